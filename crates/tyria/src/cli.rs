use crate::config::Overrides;
use crate::prelude::*;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tyria_api::end_point::account::{Account, AccountAchievements};
use tyria_api::end_point::achievements::{Achievement, AchievementId};
use tyria_api::end_point::build::Build;
use tyria_api::end_point::colors::{Color, ColorId};
use tyria_api::end_point::guild::{Guild, GuildId};
use tyria_api::end_point::items::{Item, ItemId};
use tyria_api::end_point::maps::{Map, MapId};
use tyria_api::end_point::recipes::{Recipe, RecipeId};
use tyria_api::end_point::skins::{Skin, SkinId};
use tyria_api::end_point::worlds::{World, WorldId};
use tyria_api::end_point::wvw::{Match, MatchId};
use tyria_api::{AsyncClient, Client, ClientConfig, ImageFormat, Language, RenderFile};

#[derive(Debug, Parser)]
#[command(name = "tyria", version, about = "Query the Guild Wars 2 API")]
pub struct Cli {
    /// api key for account endpoints. overrides the key in config.json
    #[arg(long, global = true, env = "TYRIA_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// en, es, de, fr or zh
    #[arg(long, global = true, env = "TYRIA_LANG")]
    pub lang: Option<Language>,
    /// don't keep responses in memory between requests
    #[arg(long, global = true)]
    pub no_cache: bool,
    /// use the async client
    #[arg(long = "async", global = true)]
    pub use_async: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// current build id of the game
    Build,
    Item {
        #[arg(required = true)]
        ids: Vec<ItemId>,
    },
    Skin {
        #[arg(required = true)]
        ids: Vec<SkinId>,
    },
    Recipe { id: RecipeId },
    /// ids of recipes that use or craft an item
    Recipes {
        #[arg(long, conflicts_with = "output", required_unless_present = "output")]
        input: Option<ItemId>,
        #[arg(long)]
        output: Option<ItemId>,
    },
    Color {
        #[arg(required = true)]
        ids: Vec<ColorId>,
    },
    Map { id: MapId },
    /// every world with its population
    Worlds,
    /// a guild by id, or the ids of guilds with this name
    Guild {
        #[arg(conflicts_with = "name", required_unless_present = "name")]
        id: Option<GuildId>,
        #[arg(long)]
        name: Option<String>,
    },
    /// a wvw match by id (eg: `1-4`), or the match of a world
    Wvw {
        #[arg(conflicts_with = "world", required_unless_present = "world")]
        match_id: Option<MatchId>,
        #[arg(long)]
        world: Option<WorldId>,
    },
    /// needs an api key
    Account {
        /// achievement progress instead of the account summary
        #[arg(long)]
        achievements: bool,
    },
    Achievement {
        #[arg(required = true)]
        ids: Vec<AchievementId>,
    },
    /// download an icon from the render service
    Render {
        /// an icon url as found in api responses
        url: String,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value = "png")]
        format: ImageFormat,
    },
}

fn to_json<T: Serialize>(value: T) -> Result<Value> {
    serde_json::to_value(value)
        .into_diagnostic()
        .wrap_err("failed to serialize response")
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            language: self.lang,
            no_cache: self.no_cache,
        }
    }

    pub fn run(&self, config: ClientConfig) -> Result<Value> {
        debug!(command = ?self.command, use_async = self.use_async, "running");
        if self.use_async {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .into_diagnostic()
                .wrap_err("failed to create tokio runtime")?;
            let client = AsyncClient::new(config)?;
            runtime.block_on(self.command.run_async(&client))
        } else {
            self.command.run_blocking(&Client::new(config))
        }
    }
}

impl Command {
    pub fn run_blocking(&self, client: &Client) -> Result<Value> {
        match self {
            Self::Build => to_json(client.get::<Build>()?),
            Self::Item { ids } => to_json(client.many::<Item>(ids)?),
            Self::Skin { ids } => to_json(client.many::<Skin>(ids)?),
            Self::Recipe { id } => to_json(client.single::<Recipe>(id)?),
            Self::Recipes { input, output } => match (input, output) {
                (Some(input), _) => to_json(client.recipes_with_input(*input)?),
                (None, Some(output)) => to_json(client.recipes_with_output(*output)?),
                (None, None) => bail!("pass --input or --output"),
            },
            Self::Color { ids } => to_json(client.many::<Color>(ids)?),
            Self::Map { id } => to_json(client.single::<Map>(id)?),
            Self::Worlds => to_json(client.all::<World>()?),
            Self::Guild { id, name } => match (id, name) {
                (Some(id), _) => to_json(client.single::<Guild>(id)?),
                (None, Some(name)) => to_json(client.guild_search(name)?),
                (None, None) => bail!("pass a guild id or --name"),
            },
            Self::Wvw { match_id, world } => match (match_id, world) {
                (Some(id), _) => to_json(client.single::<Match>(id)?),
                (None, Some(world)) => to_json(client.match_for_world(*world)?),
                (None, None) => bail!("pass a match id or --world"),
            },
            Self::Account { achievements } => {
                if *achievements {
                    to_json(client.get::<AccountAchievements>()?)
                } else {
                    to_json(client.get::<Account>()?)
                }
            }
            Self::Achievement { ids } => to_json(client.many::<Achievement>(ids)?),
            Self::Render { url, out, format } => {
                let file: RenderFile = url.parse()?;
                let bytes = client.render(&file, *format)?;
                write_render(&file, out, &bytes)
            }
        }
    }

    pub async fn run_async(&self, client: &AsyncClient) -> Result<Value> {
        match self {
            Self::Build => to_json(client.get::<Build>().await?),
            Self::Item { ids } => to_json(client.many::<Item>(ids).await?),
            Self::Skin { ids } => to_json(client.many::<Skin>(ids).await?),
            Self::Recipe { id } => to_json(client.single::<Recipe>(id).await?),
            Self::Recipes { input, output } => match (input, output) {
                (Some(input), _) => to_json(client.recipes_with_input(*input).await?),
                (None, Some(output)) => to_json(client.recipes_with_output(*output).await?),
                (None, None) => bail!("pass --input or --output"),
            },
            Self::Color { ids } => to_json(client.many::<Color>(ids).await?),
            Self::Map { id } => to_json(client.single::<Map>(id).await?),
            Self::Worlds => to_json(client.all::<World>().await?),
            Self::Guild { id, name } => match (id, name) {
                (Some(id), _) => to_json(client.single::<Guild>(id).await?),
                (None, Some(name)) => to_json(client.guild_search(name).await?),
                (None, None) => bail!("pass a guild id or --name"),
            },
            Self::Wvw { match_id, world } => match (match_id, world) {
                (Some(id), _) => to_json(client.single::<Match>(id).await?),
                (None, Some(world)) => to_json(client.match_for_world(*world).await?),
                (None, None) => bail!("pass a match id or --world"),
            },
            Self::Account { achievements } => {
                if *achievements {
                    to_json(client.get::<AccountAchievements>().await?)
                } else {
                    to_json(client.get::<Account>().await?)
                }
            }
            Self::Achievement { ids } => to_json(client.many::<Achievement>(ids).await?),
            Self::Render { url, out, format } => {
                let file: RenderFile = url.parse()?;
                let bytes = client.render(&file, *format).await?;
                write_render(&file, out, &bytes)
            }
        }
    }
}

/// the output path is picked by the user, so it is not confined to the data dir
fn write_render(file: &RenderFile, out: &Path, bytes: &[u8]) -> Result<Value> {
    std::fs::write(out, bytes)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write {out:?}"))?;
    info!(%file, ?out, size = bytes.len(), "saved render file");
    Ok(serde_json::json!({
        "file": file.to_string(),
        "path": out,
        "size": bytes.len(),
    }))
}
