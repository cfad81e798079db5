use crate::prelude::*;

/// guild ids are uuids like `4BBB52AA-D768-4FC6-8EDE-C299F2822F0F`
pub type GuildId = String;
pub(crate) const SEARCH_SEGMENT: &str = "search";

/// Without an api key only `id`, `name`, `tag` and `emblem` are sent.
/// The other fields need a key of a guild member (or the leader for some of them).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
    pub tag: String,
    pub emblem: Option<Emblem>,
    pub level: Option<u32>,
    pub motd: Option<String>,
    pub influence: Option<u64>,
    pub aetherium: Option<u64>,
    pub resonance: Option<u64>,
    pub favor: Option<u64>,
    pub member_count: Option<u32>,
    pub member_capacity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emblem {
    pub background: EmblemLayer,
    pub foreground: EmblemLayer,
    /// `FlipBackgroundHorizontal`, `FlipForegroundVertical` etc..
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmblemLayer {
    pub id: u32,
    /// color ids, see [super::colors::Color]
    #[serde(default)]
    pub colors: Vec<u32>,
}

impl Guild {
    /// `[TAG] name`, the way the game shows it
    pub fn display_name(&self) -> String {
        format!("[{}] {}", self.tag, self.name)
    }
}

impl EndPoint for Guild {
    const URL: &'static str = const_format::concatcp!(V2, "/guild");
    const AUTH: bool = false;
    const LOCALE: bool = false;
    const OPTIONAL_AUTH: bool = true;
}

impl EndPointWithId for Guild {
    type Id = GuildId;
}
