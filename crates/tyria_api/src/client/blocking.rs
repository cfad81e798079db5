use std::io::Read;
use std::sync::Arc;

use tracing::debug;

use super::{from_value, Shared};
use crate::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::end_point::guild::GuildId;
use crate::end_point::items::ItemId;
use crate::end_point::recipes::RecipeId;
use crate::end_point::worlds::WorldId;
use crate::end_point::wvw::Match;
use crate::end_point::{BulkEndPoint, EndPoint, EndPointWithId};
use crate::error::{error_text, ApiError, ApiResult, TransportKind};
use crate::render::{ImageFormat, RenderFile};
use crate::request::{ApiRequest, CachePolicy, Page, PageHeaders, RawResponse};

/// Blocking client built on [ureq]. Cheap to clone, clones share the agent and the cache.
///
/// ```no_run
/// use tyria_api::{Client, ClientConfig};
/// use tyria_api::end_point::items::Item;
///
/// let client = Client::new(ClientConfig::new());
/// let items: Vec<Item> = client.many(&[19721, 24])?;
/// # Ok::<(), tyria_api::ApiError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    agent: ureq::Agent,
    shared: Arc<Shared>,
}

impl Client {
    pub fn new(config: ClientConfig) -> Self {
        Self::build(config, None)
    }
    /// uses `cache` instead of creating one. eg: to share it with an [crate::AsyncClient]
    pub fn with_cache(config: ClientConfig, cache: Arc<ResponseCache>) -> Self {
        Self::build(config, Some(cache))
    }
    fn build(config: ClientConfig, cache: Option<Arc<ResponseCache>>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();
        Self {
            agent,
            shared: Arc::new(Shared::new(config, cache)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }
    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.shared.cache.as_ref()
    }

    fn execute_once(&self, request: &ApiRequest) -> ApiResult<RawResponse> {
        debug!(url = %request.url, auth = request.api_key.is_some(), "GET");
        let mut call = self.agent.get(request.url.as_str());
        if let Some(key) = &request.api_key {
            call = call.set("Authorization", &format!("Bearer {key}"));
        }
        let url = request.url.to_string();
        match call.call() {
            Ok(response) => {
                let pages = PageHeaders::from_headers(|name| response.header(name));
                let cache = CachePolicy::from_header(response.header("Cache-Control"));
                let mut body = vec![];
                response
                    .into_reader()
                    .read_to_end(&mut body)
                    .map_err(|source| ApiError::Io {
                        url: url.clone(),
                        source,
                    })?;
                Ok(RawResponse {
                    url: request.url.clone(),
                    body,
                    pages,
                    cache,
                })
            }
            Err(ureq::Error::Status(status, response)) => {
                let mut body = vec![];
                // the error text is optional, a broken body must not hide the status
                let _ = response.into_reader().read_to_end(&mut body);
                Err(ApiError::Status {
                    status,
                    url,
                    text: error_text(&body),
                })
            }
            Err(ureq::Error::Transport(transport)) => Err(ApiError::Transport {
                url,
                kind: TransportKind::from(&transport),
                message: transport.to_string(),
            }),
        }
    }

    fn execute(&self, request: &ApiRequest) -> ApiResult<RawResponse> {
        let mut attempt = 0;
        loop {
            match self.execute_once(request) {
                Err(e) => match self.shared.retry_after(request, attempt, &e) {
                    Some(delay) => {
                        std::thread::sleep(delay);
                        attempt += 1;
                    }
                    None => return Err(e),
                },
                ok => return ok,
            }
        }
    }

    /// json of `request`, from the cache if possible
    fn fetch<T: serde::de::DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        let value = match self.shared.cached(request) {
            Some(value) => value,
            None => {
                let response = self.execute(request)?;
                self.shared.store(request, &response)?
            }
        };
        from_value(request.url.as_str(), &value)
    }

    /// singleton resources like [crate::end_point::build::Build] or [crate::end_point::account::Account]
    pub fn get<T: EndPoint>(&self) -> ApiResult<T> {
        self.fetch(&self.shared.get_request::<T>()?)
    }

    pub fn ids<T: BulkEndPoint>(&self) -> ApiResult<Vec<T::Id>> {
        self.fetch(&self.shared.get_request::<T>()?)
    }

    pub fn single<T: EndPointWithId>(&self, id: &T::Id) -> ApiResult<T> {
        self.fetch(&self.shared.single_request::<T>(id)?)
    }

    /// Items in the order of `ids`. Ids unknown to the api are missing from the result.
    /// Long lists are split into several requests.
    pub fn many<T: BulkEndPoint>(&self, ids: &[T::Id]) -> ApiResult<Vec<T>> {
        let mut plan = self.shared.plan_many::<T>(ids)?;
        for request in plan.requests().to_vec() {
            let response = self.execute(&request);
            self.shared.absorb::<T>(&mut plan, &request, response)?;
        }
        self.shared.finish(plan, ids)
    }

    pub fn all<T: BulkEndPoint>(&self) -> ApiResult<Vec<T>> {
        if T::ALL {
            let request = self.shared.all_request::<T>()?;
            let response = self.execute(&request)?;
            response.json()
        } else {
            let ids = self.ids::<T>()?;
            self.many(&ids)
        }
    }

    /// `page` starts at 0
    pub fn page<T: BulkEndPoint>(&self, page: usize, page_size: usize) -> ApiResult<Page<T>> {
        let (request, page_size) = self.shared.page_request::<T>(page, page_size)?;
        self.execute(&request)?.into_page(page, page_size)
    }

    /// ids of the guilds with exactly this name
    pub fn guild_search(&self, name: &str) -> ApiResult<Vec<GuildId>> {
        self.fetch(&self.shared.guild_search_request(name)?)
    }

    /// recipes which use `item` as an ingredient
    pub fn recipes_with_input(&self, item: ItemId) -> ApiResult<Vec<RecipeId>> {
        self.fetch(&self.shared.recipe_search_request("input", item)?)
    }

    /// recipes which craft `item`
    pub fn recipes_with_output(&self, item: ItemId) -> ApiResult<Vec<RecipeId>> {
        self.fetch(&self.shared.recipe_search_request("output", item)?)
    }

    pub fn match_for_world(&self, world: WorldId) -> ApiResult<Match> {
        self.fetch(&self.shared.match_for_world_request(world)?)
    }

    /// raw bytes of the image
    pub fn render(&self, file: &RenderFile, format: ImageFormat) -> ApiResult<Vec<u8>> {
        let request = self.shared.render_request(file, format)?;
        Ok(self.execute(&request)?.body)
    }
}
