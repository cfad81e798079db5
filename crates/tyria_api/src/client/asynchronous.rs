use std::sync::Arc;

use reqwest::header::{ACCEPT, CACHE_CONTROL};
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

/// Async version of [crate::Client], built on [reqwest]. Needs a tokio runtime.
#[derive(Debug, Clone)]
pub struct AsyncClient {
    http: reqwest::Client,
    shared: Arc<Shared>,
}

impl AsyncClient {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        Self::build(config, None)
    }
    pub fn with_cache(config: ClientConfig, cache: Arc<ResponseCache>) -> ApiResult<Self> {
        Self::build(config, Some(cache))
    }
    fn build(config: ClientConfig, cache: Option<Arc<ResponseCache>>) -> ApiResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;
        Ok(Self {
            http,
            shared: Arc::new(Shared::new(config, cache)),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.shared.config
    }
    pub fn cache(&self) -> Option<&Arc<ResponseCache>> {
        self.shared.cache.as_ref()
    }

    async fn execute_once(&self, request: &ApiRequest) -> ApiResult<RawResponse> {
        debug!(url = %request.url, auth = request.api_key.is_some(), "GET");
        let transport = |e: reqwest::Error| ApiError::Transport {
            url: request.url.to_string(),
            kind: TransportKind::from(&e),
            message: e.to_string(),
        };
        let mut call = self
            .http
            .get(request.url.clone())
            .header(ACCEPT, "application/json");
        if let Some(key) = &request.api_key {
            call = call.bearer_auth(key);
        }
        let response = call.send().await.map_err(transport)?;
        let status = response.status();
        let headers = response.headers();
        let pages = PageHeaders::from_headers(|name| {
            headers.get(name).and_then(|value| value.to_str().ok())
        });
        let cache = CachePolicy::from_header(
            headers
                .get(CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
        );
        let body = response.bytes().await.map_err(transport)?.to_vec();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                url: request.url.to_string(),
                text: error_text(&body),
            });
        }
        Ok(RawResponse {
            url: request.url.clone(),
            body,
            pages,
            cache,
        })
    }

    async fn execute(&self, request: &ApiRequest) -> ApiResult<RawResponse> {
        let mut attempt = 0;
        loop {
            match self.execute_once(request).await {
                Err(e) => match self.shared.retry_after(request, attempt, &e) {
                    Some(delay) => {
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(e),
                },
                ok => return ok,
            }
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, request: &ApiRequest) -> ApiResult<T> {
        let value = match self.shared.cached(request) {
            Some(value) => value,
            None => {
                let response = self.execute(request).await?;
                self.shared.store(request, &response)?
            }
        };
        from_value(request.url.as_str(), &value)
    }

    pub async fn get<T: EndPoint>(&self) -> ApiResult<T> {
        self.fetch(&self.shared.get_request::<T>()?).await
    }

    pub async fn ids<T: BulkEndPoint>(&self) -> ApiResult<Vec<T::Id>> {
        self.fetch(&self.shared.get_request::<T>()?).await
    }

    pub async fn single<T: EndPointWithId>(&self, id: &T::Id) -> ApiResult<T> {
        self.fetch(&self.shared.single_request::<T>(id)?).await
    }

    /// chunks are fetched one after the other, to stay friendly with the rate limit
    pub async fn many<T: BulkEndPoint>(&self, ids: &[T::Id]) -> ApiResult<Vec<T>> {
        let mut plan = self.shared.plan_many::<T>(ids)?;
        for request in plan.requests().to_vec() {
            let response = self.execute(&request).await;
            self.shared.absorb::<T>(&mut plan, &request, response)?;
        }
        self.shared.finish(plan, ids)
    }

    pub async fn all<T: BulkEndPoint>(&self) -> ApiResult<Vec<T>> {
        if T::ALL {
            let request = self.shared.all_request::<T>()?;
            self.execute(&request).await?.json()
        } else {
            let ids = self.ids::<T>().await?;
            self.many(&ids).await
        }
    }

    pub async fn page<T: BulkEndPoint>(
        &self,
        page: usize,
        page_size: usize,
    ) -> ApiResult<Page<T>> {
        let (request, page_size) = self.shared.page_request::<T>(page, page_size)?;
        self.execute(&request).await?.into_page(page, page_size)
    }

    pub async fn guild_search(&self, name: &str) -> ApiResult<Vec<GuildId>> {
        self.fetch(&self.shared.guild_search_request(name)?).await
    }

    pub async fn recipes_with_input(&self, item: ItemId) -> ApiResult<Vec<RecipeId>> {
        self.fetch(&self.shared.recipe_search_request("input", item)?)
            .await
    }

    pub async fn recipes_with_output(&self, item: ItemId) -> ApiResult<Vec<RecipeId>> {
        self.fetch(&self.shared.recipe_search_request("output", item)?)
            .await
    }

    pub async fn match_for_world(&self, world: WorldId) -> ApiResult<Match> {
        self.fetch(&self.shared.match_for_world_request(world)?)
            .await
    }

    pub async fn render(&self, file: &RenderFile, format: ImageFormat) -> ApiResult<Vec<u8>> {
        let request = self.shared.render_request(file, format)?;
        Ok(self.execute(&request).await?.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::end_point::colors::Color;
    use crate::end_point::guild::Guild;
    use crate::end_point::recipes::Recipe;
    use crate::Client;
    use serde_json::json;
    use similar_asserts::assert_eq;
    use std::time::Duration;
    use wiremock::matchers::{header, header_exists, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> ClientConfig {
        ClientConfig::new()
            .with_base_url(&server.uri())
            .unwrap()
            .with_schema_version(None)
            .with_retry_delay(Duration::from_millis(1))
    }

    fn recipe(id: u32) -> serde_json::Value {
        json!({
            "id": id,
            "type": "Refinement",
            "output_item_id": 19713,
            "output_item_count": 1,
            "time_to_craft_ms": 1000,
            "disciplines": ["Artificer", "Armorsmith"],
            "min_rating": 0,
            "flags": ["AutoLearned"],
            "ingredients": [{"type": "Item", "id": 19723, "count": 2}],
            "chat_link": "[&CQEAAAA=]"
        })
    }

    #[tokio::test]
    async fn lang_is_only_sent_to_localized_endpoints() {
        let server = MockServer::start().await;
        Mock::given(path("/v2/recipes/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(recipe(1)))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/v2/colors"))
            .and(query_param("lang", "de"))
            .and(query_param("ids", "all"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;
        let client = AsyncClient::new(config(&server).with_language(crate::Language::De)).unwrap();
        let recipe = client.single::<Recipe>(&1).await.unwrap();
        assert_eq!(recipe.output_item_id, 19713);
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), None);

        let colors = client.all::<Color>().await.unwrap();
        assert!(colors.is_empty());
    }

    #[tokio::test]
    async fn all_without_ids_all_goes_through_many() {
        let server = MockServer::start().await;
        Mock::given(path("/v2/recipes"))
            .and(query_param("ids", "1,2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([recipe(2), recipe(1)])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(path("/v2/recipes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
            .expect(1)
            .mount(&server)
            .await;
        let client = AsyncClient::new(config(&server)).unwrap();
        let recipes = client.all::<Recipe>().await.unwrap();
        let ids: Vec<u32> = recipes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn guild_with_optional_key() {
        let server = MockServer::start().await;
        let id = "116E0C0E-0035-44A9-BB22-4AE3E23127E5";
        Mock::given(path("/v2/guild/search"))
            .and(query_param("name", "Lords of Tyria"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([id])))
            .mount(&server)
            .await;
        Mock::given(path(format!("/v2/guild/{id}")))
            .and(header("Authorization", "Bearer key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "name": "Lords of Tyria",
                "tag": "LoT",
                "level": 42,
                "motd": "hello"
            })))
            .expect(1)
            .mount(&server)
            .await;
        let client = AsyncClient::new(config(&server).with_api_key("key")).unwrap();
        let ids = client.guild_search("Lords of Tyria").await.unwrap();
        assert_eq!(ids, vec![id.to_string()]);
        let guild = client.single::<Guild>(&ids[0]).await.unwrap();
        assert_eq!(guild.display_name(), "[LoT] Lords of Tyria");
        assert_eq!(guild.motd.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn recipe_search_and_rate_limit() {
        let server = MockServer::start().await;
        Mock::given(path("/v2/recipes/search"))
            .and(query_param("output", "19713"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({"text": "too many requests"})))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(path("/v2/recipes/search"))
            .and(query_param("output", "19713"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2])))
            .mount(&server)
            .await;
        let client = AsyncClient::new(config(&server)).unwrap();
        assert_eq!(client.recipes_with_output(19713).await.unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn no_store_responses_are_not_cached() {
        let server = MockServer::start().await;
        Mock::given(path("/v2/recipes/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Cache-Control", "no-store")
                    .set_body_json(recipe(1)),
            )
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(path("/v2/recipes/2"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Cache-Control", "public, max-age=300")
                    .set_body_json(recipe(2)),
            )
            .expect(1)
            .mount(&server)
            .await;
        let client =
            AsyncClient::new(config(&server).with_cache_ttl(Duration::from_secs(60))).unwrap();
        for _ in 0..2 {
            client.single::<Recipe>(&1).await.unwrap();
            client.single::<Recipe>(&2).await.unwrap();
        }
        assert_eq!(client.cache().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn authenticated_responses_are_not_cached() {
        let server = MockServer::start().await;
        Mock::given(path("/v2/account"))
            .and(header_exists("Authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "A9F9A3F3-B1F7-4F9B-9F3A-9B8B3A2A9F0B",
                "name": "Tyrian.1234",
                "age": 3600,
                "world": 1001,
                "guilds": [],
                "created": "2015-08-28T20:42:00Z",
                "access": ["GuildWars2", "HeartOfThorns"],
                "commander": false
            })))
            .expect(2)
            .mount(&server)
            .await;
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60)));
        let client =
            AsyncClient::with_cache(config(&server).with_api_key("key"), cache.clone()).unwrap();
        for _ in 0..2 {
            let account = client.get::<crate::end_point::account::Account>().await.unwrap();
            assert_eq!(account.name, "Tyrian.1234");
        }
        assert!(cache.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn clients_can_share_a_cache() {
        let server = MockServer::start().await;
        Mock::given(path("/v2/recipes/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(recipe(1)))
            .expect(1)
            .mount(&server)
            .await;
        let cache = Arc::new(ResponseCache::new(Duration::from_secs(60)));
        let client = AsyncClient::with_cache(config(&server), cache.clone()).unwrap();
        client.single::<Recipe>(&1).await.unwrap();
        let blocking = Client::with_cache(config(&server), cache);
        let recipe = tokio::task::spawn_blocking(move || blocking.single::<Recipe>(&1))
            .await
            .unwrap()
            .unwrap();
        assert!(recipe.is_auto_learned());
    }

    #[tokio::test]
    async fn max_age_overrides_the_default_ttl() {
        let server = MockServer::start().await;
        Mock::given(path("/v2/recipes/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("Cache-Control", "max-age=1")
                    .set_body_json(recipe(1)),
            )
            .expect(2)
            .mount(&server)
            .await;
        let client =
            AsyncClient::new(config(&server).with_cache_ttl(Duration::from_secs(60))).unwrap();
        client.single::<Recipe>(&1).await.unwrap();
        client.single::<Recipe>(&1).await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
        tokio::time::sleep(Duration::from_millis(1100)).await;
        client.single::<Recipe>(&1).await.unwrap();
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn slow_responses_time_out() {
        let server = MockServer::start().await;
        Mock::given(path("/v2/recipes/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(500))
                    .set_body_json(recipe(1)),
            )
            .mount(&server)
            .await;
        let config = config(&server)
            .with_timeout(Duration::from_millis(50))
            .with_max_retries(0);
        let err = AsyncClient::new(config)
            .unwrap()
            .single::<Recipe>(&1)
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApiError::Transport { kind: TransportKind::Timeout, .. }),
            "{err:?}"
        );
    }

    #[tokio::test]
    async fn refused_connection_is_a_connect_error() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let config = ClientConfig::new()
            .with_base_url(&format!("http://127.0.0.1:{port}"))
            .unwrap()
            .with_max_retries(0);
        let err = AsyncClient::new(config)
            .unwrap()
            .get::<crate::end_point::build::Build>()
            .await
            .unwrap_err();
        assert!(
            matches!(err, ApiError::Transport { kind: TransportKind::Connect, .. }),
            "{err:?}"
        );
    }

    #[tokio::test]
    #[ignore = "needs network access"]
    async fn live_worlds() {
        let client = AsyncClient::new(ClientConfig::new()).unwrap();
        let worlds = client
            .all::<crate::end_point::worlds::World>()
            .await
            .unwrap();
        assert!(worlds.len() > 50);
    }
}
