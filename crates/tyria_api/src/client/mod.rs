//! The two clients only differ in how requests are sent and how they wait between retries.
//! Everything else (which request to send, what to cache, how `many` merges cached
//! and fetched items) lives in [Shared].
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::cache::ResponseCache;
use crate::config::ClientConfig;
use crate::end_point::guild::{Guild, SEARCH_SEGMENT};
use crate::end_point::recipes::SEARCH_URL;
use crate::end_point::wvw::Match;
use crate::end_point::{BulkEndPoint, EndPoint, EndPointWithId};
use crate::error::{ApiError, ApiResult};
use crate::render::{ImageFormat, RenderFile};
use crate::request::{build_request, endpoint_request, join_ids, ApiRequest, Auth, RawResponse};
use crate::MAX_IDS_PER_REQUEST;

mod asynchronous;
mod blocking;

pub use asynchronous::AsyncClient;
pub use blocking::Client;

#[derive(Debug)]
pub(crate) struct Shared {
    pub config: ClientConfig,
    pub cache: Option<Arc<ResponseCache>>,
}

/// the work left for `many` after looking into the cache
#[derive(Debug, Default)]
pub(crate) struct ManyPlan {
    /// json of every id we have so far, keyed by the id's string form
    found: HashMap<String, Arc<Value>>,
    /// requests for the ids that were not cached
    requests: Vec<ApiRequest>,
}

impl ManyPlan {
    pub fn requests(&self) -> &[ApiRequest] {
        &self.requests
    }
}

impl Shared {
    pub fn new(config: ClientConfig, cache: Option<Arc<ResponseCache>>) -> Self {
        let cache = cache.or_else(|| {
            config
                .cache_ttl
                .map(|ttl| Arc::new(ResponseCache::new(ttl)))
        });
        Self { config, cache }
    }

    /// how long to wait before retrying after `error`. `None` means give up
    pub fn retry_after(&self, request: &ApiRequest, attempt: u8, error: &ApiError) -> Option<Duration> {
        if !error.is_retryable() || attempt >= self.config.max_retries {
            return None;
        }
        let delay = self.config.backoff(attempt);
        warn!(url = %request.url, attempt, ?delay, %error, "retrying request");
        Some(delay)
    }

    pub fn cached(&self, request: &ApiRequest) -> Option<Arc<Value>> {
        if !request.is_cacheable() {
            return None;
        }
        self.cache.as_ref()?.get(request.url.as_str())
    }

    pub fn store(&self, request: &ApiRequest, response: &RawResponse) -> ApiResult<Arc<Value>> {
        let value: Value = response.json()?;
        if let Some(cache) = self.cache.as_ref().filter(|_| request.is_cacheable()) {
            cache.insert(request.url.to_string(), value.clone(), response.cache);
        }
        Ok(Arc::new(value))
    }

    pub fn get_request<T: EndPoint>(&self) -> ApiResult<ApiRequest> {
        endpoint_request::<T>(&self.config, None, &[])
    }

    pub fn single_request<T: EndPointWithId>(&self, id: &T::Id) -> ApiResult<ApiRequest> {
        endpoint_request::<T>(&self.config, Some(id.to_string().as_str()), &[])
    }

    pub fn all_request<T: BulkEndPoint>(&self) -> ApiResult<ApiRequest> {
        endpoint_request::<T>(&self.config, None, &[("ids", "all")])
    }

    /// the page size is clamped to what the api accepts
    pub fn page_request<T: BulkEndPoint>(
        &self,
        page: usize,
        page_size: usize,
    ) -> ApiResult<(ApiRequest, usize)> {
        let page_size = page_size.clamp(1, MAX_IDS_PER_REQUEST);
        let request = endpoint_request::<T>(
            &self.config,
            None,
            &[
                ("page", page.to_string().as_str()),
                ("page_size", page_size.to_string().as_str()),
            ],
        )?;
        Ok((request, page_size))
    }

    pub fn guild_search_request(&self, name: &str) -> ApiResult<ApiRequest> {
        build_request(
            &self.config,
            Guild::URL,
            Some(SEARCH_SEGMENT),
            &[("name", name)],
            false,
            Auth::None,
        )
    }

    /// `direction` is `input` or `output`
    pub fn recipe_search_request(&self, direction: &str, item: u32) -> ApiResult<ApiRequest> {
        build_request(
            &self.config,
            SEARCH_URL,
            None,
            &[(direction, item.to_string().as_str())],
            false,
            Auth::None,
        )
    }

    pub fn match_for_world_request(&self, world: u32) -> ApiResult<ApiRequest> {
        endpoint_request::<Match>(&self.config, None, &[("world", world.to_string().as_str())])
    }

    pub fn render_request(&self, file: &RenderFile, format: ImageFormat) -> ApiResult<ApiRequest> {
        Ok(ApiRequest {
            url: file.url(&self.config.render_url, format)?,
            api_key: None,
        })
    }

    /// splits `ids` into what the cache already has and chunked requests for the rest
    pub fn plan_many<T: BulkEndPoint>(&self, ids: &[T::Id]) -> ApiResult<ManyPlan> {
        let mut plan = ManyPlan::default();
        let mut seen = HashSet::new();
        let mut missing = vec![];
        for id in ids {
            let id = id.to_string();
            if !seen.insert(id.clone()) {
                continue;
            }
            let single = endpoint_request::<T>(&self.config, Some(id.as_str()), &[])?;
            match self.cached(&single) {
                Some(value) => {
                    plan.found.insert(id, value);
                }
                None => missing.push(id),
            }
        }
        for chunk in missing.chunks(MAX_IDS_PER_REQUEST) {
            plan.requests.push(endpoint_request::<T>(
                &self.config,
                None,
                &[("ids", join_ids(chunk).as_str())],
            )?);
        }
        Ok(plan)
    }

    /// adds the items of a bulk response to the plan and to the cache. Every item is cached
    /// under the url of its single request, so that `single` can find it too.
    pub fn absorb<T: BulkEndPoint>(
        &self,
        plan: &mut ManyPlan,
        request: &ApiRequest,
        response: ApiResult<RawResponse>,
    ) -> ApiResult<()> {
        let response = match response {
            Ok(response) => response,
            Err(e) if e.is_all_ids_invalid() => return Ok(()),
            Err(e) => return Err(e),
        };
        let items: Vec<Value> = response.json()?;
        for item in items {
            let Some(id) = item.get("id").and_then(value_id) else {
                return Err(ApiError::Json {
                    url: response.url.to_string(),
                    source: serde::de::Error::custom("bulk item without an id"),
                });
            };
            let single = endpoint_request::<T>(&self.config, Some(id.as_str()), &[])?;
            if let Some(cache) = self.cache.as_ref().filter(|_| request.is_cacheable()) {
                cache.insert(single.url.to_string(), item.clone(), response.cache);
            }
            plan.found.insert(id, Arc::new(item));
        }
        Ok(())
    }

    /// the found items in the order of `ids`. unknown ids are skipped
    pub fn finish<T: BulkEndPoint>(
        &self,
        plan: ManyPlan,
        ids: &[T::Id],
    ) -> ApiResult<Vec<T>> {
        ids.iter()
            .filter_map(|id| plan.found.get(&id.to_string()))
            .map(|value| from_value(T::URL, value))
            .collect()
    }
}

/// ids are either numbers or strings in the api
fn value_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn from_value<T: DeserializeOwned>(url: &str, value: &Value) -> ApiResult<T> {
    T::deserialize(value).map_err(|source| ApiError::Json {
        url: url.to_string(),
        source,
    })
}
