//! Configuration shared by [crate::Client] and [crate::AsyncClient]
use std::time::Duration;

use url::Url;

use crate::error::ApiResult;
use crate::request::Language;
use crate::{API_BASE_URL, LATEST_SCHEMA, RENDER_BASE_URL};

/// Use the `with_*` methods to customize it.
///
/// ```
/// use tyria_api::{ClientConfig, Language};
/// use std::time::Duration;
///
/// let config = ClientConfig::new()
///     .with_language(Language::De)
///     .with_cache_ttl(Duration::from_secs(300))
///     .with_api_key("XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXXXXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub(crate) base_url: Url,
    pub(crate) render_url: Url,
    pub(crate) api_key: Option<String>,
    pub(crate) language: Language,
    /// sent as `v=`. `None` lets the api pick its (old) default schema
    pub(crate) schema_version: Option<String>,
    pub(crate) timeout: Duration,
    pub(crate) user_agent: String,
    pub(crate) max_retries: u8,
    pub(crate) retry_delay: Duration,
    /// `None` disables the response cache
    pub(crate) cache_ttl: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: parse_base(API_BASE_URL).expect("default api url is valid"),
            render_url: parse_base(RENDER_BASE_URL).expect("default render url is valid"),
            api_key: None,
            language: Language::default(),
            schema_version: Some(LATEST_SCHEMA.to_string()),
            timeout: Duration::from_secs(30),
            user_agent: concat!("tyria_api/", env!("CARGO_PKG_VERSION")).to_string(),
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
            cache_ttl: None,
        }
    }
}

/// `Url::join` replaces the last path segment unless the base ends with a slash
fn parse_base(url: &str) -> ApiResult<Url> {
    if url.ends_with('/') {
        Ok(Url::parse(url)?)
    } else {
        Ok(Url::parse(&format!("{url}/"))?)
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_base_url(mut self, url: &str) -> ApiResult<Self> {
        self.base_url = parse_base(url)?;
        Ok(self)
    }
    pub fn with_render_url(mut self, url: &str) -> ApiResult<Self> {
        self.render_url = parse_base(url)?;
        Ok(self)
    }
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
    pub fn with_optional_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }
    pub fn with_language(mut self, language: Language) -> Self {
        self.language = language;
        self
    }
    pub fn with_schema_version(mut self, schema: Option<String>) -> Self {
        self.schema_version = schema;
        self
    }
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries;
        self
    }
    /// base delay of the exponential backoff between retries
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
    /// enables the response cache. used when the api doesn't send a `Cache-Control: max-age`
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }
    pub fn without_cache(mut self) -> Self {
        self.cache_ttl = None;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
    pub fn render_url(&self) -> &Url {
        &self.render_url
    }
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
    pub fn language(&self) -> Language {
        self.language
    }
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl
    }

    /// delay before retry number `attempt` (starting at 0)
    pub(crate) fn backoff(&self, attempt: u8) -> Duration {
        self.retry_delay
            .saturating_mul(2u32.saturating_pow(u32::from(attempt)))
    }
}
