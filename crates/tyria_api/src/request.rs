//! Request building and response metadata. Shared by the blocking and the async client,
//! which only differ in how the bytes are moved.
use std::str::FromStr;
use std::time::Duration;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::ClientConfig;
use crate::end_point::EndPoint;
use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    De,
    Fr,
    Zh,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::De => "de",
            Self::Fr => "fr",
            Self::Zh => "zh",
        }
    }
}

impl FromStr for Language {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            "de" => Ok(Self::De),
            "fr" => Ok(Self::Fr),
            "zh" => Ok(Self::Zh),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}

/// A fully resolved GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: Url,
    /// the api key, sent as a bearer token
    pub api_key: Option<String>,
}

impl ApiRequest {
    /// only anonymous requests are shared through the cache
    pub fn is_cacheable(&self) -> bool {
        self.api_key.is_none()
    }
}

/// how a request should treat the api key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth {
    None,
    Optional,
    Required(&'static str),
}

pub(crate) fn build_request(
    config: &ClientConfig,
    path: &str,
    segment: Option<&str>,
    query: &[(&str, &str)],
    localized: bool,
    auth: Auth,
) -> ApiResult<ApiRequest> {
    let api_key = match auth {
        Auth::None => None,
        Auth::Optional => config.api_key.clone(),
        Auth::Required(endpoint) => Some(
            config
                .api_key
                .clone()
                .ok_or(ApiError::MissingApiKey { endpoint })?,
        ),
    };
    let mut url = config.base_url.join(path)?;
    if let Some(segment) = segment {
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .push(segment);
    }
    let mut pairs: Vec<(&str, &str)> = query.to_vec();
    if localized {
        pairs.push(("lang", config.language.code()));
    }
    if let Some(schema) = config.schema_version.as_deref() {
        pairs.push(("v", schema));
    }
    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
    Ok(ApiRequest { url, api_key })
}

/// request for the endpoint `T`. `segment` is appended to the path (eg: an id)
pub(crate) fn endpoint_request<T: EndPoint>(
    config: &ClientConfig,
    segment: Option<&str>,
    query: &[(&str, &str)],
) -> ApiResult<ApiRequest> {
    let auth = if T::AUTH {
        Auth::Required(T::URL)
    } else if T::OPTIONAL_AUTH {
        Auth::Optional
    } else {
        Auth::None
    };
    build_request(config, T::URL, segment, query, T::LOCALE, auth)
}

pub(crate) fn join_ids<I: std::fmt::Display>(ids: &[I]) -> String {
    ids.iter().join(",")
}

/// one page of a bulk endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 0 based
    pub page: usize,
    pub page_size: usize,
    pub page_total: usize,
    pub result_total: usize,
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.page + 1 >= self.page_total
    }
    pub fn next_page(&self) -> Option<usize> {
        (!self.is_last()).then_some(self.page + 1)
    }
}

/// The pagination headers. The api sends them on every bulk response, not just paged ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageHeaders {
    pub page_size: Option<usize>,
    pub page_total: Option<usize>,
    pub result_total: Option<usize>,
    pub result_count: Option<usize>,
}

impl PageHeaders {
    pub(crate) fn from_headers<'a>(header: impl Fn(&str) -> Option<&'a str>) -> Self {
        let number = |name: &str| header(name).and_then(|v| v.trim().parse().ok());
        Self {
            page_size: number("X-Page-Size"),
            page_total: number("X-Page-Total"),
            result_total: number("X-Result-Total"),
            result_count: number("X-Result-Count"),
        }
    }
}

/// how long a response may be cached, based on its `Cache-Control` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// no usable header. the configured ttl applies
    Default,
    /// `no-store`, `no-cache` or `max-age=0`
    Skip,
    For(Duration),
}

impl CachePolicy {
    pub fn from_header(header: Option<&str>) -> Self {
        let Some(header) = header else {
            return Self::Default;
        };
        let mut policy = Self::Default;
        for directive in header.split(',').map(|d| d.trim().to_ascii_lowercase()) {
            match directive.as_str() {
                "no-store" | "no-cache" | "private" => return Self::Skip,
                _ => {
                    if let Some(age) = directive.strip_prefix("max-age=") {
                        policy = match age.trim().parse::<u64>() {
                            Ok(0) => Self::Skip,
                            Ok(secs) => Self::For(Duration::from_secs(secs)),
                            Err(_) => policy,
                        };
                    }
                }
            }
        }
        policy
    }
}

/// a successful response before deserialization
#[derive(Debug, Clone)]
pub(crate) struct RawResponse {
    pub url: Url,
    pub body: Vec<u8>,
    pub pages: PageHeaders,
    pub cache: CachePolicy,
}

impl RawResponse {
    pub(crate) fn json<T: serde::de::DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_slice(&self.body).map_err(|source| ApiError::Json {
            url: self.url.to_string(),
            source,
        })
    }
    pub(crate) fn into_page<T: serde::de::DeserializeOwned>(
        self,
        page: usize,
        page_size: usize,
    ) -> ApiResult<Page<T>> {
        let items: Vec<T> = self.json()?;
        Ok(Page {
            page,
            page_size: self.pages.page_size.unwrap_or(page_size),
            page_total: self.pages.page_total.unwrap_or(page + 1),
            result_total: self.pages.result_total.unwrap_or(items.len()),
            items,
        })
    }
}
