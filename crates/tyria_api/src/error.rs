use miette::Diagnostic;
use thiserror::Error;

pub type ApiResult<T> = std::result::Result<T, ApiError>;

const ALL_IDS_INVALID: &str = "all ids provided are invalid";

/// what went wrong below http
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// dns, refused or failed connections, proxies
    Connect,
    Timeout,
    /// the connection broke while reading the body
    Body,
    Other,
}

impl std::fmt::Display for TransportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Connect => "connection",
            Self::Timeout => "timeout",
            Self::Body => "body",
            Self::Other => "transport",
        })
    }
}

impl From<&ureq::Transport> for TransportKind {
    fn from(transport: &ureq::Transport) -> Self {
        use ureq::ErrorKind;
        match transport.kind() {
            ErrorKind::Dns
            | ErrorKind::ConnectionFailed
            | ErrorKind::ProxyConnect
            | ErrorKind::ProxyUnauthorized => Self::Connect,
            ErrorKind::Io => {
                let timed_out = std::error::Error::source(transport)
                    .and_then(|source| source.downcast_ref::<std::io::Error>())
                    .is_some_and(|e| {
                        matches!(
                            e.kind(),
                            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
                        )
                    });
                if timed_out {
                    Self::Timeout
                } else {
                    Self::Body
                }
            }
            _ => Self::Other,
        }
    }
}

impl From<&reqwest::Error> for TransportKind {
    fn from(e: &reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect
        } else if e.is_body() || e.is_decode() {
            Self::Body
        } else {
            Self::Other
        }
    }
}

#[derive(Diagnostic, Debug, Error)]
pub enum ApiError {
    /// The api answered with a non-success status.
    /// `text` is the message from the api's `{"text": ".."}` error body, if it sent one.
    #[error("request to {url} failed with status {status}: {}", .text.as_deref().unwrap_or("no error text"))]
    #[diagnostic(code(api_error::status))]
    Status {
        status: u16,
        url: String,
        text: Option<String>,
    },
    #[error("{kind} error while requesting {url}: {message}")]
    #[diagnostic(
        code(api_error::transport),
        help("check your network connection or increase the timeout")
    )]
    Transport {
        url: String,
        kind: TransportKind,
        message: String,
    },
    #[error("failed to deserialize response of {url}")]
    #[diagnostic(code(api_error::json))]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to read response body of {url}")]
    #[diagnostic(code(api_error::io))]
    Io {
        url: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid url: {0}")]
    #[diagnostic(code(api_error::invalid_url))]
    InvalidUrl(#[from] url::ParseError),
    #[error("endpoint {endpoint} requires an api key")]
    #[diagnostic(
        code(api_error::missing_api_key),
        help("create a key at https://account.arena.net/applications")
    )]
    MissingApiKey { endpoint: &'static str },
    #[error("not a render service url: {0}")]
    #[diagnostic(code(api_error::invalid_render_url))]
    InvalidRenderUrl(String),
    /// the async client could not be set up (eg: no tls backend)
    #[error("failed to build http client: {0}")]
    #[diagnostic(code(api_error::client))]
    Client(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
    /// the 404 a bulk endpoint answers when none of the requested ids exist.
    /// any other 404 (eg: a wrong base url) is a real error.
    pub fn is_all_ids_invalid(&self) -> bool {
        matches!(
            self,
            Self::Status { status: 404, text: Some(text), .. } if text == ALL_IDS_INVALID
        )
    }
    /// server errors, rate limiting and transport errors are worth another try.
    pub(crate) fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || (500..600).contains(status),
            Self::Transport { .. } => true,
            _ => false,
        }
    }
}

/// extracts the `text` field of an error body like `{"text": "no such id"}`
pub(crate) fn error_text(body: &[u8]) -> Option<String> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        text: String,
    }
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .map(|body| body.text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(404, false)]
    #[case(403, false)]
    #[case(429, true)]
    #[case(500, true)]
    #[case(503, true)]
    fn retryable_statuses(#[case] status: u16, #[case] retryable: bool) {
        let e = ApiError::Status {
            status,
            url: "https://api.guildwars2.com/v2/items/1".to_string(),
            text: None,
        };
        assert_eq!(e.is_retryable(), retryable);
    }

    #[test]
    fn status_message_contains_api_text() {
        let e = ApiError::Status {
            status: 404,
            url: "https://api.guildwars2.com/v2/items/1".to_string(),
            text: error_text(br#"{"text": "no such id"}"#),
        };
        assert!(e.is_not_found());
        let msg = e.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains("no such id"));
    }

    #[rstest]
    #[case(404, Some("all ids provided are invalid"), true)]
    #[case(404, None, false)]
    #[case(404, Some("no such id"), false)]
    #[case(400, Some("all ids provided are invalid"), false)]
    fn only_the_invalid_ids_answer_counts(
        #[case] status: u16,
        #[case] text: Option<&str>,
        #[case] expected: bool,
    ) {
        let e = ApiError::Status {
            status,
            url: "https://api.guildwars2.com/v2/items?ids=0".to_string(),
            text: text.map(str::to_string),
        };
        assert_eq!(e.is_all_ids_invalid(), expected);
    }

    #[test]
    fn transport_message_names_the_kind() {
        let e = ApiError::Transport {
            url: "https://api.guildwars2.com/v2/build".to_string(),
            kind: TransportKind::Timeout,
            message: "timed out".to_string(),
        };
        assert!(e.is_retryable());
        assert!(e.to_string().starts_with("timeout error while requesting"));
    }

    #[test]
    fn error_text_ignores_other_bodies() {
        assert_eq!(error_text(b"<html>bad gateway</html>"), None);
        assert_eq!(error_text(br#"{"error": "x"}"#), None);
    }
}
