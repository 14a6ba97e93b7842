use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::error::{ApiError, ApiResult};

/// What the shell hands back for a request issued without `expect_json`.
pub type RawHttpResult = crux_http::Result<crux_http::Response<Vec<u8>>>;

pub const MAX_URL_LENGTH: usize = 2048;
pub const MAX_ERROR_BODY_LENGTH: usize = 512;

/// An absolute http(s) URL that `crux_http` can parse without panicking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidatedUrl {
    url: String,
    host: String,
}

impl ValidatedUrl {
    pub fn new(url: impl Into<String>) -> Result<Self, ApiError> {
        let parsed = Self::parse(&url.into())?;
        Self::from_parsed(parsed)
    }

    /// Parses `url` and appends `segment` as one percent-encoded path segment.
    pub fn with_segment(url: &str, segment: &str) -> Result<Self, ApiError> {
        let mut parsed = Self::parse(url)?;
        parsed
            .path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: "URL cannot take path segments".to_string(),
            })?
            .pop_if_empty()
            .push(segment);
        Self::from_parsed(parsed)
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    fn parse(url: &str) -> Result<Url, ApiError> {
        if url.trim().is_empty() {
            return Err(ApiError::InvalidUrl {
                url: String::new(),
                reason: "URL cannot be empty".to_string(),
            });
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(ApiError::InvalidUrl {
                url: Self::truncate_url(url),
                reason: format!("URL exceeds maximum length of {} bytes", MAX_URL_LENGTH),
            });
        }

        Url::parse(url).map_err(|e| ApiError::InvalidUrl {
            url: Self::truncate_url(url),
            reason: e.to_string(),
        })
    }

    fn from_parsed(parsed: Url) -> Result<Self, ApiError> {
        let scheme = parsed.scheme().to_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ApiError::InvalidUrl {
                url: Self::truncate_url(parsed.as_str()),
                reason: format!(
                    "invalid scheme '{}', only 'http' and 'https' are allowed",
                    scheme
                ),
            });
        }

        let host = match parsed.host_str() {
            Some(host) => host.to_lowercase(),
            None => {
                return Err(ApiError::InvalidUrl {
                    url: Self::truncate_url(parsed.as_str()),
                    reason: "URL must have a host".to_string(),
                })
            }
        };

        if !parsed.username().is_empty() || parsed.password().is_some() {
            return Err(ApiError::InvalidUrl {
                url: Self::truncate_url(parsed.as_str()),
                reason: "credentials in URL are not allowed".to_string(),
            });
        }

        Ok(Self {
            url: parsed.to_string(),
            host,
        })
    }

    fn truncate_url(url: &str) -> String {
        truncate(url, 100)
    }
}

/// Splits a shell response into body bytes or a network error.
pub fn read_body(result: RawHttpResult) -> ApiResult<Vec<u8>> {
    match result {
        Ok(mut response) => {
            let status: u16 = response.status().into();
            let body = response.take_body().unwrap_or_default();
            check_status(status, body)
        }
        Err(e) => Err(ApiError::transport(e.to_string())),
    }
}

pub fn check_status(status: u16, body: Vec<u8>) -> ApiResult<Vec<u8>> {
    if (200..300).contains(&status) {
        return Ok(body);
    }

    let text = String::from_utf8_lossy(&body);
    Err(ApiError::Status {
        status,
        body: truncate(text.trim(), MAX_ERROR_BODY_LENGTH),
    })
}

pub fn parse_json(body: &[u8]) -> ApiResult<Value> {
    serde_json::from_slice(body).map_err(|e| ApiError::Decode {
        message: e.to_string(),
    })
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    }
}
