//! Endpoint resolution and request/response handling for the compendium API.

use serde_json::Value;
use tracing::debug;

use crate::capabilities::{parse_json, read_body, AppHttp, RawHttpResult, ValidatedUrl};
use crate::category::CATEGORY_SLUGS;
use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::event::Event;
use crate::normalize::{display_string, extract_records, is_truthy, RawRecord};

/// Keys unwrapped, in order, from a single-item response object.
pub const ITEM_KEYS: [&str; 3] = ["item", "data", "result"];

const FULL_LISTING: &str = "compendium/all";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiClient {
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn timeout_ms(&self) -> Option<u64> {
        self.config.request_timeout_ms
    }

    /// Maps a logical endpoint name, or an absolute URL, to a request URL.
    ///
    /// Total: absolute URLs pass through, category slugs map to the category
    /// listing, `all`/`compendium/all` (and blank input) map to the full
    /// listing, anything else is joined under the base.
    pub fn resolve_url(&self, endpoint_or_url: &str) -> String {
        let trimmed = endpoint_or_url.trim();
        if is_absolute(trimmed) {
            return trimmed.to_string();
        }

        let base = self.config.base();
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);

        if CATEGORY_SLUGS.contains(&trimmed) {
            return format!("{base}/compendium/category/{trimmed}");
        }

        if trimmed.is_empty() || trimmed == "all" || trimmed == FULL_LISTING {
            return format!("{base}/{FULL_LISTING}");
        }

        format!("{base}/{trimmed}")
    }

    pub fn list_url(&self, endpoint_or_url: &str) -> ApiResult<ValidatedUrl> {
        ValidatedUrl::new(self.resolve_url(endpoint_or_url))
    }

    /// The resolved endpoint with `id` appended as an encoded path segment.
    pub fn item_url(&self, endpoint_or_url: &str, id: Option<&str>) -> ApiResult<ValidatedUrl> {
        let id = match id {
            Some(id) if !id.trim().is_empty() => id,
            _ => return Err(ApiError::invalid_input("id is required")),
        };
        ValidatedUrl::with_segment(&self.resolve_url(endpoint_or_url), id)
    }

    /// Issues one GET for a listing. Errors returned here happen before any
    /// request is made; everything later arrives through `make_event`.
    pub fn fetch_list<F>(&self, http: &AppHttp, endpoint_or_url: &str, make_event: F) -> ApiResult<()>
    where
        F: Fn(ApiResult<Vec<RawRecord>>) -> Event + Send + Sync + 'static,
    {
        let url = self.list_url(endpoint_or_url)?;
        debug!(url = url.as_str(), "fetching list");
        http.get(url.as_str())
            .send(move |result: RawHttpResult| make_event(decode_list(read_body(result))));
        Ok(())
    }

    pub fn fetch_item<F>(
        &self,
        http: &AppHttp,
        endpoint_or_url: &str,
        id: Option<&str>,
        make_event: F,
    ) -> ApiResult<()>
    where
        F: Fn(ApiResult<RawRecord>) -> Event + Send + Sync + 'static,
    {
        let url = self.item_url(endpoint_or_url, id)?;
        debug!(url = url.as_str(), "fetching item");
        http.get(url.as_str())
            .send(move |result: RawHttpResult| make_event(decode_item(read_body(result))));
        Ok(())
    }
}

fn is_absolute(endpoint_or_url: &str) -> bool {
    let lower = endpoint_or_url
        .get(..8)
        .unwrap_or(endpoint_or_url)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

pub fn decode_list(body: ApiResult<Vec<u8>>) -> ApiResult<Vec<RawRecord>> {
    let payload = parse_json(&body?)?;
    Ok(extract_records(payload))
}

pub fn decode_item(body: ApiResult<Vec<u8>>) -> ApiResult<RawRecord> {
    let payload = parse_json(&body?)?;
    Ok(unwrap_item(payload))
}

/// Unwraps `{item|data|result: ...}` wrappers; anything else is returned as-is.
pub fn unwrap_item(payload: Value) -> RawRecord {
    match payload {
        Value::Object(mut map) => {
            let key = ITEM_KEYS
                .iter()
                .find(|key| map.get(**key).is_some_and(is_truthy))
                .copied();
            match key.and_then(|key| map.remove(key)) {
                Some(inner) => inner,
                None => Value::Object(map),
            }
        }
        other => other,
    }
}

/// Linear search of a listing by id, then by name.
pub fn find_in_listing(records: &[RawRecord], id: &str) -> Option<RawRecord> {
    let field_is = |record: &&RawRecord, key: &str| {
        record
            .get(key)
            .filter(|v| !v.is_null())
            .is_some_and(|v| display_string(v) == id)
    };
    records
        .iter()
        .find(|record| field_is(record, "id") || field_is(record, "name"))
        .cloned()
}
