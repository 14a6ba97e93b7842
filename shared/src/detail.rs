//! Single-item detail page.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::api::find_in_listing;
use crate::category::normalize;
use crate::error::ApiError;
use crate::navigation::Transition;
use crate::normalize::{display_string, RawRecord};

pub const DEFAULT_TITLE: &str = "Item detail";
const HIDDEN_FIELDS: &[&str] = &["dlc"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailPhase {
    Loading,
    /// Direct fetch failed; searching the full listing instead.
    SearchingListing,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum DetailValue {
    Empty,
    List(Vec<String>),
    Json(String),
    Text(String),
}

impl DetailValue {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::String(s) if s.is_empty() => Self::Empty,
            Value::Array(entries) if entries.is_empty() => Self::Empty,
            Value::Array(entries) => Self::List(entries.iter().map(display_string).collect()),
            Value::Object(_) => {
                Self::Json(serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()))
            }
            other => Self::Text(display_string(other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailField {
    pub key: String,
    pub label: String,
    pub value: DetailValue,
}

/// Where the Back button leads.
#[derive(Debug, Clone, PartialEq)]
pub enum BackTarget {
    /// Return to the dashboard carrying the snapshot we arrived with.
    Restore(Transition),
    /// Let the browser history step back.
    History,
    Home,
}

/// What to do after a direct item fetch completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailStep {
    Stale,
    Done,
    SearchListing(ApiError),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DetailState {
    /// Category slug after normalization.
    pub category: String,
    pub id: Option<String>,
    pub item: Option<RawRecord>,
    pub phase: Option<DetailPhase>,
    pub error: Option<String>,
    pub pending_request: Option<u64>,
    pub incoming: Transition,
}

impl DetailState {
    pub fn new(category: Option<&str>, id: Option<String>, incoming: Option<Transition>) -> Self {
        let incoming = incoming.unwrap_or_default();
        let item = incoming.item.clone();
        Self {
            category: normalize(category),
            id,
            phase: Some(if item.is_some() {
                DetailPhase::Ready
            } else {
                DetailPhase::Loading
            }),
            item,
            error: None,
            pending_request: None,
            incoming,
        }
    }

    pub fn needs_fetch(&self) -> bool {
        self.item.is_none() && self.phase == Some(DetailPhase::Loading) && self.pending_request.is_none()
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.phase,
            Some(DetailPhase::Loading) | Some(DetailPhase::SearchingListing)
        )
    }

    pub fn begin_fetch(&mut self, request_id: u64) {
        self.pending_request = Some(request_id);
        self.phase = Some(DetailPhase::Loading);
        self.error = None;
    }

    pub fn complete_fetch(&mut self, request_id: u64, result: Result<RawRecord, ApiError>) -> DetailStep {
        if self.pending_request != Some(request_id) {
            debug!(request_id, "discarding stale detail result");
            return DetailStep::Stale;
        }
        self.pending_request = None;

        match result {
            Ok(item) => {
                self.item = Some(item);
                self.phase = Some(DetailPhase::Ready);
                DetailStep::Done
            }
            Err(ApiError::InvalidInput { reason }) => {
                self.fail(&ApiError::InvalidInput { reason });
                DetailStep::Done
            }
            Err(e) => {
                info!(error = %e, "item fetch failed, searching full listing");
                DetailStep::SearchListing(e)
            }
        }
    }

    pub fn begin_listing_search(&mut self, request_id: u64) {
        self.pending_request = Some(request_id);
        self.phase = Some(DetailPhase::SearchingListing);
    }

    /// Resolves the listing search. The original fetch error is what the user
    /// sees if the item cannot be found, or the listing fetch fails too.
    pub fn complete_listing_search(
        &mut self,
        request_id: u64,
        cause: ApiError,
        result: Result<Vec<RawRecord>, ApiError>,
    ) -> bool {
        if self.pending_request != Some(request_id) {
            debug!(request_id, "discarding stale listing search");
            return false;
        }
        self.pending_request = None;

        let found = match (&result, self.id.as_deref()) {
            (Ok(records), Some(id)) => find_in_listing(records, id),
            _ => None,
        };

        match found {
            Some(item) => {
                self.item = Some(item);
                self.phase = Some(DetailPhase::Ready);
                self.error = None;
            }
            None => {
                if let Err(e) = &result {
                    debug!(error = %e, "listing search failed as well");
                }
                self.fail(&cause);
            }
        }
        true
    }

    pub fn fail(&mut self, error: &ApiError) {
        self.phase = Some(DetailPhase::Failed);
        self.error = Some(error.to_string());
    }

    pub fn title(&self) -> String {
        self.item
            .as_ref()
            .and_then(|item| item.get("name"))
            .filter(|name| !name.is_null())
            .map(display_string)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string())
    }

    pub fn image(&self) -> Option<String> {
        self.item
            .as_ref()
            .and_then(|item| item.get("image"))
            .map(display_string)
            .filter(|image| !image.is_empty())
    }

    /// One row per raw field, in upstream order, minus hidden fields.
    pub fn fields(&self) -> Vec<DetailField> {
        let Some(Value::Object(map)) = &self.item else {
            return match &self.item {
                Some(Value::Null) | None => Vec::new(),
                Some(other) => vec![DetailField {
                    key: "value".to_string(),
                    label: "Value".to_string(),
                    value: DetailValue::from_value(other),
                }],
            };
        };

        map.iter()
            .filter(|(key, _)| !HIDDEN_FIELDS.contains(&key.to_lowercase().as_str()))
            .map(|(key, value)| DetailField {
                key: key.clone(),
                label: humanize_key(key),
                value: DetailValue::from_value(value),
            })
            .collect()
    }

    pub fn back_target(&self) -> BackTarget {
        if let Some(snapshot) = self.incoming.snapshot.as_ref().filter(|_| self.incoming.trusted) {
            return BackTarget::Restore(Transition::trusted(snapshot.clone()));
        }
        if self.incoming.from_history {
            return BackTarget::History;
        }
        BackTarget::Home
    }
}

/// `hearts_recovered` -> `Hearts Recovered`, `commonLocations` -> `Common Locations`.
pub fn humanize_key(key: &str) -> String {
    if key.eq_ignore_ascii_case("edible") {
        return "Edible".to_string();
    }

    let mut spaced = String::with_capacity(key.len() + 4);
    let mut previous: Option<char> = None;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c.is_ascii_uppercase() && previous.is_some_and(|p| p.is_ascii_lowercase()) {
            spaced.push(' ');
        }
        spaced.push(c);
        previous = Some(c);
    }

    spaced
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::NavigationSnapshot;
    use serde_json::json;

    #[test]
    fn labels_are_humanized() {
        assert_eq!(humanize_key("hearts_recovered"), "Hearts Recovered");
        assert_eq!(humanize_key("commonLocations"), "Common Locations");
        assert_eq!(humanize_key("edible"), "Edible");
        assert_eq!(humanize_key("EDIBLE"), "Edible");
        assert_eq!(humanize_key("id"), "Id");
    }

    #[test]
    fn values_are_rendered_by_shape() {
        assert_eq!(DetailValue::from_value(&json!(null)), DetailValue::Empty);
        assert_eq!(DetailValue::from_value(&json!("")), DetailValue::Empty);
        assert_eq!(DetailValue::from_value(&json!([])), DetailValue::Empty);
        assert_eq!(
            DetailValue::from_value(&json!(["Akkala", 2])),
            DetailValue::List(vec!["Akkala".into(), "2".into()])
        );
        assert_eq!(DetailValue::from_value(&json!(true)), DetailValue::Text("true".into()));
        assert!(matches!(
            DetailValue::from_value(&json!({"attack": 10})),
            DetailValue::Json(text) if text.contains("\"attack\": 10")
        ));
    }

    #[test]
    fn fields_follow_upstream_order_and_hide_dlc() {
        let incoming = Transition {
            item: Some(json!({"name": "Amber", "dlc": false, "id": 6, "common_locations": []})),
            ..Transition::default()
        };
        let detail = DetailState::new(Some("Material"), Some("6".into()), Some(incoming));
        assert_eq!(detail.category, "materials");
        assert_eq!(detail.phase, Some(DetailPhase::Ready));
        assert!(!detail.needs_fetch());
        assert_eq!(detail.title(), "Amber");
        let keys: Vec<_> = detail.fields().into_iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["name", "id", "common_locations"]);
    }

    #[test]
    fn missing_item_needs_fetch() {
        let detail = DetailState::new(None, Some("6".into()), None);
        assert_eq!(detail.category, "all");
        assert!(detail.needs_fetch());
        assert_eq!(detail.title(), DEFAULT_TITLE);
        assert!(detail.fields().is_empty());
    }

    #[test]
    fn failed_fetch_searches_listing_then_finds_by_name() {
        let mut detail = DetailState::new(Some("materials"), Some("Amber".into()), None);
        detail.begin_fetch(1);
        let cause = ApiError::Status {
            status: 404,
            body: String::new(),
        };
        assert_eq!(
            detail.complete_fetch(1, Err(cause.clone())),
            DetailStep::SearchListing(cause.clone())
        );

        detail.begin_listing_search(2);
        assert!(detail.is_loading());
        let listing = vec![json!({"id": 1, "name": "Opal"}), json!({"id": 6, "name": "Amber"})];
        assert!(detail.complete_listing_search(2, cause, Ok(listing)));
        assert_eq!(detail.phase, Some(DetailPhase::Ready));
        assert_eq!(detail.title(), "Amber");
    }

    #[test]
    fn unresolved_search_reports_original_error() {
        let mut detail = DetailState::new(Some("materials"), Some("999".into()), None);
        detail.begin_listing_search(3);
        let cause = ApiError::Status {
            status: 404,
            body: "missing".into(),
        };
        detail.complete_listing_search(3, cause.clone(), Ok(vec![json!({"id": 1})]));
        assert_eq!(detail.phase, Some(DetailPhase::Failed));
        assert_eq!(detail.error, Some(cause.to_string()));

        let mut detail = DetailState::new(Some("materials"), Some("999".into()), None);
        detail.begin_listing_search(4);
        detail.complete_listing_search(4, cause.clone(), Err(ApiError::transport("offline")));
        assert_eq!(detail.error, Some(cause.to_string()));
    }

    #[test]
    fn invalid_input_does_not_search_listing() {
        let mut detail = DetailState::new(None, None, None);
        detail.begin_fetch(1);
        let step = detail.complete_fetch(1, Err(ApiError::invalid_input("id is required")));
        assert_eq!(step, DetailStep::Done);
        assert_eq!(detail.phase, Some(DetailPhase::Failed));
    }

    #[test]
    fn stale_detail_results_are_dropped() {
        let mut detail = DetailState::new(None, Some("1".into()), None);
        detail.begin_fetch(5);
        assert_eq!(detail.complete_fetch(4, Ok(json!({"name": "x"}))), DetailStep::Stale);
        assert!(detail.item.is_none());
    }

    #[test]
    fn untrusted_snapshot_is_not_carried_back() {
        let stale = NavigationSnapshot {
            query: "stale".into(),
            category: "monsters".into(),
            ..NavigationSnapshot::default()
        };
        let incoming = Transition {
            snapshot: Some(stale.clone()),
            ..Transition::default()
        };
        let detail = DetailState::new(None, Some("1".into()), Some(incoming));
        assert_eq!(detail.back_target(), BackTarget::Home);

        let incoming = Transition {
            snapshot: Some(stale),
            from_history: true,
            ..Transition::default()
        };
        let detail = DetailState::new(None, Some("1".into()), Some(incoming));
        assert_eq!(detail.back_target(), BackTarget::History);
    }

    #[test]
    fn back_target_precedence() {
        let snapshot = NavigationSnapshot {
            query: "bow".into(),
            ..NavigationSnapshot::default()
        };
        let detail = DetailState::new(None, Some("1".into()), Some(Transition::trusted(snapshot.clone())));
        assert_eq!(detail.back_target(), BackTarget::Restore(Transition::trusted(snapshot)));

        let from_history = Transition {
            from_history: true,
            ..Transition::default()
        };
        let detail = DetailState::new(None, Some("1".into()), Some(from_history));
        assert_eq!(detail.back_target(), BackTarget::History);

        let detail = DetailState::new(None, Some("1".into()), None);
        assert_eq!(detail.back_target(), BackTarget::Home);
    }
}
