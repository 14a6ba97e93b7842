//! Tolerant conversion of upstream payloads into canonical [`Item`]s.
//!
//! Nothing here assumes a schema: payloads stay untyped `serde_json::Value`
//! until [`extract_records`] and [`to_item`] have run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An upstream record exactly as received.
pub type RawRecord = Value;

/// Keys searched, in order, for the record array of a wrapped list payload.
pub const LIST_KEYS: [&str; 4] = ["data", "results", "entries", "items"];

const ID_KEYS: &[&str] = &["id", "name"];
const NAME_KEYS: &[&str] = &["name", "title"];
const CATEGORY_KEYS: &[&str] = &["category", "type", "class"];
const DESCRIPTION_KEYS: &[&str] = &["description", "about"];
const IMAGE_KEYS: &[&str] = &["image", "img", "image_url"];
const LOCATION_KEYS: &[&str] = &["common_locations", "commonLocations", "commonLocation"];

pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Common locations as delivered upstream: a list, or a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Locations {
    List(Vec<String>),
    Text(String),
}

impl Default for Locations {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl Locations {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(entries) => Self::List(
                entries
                    .iter()
                    .filter(|v| !v.is_null())
                    .map(display_string)
                    .collect(),
            ),
            Value::String(s) => Self::Text(s.clone()),
            other if is_truthy(other) => Self::Text(display_string(other)),
            _ => Self::default(),
        }
    }

    /// Non-empty list, or non-blank text.
    pub fn is_present(&self) -> bool {
        match self {
            Self::List(entries) => !entries.is_empty(),
            Self::Text(text) => !text.trim().is_empty(),
        }
    }
}

/// The canonical unit of display. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    pub image: String,
    pub common_locations: Locations,
    pub raw: RawRecord,
}

/// Pulls the record array out of an arbitrarily shaped payload.
///
/// Never fails: a payload without any array is wrapped as a single record.
pub fn extract_records(payload: Value) -> Vec<RawRecord> {
    match payload {
        Value::Array(records) => records,
        Value::Object(mut map) => {
            let key = LIST_KEYS
                .iter()
                .find(|key| map.get(**key).is_some_and(Value::is_array))
                .map(|key| (*key).to_string())
                .or_else(|| {
                    map.iter()
                        .find(|(_, value)| value.is_array())
                        .map(|(key, _)| key.clone())
                });

            match key.and_then(|key| map.remove(&key)) {
                Some(Value::Array(records)) => records,
                _ => vec![Value::Object(map)],
            }
        }
        scalar => vec![scalar],
    }
}

/// Maps one raw record at position `index` to an [`Item`]. Total over all inputs.
pub fn to_item(raw: &RawRecord, index: usize) -> Item {
    if let Value::String(name) = raw {
        return Item {
            id: index.to_string(),
            name: name.clone(),
            category: UNKNOWN_CATEGORY.to_string(),
            description: String::new(),
            image: String::new(),
            common_locations: Locations::default(),
            raw: raw.clone(),
        };
    }

    Item {
        id: first_text(raw, ID_KEYS).unwrap_or_else(|| index.to_string()),
        name: first_text(raw, NAME_KEYS).unwrap_or_else(|| format!("item-{index}")),
        category: first_text(raw, CATEGORY_KEYS).unwrap_or_else(|| UNKNOWN_CATEGORY.to_string()),
        description: first_text(raw, DESCRIPTION_KEYS).unwrap_or_default(),
        image: first_text(raw, IMAGE_KEYS).unwrap_or_default(),
        common_locations: first_present(raw, LOCATION_KEYS)
            .map(Locations::from_value)
            .unwrap_or_default(),
        raw: raw.clone(),
    }
}

/// Normalizes a whole list, dropping falsy records. Positions are preserved
/// as the fallback index, so the result may be shorter than the input.
pub fn normalize_records(records: &[RawRecord]) -> Vec<Item> {
    records
        .iter()
        .enumerate()
        .filter(|(_, raw)| is_truthy(raw))
        .map(|(index, raw)| to_item(raw, index))
        .collect()
}

/// JavaScript-style truthiness, which is what upstream producers assume.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Renders a value the way it would appear as plain text.
pub fn display_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// First key whose value is present and not null.
fn first_present<'a>(raw: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find(|value| !value.is_null())
}

/// First key holding a scalar, rendered as text. Nested values are skipped.
fn first_text(raw: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| raw.get(*key))
        .find_map(|value| match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn extract_passes_arrays_through() {
        let records = extract_records(json!([{"id": 1}, {"id": 2}]));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn extract_prefers_candidate_keys_in_order() {
        let payload = json!({
            "other": [1],
            "results": [2, 3],
            "data": [4],
        });
        assert_eq!(extract_records(payload), vec![json!(4)]);

        let payload = json!({"meta": {}, "results": [{"id": "a"}]});
        assert_eq!(extract_records(payload), vec![json!({"id": "a"})]);
    }

    #[test]
    fn extract_skips_non_array_candidates() {
        let payload = json!({"data": {"nested": true}, "entries": ["x"]});
        assert_eq!(extract_records(payload), vec![json!("x")]);
    }

    #[test]
    fn extract_falls_back_to_first_array_value() {
        let payload = json!({"status": 200, "anything": [{"id": "1"}], "later": [9]});
        assert_eq!(extract_records(payload), vec![json!({"id": "1"})]);
    }

    #[test]
    fn extract_wraps_objects_and_scalars() {
        let payload = json!({"status": 200});
        assert_eq!(extract_records(payload.clone()), vec![payload]);
        assert_eq!(extract_records(json!(42)), vec![json!(42)]);
        assert_eq!(extract_records(Value::Null), vec![Value::Null]);
    }

    #[test]
    fn to_item_applies_fallback_chains() {
        let raw = json!({
            "title": "Lynel",
            "type": "monsters",
            "about": "Dangerous.",
            "img": "https://example.com/lynel.png",
            "commonLocation": "Hyrule Field",
        });
        let item = to_item(&raw, 7);
        assert_eq!(item.id, "7");
        assert_eq!(item.name, "Lynel");
        assert_eq!(item.category, "monsters");
        assert_eq!(item.description, "Dangerous.");
        assert_eq!(item.image, "https://example.com/lynel.png");
        assert_eq!(item.common_locations, Locations::Text("Hyrule Field".into()));
        assert_eq!(item.raw, raw);
    }

    #[test]
    fn to_item_uses_name_as_id_and_defaults() {
        let item = to_item(&json!({"name": "Amber"}), 3);
        assert_eq!(item.id, "Amber");
        assert_eq!(item.category, UNKNOWN_CATEGORY);
        assert_eq!(item.description, "");
        assert_eq!(item.image, "");
        assert_eq!(item.common_locations, Locations::List(vec![]));

        let item = to_item(&json!({}), 3);
        assert_eq!(item.id, "3");
        assert_eq!(item.name, "item-3");
    }

    #[test]
    fn to_item_stringifies_numeric_ids() {
        let item = to_item(&json!({"id": 12, "name": "Hylian Shroom", "class": "material"}), 0);
        assert_eq!(item.id, "12");
        assert_eq!(item.category, "material");
    }

    #[test]
    fn to_item_null_fields_fall_through() {
        let item = to_item(&json!({"id": null, "name": null, "title": "Fallback"}), 1);
        assert_eq!(item.id, "1");
        assert_eq!(item.name, "Fallback");
    }

    #[test]
    fn to_item_from_bare_string() {
        let item = to_item(&json!("Silent Princess"), 4);
        assert_eq!(item.id, "4");
        assert_eq!(item.name, "Silent Princess");
        assert_eq!(item.category, UNKNOWN_CATEGORY);
        assert!(!item.common_locations.is_present());
    }

    #[test]
    fn location_lists_drop_nulls_and_stringify() {
        let item = to_item(&json!({"common_locations": ["Akkala", null, 3]}), 0);
        assert_eq!(
            item.common_locations,
            Locations::List(vec!["Akkala".into(), "3".into()])
        );
    }

    #[test]
    fn falsy_scalar_locations_are_absent() {
        let item = to_item(&json!({"common_locations": false}), 0);
        assert!(!item.common_locations.is_present());
        let item = to_item(&json!({"common_locations": 5}), 0);
        assert!(item.common_locations.is_present());
        let item = to_item(&json!({"common_locations": "   "}), 0);
        assert!(!item.common_locations.is_present());
    }

    #[test]
    fn normalize_records_drops_falsy_and_keeps_positions() {
        let records = vec![json!(null), json!({"name": "A"}), json!(""), json!({})];
        let items = normalize_records(&records);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "A");
        assert_eq!(items[1].id, "3");
        assert_eq!(items[1].name, "item-3");
    }

    #[test]
    fn normalize_records_of_nothing_is_empty() {
        assert!(normalize_records(&[]).is_empty());
        assert!(normalize_records(&[json!(null), json!(0)]).is_empty());
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            ".{0,12}".prop_map(Value::String),
        ];
        leaf.prop_recursive(3, 24, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::vec(
                    (
                        prop_oneof![
                            Just("id".to_string()),
                            Just("name".to_string()),
                            Just("category".to_string()),
                            Just("common_locations".to_string()),
                            "[a-z]{1,6}",
                        ],
                        inner
                    ),
                    0..6
                )
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn extract_always_yields_a_sequence(payload in arb_json()) {
            let wraps_itself = match &payload {
                Value::Array(_) => false,
                Value::Object(map) => !map.values().any(Value::is_array),
                _ => true,
            };
            let records = extract_records(payload.clone());
            if wraps_itself {
                prop_assert_eq!(records, vec![payload]);
            }
        }

        #[test]
        fn bare_scalar_becomes_single_record(n in any::<i64>(), text in ".*") {
            prop_assert_eq!(extract_records(json!(n)), vec![json!(n)]);
            prop_assert_eq!(extract_records(json!(text.clone())), vec![json!(text)]);
        }

        #[test]
        fn to_item_is_total_and_idempotent(raw in arb_json(), index in 0usize..1000) {
            let first = to_item(&raw, index);
            let second = to_item(&raw, index);
            prop_assert_eq!(&first.raw, &raw);
            if let Value::String(name) = &raw {
                prop_assert_eq!(&first.name, name);
                prop_assert_eq!(first.id.clone(), index.to_string());
            }
            prop_assert_eq!(first, second);
        }
    }
}
