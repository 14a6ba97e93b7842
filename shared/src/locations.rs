//! Common-location helpers: the table cell projection and the distinct
//! location set across a listing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::normalize::{Item, Locations};

/// Entries shown before a location list collapses behind a toggle.
pub const COLLAPSED_LOCATIONS: usize = 3;
pub const EMPTY_CELL: &str = "—";

const LIST_SOURCES: &[&str] = &["common_locations", "commonLocations", "locations", "spawn_locations"];
const TEXT_SOURCES: &[&str] = &[
    "common_locations",
    "commonLocations",
    "locations",
    "spawn_locations",
    "location",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LocationsCell {
    Empty { text: String },
    Text { text: String },
    List {
        visible: Vec<String>,
        /// Full list joined, for a hover title while collapsed.
        title: Option<String>,
        total: usize,
        /// Entries hidden behind the toggle; 0 when everything is shown.
        hidden_count: usize,
        expanded: bool,
        /// Present only when the list is long enough to toggle.
        toggle_label: Option<String>,
    },
}

impl LocationsCell {
    pub fn project(locations: &Locations, expanded: bool) -> Self {
        match locations {
            Locations::List(entries) if entries.is_empty() => Self::Empty {
                text: EMPTY_CELL.to_string(),
            },
            Locations::List(entries) => {
                let total = entries.len();
                let collapsible = total > COLLAPSED_LOCATIONS;
                let visible = if expanded || !collapsible {
                    entries.clone()
                } else {
                    entries[..COLLAPSED_LOCATIONS].to_vec()
                };
                let toggle_label = collapsible.then(|| {
                    if expanded {
                        " show less".to_string()
                    } else {
                        format!(" …more ({})", total - COLLAPSED_LOCATIONS)
                    }
                });
                let hidden_count = total - visible.len();
                Self::List {
                    visible,
                    title: (!expanded).then(|| entries.join(", ")),
                    total,
                    hidden_count,
                    expanded,
                    toggle_label,
                }
            }
            Locations::Text(text) if text.is_empty() => Self::Empty {
                text: EMPTY_CELL.to_string(),
            },
            Locations::Text(text) => Self::Text { text: text.clone() },
        }
    }
}

/// Collapses runs of whitespace and spaces commas as `", "`.
pub fn normalize_location(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    let spaced = collapsed
        .split(',')
        .map(str::trim_start)
        .collect::<Vec<_>>()
        .join(", ");
    Some(spaced.trim().to_string())
}

/// Distinct normalized locations across every known location field, sorted.
pub fn unique_locations(items: &[Item]) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    for item in items {
        for key in LIST_SOURCES {
            if let Some(Value::Array(entries)) = item.raw.get(*key) {
                found.extend(
                    entries
                        .iter()
                        .filter_map(Value::as_str)
                        .filter_map(normalize_location),
                );
            }
        }
        for key in TEXT_SOURCES {
            if let Some(Value::String(text)) = item.raw.get(*key) {
                found.extend(text.split(',').filter_map(normalize_location));
            }
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::to_item;
    use serde_json::json;

    fn list(entries: &[&str]) -> Locations {
        Locations::List(entries.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn short_lists_show_everything_without_toggle() {
        let cell = LocationsCell::project(&list(&["A", "B", "C"]), false);
        match cell {
            LocationsCell::List {
                visible,
                toggle_label,
                ..
            } => {
                assert_eq!(visible.len(), 3);
                assert_eq!(toggle_label, None);
            }
            other => panic!("unexpected cell: {other:?}"),
        }
    }

    #[test]
    fn long_lists_collapse_until_expanded() {
        let locations = list(&["A", "B", "C", "D", "E"]);
        let collapsed = LocationsCell::project(&locations, false);
        assert_eq!(
            collapsed,
            LocationsCell::List {
                visible: vec!["A".into(), "B".into(), "C".into()],
                title: Some("A, B, C, D, E".into()),
                total: 5,
                hidden_count: 2,
                expanded: false,
                toggle_label: Some(" …more (2)".into()),
            }
        );

        let expanded = LocationsCell::project(&locations, true);
        assert_eq!(
            expanded,
            LocationsCell::List {
                visible: vec!["A".into(), "B".into(), "C".into(), "D".into(), "E".into()],
                title: None,
                total: 5,
                hidden_count: 0,
                expanded: true,
                toggle_label: Some(" show less".into()),
            }
        );
    }

    #[test]
    fn empty_and_text_cells() {
        assert_eq!(
            LocationsCell::project(&Locations::default(), false),
            LocationsCell::Empty { text: EMPTY_CELL.into() }
        );
        assert_eq!(
            LocationsCell::project(&Locations::Text("Hebra".into()), true),
            LocationsCell::Text { text: "Hebra".into() }
        );
    }

    #[test]
    fn location_normalization() {
        assert_eq!(normalize_location("  Great   Plateau "), Some("Great Plateau".into()));
        assert_eq!(normalize_location("Akkala,Hebra"), Some("Akkala, Hebra".into()));
        assert_eq!(normalize_location("   "), None);
    }

    #[test]
    fn unique_locations_merge_all_sources() {
        let items = vec![
            to_item(&json!({"name": "a", "common_locations": ["Akkala", "Hebra  Mountains"]}), 0),
            to_item(&json!({"name": "b", "locations": "Akkala, Faron"}), 1),
            to_item(&json!({"name": "c", "spawn_locations": ["Faron"], "location": "Eldin"}), 2),
        ];
        let found: Vec<_> = unique_locations(&items).into_iter().collect();
        assert_eq!(found, vec!["Akkala", "Eldin", "Faron", "Hebra Mountains"]);
    }
}
