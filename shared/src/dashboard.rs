//! Dashboard state: the item list for the selected category, the free-text
//! filter, per-row UI flags, and the derived aggregates.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{BTreeSet, HashSet};
use tracing::{debug, warn};

use crate::category::Category;
use crate::charts::percent_of;
use crate::error::ApiError;
use crate::locations::unique_locations;
use crate::normalize::{normalize_records, to_item, Item, RawRecord, UNKNOWN_CATEGORY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    /// Fallback data on screen alongside an error message. Not terminal.
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Stats {
    pub total: usize,
    pub unique_categories: usize,
    pub with_description: usize,
    pub with_locations: usize,
    pub percent_with_locations: u32,
    pub unique_locations: usize,
}

impl Stats {
    pub fn compute(items: &[Item]) -> Self {
        let total = items.len();
        let unique_categories = items
            .iter()
            .map(|item| {
                if item.category.is_empty() {
                    UNKNOWN_CATEGORY
                } else {
                    item.category.as_str()
                }
            })
            .collect::<HashSet<_>>()
            .len();
        let with_description = items.iter().filter(|i| !i.description.is_empty()).count();
        let with_locations = items
            .iter()
            .filter(|i| i.common_locations.is_present())
            .count();

        Self {
            total,
            unique_categories,
            with_description,
            with_locations,
            percent_with_locations: percent_of(with_locations, total),
            unique_locations: unique_locations(items).len(),
        }
    }
}

/// Dashboard values carried across a navigation and reapplied on return.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RestoredState {
    pub query: String,
    pub category: Option<Category>,
    pub expanded_ids: BTreeSet<String>,
    pub broken_image_ids: BTreeSet<String>,
    pub scroll_offset: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DashboardState {
    pub items: Vec<Item>,
    pub query: String,
    pub category: Category,
    pub expanded_ids: BTreeSet<String>,
    pub broken_image_ids: BTreeSet<String>,
    pub phase: FetchPhase,
    pub error: Option<String>,
    /// Only the response to this request may be committed.
    pub pending_request: Option<u64>,
    /// Set on mount until the durable preference has been read.
    pub awaiting_preference: bool,
    /// Offset the shell should scroll to after the next render.
    pub restore_scroll: Option<f64>,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also true while the stored category is still being read.
    pub fn is_loading(&self) -> bool {
        self.awaiting_preference || matches!(self.phase, FetchPhase::Loading)
    }

    pub fn apply_restored(&mut self, restored: RestoredState) {
        self.query = restored.query;
        if let Some(category) = restored.category {
            self.category = category;
        }
        self.expanded_ids = restored.expanded_ids;
        self.broken_image_ids = restored.broken_image_ids;
        self.restore_scroll = Some(restored.scroll_offset);
    }

    /// idle/ready/degraded -> loading. Supersedes any in-flight request.
    pub fn begin_fetch(&mut self, request_id: u64) {
        if let Some(previous) = self.pending_request.replace(request_id) {
            debug!(previous, request_id, "superseding in-flight fetch");
        }
        self.phase = FetchPhase::Loading;
        self.error = None;
    }

    /// Commits a fetch result if it belongs to the active request.
    /// Returns `false` for a stale result, which is dropped untouched.
    pub fn complete_fetch(&mut self, request_id: u64, result: Result<Vec<RawRecord>, ApiError>) -> bool {
        if self.pending_request != Some(request_id) {
            debug!(request_id, pending = ?self.pending_request, "discarding stale fetch result");
            return false;
        }
        self.pending_request = None;

        let outcome = result.and_then(|records| {
            let items = normalize_records(&records);
            if items.is_empty() {
                Err(ApiError::EmptyResult)
            } else {
                Ok(items)
            }
        });

        match outcome {
            Ok(items) => {
                debug!(count = items.len(), category = %self.category, "items loaded");
                self.items = items;
                self.phase = FetchPhase::Ready;
                self.error = None;
            }
            Err(e) => {
                warn!(error = %e, category = %self.category, "showing fallback dataset");
                self.items = fallback_items();
                self.phase = FetchPhase::Degraded;
                self.error = Some(e.to_string());
            }
        }
        true
    }

    /// Items whose name or description contains the query, case-insensitively.
    pub fn filtered(&self) -> Vec<&Item> {
        let query = self.query.trim().to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                query.is_empty()
                    || item.name.to_lowercase().contains(&query)
                    || item.description.to_lowercase().contains(&query)
            })
            .collect()
    }

    pub fn stats(&self) -> Stats {
        Stats::compute(&self.items)
    }

    pub fn find_item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn toggle_expanded(&mut self, id: &str) {
        if !self.expanded_ids.remove(id) {
            self.expanded_ids.insert(id.to_string());
        }
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded_ids.contains(id)
    }

    /// Idempotent: a second failure for the same id changes nothing.
    pub fn mark_image_broken(&mut self, id: &str) {
        self.broken_image_ids.insert(id.to_string());
    }

    pub fn is_image_broken(&self, id: &str) -> bool {
        self.broken_image_ids.contains(id)
    }
}

/// Fixed sample records shown whenever a fetch fails or comes back empty.
pub fn fallback_records() -> Vec<RawRecord> {
    vec![
        json!({"id": "1", "name": "Hylian Shroom", "category": "material", "description": "A mushroom."}),
        json!({"id": "2", "name": "Hylian Wheat", "category": "material", "description": "A stalk of wheat."}),
        json!({"id": "3", "name": "Blue Bokoblin", "category": "monster", "description": "A common foe."}),
        json!({"id": "4", "name": "Traveler Sword", "category": "weapon", "description": "A rusty sword."}),
        json!({"id": "5", "name": "Soldier Shield", "category": "armor", "description": "A sturdy shield."}),
        json!({"id": "6", "name": "Amber", "category": "material", "description": "A gem."}),
        json!({"id": "7", "name": "Keese Wing", "category": "material", "description": "A wing."}),
        json!({"id": "8", "name": "Lizalfos", "category": "monster", "description": "A lizard-like enemy."}),
        json!({"id": "9", "name": "Hylian Shield", "category": "armor", "description": "A classic shield."}),
        json!({"id": "10", "name": "Ancient Core", "category": "material", "description": "A machine part."}),
    ]
}

pub fn fallback_items() -> Vec<Item> {
    fallback_records()
        .iter()
        .enumerate()
        .map(|(index, raw)| to_item(raw, index))
        .collect()
}
