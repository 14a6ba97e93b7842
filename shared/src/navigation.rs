//! Snapshot/restore of dashboard state across a detail-page round trip,
//! plus the one durable preference (last selected category).

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::capabilities::{KvError, KvKey};
use crate::category::Category;
use crate::config::StorageConfig;
use crate::dashboard::{DashboardState, RestoredState};
use crate::normalize::RawRecord;

/// Serialized slice of dashboard state attached to an outbound navigation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationSnapshot {
    pub query: String,
    pub category: String,
    pub expanded_ids: Vec<String>,
    pub broken_image_ids: Vec<String>,
    pub scroll_offset: f64,
}

/// State the router carries with a history entry.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transition {
    pub snapshot: Option<NavigationSnapshot>,
    /// Set only on links produced by this app.
    pub trusted: bool,
    pub from_history: bool,
    /// Record already in hand, so the detail page can skip its fetch.
    pub item: Option<RawRecord>,
}

impl Transition {
    pub fn trusted(snapshot: NavigationSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            trusted: true,
            ..Self::default()
        }
    }

    pub fn with_item(mut self, item: RawRecord) -> Self {
        self.item = Some(item);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "camelCase")]
pub enum Route {
    Dashboard,
    Detail { category: String, id: String },
}

impl Default for Route {
    fn default() -> Self {
        Self::Dashboard
    }
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::Detail { category, id } => format!("/item/{category}/{id}"),
        }
    }
}

/// One-shot instruction for the shell's router.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NavigationRequest {
    Push { route: Route, transition: Transition },
    HistoryBack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreferenceWrite {
    Set { key: String, value: Vec<u8> },
    Clear { key: String },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationStateBroker {
    key: KvKey,
    incoming: Option<Transition>,
    /// Category carried by the snapshot most recently restored on this mount.
    restored_category: Option<String>,
}

impl NavigationStateBroker {
    pub fn new(config: &StorageConfig) -> Result<Self, KvError> {
        Ok(Self {
            key: KvKey::new(&config.namespace, &config.last_category_key)?,
            incoming: None,
            restored_category: None,
        })
    }

    pub fn preference_key(&self) -> String {
        self.key.raw()
    }

    /// Pure projection of the dashboard into a snapshot.
    pub fn snapshot(state: &DashboardState, scroll_offset: f64) -> NavigationSnapshot {
        NavigationSnapshot {
            query: state.query.clone(),
            category: state.category.as_slug().to_string(),
            expanded_ids: state.expanded_ids.iter().cloned().collect(),
            broken_image_ids: state.broken_image_ids.iter().cloned().collect(),
            scroll_offset,
        }
    }

    /// Starts a new mount with whatever the router carried in.
    pub fn accept(&mut self, incoming: Option<Transition>) {
        self.incoming = incoming;
        self.restored_category = None;
    }

    /// Yields the carried state once, and only for a trusted transition.
    pub fn restore(&mut self) -> Option<RestoredState> {
        let transition = self.incoming.take()?;
        if !transition.trusted {
            debug!("ignoring snapshot from untrusted transition");
            return None;
        }
        let snapshot = transition.snapshot?;
        self.restored_category = Some(snapshot.category.clone());

        Some(RestoredState {
            query: snapshot.query,
            category: Category::from_slug(&snapshot.category),
            expanded_ids: snapshot.expanded_ids.into_iter().collect(),
            broken_image_ids: snapshot.broken_image_ids.into_iter().collect(),
            scroll_offset: snapshot.scroll_offset,
        })
    }

    pub fn has_restored(&self) -> bool {
        self.restored_category.is_some()
    }

    /// Trusted snapshot category, then a valid stored slug, then `all`.
    pub fn load_preferred_category(&self, stored: Option<&[u8]>) -> Category {
        if let Some(category) = self
            .restored_category
            .as_deref()
            .and_then(Category::from_slug)
        {
            return category;
        }

        stored
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
            .and_then(|value| Category::from_upstream_slug(value.trim()))
            .unwrap_or_default()
    }

    /// The write that persists `category`. `all` clears the key, since only
    /// upstream slugs are stored.
    pub fn save_preferred_category(&self, category: Category) -> PreferenceWrite {
        let key = self.preference_key();
        match category {
            Category::All => PreferenceWrite::Clear { key },
            other => PreferenceWrite::Set {
                key,
                value: other.as_slug().as_bytes().to_vec(),
            },
        }
    }

    /// Write failures only affect a soft default, so they are logged and dropped.
    pub fn preference_saved(&self, ok: bool) {
        if !ok {
            warn!(key = %self.preference_key(), "failed to persist last category");
        }
    }
}
