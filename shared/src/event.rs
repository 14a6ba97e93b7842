use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::navigation::Transition;
use crate::normalize::RawRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Configure(AppConfig),

    // dashboard lifecycle
    DashboardMounted {
        incoming: Option<Transition>,
    },
    CategorySelected {
        category: String,
    },
    QueryChanged {
        query: String,
    },
    ToggleExpanded {
        id: String,
    },
    ImageFailed {
        id: String,
    },
    ScrollRestored,
    ItemSelected {
        id: String,
        scroll_offset: f64,
    },

    // detail page
    DetailMounted {
        category: Option<String>,
        id: Option<String>,
        incoming: Option<Transition>,
    },
    BackRequested,

    /// Fired by the shell once the configured request timeout has elapsed.
    FetchTimedOut {
        request_id: u64,
    },

    // capability responses
    #[serde(skip)]
    PreferenceLoaded {
        value: Option<Vec<u8>>,
    },
    #[serde(skip)]
    PreferenceSaved {
        ok: bool,
    },
    #[serde(skip)]
    ListFetched {
        request_id: u64,
        result: ApiResult<Vec<RawRecord>>,
    },
    #[serde(skip)]
    DetailFetched {
        request_id: u64,
        result: ApiResult<RawRecord>,
    },
    #[serde(skip)]
    DetailFallbackFetched {
        request_id: u64,
        cause: ApiError,
        result: ApiResult<Vec<RawRecord>>,
    },
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "configure",
            Self::DashboardMounted { .. } => "dashboard_mounted",
            Self::CategorySelected { .. } => "category_selected",
            Self::QueryChanged { .. } => "query_changed",
            Self::ToggleExpanded { .. } => "toggle_expanded",
            Self::ImageFailed { .. } => "image_failed",
            Self::ScrollRestored => "scroll_restored",
            Self::ItemSelected { .. } => "item_selected",
            Self::DetailMounted { .. } => "detail_mounted",
            Self::BackRequested => "back_requested",
            Self::FetchTimedOut { .. } => "fetch_timed_out",
            Self::PreferenceLoaded { .. } => "preference_loaded",
            Self::PreferenceSaved { .. } => "preference_saved",
            Self::ListFetched { .. } => "list_fetched",
            Self::DetailFetched { .. } => "detail_fetched",
            Self::DetailFallbackFetched { .. } => "detail_fallback_fetched",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::CategorySelected { .. }
                | Self::QueryChanged { .. }
                | Self::ToggleExpanded { .. }
                | Self::ItemSelected { .. }
                | Self::BackRequested
        )
    }
}
