use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::dashboard::DashboardState;
use crate::detail::DetailState;
use crate::navigation::{NavigationRequest, NavigationStateBroker, Route};

#[derive(Debug, Default)]
pub struct Model {
    pub config: AppConfig,
    pub api: ApiClient,
    pub broker: NavigationStateBroker,
    pub route: Route,
    pub dashboard: DashboardState,
    /// Present while the detail page is mounted.
    pub detail: Option<DetailState>,
    /// Monotonic across mounts so a late response never matches a newer request.
    pub last_request_id: u64,
    /// One-shot router instruction, cleared at the start of the next update.
    pub navigation: Option<NavigationRequest>,
    pub replace_history_state: bool,
}

impl Model {
    pub fn next_request_id(&mut self) -> u64 {
        self.last_request_id += 1;
        self.last_request_id
    }

    /// The request whose completion is currently awaited, if any.
    pub fn active_request(&self) -> Option<u64> {
        match &self.route {
            Route::Dashboard => self.dashboard.pending_request,
            Route::Detail { .. } => self.detail.as_ref().and_then(|d| d.pending_request),
        }
    }
}
