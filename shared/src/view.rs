//! What the shell renders. Built fresh from the model on every `view` call.

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::charts::{category_breakdown, edibility_breakdown, CategorySlice, EdibilityRow};
use crate::dashboard::{DashboardState, Stats};
use crate::detail::{DetailField, DetailState};
use crate::locations::LocationsCell;
use crate::navigation::{NavigationRequest, Route};
use crate::normalize::Item;

pub const EMPTY_MESSAGE: &str = "No results";
pub const LOADING_MESSAGE: &str = "Loading…";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOption {
    pub slug: String,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    /// `None` when absent or after the shell reported a load failure.
    pub image: Option<String>,
    pub locations: LocationsCell,
}

impl ItemRow {
    fn project(item: &Item, state: &DashboardState) -> Self {
        let image = (!item.image.is_empty() && !state.is_image_broken(&item.id)).then(|| item.image.clone());
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            description: item.description.clone(),
            image,
            locations: LocationsCell::project(&item.common_locations, state.is_expanded(&item.id)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    pub categories: Vec<CategoryOption>,
    pub query: String,
    pub loading: bool,
    pub loading_message: Option<String>,
    pub error: Option<String>,
    pub stats: Stats,
    pub rows: Vec<ItemRow>,
    pub empty_message: Option<String>,
    pub category_chart: Vec<CategorySlice>,
    pub edibility_chart: Vec<EdibilityRow>,
    /// Scroll target, present until the shell sends `ScrollRestored`.
    pub restore_scroll_offset: Option<f64>,
    pub pending_request_id: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

impl DashboardView {
    pub fn build(state: &DashboardState, request_timeout_ms: Option<u64>) -> Self {
        let categories = Category::ALL
            .iter()
            .map(|category| CategoryOption {
                slug: category.as_slug().to_string(),
                label: category.label().to_string(),
                selected: *category == state.category,
            })
            .collect();

        let rows: Vec<ItemRow> = state
            .filtered()
            .into_iter()
            .map(|item| ItemRow::project(item, state))
            .collect();
        let loading = state.is_loading();

        Self {
            categories,
            query: state.query.clone(),
            loading,
            loading_message: loading.then(|| LOADING_MESSAGE.to_string()),
            error: state.error.clone(),
            stats: state.stats(),
            empty_message: (!loading && rows.is_empty()).then(|| EMPTY_MESSAGE.to_string()),
            rows,
            category_chart: category_breakdown(&state.items),
            edibility_chart: edibility_breakdown(&state.items),
            restore_scroll_offset: state.restore_scroll,
            pending_request_id: state.pending_request,
            request_timeout_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailView {
    pub category: String,
    pub id: Option<String>,
    pub title: String,
    pub image: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub fields: Vec<DetailField>,
    pub pending_request_id: Option<u64>,
    pub request_timeout_ms: Option<u64>,
}

impl DetailView {
    pub fn build(state: &DetailState, request_timeout_ms: Option<u64>) -> Self {
        Self {
            category: state.category.clone(),
            id: state.id.clone(),
            title: state.title(),
            image: state.image(),
            loading: state.is_loading(),
            error: state.error.clone(),
            fields: state.fields(),
            pending_request_id: state.pending_request,
            request_timeout_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "page", content = "view", rename_all = "camelCase")]
pub enum Page {
    Dashboard(Box<DashboardView>),
    Detail(Box<DetailView>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewModel {
    pub route: Route,
    pub path: String,
    pub page: Page,
    pub navigation: Option<NavigationRequest>,
    /// Tells the shell to clear the state attached to the current history entry.
    pub replace_history_state: bool,
}

impl Default for ViewModel {
    fn default() -> Self {
        Self {
            route: Route::Dashboard,
            path: Route::Dashboard.path(),
            page: Page::Dashboard(Box::new(DashboardView::build(&DashboardState::default(), None))),
            navigation: None,
            replace_history_state: false,
        }
    }
}
