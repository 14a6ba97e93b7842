use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::capabilities::Capabilities;
use crate::category::Category;
use crate::detail::{BackTarget, DetailPhase, DetailState, DetailStep};
use crate::error::ApiError;
use crate::event::Event;
use crate::model::Model;
use crate::navigation::{NavigationRequest, NavigationStateBroker, PreferenceWrite, Route, Transition};
use crate::view::{DashboardView, DetailView, Page, ViewModel};

#[derive(Default)]
pub struct App;

impl App {
    fn start_list_fetch(&self, model: &mut Model, caps: &Capabilities) {
        let request_id = model.next_request_id();
        model.dashboard.begin_fetch(request_id);

        let endpoint = model.dashboard.category.as_slug();
        let sent = model.api.fetch_list(&caps.http, endpoint, move |result| Event::ListFetched {
            request_id,
            result,
        });
        if let Err(e) = sent {
            self.handle(
                Event::ListFetched {
                    request_id,
                    result: Err(e),
                },
                model,
                caps,
            );
        }
    }

    fn start_detail_fetch(&self, model: &mut Model, caps: &Capabilities) {
        let request_id = model.next_request_id();
        let Some(detail) = model.detail.as_mut() else {
            return;
        };
        detail.begin_fetch(request_id);

        let sent = model.api.fetch_item(
            &caps.http,
            &detail.category,
            detail.id.as_deref(),
            move |result| Event::DetailFetched { request_id, result },
        );
        if let Err(e) = sent {
            self.handle(
                Event::DetailFetched {
                    request_id,
                    result: Err(e),
                },
                model,
                caps,
            );
        }
    }

    fn start_listing_search(&self, model: &mut Model, caps: &Capabilities, cause: ApiError) {
        let request_id = model.next_request_id();
        let Some(detail) = model.detail.as_mut() else {
            return;
        };
        detail.begin_listing_search(request_id);

        let retained = cause.clone();
        let sent = model.api.fetch_list(&caps.http, "all", move |result| Event::DetailFallbackFetched {
            request_id,
            cause: retained.clone(),
            result,
        });
        if let Err(e) = sent {
            self.handle(
                Event::DetailFallbackFetched {
                    request_id,
                    cause,
                    result: Err(e),
                },
                model,
                caps,
            );
        }
    }

    fn write_preference(model: &Model, caps: &Capabilities, category: Category) {
        match model.broker.save_preferred_category(category) {
            PreferenceWrite::Set { key, value } => {
                caps.kv.set(key, value, |result| Event::PreferenceSaved { ok: result.is_ok() });
            }
            PreferenceWrite::Clear { key } => {
                caps.kv.delete(key, |result| Event::PreferenceSaved { ok: result.is_ok() });
            }
        }
    }

    fn mount_dashboard(&self, model: &mut Model, caps: &Capabilities, incoming: Option<Transition>) {
        model.route = Route::Dashboard;
        model.detail = None;
        model.dashboard = Default::default();
        model.broker.accept(incoming);

        let category_settled = match model.broker.restore() {
            Some(restored) => {
                info!(query = %restored.query, "restoring dashboard snapshot");
                let settled = restored.category.is_some();
                model.dashboard.apply_restored(restored);
                model.replace_history_state = true;
                settled
            }
            None => false,
        };

        if category_settled {
            self.start_list_fetch(model, caps);
        } else {
            model.dashboard.awaiting_preference = true;
            caps.kv.get(model.broker.preference_key(), |result| Event::PreferenceLoaded {
                value: result.ok().flatten(),
            });
        }
    }

    fn mount_detail(
        &self,
        model: &mut Model,
        caps: &Capabilities,
        category: Option<String>,
        id: Option<String>,
        incoming: Option<Transition>,
    ) {
        let detail = DetailState::new(category.as_deref(), id.clone(), incoming);
        model.route = Route::Detail {
            category: detail.category.clone(),
            id: id.unwrap_or_default(),
        };
        // the dashboard is unmounted; whatever it still awaits is stale
        model.dashboard.pending_request = None;
        let needs_fetch = detail.needs_fetch();
        model.detail = Some(detail);

        if needs_fetch {
            self.start_detail_fetch(model, caps);
        }
    }

    /// Event dispatch without the per-update reset, so completions fed back
    /// from inside an update keep the one-shot router fields intact.
    fn handle(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        match event {
            Event::Configure(config) => {
                if let Err(e) = config.api.validate() {
                    warn!(error = %e, "rejecting api configuration");
                    return;
                }
                match NavigationStateBroker::new(&config.storage) {
                    Ok(broker) => model.broker = broker,
                    Err(e) => {
                        warn!(error = %e, "rejecting storage configuration");
                        return;
                    }
                }
                model.api = ApiClient::new(config.api.clone());
                model.config = config;
            }

            Event::DashboardMounted { incoming } => {
                self.mount_dashboard(model, caps, incoming);
                caps.render.render();
            }

            Event::PreferenceLoaded { value } => {
                if !model.dashboard.awaiting_preference || model.route != Route::Dashboard {
                    debug!("preference arrived after the category was settled");
                    return;
                }
                model.dashboard.awaiting_preference = false;
                model.dashboard.category = model.broker.load_preferred_category(value.as_deref());
                self.start_list_fetch(model, caps);
                caps.render.render();
            }

            Event::PreferenceSaved { ok } => model.broker.preference_saved(ok),

            Event::CategorySelected { category } => {
                let Some(category) = Category::parse_loose(Some(&category)) else {
                    warn!(%category, "ignoring unknown category");
                    return;
                };
                model.dashboard.awaiting_preference = false;
                model.dashboard.category = category;
                Self::write_preference(model, caps, category);
                self.start_list_fetch(model, caps);
                caps.render.render();
            }

            Event::QueryChanged { query } => {
                model.dashboard.query = query;
                caps.render.render();
            }

            Event::ToggleExpanded { id } => {
                model.dashboard.toggle_expanded(&id);
                caps.render.render();
            }

            Event::ImageFailed { id } => {
                if !model.dashboard.is_image_broken(&id) {
                    model.dashboard.mark_image_broken(&id);
                    caps.render.render();
                }
            }

            Event::ScrollRestored => {
                model.dashboard.restore_scroll = None;
            }

            Event::ListFetched { request_id, result } => {
                if model.dashboard.complete_fetch(request_id, result) {
                    caps.render.render();
                }
            }

            Event::FetchTimedOut { request_id } => {
                if model.active_request() != Some(request_id) {
                    debug!(request_id, "timeout for a request no longer awaited");
                    return;
                }
                let timeout_ms = model.api.timeout_ms().unwrap_or_default();
                warn!(request_id, timeout_ms, "request timed out");
                let timeout = ApiError::Timeout { timeout_ms };

                let searching = model
                    .detail
                    .as_ref()
                    .is_some_and(|d| d.phase == Some(DetailPhase::SearchingListing));
                let follow_up = match &model.route {
                    Route::Dashboard => Event::ListFetched {
                        request_id,
                        result: Err(timeout),
                    },
                    Route::Detail { .. } if searching => Event::DetailFallbackFetched {
                        request_id,
                        cause: timeout.clone(),
                        result: Err(timeout),
                    },
                    Route::Detail { .. } => Event::DetailFetched {
                        request_id,
                        result: Err(timeout),
                    },
                };
                self.handle(follow_up, model, caps);
            }

            Event::ItemSelected { id, scroll_offset } => {
                let Some(item) = model.dashboard.find_item(&id) else {
                    warn!(%id, "selected item is not in the current list");
                    return;
                };
                let category = Category::parse_loose(Some(&item.category))
                    .unwrap_or(model.dashboard.category)
                    .as_slug()
                    .to_string();
                let snapshot = NavigationStateBroker::snapshot(&model.dashboard, scroll_offset);
                let transition = Transition::trusted(snapshot).with_item(item.raw.clone());
                let route = Route::Detail {
                    category: category.clone(),
                    id: id.clone(),
                };

                self.mount_detail(model, caps, Some(category), Some(id), Some(transition.clone()));
                model.navigation = Some(NavigationRequest::Push { route, transition });
                caps.render.render();
            }

            Event::DetailMounted { category, id, incoming } => {
                self.mount_detail(model, caps, category, id, incoming);
                caps.render.render();
            }

            Event::DetailFetched { request_id, result } => {
                let Some(detail) = model.detail.as_mut() else {
                    return;
                };
                match detail.complete_fetch(request_id, result) {
                    DetailStep::Stale => {}
                    DetailStep::Done => caps.render.render(),
                    DetailStep::SearchListing(cause) => {
                        self.start_listing_search(model, caps, cause);
                        caps.render.render();
                    }
                }
            }

            Event::DetailFallbackFetched {
                request_id,
                cause,
                result,
            } => {
                let Some(detail) = model.detail.as_mut() else {
                    return;
                };
                if detail.complete_listing_search(request_id, cause, result) {
                    caps.render.render();
                }
            }

            Event::BackRequested => {
                let target = match &model.detail {
                    Some(detail) => detail.back_target(),
                    None => BackTarget::Home,
                };
                match target {
                    BackTarget::Restore(transition) => {
                        model.navigation = Some(NavigationRequest::Push {
                            route: Route::Dashboard,
                            transition: transition.clone(),
                        });
                        // the shell pushes first, then clears the pushed entry's state
                        self.mount_dashboard(model, caps, Some(transition));
                    }
                    BackTarget::History => {
                        // the shell's history pop remounts the dashboard
                        model.navigation = Some(NavigationRequest::HistoryBack);
                    }
                    BackTarget::Home => {
                        model.navigation = Some(NavigationRequest::Push {
                            route: Route::Dashboard,
                            transition: Transition::default(),
                        });
                        self.mount_dashboard(model, caps, None);
                    }
                }
                caps.render.render();
            }
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        debug!(event = event.name(), user = event.is_user_initiated(), "update");
        model.navigation = None;
        model.replace_history_state = false;
        self.handle(event, model, caps);
    }

    fn view(&self, model: &Model) -> ViewModel {
        let timeout = model.api.timeout_ms();
        let page = match (&model.route, &model.detail) {
            (Route::Detail { .. }, Some(detail)) => Page::Detail(Box::new(DetailView::build(detail, timeout))),
            _ => Page::Dashboard(Box::new(DashboardView::build(&model.dashboard, timeout))),
        };

        ViewModel {
            route: model.route.clone(),
            path: model.route.path(),
            page,
            navigation: model.navigation.clone(),
            replace_history_state: model.replace_history_state,
        }
    }
}
