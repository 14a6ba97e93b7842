#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod api;
pub mod app;
pub mod capabilities;
pub mod category;
pub mod charts;
pub mod config;
pub mod dashboard;
pub mod detail;
pub mod error;
pub mod event;
pub mod locations;
pub mod model;
pub mod navigation;
pub mod normalize;
pub mod view;

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::AppConfig;
pub use crux_core::{render::Render, App as CruxApp};
pub use error::{ApiError, ApiResult, ErrorKind};
pub use event::Event;
pub use model::Model;
pub use navigation::{NavigationRequest, NavigationSnapshot, Route, Transition};
pub use normalize::{Item, Locations, RawRecord};
pub use view::ViewModel;
