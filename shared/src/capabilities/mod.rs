mod http;
mod kv;

pub use self::http::{
    check_status, parse_json, read_body, RawHttpResult, ValidatedUrl,
    MAX_URL_LENGTH,
};
pub use self::kv::{KvError, KvKey};

// Render comes straight from crux_core; http and kv are the generic fetch
// primitive and the durable key-value store the shell implements.
pub use crux_core::render::Render;
pub use crux_http::Http;
pub use crux_kv::KeyValue;

use crate::app::App;
use crate::event::Event;

pub type AppHttp = Http<Event>;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub kv: KeyValue<Event>,
    pub render: Render<Event>,
}
