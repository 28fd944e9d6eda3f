//! Dashboard-side consumers of the proxy: fetch wrappers and the pure
//! transforms that turn payloads into display-ready figures.

pub mod client;
pub mod donki;
pub mod neo;

pub use client::ProxyClient;
pub use donki::{kp_to_scale, map_event, map_events, ChartScale, TimeRange};
pub use neo::{flatten_feed, NeoFilter, NeoStats};
