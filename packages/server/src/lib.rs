// Solar Telemetry - HTTP server core
//
// Serves the aggregated station report as an HTML page and as JSON.
// All fetching and extraction lives in the telemetry crate.

pub mod config;
pub mod server;

pub use config::*;
