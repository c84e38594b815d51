//! Carbon Intensity API — Shared Library
//!
//! This crate contains the WattTime client, configuration, error
//! taxonomy, and proxy orchestration shared by all API handlers.
//!
//! Each serverless function in `api/` imports from this library
//! to keep handlers thin and logic reusable.

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod proxy;
pub mod units;

pub use error::{Error, Result};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Install the global tracing subscriber for a handler process.
///
/// Respects `RUST_LOG` when set, defaulting to `info`. Safe to call
/// from every entry point; repeated calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
