//! Shared helpers: logging setup, numeric formatting, DPI fallback, and
//! visualization output.

pub mod dpi;
pub mod visualization;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Initializes the global tracing subscriber.
///
/// The filter comes from `RUST_LOG`, defaulting to `info` for this crate
/// when unset. Safe to call once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(concat!(env!("CARGO_PKG_NAME"), "=info")));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init();
}

/// Rounds a value to three decimal places for JSON output.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
