//! Logger initialization.
//!
//! Small wrapper over `env_logger`; the rest of the crate logs through the
//! `log` facade only.

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// Filter resolution order: the `RUST_LOG` environment variable, then
/// `default_filter`, then info level. Subsequent calls are ignored, so both a
/// host application and the engine may call this safely.
pub fn init_logging(default_filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else if let Some(filter) = default_filter {
            builder.parse_filters(filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.init();
        log::debug!("logging initialized");
    });
}
