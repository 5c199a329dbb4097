//! Logger initialization.
//!
//! Native builds log through `env_logger` (so `RUST_LOG` still wins), the
//! browser build through `console_log`. Calling `init` twice is harmless.

use crate::config::LogLevel;

#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LogLevel) {
    let result = env_logger::Builder::new()
        .filter_level(level.to_level_filter())
        .parse_default_env()
        .try_init();
    if result.is_err() {
        log::debug!("Logger already initialized");
    }
}

#[cfg(target_arch = "wasm32")]
pub fn init(level: LogLevel) {
    if console_log::init_with_level(level.to_level()).is_err() {
        log::debug!("Logger already initialized");
    }
}
