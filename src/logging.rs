//! Logger installation
//!
//! On Android the `log` facade is routed to logcat. Elsewhere the embedding
//! host is expected to install its own logger.

use crate::config::LogConfig;

/// Install the platform logger. Safe to call more than once.
pub fn init(config: &LogConfig) {
    #[cfg(target_os = "android")]
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(config.max_level)
            .with_tag(config.tag.as_str()),
    );

    #[cfg(not(target_os = "android"))]
    let _ = config;
}
