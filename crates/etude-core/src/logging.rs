//! Logging and tracing initialization for Etude.
//!
//! The library itself only emits `tracing` events: route registration,
//! recovered panics, request timing from the logger stage, server
//! lifecycle. Nothing is printed until a subscriber is installed, which is
//! what the functions here do.
//!
//! ## Configuration
//!
//! `RUST_LOG` always wins over the level passed in code:
//!
//! ```bash
//! # Show only warnings and errors (production)
//! RUST_LOG=warn cargo run -p etude-hello
//!
//! # Fine-grained control
//! RUST_LOG=etude_core=debug,hyper=warn cargo run -p etude-hello
//! ```
//!
//! [`init_logging_from_config`] installs a global subscriber and panics if
//! one is already set. Call it once, at startup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Pick level and format from a loaded [`Config`].
///
/// ```rust,no_run
/// let config = etude_core::Config::from_env().unwrap();
/// etude_core::logging::init_logging_from_config(&config);
/// ```
pub fn init_logging_from_config(config: &Config) {
    let registry = tracing_subscriber::registry().with(filter(&config.log_level));
    match config.log_format {
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .pretty()
                    .with_line_number(true)
                    .with_thread_ids(true)
                    .with_target(true),
            )
            .init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Compact => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}
