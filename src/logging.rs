//! # Structured Logging Module
//!
//! Environment-aware structured logging for strategy resolution and container
//! configuration. Library code only emits `tracing` events; installing a
//! subscriber is left to the host, with [`init_structured_logging`] as a
//! convenience for binaries and tests.

use std::sync::OnceLock;

use chrono::Utc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::SettingsLoader;
use crate::constants::env;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// `TEXTCONV_LOG` takes precedence over the per-environment defaults.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = SettingsLoader::detect_environment();
        let filter = EnvFilter::try_from_env(env::LOG_FILTER)
            .unwrap_or_else(|_| EnvFilter::new(default_directives(&environment)));

        let layer = if use_json_output() {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_filter(filter)
                .boxed()
        };

        // A host may already own the global subscriber
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(environment = %environment, "Structured logging initialized");
    });
}

/// Filter directives used when `TEXTCONV_LOG` is unset. Resolution events are
/// `debug`, so production keeps only configuration and error events.
fn default_directives(environment: &str) -> &'static str {
    match environment {
        "production" | "staging" => "warn,textconv_core=info",
        "test" => "warn,textconv_core=debug",
        _ => "info,textconv_core=debug",
    }
}

fn use_json_output() -> bool {
    std::env::var(env::LOG_FORMAT)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log structured data for strategy resolution
pub fn log_resolution(
    container: &str,
    type_name: &str,
    kind: &str,
    origin: &str,
    status: &str,
) {
    tracing::debug!(
        container = %container,
        type_name = %type_name,
        kind = %kind,
        origin = %origin,
        status = %status,
        timestamp = %Utc::now().to_rfc3339(),
        "STRATEGY_RESOLUTION"
    );
}

/// Log structured data for configuration operations
pub fn log_configuration(
    operation: &str,
    type_name: Option<&str>,
    status: &str,
    details: Option<&str>,
) {
    tracing::info!(
        operation = %operation,
        type_name = type_name,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "CONFIGURATION_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
