//! # Structured Logging Module
//!
//! Environment-aware structured logging for the resolver and replication
//! manager. Everything in this crate logs through `tracing`; this module only
//! installs a subscriber for hosts that do not bring their own.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration.
///
/// `RUST_LOG` overrides the environment default. Calling this more than once,
/// or after another global subscriber has been installed, is harmless.
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(get_log_level(&environment)));
        let json = std::env::var("REPLICA_LOADER_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let layer = if json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
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

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized - continuing with existing subscriber");
        }

        tracing::info!(
            pid = std::process::id(),
            environment = %environment,
            json = json,
            "Structured logging initialized"
        );
    });
}

/// Current environment from environment variables
pub(crate) fn get_environment() -> String {
    std::env::var("REPLICA_LOADER_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
        .to_lowercase()
}

/// Log level based on environment
pub(crate) fn get_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        "test" | "development" => "debug",
        _ => "debug",
    }
}

/// Log structured data for resolver operations
pub fn log_resolver_operation(
    operation: &str,
    attribute: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::debug!(
        operation = %operation,
        attribute = %attribute,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "RESOLVER_OPERATION"
    );
}

/// Log structured data for replication manager lifecycle transitions
pub fn log_manager_transition(container: Option<&str>, transition: &str, details: Option<&str>) {
    tracing::info!(
        container = container,
        transition = %transition,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "MANAGER_TRANSITION"
    );
}
