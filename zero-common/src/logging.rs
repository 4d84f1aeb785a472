//! Logging setup for the sentiment service.
//!
//! Structured logging via `tracing`, rendered as JSON or human-readable text.
//!
//! # Noise Filtering
//!
//! HTTP client internals and the HTML parser produce high-volume debug output
//! on every fetch. Those modules are pinned to `warn` while business logs stay
//! at the configured level. `RUST_LOG` overrides everything.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;

/// Library modules pinned to `warn`.
pub const NOISY_MODULES: &[&str] = &[
    "hyper",
    "hyper_util",
    "reqwest",
    "h2",
    "rustls",
    "tokio_util",
    "tower_http",
    "html5ever",
    "selectors",
];

/// Build the filter directive string for a base level plus exclusions.
fn build_directives(log_level: &str, excluded_targets: &[String]) -> String {
    let mut directives = String::from(log_level);

    for module in NOISY_MODULES {
        directives.push_str(&format!(",{}=warn", module));
    }

    for target in excluded_targets {
        directives.push_str(&format!(",{}=warn", target));
    }

    directives
}

/// Build the EnvFilter, preferring `RUST_LOG` when set.
fn build_filter(log_level: &str, excluded_targets: &[String]) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }

    EnvFilter::new(build_directives(log_level, excluded_targets))
}

/// Initialize logging with the given level and format.
///
/// * `log_level` - Base log level (trace, debug, info, warn, error)
/// * `log_format` - `"json"` for structured JSON, anything else for pretty output
pub fn init_logging(log_level: &str, log_format: &str) {
    install(log_level, log_format, &[]);
}

/// Initialize logging from the observability section of the config.
pub fn init_from_config(config: &ObservabilityConfig) {
    install(&config.log_level, &config.log_format, &config.excluded_targets);
}

fn install(log_level: &str, log_format: &str, excluded_targets: &[String]) {
    let filter = build_filter(log_level, excluded_targets);
    let subscriber = tracing_subscriber::registry().with(filter);

    // try_init: a second call (tests, embedded use) keeps the first subscriber.
    if log_format == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .json()
            .with_span_events(FmtSpan::CLOSE)
            .with_current_span(true)
            .with_target(true)
            .with_file(true)
            .with_line_number(true);
        let _ = subscriber.with(fmt_layer).try_init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(true)
            .with_target(true)
            .with_file(false)
            .with_line_number(false);
        let _ = subscriber.with(fmt_layer).try_init();
    }

    tracing::info!(
        log_level = %log_level,
        log_format = %log_format,
        noise_filtered = NOISY_MODULES.len() + excluded_targets.len(),
        "Logging initialized"
    );
}

/// Generate a new identifier for a refresh pass or request.
pub fn generate_trace_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Create a tracing span for a single refresh pass.
///
/// ```ignore
/// let span = pass_span!(pass_id, entities = targets.len());
/// async { /* ... */ }.instrument(span).await;
/// ```
#[macro_export]
macro_rules! pass_span {
    ($pass_id:expr) => {
        tracing::info_span!("refresh_pass", pass_id = %$pass_id)
    };
    ($pass_id:expr, $($field:tt)*) => {
        tracing::info_span!("refresh_pass", pass_id = %$pass_id, $($field)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noisy_modules_list() {
        assert!(NOISY_MODULES.contains(&"hyper"));
        assert!(NOISY_MODULES.contains(&"reqwest"));
        assert!(NOISY_MODULES.contains(&"html5ever"));
        assert!(NOISY_MODULES.contains(&"selectors"));
    }

    #[test]
    fn test_build_directives() {
        let directives = build_directives("debug", &["wiremock".to_string()]);
        assert!(directives.starts_with("debug,"));
        assert!(directives.contains("reqwest=warn"));
        assert!(directives.ends_with(",wiremock=warn"));
    }

    #[test]
    fn test_generate_trace_id() {
        let id1 = generate_trace_id();
        let id2 = generate_trace_id();
        assert_ne!(id1, id2);
        assert_eq!(id1.len(), 36);
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        init_logging("info", "pretty");
        init_from_config(&ObservabilityConfig::default());
    }
}
