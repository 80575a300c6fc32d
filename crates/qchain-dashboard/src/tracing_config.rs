//! Log output configuration.
//!
//! Console output for development, JSON lines for production.

use qchain_core::LoggingSettings;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Human-readable console output.
    Console,
    /// JSON structured logging.
    Json,
}

impl TracingFormat {
    fn parse(s: &str) -> Self {
        match s {
            "json" => TracingFormat::Json,
            _ => TracingFormat::Console,
        }
    }
}

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Filter directive for the dashboard crates (e.g. "info", "debug").
    pub log_level: String,
    pub format: TracingFormat,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: TracingFormat::Console,
        }
    }
}

impl TracingConfig {
    /// Build from the `logging` configuration section.
    pub fn from_settings(settings: &LoggingSettings) -> Self {
        Self {
            log_level: settings.level.clone(),
            format: TracingFormat::parse(&settings.format),
        }
    }

    /// Filter used when `RUST_LOG` is unset.
    fn default_directives(&self) -> String {
        let level = &self.log_level;
        format!(
            "qchain_dashboard={level},qchain_ledger={level},qchain_ai={level},qchain_core={level},tower_http={level}"
        )
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_tracing(config: &TracingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.default_directives()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = match config.format {
        TracingFormat::Console => fmt::layer().with_target(true).boxed(),
        TracingFormat::Json => fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .json()
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.format, TracingFormat::Console);
    }

    #[test]
    fn test_from_settings() {
        let settings = LoggingSettings {
            level: "debug".to_string(),
            format: "json".to_string(),
        };
        let config = TracingConfig::from_settings(&settings);
        assert_eq!(config.format, TracingFormat::Json);
        assert!(config.default_directives().contains("qchain_ledger=debug"));
        assert!(config.default_directives().contains("tower_http=debug"));
    }

    #[test]
    fn test_unknown_format_falls_back_to_console() {
        assert_eq!(TracingFormat::parse("xml"), TracingFormat::Console);
    }
}
