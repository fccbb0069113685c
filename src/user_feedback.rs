//! User-facing progress and result messages, routed through `tracing`

use crate::catalog::CatalogReport;
use crate::config::FixtureConfig;
use crate::types::FixtureError;

pub struct UserFeedback;

impl UserFeedback {
    pub fn show_welcome() {
        tracing::info!("Pixie fixtures {}", env!("CARGO_PKG_VERSION"));
    }

    pub fn show_config(config: &FixtureConfig) {
        for line in config.summary().lines() {
            tracing::info!("{}", line.trim());
        }
    }

    pub fn show_error(error: &str, suggestion: Option<&str>) {
        if let Some(hint) = suggestion {
            tracing::error!("Error: {} | Hint: {}", error, hint);
        } else {
            tracing::error!("Error: {}", error);
        }
    }

    pub fn show_success(message: &str, stats: Option<&str>) {
        if let Some(metrics) = stats {
            tracing::info!("Success: {} | Stats: {}", message, metrics);
        } else {
            tracing::info!("Success: {}", message);
        }
    }

    pub fn show_warning(message: &str) {
        tracing::warn!("Warning: {}", message);
    }

    pub fn show_info(message: &str) {
        tracing::info!("Info: {}", message);
    }

    pub fn catalog_finished(report: &CatalogReport) {
        Self::show_success("fixtures generated", Some(&report.summary()));
    }

    /// Report a failure with a hint matched to its kind
    pub fn fixture_error(error: &FixtureError) {
        let hint = match error {
            FixtureError::Io { .. } => "Check that the fixtures root is writable.",
            FixtureError::Config(_) => "Fix the configuration file or drop it to use the defaults.",
            FixtureError::InvalidRequest(_) => "The requested parameters are outside what the container can store.",
            FixtureError::Codec { .. } => "The codec rejected the synthesized pixels.",
        };
        Self::show_error(&error.to_string(), Some(hint));
    }
}
