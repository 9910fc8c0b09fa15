use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::report::{Locale, PageGeometry, ReportConfig};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: String,
    pub backend_timeout: Duration,
    pub store_path: PathBuf,
    pub report_organization: String,
    pub report_locale: Locale,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            backend_url: require_env("BACKEND_URL")?,
            backend_timeout: Duration::from_secs(
                optional_env("BACKEND_TIMEOUT_SECS", "60")
                    .parse::<u64>()
                    .context("BACKEND_TIMEOUT_SECS must be a whole number of seconds")?,
            ),
            store_path: PathBuf::from(optional_env("STORE_PATH", ".dev-store.json")),
            report_organization: optional_env("REPORT_ORGANIZATION", "Portal de Reclutamiento"),
            report_locale: optional_env("REPORT_LOCALE", "es")
                .parse::<Locale>()
                .map_err(anyhow::Error::msg)
                .context("REPORT_LOCALE must be 'es' or 'en'")?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }

    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            organization: self.report_organization.clone(),
            locale: self.report_locale,
            geometry: PageGeometry::a4(),
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
