use std::env;

use tracing_subscriber::EnvFilter;
use tripsplit_application::LedgerConfig;
use tripsplit_domain::{CurrencyCode, services::PercentagePolicy};
use tripsplit_tokenizer::DecimalFormat;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name}={value:?} is invalid: {reason}")]
pub struct ConfigError {
    pub name: &'static str,
    pub value: String,
    pub reason: &'static str,
}

/// Settings read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub ledger: LedgerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Unset or blank variables keep the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut ledger = LedgerConfig::default();
        let read = |name: &'static str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .map(|value| (name, value))
        };

        if let Some((name, value)) = read("TRIPSPLIT_MATCH_THRESHOLD") {
            ledger.match_threshold = match value.parse::<f64>() {
                Ok(threshold) if (0.0..=1.0).contains(&threshold) => threshold,
                _ => return Err(invalid(name, value, "expected a number between 0 and 1")),
            };
        }
        if let Some((name, value)) = read("TRIPSPLIT_PERCENTAGE_POLICY") {
            ledger.percentage_policy = match value.to_ascii_lowercase().as_str() {
                "lenient" => PercentagePolicy::Lenient,
                "strict" => PercentagePolicy::Strict,
                _ => return Err(invalid(name, value, "expected `lenient` or `strict`")),
            };
        }
        if let Some((name, value)) = read("TRIPSPLIT_DECIMAL_FORMAT") {
            ledger.decimal_format = match value.to_ascii_lowercase().as_str() {
                "us" => DecimalFormat::Us,
                "eu" => DecimalFormat::Eu,
                _ => return Err(invalid(name, value, "expected `us` or `eu`")),
            };
        }
        if let Some((name, value)) = read("TRIPSPLIT_DEFAULT_CURRENCY") {
            ledger.default_currency = value
                .parse::<CurrencyCode>()
                .map_err(|_| invalid(name, value, "expected a three-letter currency code"))?;
        }

        Ok(Self { ledger })
    }
}

fn invalid(name: &'static str, value: String, reason: &'static str) -> ConfigError {
    ConfigError {
        name,
        value,
        reason,
    }
}

/// Logs go to stderr so stdout stays clean for reports; `RUST_LOG` overrides
/// the default `warn` level.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
