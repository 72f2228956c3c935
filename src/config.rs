//! Configuration management for the booking engine

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::models::policy::{BookingWindow, CancellationRule};

#[derive(Debug, Deserialize, Clone)]
pub struct BookingWindowConfig {
    /// Earliest bookable day, in days from today (inclusive)
    pub min_days_ahead: i64,
    /// Latest bookable day, in days from today (inclusive)
    pub max_days_ahead: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CancellationConfig {
    /// Fee tiers, each a (days_before, fee_percent) pair
    pub rules: Vec<CancellationRuleConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CancellationRuleConfig {
    pub days_before: i64,
    pub fee_percent: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub booking_window: BookingWindowConfig,
    #[serde(default)]
    pub cancellation: CancellationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix STUDIO_)
            .add_source(
                Environment::with_prefix("STUDIO")
                    .separator("_")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn booking_window(&self) -> BookingWindow {
        BookingWindow::new(
            self.booking_window.min_days_ahead,
            self.booking_window.max_days_ahead,
        )
    }

    pub fn cancellation_rules(&self) -> Vec<CancellationRule> {
        self.cancellation
            .rules
            .iter()
            .map(|r| CancellationRule::new(r.days_before, r.fee_percent))
            .collect()
    }
}

impl Default for BookingWindowConfig {
    fn default() -> Self {
        Self {
            min_days_ahead: 1,
            max_days_ahead: 90,
        }
    }
}

impl Default for CancellationConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                CancellationRuleConfig { days_before: 7, fee_percent: 0 },
                CancellationRuleConfig { days_before: 3, fee_percent: 50 },
                CancellationRuleConfig { days_before: 1, fee_percent: 80 },
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
