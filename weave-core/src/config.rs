use config::{Config, ConfigError, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct WeaveConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub badges: BadgeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub log_level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Thresholds for percentile and lifecycle badges.
///
/// Defaults match the product rules: top 10% of the network by connection
/// count (with at least 10 connections) for super-connector, top 5% by
/// point balance (with at least 500 points) for top-earner, and the first
/// 100 signups for early-adopter.
#[derive(Debug, Deserialize, Clone)]
pub struct BadgeConfig {
    pub super_connector_percentile: f64,
    pub super_connector_min_connections: usize,
    pub top_earner_percentile: f64,
    pub top_earner_min_balance: i64,
    pub early_adopter_cutoff: usize,
}

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            super_connector_percentile: 0.10,
            super_connector_min_connections: 10,
            top_earner_percentile: 0.05,
            top_earner_min_balance: 500,
            early_adopter_cutoff: 100,
        }
    }
}

impl WeaveConfig {
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .build()?;
        s.try_deserialize()
    }
}
