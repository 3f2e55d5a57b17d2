//! Configuration management for the Procurement Management Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with PMS_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Procurement policy configuration
    pub procurement: ProcurementConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for validating JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,

    /// Refresh token expiration in seconds
    pub refresh_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProcurementConfig {
    /// Default VAT rate applied to purchase orders, as a fraction
    pub default_tax_rate: f64,
}

impl ProcurementConfig {
    /// The configured rate as an exact decimal fraction.
    ///
    /// Converts through the shortest round-trip string form, so 0.07
    /// comes out as exactly 0.07 rather than the nearest f64.
    pub fn tax_rate(&self) -> Option<rust_decimal::Decimal> {
        use std::str::FromStr;
        rust_decimal::Decimal::from_str(&self.default_tax_rate.to_string()).ok()
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("PMS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("jwt.access_token_expiry", 3600)?
            .set_default("jwt.refresh_token_expiry", 604800)?
            // 7% Thai VAT
            .set_default("procurement.default_tax_rate", 0.07)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (PMS_ prefix)
            .add_source(
                Environment::with_prefix("PMS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_tax_rate_is_exact() {
        let procurement = ProcurementConfig {
            default_tax_rate: 0.07,
        };
        assert_eq!(procurement.tax_rate(), Some(Decimal::new(7, 2)));
    }

    #[test]
    fn test_tax_amount_carries_no_float_noise() {
        let procurement = ProcurementConfig {
            default_tax_rate: 0.07,
        };
        let rate = procurement.tax_rate().unwrap();

        let tax = Decimal::from(100_000) * rate;
        assert_eq!(tax, Decimal::new(7_000_00, 2));
    }
}
