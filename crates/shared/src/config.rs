//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Default exchange rates into MGA.
    #[serde(default)]
    pub rates: RatesConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration values.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for validating tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Default exchange rates into MGA, one per supported currency.
///
/// These are deployment configuration, not business logic: an operator
/// updates them through `config/*.toml` or `VOLA__RATES__*` environment
/// variables without a code change.
#[derive(Debug, Clone, Deserialize)]
pub struct RatesConfig {
    /// MGA to MGA (always 1).
    #[serde(default = "default_rate_mga")]
    pub mga: Decimal,
    /// RMB to MGA.
    #[serde(default = "default_rate_rmb")]
    pub rmb: Decimal,
    /// EUR to MGA.
    #[serde(default = "default_rate_eur")]
    pub eur: Decimal,
    /// USD to MGA.
    #[serde(default = "default_rate_usd")]
    pub usd: Decimal,
    /// AED to MGA.
    #[serde(default = "default_rate_aed")]
    pub aed: Decimal,
}

fn default_rate_mga() -> Decimal {
    Decimal::ONE
}

fn default_rate_rmb() -> Decimal {
    Decimal::from(613)
}

fn default_rate_eur() -> Decimal {
    Decimal::from(5180)
}

fn default_rate_usd() -> Decimal {
    Decimal::from(4400)
}

fn default_rate_aed() -> Decimal {
    Decimal::from(1195)
}

impl Default for RatesConfig {
    fn default() -> Self {
        Self {
            mga: default_rate_mga(),
            rmb: default_rate_rmb(),
            eur: default_rate_eur(),
            usd: default_rate_usd(),
            aed: default_rate_aed(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("VOLA").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_rates_match_reference_table() {
        let rates = RatesConfig::default();
        assert_eq!(rates.mga, dec!(1));
        assert_eq!(rates.rmb, dec!(613));
        assert_eq!(rates.eur, dec!(5180));
        assert_eq!(rates.usd, dec!(4400));
        assert_eq!(rates.aed, dec!(1195));
    }
}
