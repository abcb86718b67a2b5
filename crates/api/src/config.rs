use std::time::Duration;

use gigbook_core::booking::DEFAULT_PLATFORM_FEE_PERCENT;
use gigbook_core::dispute::{validate_window_days, DEFAULT_WINDOW_DAYS};
use rust_decimal::Decimal;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the JWT secret have defaults suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Database pool size (default: `20`).
    pub db_max_connections: u32,
    /// Emit JSON log lines instead of human-readable text.
    pub log_json: bool,
    pub jwt: JwtConfig,
    pub marketplace: MarketplaceConfig,
}

/// Business parameters of the booking marketplace.
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    /// Commission taken from each booking total, in percent.
    pub platform_fee_percent: Decimal,
    /// Days before an unanswered dispute auto-resolves.
    pub dispute_window_days: i64,
    /// How often the auto-resolution sweep runs.
    pub dispute_check_interval: Duration,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            platform_fee_percent: Decimal::from(DEFAULT_PLATFORM_FEE_PERCENT),
            dispute_window_days: DEFAULT_WINDOW_DAYS,
            dispute_check_interval: Duration::from_secs(3600),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                       | Default                  |
    /// |-------------------------------|--------------------------|
    /// | `HOST`                        | `0.0.0.0`                |
    /// | `PORT`                        | `5000`                   |
    /// | `CORS_ORIGINS`                | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`        | `30`                     |
    /// | `DB_MAX_CONNECTIONS`          | `20`                     |
    /// | `LOG_FORMAT`                  | `text` (or `json`)       |
    /// | `PLATFORM_FEE_PERCENT`        | `10`                     |
    /// | `DISPUTE_WINDOW_DAYS`         | `7` (at most `365`)      |
    /// | `DISPUTE_CHECK_INTERVAL_SECS` | `3600`                   |
    ///
    /// JWT settings are read by [`JwtConfig::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on unparsable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = env_or("PORT", "5000")
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:3000")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = env_or("REQUEST_TIMEOUT_SECS", "30")
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let db_max_connections: u32 = std::env::var("DB_MAX_CONNECTIONS")
            .map(|v| v.parse().expect("DB_MAX_CONNECTIONS must be a valid u32"))
            .unwrap_or(gigbook_db::DEFAULT_MAX_CONNECTIONS);

        let log_json = match env_or("LOG_FORMAT", "text").as_str() {
            "json" => true,
            "text" => false,
            other => panic!("LOG_FORMAT must be 'text' or 'json', got '{other}'"),
        };

        let platform_fee_percent: Decimal = env_or(
            "PLATFORM_FEE_PERCENT",
            &DEFAULT_PLATFORM_FEE_PERCENT.to_string(),
        )
        .parse()
        .expect("PLATFORM_FEE_PERCENT must be a decimal number");
        assert!(
            platform_fee_percent >= Decimal::ZERO && platform_fee_percent <= Decimal::ONE_HUNDRED,
            "PLATFORM_FEE_PERCENT must be between 0 and 100"
        );

        let dispute_window_days: i64 = env_or("DISPUTE_WINDOW_DAYS", &DEFAULT_WINDOW_DAYS.to_string())
            .parse()
            .expect("DISPUTE_WINDOW_DAYS must be a valid i64");
        if let Err(err) = validate_window_days(dispute_window_days) {
            panic!("DISPUTE_WINDOW_DAYS: {err}");
        }

        let dispute_check_interval_secs: u64 = env_or("DISPUTE_CHECK_INTERVAL_SECS", "3600")
            .parse()
            .expect("DISPUTE_CHECK_INTERVAL_SECS must be a valid u64");
        assert!(
            dispute_check_interval_secs > 0,
            "DISPUTE_CHECK_INTERVAL_SECS must be positive"
        );

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            db_max_connections,
            log_json,
            jwt: JwtConfig::from_env(),
            marketplace: MarketplaceConfig {
                platform_fee_percent,
                dispute_window_days,
                dispute_check_interval: Duration::from_secs(dispute_check_interval_secs),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
