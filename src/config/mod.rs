//! Environment-driven settings for processes embedding the facility services.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use crate::facility::batch::MAX_BATCH_SPAN;
use crate::facility::expiry::EXPIRY_WINDOW_DAYS;

/// Runtime stage of the embedding process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_env(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Everything a binary needs to wire the services and serve them.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub limits: FacilityLimits,
    pub log_level: String,
}

impl AppConfig {
    /// Read settings from the process environment, falling back to
    /// development defaults. A `.env` file is honored when present.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment =
            AppEnvironment::from_env(&env::var("RENTAL_OPS_ENV").unwrap_or_default());

        let host = env::var("RENTAL_OPS_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let address = if host.eq_ignore_ascii_case("localhost") {
            IpAddr::from([127, 0, 0, 1])
        } else {
            host.parse().map_err(|_| ConfigError::Invalid {
                key: "RENTAL_OPS_HOST",
                value: host,
            })?
        };
        let port = parsed("RENTAL_OPS_PORT", 8080u16)?;

        let batch_floor_span = parsed("RENTAL_OPS_BATCH_FLOOR_SPAN", MAX_BATCH_SPAN)?;
        if batch_floor_span < 0 {
            return Err(ConfigError::Negative {
                key: "RENTAL_OPS_BATCH_FLOOR_SPAN",
                value: i64::from(batch_floor_span),
            });
        }
        let expiry_window_days = parsed("RENTAL_OPS_EXPIRY_WINDOW_DAYS", EXPIRY_WINDOW_DAYS)?;
        if expiry_window_days < 0 {
            return Err(ConfigError::Negative {
                key: "RENTAL_OPS_EXPIRY_WINDOW_DAYS",
                value: expiry_window_days,
            });
        }

        let log_level = env::var("RENTAL_OPS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { address, port },
            limits: FacilityLimits {
                batch_floor_span,
                expiry_window_days,
            },
            log_level,
        })
    }
}

/// Bind address for the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.address, self.port)
    }
}

/// Operational caps handed to [`FacilityState::with_limits`]; the defaults
/// are the domain constants.
///
/// [`FacilityState::with_limits`]: crate::facility::router::FacilityState::with_limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacilityLimits {
    /// Widest floor-number span a single batch call may cover.
    pub batch_floor_span: i32,
    /// Days ahead of a contract's end date that count as expiring soon.
    pub expiry_window_days: i64,
}

impl Default for FacilityLimits {
    fn default() -> Self {
        Self {
            batch_floor_span: MAX_BATCH_SPAN,
            expiry_window_days: EXPIRY_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} has unusable value {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("{key} must not be negative, got {value}")]
    Negative { key: &'static str, value: i64 },
}

fn parsed<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}
