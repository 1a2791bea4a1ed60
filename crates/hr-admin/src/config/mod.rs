use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::reports::talent::validate_trend_months;
use crate::reports::DateRangeSelector;

const DEFAULT_TREND_MONTHS: u32 = 6;

/// Deployment stage, read from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

fn var_or(key: &str, fallback: &str) -> String {
    env::var(key).unwrap_or_else(|_| fallback.to_string())
}

/// Everything the service binary needs at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub reports: ReportConfig,
}

impl AppConfig {
    /// Read `.env` (when present) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            environment: AppEnvironment::parse(&var_or("APP_ENV", "development")),
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig {
                log_level: var_or("APP_LOG_LEVEL", "info"),
            },
            reports: ReportConfig::from_env()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = var_or("APP_PORT", "3000")
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        Ok(Self {
            host: var_or("APP_HOST", "127.0.0.1"),
            port,
        })
    }

    /// `localhost` is accepted as an alias for the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse::<IpAddr>()
                .map_err(|source| ConfigError::InvalidHost { source })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// An `EnvFilter` directive; `RUST_LOG` overrides it at init time.
    pub log_level: String,
}

/// Defaults applied when a report request leaves its filters unset.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub default_range: DateRangeSelector,
    pub trend_months: u32,
}

impl ReportConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let range_raw = var_or("REPORT_DEFAULT_RANGE", "30");
        let default_range = range_raw
            .parse::<DateRangeSelector>()
            .map_err(|_| ConfigError::InvalidReportRange { value: range_raw })?;

        let trend_months = match env::var("REPORT_TREND_MONTHS") {
            Ok(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .and_then(|months| validate_trend_months(months).ok())
                .ok_or(ConfigError::InvalidTrendMonths)?,
            Err(_) => DEFAULT_TREND_MONTHS,
        };

        Ok(Self {
            default_range,
            trend_months,
        })
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_range: DateRangeSelector::Days(30),
            trend_months: DEFAULT_TREND_MONTHS,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a valid u16")]
    InvalidPort,
    #[error("APP_HOST must be localhost or an IPv4/IPv6 address")]
    InvalidHost { source: std::net::AddrParseError },
    #[error("REPORT_DEFAULT_RANGE '{value}' is neither a day count nor a named range")]
    InvalidReportRange { value: String },
    #[error("REPORT_TREND_MONTHS must be between 1 and 24")]
    InvalidTrendMonths,
}
