use crate::workflows::sales::{DEFAULT_ANOMALY_RATIO, DEFAULT_REPORT_TITLE};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub insights: InsightConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let log_format = match env::var("APP_LOG_FORMAT") {
            Ok(raw) => LogFormat::parse(&raw).ok_or(ConfigError::InvalidLogFormat { value: raw })?,
            Err(_) => LogFormat::Compact,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig {
                log_level,
                log_format,
            },
            insights: InsightConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Output style for log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Some(Self::Compact),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Knobs for the insight pipeline and the exported document.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightConfig {
    /// Fraction of the mean daily total below which a day is flagged.
    pub anomaly_ratio: f64,
    pub preview_rows: usize,
    pub report_title: String,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            anomaly_ratio: DEFAULT_ANOMALY_RATIO,
            preview_rows: 5,
            report_title: DEFAULT_REPORT_TITLE.to_string(),
        }
    }
}

impl InsightConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let anomaly_ratio = match env::var("SALES_ANOMALY_RATIO") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
                .ok_or(ConfigError::InvalidAnomalyRatio { value: raw })?,
            Err(_) => defaults.anomaly_ratio,
        };

        let preview_rows = match env::var("SALES_PREVIEW_ROWS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidPreviewRows { value: raw })?,
            Err(_) => defaults.preview_rows,
        };

        let report_title = env::var("SALES_REPORT_TITLE")
            .ok()
            .map(|title| title.trim().to_string())
            .filter(|title| !title.is_empty())
            .unwrap_or(defaults.report_title);

        Ok(Self {
            anomaly_ratio,
            preview_rows,
            report_title,
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLogFormat { value: String },
    InvalidAnomalyRatio { value: String },
    InvalidPreviewRows { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLogFormat { value } => {
                write!(f, "APP_LOG_FORMAT must be 'compact' or 'json' (got '{value}')")
            }
            ConfigError::InvalidAnomalyRatio { value } => write!(
                f,
                "SALES_ANOMALY_RATIO must be a positive number (got '{value}')"
            ),
            ConfigError::InvalidPreviewRows { value } => write!(
                f,
                "SALES_PREVIEW_ROWS must be a non-negative integer (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidLogFormat { .. }
            | ConfigError::InvalidAnomalyRatio { .. }
            | ConfigError::InvalidPreviewRows { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "APP_LOG_FORMAT",
            "SALES_ANOMALY_RATIO",
            "SALES_PREVIEW_ROWS",
            "SALES_REPORT_TITLE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.telemetry.log_format, LogFormat::Compact);
        assert_eq!(config.insights, InsightConfig::default());
        assert_eq!(config.insights.anomaly_ratio, 0.5);
        assert_eq!(config.insights.report_title, "E-commerce Sales Report");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        reset_env();
    }

    #[test]
    fn reads_insight_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SALES_ANOMALY_RATIO", "0.25");
        env::set_var("SALES_PREVIEW_ROWS", "10");
        env::set_var("SALES_REPORT_TITLE", "  Weekly Sales  ");
        env::set_var("APP_LOG_FORMAT", "JSON");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.insights.anomaly_ratio, 0.25);
        assert_eq!(config.insights.preview_rows, 10);
        assert_eq!(config.insights.report_title, "Weekly Sales");
        assert_eq!(config.telemetry.log_format, LogFormat::Json);
        reset_env();
    }

    #[test]
    fn rejects_non_positive_anomaly_ratio() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("SALES_ANOMALY_RATIO", "-1");
        let error = AppConfig::load().expect_err("negative ratio rejected");
        assert!(matches!(error, ConfigError::InvalidAnomalyRatio { .. }));
        assert!(error.to_string().contains("SALES_ANOMALY_RATIO"));
        reset_env();
    }

    #[test]
    fn rejects_unknown_log_format() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_LOG_FORMAT", "xml");
        let error = AppConfig::load().expect_err("unknown format rejected");
        assert!(matches!(error, ConfigError::InvalidLogFormat { .. }));
        reset_env();
    }
}
