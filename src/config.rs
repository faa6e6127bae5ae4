// src/config.rs
use std::{env, path::PathBuf, str::FromStr};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" | "text" => Ok(Self::Pretty),
            other => Err(ConfigError::Invalid(format!(
                "LOG_FORMAT must be 'json' or 'pretty', got '{other}'"
            ))),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    listen_addr: String,
    service_name: String,
    environment: String,
    app_version: String,
    log_filter: String,
    log_format: LogFormat,
    audit_retention_days: u32,
    audit_max_events: usize,
    audit_log_file: Option<PathBuf>,
    memory_threshold: f64,
    allowed_origins: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub const DEFAULT_RETENTION_DAYS: u32 = 90;
pub const DEFAULT_MAX_EVENTS: usize = 10_000;
pub const DEFAULT_MEMORY_THRESHOLD: f64 = 0.9;

fn default_listen_addr() -> String {
    "127.0.0.1:3000".into()
}

fn default_log_filter() -> String {
    "info,tower_http=info".into()
}

impl AppConfig {
    /// Build configuration from environment variables. Uses sensible defaults
    /// for optional values and validates the rest.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Allow dotenv files to populate env vars when present.
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reads keys through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let listen_addr = get("LISTEN_ADDR")
            .or_else(|| get("PORT").map(|port| format!("0.0.0.0:{}", port.trim())))
            .unwrap_or_else(default_listen_addr);
        let service_name = get("SERVICE_NAME").unwrap_or_else(|| "platform-service".into());
        let environment = get("APP_ENV")
            .or_else(|| get("NODE_ENV"))
            .unwrap_or_else(|| "development".into());
        let app_version = get("APP_VERSION").unwrap_or_else(|| "1.0.0".into());
        let log_filter = get("LOG_LEVEL")
            .or_else(|| get("RUST_LOG"))
            .unwrap_or_else(default_log_filter);

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None if environment == "production" => LogFormat::Json,
            None => LogFormat::Pretty,
        };

        let audit_retention_days =
            parse_or("AUDIT_RETENTION_DAYS", get("AUDIT_RETENTION_DAYS"), DEFAULT_RETENTION_DAYS)?;
        if audit_retention_days == 0 {
            return Err(ConfigError::Invalid(
                "AUDIT_RETENTION_DAYS must be greater than zero".into(),
            ));
        }

        let audit_max_events =
            parse_or("AUDIT_MAX_EVENTS", get("AUDIT_MAX_EVENTS"), DEFAULT_MAX_EVENTS)?;
        if audit_max_events == 0 {
            return Err(ConfigError::Invalid(
                "AUDIT_MAX_EVENTS must be greater than zero".into(),
            ));
        }

        let memory_threshold =
            parse_or("MEMORY_THRESHOLD", get("MEMORY_THRESHOLD"), DEFAULT_MEMORY_THRESHOLD)?;
        if !(memory_threshold > 0.0 && memory_threshold <= 1.0) {
            return Err(ConfigError::Invalid(
                "MEMORY_THRESHOLD must be within (0, 1]".into(),
            ));
        }

        let audit_log_file = get("AUDIT_LOG_FILE").map(PathBuf::from);

        let allowed_origins = get("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| vec!["*".to_string()]);

        Ok(Self {
            listen_addr,
            service_name,
            environment,
            app_version,
            log_filter,
            log_format,
            audit_retention_days,
            audit_max_events,
            audit_log_file,
            memory_threshold,
            allowed_origins,
        })
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn app_version(&self) -> &str {
        &self.app_version
    }

    pub fn log_filter(&self) -> &str {
        &self.log_filter
    }

    pub fn log_format(&self) -> LogFormat {
        self.log_format
    }

    pub fn audit_retention_days(&self) -> u32 {
        self.audit_retention_days
    }

    pub fn audit_max_events(&self) -> usize {
        self.audit_max_events
    }

    /// Optional JSON-lines file that mirrors every audit event.
    pub fn audit_log_file(&self) -> Option<&PathBuf> {
        self.audit_log_file.as_ref()
    }

    pub fn memory_threshold(&self) -> f64 {
        self.memory_threshold
    }

    /// Return the allowed CORS origins; `*` means any.
    pub fn allowed_origins(&self) -> &[String] {
        &self.allowed_origins
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid(format!("{key} has an invalid value '{value}'"))),
        None => Ok(default),
    }
}
