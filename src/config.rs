use std::env::var;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::{
    application::services::scheduler::SchedulerConfig,
    infrastructure::messaging::http_api::HttpDeliveryConfig,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub ssl_mode: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}?sslmode={}",
            self.user, self.password, self.host, self.port, self.name, self.ssl_mode
        )
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub scheme: String,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub redis_url: Option<String>,
    pub server: ServerConfig,
    pub delivery: HttpDeliveryConfig,
    pub scheduler: SchedulerConfig,
    pub scheduler_auto_start: bool,
    pub logging: LoggingConfig,
}

impl Config {
    /// Reads the process environment after loading an optional `.env` file.
    pub fn try_parse() -> Result<Config, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|key| var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let scheduler = SchedulerConfig {
            interval: env.duration("SCHEDULER_INTERVAL", Duration::from_secs(2 * 60))?,
            batch_size: env.parse("MESSAGES_PER_BATCH", 2usize)?,
        };
        if scheduler.batch_size == 0 {
            return Err(invalid("MESSAGES_PER_BATCH", "0", "must be positive"));
        }
        if scheduler.interval.is_zero() {
            return Err(invalid(
                "SCHEDULER_INTERVAL",
                &env.string("SCHEDULER_INTERVAL", ""),
                "must be non-zero",
            ));
        }

        let format = match env.string("LOG_FORMAT", "text").to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "text" | "pretty" | "" => LogFormat::Text,
            other => return Err(invalid("LOG_FORMAT", other, "expected text or json")),
        };

        let level = env.string("LOG_LEVEL", "info");
        let level = level
            .parse::<LevelFilter>()
            .map_err(|_| invalid("LOG_LEVEL", &level, "expected trace, debug, info, warn, error or off"))?;

        Ok(Config {
            database: DatabaseConfig {
                host: env.string("DB_HOST", "localhost"),
                port: env.parse("DB_PORT", 5432u16)?,
                user: env.string("DB_USER", "postgres"),
                password: env.string("DB_PASSWORD", ""),
                name: env.string("DB_NAME", "messaging"),
                ssl_mode: env.string("DB_SSL_MODE", "disable"),
                max_connections: env.parse("DB_MAX_CONNECTIONS", 10u32)?,
            },
            redis_url: env.optional("REDIS_URL"),
            server: ServerConfig {
                host: env.string("SERVER_HOST", "0.0.0.0"),
                port: env.parse("SERVER_PORT", 8080u16)?,
                scheme: env.string("SERVER_SCHEME", "http"),
            },
            delivery: HttpDeliveryConfig {
                url: env.string("MESSAGE_API_URL", "http://localhost:3000/send"),
                timeout: env.duration("MESSAGE_API_TIMEOUT", Duration::from_secs(30))?,
            },
            scheduler,
            scheduler_auto_start: env.flag("SCHEDULER_AUTO_START", true)?,
            logging: LoggingConfig { level, format },
        })
    }
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn string(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    fn parse<T: std::str::FromStr>(&self, key: &'static str, default: T) -> Result<T, ConfigError> {
        match self.optional(key) {
            Some(value) => value
                .parse()
                .map_err(|_| invalid(key, &value, "expected a non-negative integer")),
            None => Ok(default),
        }
    }

    fn duration(&self, key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
        match self.optional(key) {
            Some(value) => parse_duration(&value)
                .ok_or_else(|| invalid(key, &value, "expected a duration such as 30s, 2m or 1m30s")),
            None => Ok(default),
        }
    }

    fn flag(&self, key: &'static str, default: bool) -> Result<bool, ConfigError> {
        match self.optional(key) {
            Some(value) => match value.to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => Ok(true),
                "0" | "false" | "no" | "off" => Ok(false),
                _ => Err(invalid(key, &value, "expected true or false")),
            },
            None => Ok(default),
        }
    }
}

fn invalid(key: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason,
    }
}

/// Parses `90`, `500ms`, `30s`, `2m`, `1h` and compounds like `1m30s`.
/// A bare number is seconds.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(secs) = input.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        if digits == 0 {
            return None;
        }
        let amount: u64 = rest[..digits].parse().ok()?;
        rest = &rest[digits..];

        let unit_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        let part = match &rest[..unit_len] {
            "ms" => Duration::from_millis(amount),
            "s" => Duration::from_secs(amount),
            "m" => Duration::from_secs(amount.checked_mul(60)?),
            "h" => Duration::from_secs(amount.checked_mul(60 * 60)?),
            _ => return None,
        };
        rest = &rest[unit_len..];
        total = total.checked_add(part)?;
    }
    Some(total)
}
