use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub windows: WindowConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub session_duration_hours: i64,
    #[serde(default)]
    pub secure_cookies: bool,
}

/// How long a fetched partition snapshot (and its search index) is reused,
/// and how many partitions are kept at once.
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_entries() -> usize {
    crate::service::cache::DEFAULT_MAX_ENTRIES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 60,
            max_entries: default_max_entries(),
        }
    }
}

/// Longest window, in days, either view may be configured with.
pub const MAX_WINDOW_DAYS: i64 = 3660;

#[derive(Debug, Deserialize, Clone)]
pub struct WindowConfig {
    pub recent_days: i64,
    pub upcoming_days: i64,
}

impl WindowConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, days) in [("recent_days", self.recent_days), ("upcoming_days", self.upcoming_days)] {
            if !(0..=MAX_WINDOW_DAYS).contains(&days) {
                return Err(ConfigError::Message(format!(
                    "windows.{} must be between 0 and {}, got {}",
                    name, MAX_WINDOW_DAYS, days
                )));
            }
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            recent_days: crate::search::RECENT_WINDOW_DAYS,
            upcoming_days: crate::search::UPCOMING_WINDOW_DAYS,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("database.url", "sqlite://class_assistant.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("auth.session_duration_hours", 24)?
            .set_default("auth.secure_cookies", false)?
            .set_default("cache.ttl_seconds", 60)?
            .set_default("cache.max_entries", default_max_entries() as i64)?
            .set_default("windows.recent_days", crate::search::RECENT_WINDOW_DAYS)?
            .set_default("windows.upcoming_days", crate::search::UPCOMING_WINDOW_DAYS)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Environment variables, e.g. CLASS_ASSISTANT__SERVER__PORT=9000
            .add_source(Environment::with_prefix("CLASS_ASSISTANT").separator("__"))

            .build()?;

        let settings: Settings = config.try_deserialize()?;
        settings.windows.validate()?;

        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite://class_assistant.db?mode=rwc".to_string(),
                max_connections: 10,
            },
            auth: AuthConfig {
                session_duration_hours: 24,
                secure_cookies: false,
            },
            cache: CacheConfig::default(),
            windows: WindowConfig::default(),
        }
    }
}
