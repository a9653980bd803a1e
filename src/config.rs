use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 3000 }

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String { "http://localhost:8080".to_string() }
fn default_timeout_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// Directory of the JSON documents; memory-only when empty
    #[serde(default = "default_store_path")]
    pub path: String,
    #[serde(default = "default_l1_cache_size")]
    pub l1_cache_size: u64,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            l1_cache_size: default_l1_cache_size(),
            ttl_secs: default_ttl_secs(),
            sync_interval_secs: default_sync_interval_secs(),
        }
    }
}

impl StoreSettings {
    pub fn dir(&self) -> Option<&str> {
        Some(self.path.trim()).filter(|p| !p.is_empty())
    }
}

fn default_store_path() -> String { ".smartbuy".to_string() }
fn default_l1_cache_size() -> u64 { 64 }
fn default_ttl_secs() -> u64 { 300 }
fn default_sync_interval_secs() -> u64 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with SMARTBUY_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., SMARTBUY__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("SMARTBUY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("SMARTBUY")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Apply the short-form `API_BASE_URL` variable over the layered config
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    let base_url = std::env::var("API_BASE_URL").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(base_url) = base_url {
        builder = builder.set_override("backend.base_url", base_url)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_backend() {
        let backend = BackendSettings::default();
        assert_eq!(backend.base_url, "http://localhost:8080");
        assert_eq!(backend.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_server_does_not_clash_with_backend() {
        let server = ServerSettings::default();
        assert_eq!(server.port, 3000);
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("smartbuy-config-{}.toml", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            "[backend]\nbase_url = \"http://backend.test\"\n\n[store]\nsync_interval_secs = 2\n",
        )
        .unwrap();

        let settings = Settings::load_from(&path).unwrap();

        assert_eq!(settings.backend.base_url, "http://backend.test");
        assert_eq!(settings.store.sync_interval_secs, 2);
        assert_eq!(settings.store.l1_cache_size, 64);
        assert_eq!(settings.store.dir(), Some(".smartbuy"));
        assert_eq!(settings.server.port, 3000);

        let _ = std::fs::remove_file(&path);
    }
}
