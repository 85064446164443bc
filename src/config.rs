use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Application configuration
///
/// Built once at startup and handed to the HTTP layer. Nothing below the
/// entrypoint reads the process environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    #[serde(default)]
    pub search: SearchSettings,
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

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

/// Chat-completion provider settings
#[derive(Clone, Deserialize)]
pub struct ProviderSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub api_key: String,
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Optional `HTTP-Referer` attribution header
    #[serde(default)]
    pub referer: Option<String>,
    /// Optional `X-Title` attribution header
    #[serde(default)]
    pub title: Option<String>,
}

// The API key must never reach the logs, so Debug is written by hand.
impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("referer", &self.referer)
            .field("title", &self.title)
            .finish()
    }
}

pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";

fn default_endpoint() -> String { DEFAULT_ENDPOINT.to_string() }
fn default_timeout_secs() -> u64 { 30 }
fn default_connect_timeout_secs() -> u64 { 10 }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_query_chars: default_max_query_chars(),
        }
    }
}

fn default_max_query_chars() -> usize { 1000 }

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
    /// 4. Environment variables (prefixed with NEPTUNE__)
    /// 5. OPENROUTER_API_KEY / OPENROUTER_MODEL
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., NEPTUNE__SERVER__PORT -> server.port
            .add_source(neptune_env())
            .build()?;

        let settings = apply_provider_env(settings, process_env)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    ///
    /// The `NEPTUNE__*` variables and the provider overlay apply on top of the
    /// file, the same as for [`Settings::load`].
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::load_from_with(path, process_env)
    }

    fn load_from_with<P, F>(path: P, lookup: F) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(neptune_env())
            .build()?;

        let settings = apply_provider_env(settings, lookup)?;

        settings.try_deserialize()
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn neptune_env() -> Environment {
    Environment::with_prefix("NEPTUNE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Overlay the provider variables the front end deployment already uses
fn apply_provider_env<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = lookup("OPENROUTER_API_KEY") {
        builder = builder.set_override("provider.api_key", api_key)?;
    }
    if let Some(model) = lookup("OPENROUTER_MODEL") {
        builder = builder.set_override("provider.model", model)?;
    }

    builder.build()
}
