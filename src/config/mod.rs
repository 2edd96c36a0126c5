mod loader;

use serde::{Deserialize, Serialize};
use std::path::Path;

pub use loader::{load_config, load_env_files};

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub stats: StatsConfig,
}

/// Relay listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    5000
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

/// Upstream completion API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// API base URL including the version prefix (e.g., "https://api.openai.com/v1")
    #[serde(default = "default_upstream_url")]
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// TLS configuration options
    #[serde(default)]
    pub tls: Option<TlsConfig>,
    /// Name of the environment variable holding the bearer credential
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Literal credential; takes precedence over `api_key_env`
    #[serde(default)]
    pub api_key: Option<String>,
}

/// TLS configuration for upstream connections
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TlsConfig {
    /// Accept invalid certificates (self-signed, expired)
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Path to custom CA certificate (PEM format)
    pub ca_cert_path: Option<String>,
    /// Path to client certificate for mTLS
    pub client_cert_path: Option<String>,
    /// Path to client private key for mTLS
    pub client_key_path: Option<String>,
}

fn default_upstream_url() -> String {
    "https://api.openai.com/v1".to_string()
}

// Same as the provider SDK's default read timeout
fn default_timeout() -> u64 {
    600
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_seconds: default_timeout(),
            tls: None,
            api_key_env: default_api_key_env(),
            api_key: None,
        }
    }
}

impl UpstreamConfig {
    /// Returns the base URL with trailing slash stripped
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Returns true if the URL uses HTTPS
    pub fn is_tls(&self) -> bool {
        self.url.to_lowercase().starts_with("https://")
    }

    /// Resolve the bearer credential: the literal `api_key` first, then the
    /// environment variable named by `api_key_env`.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        if let Some(key) = self.api_key.as_deref().filter(|k| !k.is_empty()) {
            return Ok(key.to_string());
        }

        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey(self.api_key_env.clone())),
        }
    }
}

/// Relay endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RelayConfig {
    /// Value reported in the `service` field of `/health`
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default)]
    pub ask: AskConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

fn default_service_name() -> String {
    "OpenAI GPT API".to_string()
}

fn default_model() -> String {
    "gpt-5.1".to_string()
}

fn default_enabled() -> bool {
    true
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            ask: AskConfig::default(),
            chat: ChatConfig::default(),
        }
    }
}

/// `/ask` endpoint: chat completions with a system-role persona
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AskConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_system_prompt() -> String {
    "You are a helpful AI assistant.".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for AskConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            model: default_model(),
            system_prompt: default_system_prompt(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

/// `/chat` endpoint: responses API with the persona prepended to the input
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_persona")]
    pub persona: String,
}

fn default_persona() -> String {
    "You are Nexus, a helpful AI productivity assistant for employees.".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            model: default_model(),
            persona: default_persona(),
        }
    }
}

impl ChatConfig {
    /// Build the single input string sent upstream
    pub fn compose_input(&self, message: &str) -> String {
        format!("{} User: {}", self.persona, message)
    }
}

/// Stats logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StatsConfig {
    #[serde(default = "default_stats_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub format: StatsFormat,
}

fn default_stats_enabled() -> bool {
    true
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: default_stats_enabled(),
            format: StatsFormat::default(),
        }
    }
}

/// Stats output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StatsFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        load_config(path)
    }

    /// Load configuration, falling back to the default locations and then to
    /// built-in defaults. An explicit path must exist.
    pub fn load_or_default(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        match config_path {
            Some(path) => Self::from_file(path),
            None => {
                let default_paths = ["config.yaml", "config.yml", "./config/config.yaml"];
                for p in default_paths {
                    let path = Path::new(p);
                    if path.exists() {
                        return Self::from_file(path);
                    }
                }
                tracing::debug!("No config file found, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.upstream.url).map_err(|e| {
            ConfigError::Validation(format!("upstream.url '{}' is not a valid URL: {}", self.upstream.url, e))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "upstream.url must use http or https, got '{}'",
                parsed.scheme()
            )));
        }

        if self.relay.ask.model.trim().is_empty() || self.relay.chat.model.trim().is_empty() {
            return Err(ConfigError::Validation("relay model names must not be empty".to_string()));
        }

        if self.relay.ask.max_tokens == 0 {
            return Err(ConfigError::Validation("relay.ask.max_tokens must be greater than 0".to_string()));
        }

        if !(0.0..=2.0).contains(&self.relay.ask.temperature) {
            return Err(ConfigError::Validation(format!(
                "relay.ask.temperature must be within 0.0..=2.0, got {}",
                self.relay.ask.temperature
            )));
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Upstream API key missing: set the {0} environment variable (or add it to .env)")]
    MissingApiKey(String),
}
