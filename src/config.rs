use std::path::PathBuf;

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tui: TuiConfig,
    pub data: DataConfig,
    pub gateway: GatewayConfig,
}

/// TUI-specific configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Tick interval in milliseconds for the event loop.
    pub tick_rate_ms: u64,
    /// Enable mouse support in the terminal.
    pub mouse_enabled: bool,
    /// Display language code for localized copy (vi, en, zh, ko, ja).
    pub language: String,
}

/// Data directory and operator identity configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Override the default data directory.
    pub data_dir: Option<PathBuf>,
    /// Operator id attached to chat transcripts written from this console.
    pub operator: String,
}

/// Remote AI gateway (chat + translation endpoints).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL of the gateway, e.g. `https://gateway.example.com`.
    pub base_url: String,
    /// Bearer token sent with every request. Usually injected via
    /// `HAIDESK_GATEWAY__API_TOKEN` rather than written to the config file.
    pub api_token: Option<String>,
    /// Path of the chat-completion endpoint.
    pub chat_path: String,
    /// Path of the translation endpoint.
    pub translate_path: String,
    /// Hard ceiling on a single request. The remote service governs within it.
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tui: TuiConfig::default(),
            data: DataConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            mouse_enabled: false,
            language: "vi".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            operator: "console".to_string(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8787".to_string(),
            api_token: None,
            chat_path: "/chat".to_string(),
            translate_path: "/translate".to_string(),
            request_timeout_secs: 300,
        }
    }
}

impl AppConfig {
    /// Load configuration from `~/.config/haidesk/config.toml`, layered with
    /// `HAIDESK_*` environment variables (section and key joined with `__`,
    /// e.g. `HAIDESK_GATEWAY__BASE_URL`).
    /// Returns `Default` if nothing is configured or the file is unparseable.
    pub fn load() -> Self {
        let config_path = Self::config_path();

        let figment = Figment::new()
            .merge(Toml::file(&config_path))
            .merge(Env::prefixed("HAIDESK_").split("__"));

        match figment.extract() {
            Ok(config) => {
                log::info!("Loaded config from {}", config_path.display());
                config
            }
            Err(e) => {
                log::warn!(
                    "Failed to load config at {}: {e}; using defaults",
                    config_path.display()
                );
                Self::default()
            }
        }
    }

    /// Resolved data directory (override or XDG default).
    pub fn data_dir(&self) -> PathBuf {
        self.data.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("haidesk"))
                .unwrap_or_else(|| PathBuf::from("data"))
        })
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("haidesk").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}

impl GatewayConfig {
    /// Full URL of the chat endpoint.
    pub fn chat_url(&self) -> Result<url::Url, url::ParseError> {
        let base: url::Url = self.base_url.parse()?;
        base.join(&self.chat_path)
    }

    /// Full URL of the translation endpoint.
    pub fn translate_url(&self) -> Result<url::Url, url::ParseError> {
        let base: url::Url = self.base_url.parse()?;
        base.join(&self.translate_path)
    }
}
