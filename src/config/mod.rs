//! Service configuration: a TOML file in the user's workspace directory,
//! created with defaults on first run. Secrets can also arrive through the
//! environment (see `providers::GeminiModel` key resolution).

use std::path::{Path, PathBuf};

use directories::UserDirs;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Bounded randomness for reproducible judgments.
pub const DEFAULT_TEMPERATURE: f64 = 0.2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Workspace directory - computed from home, not serialized
    #[serde(skip)]
    pub workspace_dir: PathBuf,
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Origins allowed to call the gateway cross-origin.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Request body ceiling. Inline base64 images are large.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Must exceed the model call budget so upstream timeouts surface as
    /// evaluation failures, not gateway timeouts.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
            max_body_bytes: default_max_body_bytes(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Overrides `<workspace>/hits.db` when set.
    pub db_path: Option<PathBuf>,
}

impl StoreConfig {
    pub fn resolve_db_path(&self, workspace_dir: &Path) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| workspace_dir.join("hits.db"))
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "https://photo-quality-880b6.web.app".to_string(),
    ]
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_request_timeout_secs() -> u64 {
    75
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::new(),
            config_path: PathBuf::new(),
            api_key: None,
            model: default_model(),
            temperature: default_temperature(),
            gateway: GatewayConfig::default(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Load `~/.phodo/config.toml`, writing the default config on first run.
    pub fn load_or_init() -> Result<Self, ConfigError> {
        let home = UserDirs::new()
            .ok_or_else(|| ConfigError::Load("cannot locate home directory".into()))?;
        let workspace_dir = home.home_dir().join(".phodo");
        Self::load_or_init_at(&workspace_dir)
    }

    /// Same as [`Config::load_or_init`] against an explicit workspace
    /// directory. Used by tests.
    pub fn load_or_init_at(workspace_dir: &Path) -> Result<Self, ConfigError> {
        std::fs::create_dir_all(workspace_dir)?;
        let config_path = workspace_dir.join("config.toml");

        let mut config = if config_path.exists() {
            let raw = std::fs::read_to_string(&config_path)?;
            toml::from_str(&raw).map_err(|error| ConfigError::Load(error.to_string()))?
        } else {
            let config = Self::default();
            let rendered = toml::to_string_pretty(&config)
                .map_err(|error| ConfigError::Load(error.to_string()))?;
            std::fs::write(&config_path, rendered)?;
            config
        };

        config.workspace_dir = workspace_dir.to_path_buf();
        config.config_path = config_path;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::Validation(format!(
                "temperature {} is outside [0.0, 1.0]",
                self.temperature
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Validation("model name is empty".into()));
        }
        if self.gateway.allowed_origins.is_empty() {
            return Err(ConfigError::Validation(
                "allowed_origins must name at least one front-end origin".into(),
            ));
        }
        Ok(())
    }
}
