use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    CREATE_CONVERSATION_PATH, DEFAULT_SERVER_URL, DEFAULT_TOAST_SECS, DELETE_CONVERSATION_PATH,
    HISTORY_PATH, HTTP_REQUEST_TIMEOUT_SECS, SEND_MESSAGE_PATH, USER_TYPE_PATH,
};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection
    #[serde(default)]
    pub server: ServerConfig,

    /// Endpoint paths on the backend
    #[serde(default)]
    pub endpoints: EndpointsConfig,

    /// UI configuration
    #[serde(default)]
    pub ui: UIConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the web application
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Raw `Cookie` header carrying the authenticated server session
    pub session_cookie: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SERVER_URL.to_string(),
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
            session_cookie: None,
        }
    }
}

/// Endpoint paths, relative to `server.base_url`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    pub history: String,
    pub create: String,
    pub send: String,
    /// `{id}` is replaced by the conversation id
    pub delete: String,
    pub user_type: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            history: HISTORY_PATH.to_string(),
            create: CREATE_CONVERSATION_PATH.to_string(),
            send: SEND_MESSAGE_PATH.to_string(),
            delete: DELETE_CONVERSATION_PATH.to_string(),
            user_type: USER_TYPE_PATH.to_string(),
        }
    }
}

/// UI configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UIConfig {
    /// Show the conversation sidebar on startup
    pub show_sidebar: bool,
    /// Show the sample question panel on startup
    pub show_templates: bool,
    /// How long a notification stays in the status bar
    pub toast_secs: u64,
}

impl Default for UIConfig {
    fn default() -> Self {
        Self {
            show_sidebar: true,
            show_templates: true,
            toast_secs: DEFAULT_TOAST_SECS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is not set
    pub level: String,
    /// Log file; stderr when absent
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let global_config = get_config_dir()?.join("config.toml");
    let local_config = PathBuf::from(".ecosmart/config.toml");

    let mut figment = Figment::from(Serialized::defaults(Config::default()));

    if global_config.exists() {
        figment = figment.merge(Toml::file(&global_config));
    }

    if local_config.exists() {
        figment = figment.merge(Toml::file(&local_config));
    }

    extract(figment)
}

/// Load configuration from one explicit file, still honouring the environment
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }

    let figment =
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::file(path));

    extract(figment)
}

fn extract(figment: Figment) -> Result<Config> {
    // ECOSMART_SERVER__BASE_URL -> server.base_url
    figment
        .merge(Env::prefixed("ECOSMART_").split("__"))
        .extract()
        .context("Failed to load configuration")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "ecosmart") {
        let config_dir = proj_dirs.config_dir();
        std::fs::create_dir_all(config_dir)?;
        Ok(config_dir.to_path_buf())
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        let config_dir = PathBuf::from(home).join(".config").join("ecosmart");
        std::fs::create_dir_all(&config_dir)?;
        Ok(config_dir)
    }
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join("config.toml")
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join("config.toml");

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
    }

    Ok(config_file)
}
