use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::ConfigError;

/// Name of the file looked up next to the executable.
pub const CONFIG_FILE: &str = "config.json";

/// Env var naming an explicit config file, bypassing the lookup.
pub const CONFIG_ENV: &str = "MOCK_CONFIG";

/// Settings for the device-login / notification mock.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// HTTP port to listen on.
    #[serde(default = "default_auth_port")]
    pub port: u16,

    /// Log level for tracing (e.g. "info", "debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Where `/cli-forward` relays notifications.
    #[serde(default = "default_receiver_url")]
    pub receiver_url: String,

    /// Advertised by `/device-login`.
    #[serde(default = "default_verification_uri")]
    pub verification_uri: String,
}

/// Settings for the notification receiver.
#[derive(Debug, Deserialize, Clone)]
pub struct ReceiverConfig {
    #[serde(default = "default_receiver_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of notifications kept in memory, newest first.
    #[serde(default = "default_max_history")]
    pub max_history: usize,
}

/// Contents of `config.json`. Both sections are optional.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MockConfig {
    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub receiver: ReceiverConfig,
}

fn default_auth_port() -> u16 {
    3000
}

fn default_receiver_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_receiver_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_verification_uri() -> String {
    "http://localhost:3000/verify".to_string()
}

fn default_max_history() -> usize {
    20
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            port: default_auth_port(),
            log_level: default_log_level(),
            receiver_url: default_receiver_url(),
            verification_uri: default_verification_uri(),
        }
    }
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            port: default_receiver_port(),
            log_level: default_log_level(),
            max_history: default_max_history(),
        }
    }
}

impl MockConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&file)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str::<MockConfig>(text)?)
    }

    /// Find `config.json`: `$MOCK_CONFIG`, then the executable's folder,
    /// then its parent. `None` means run on defaults.
    pub fn locate() -> Option<PathBuf> {
        if let Ok(explicit) = env::var(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }

        let exe_path = env::current_exe().ok()?;
        let exe_dir = exe_path.parent()?;

        [
            exe_dir.join(CONFIG_FILE),
            exe_dir.join("..").join(CONFIG_FILE),
        ]
        .into_iter()
        .find(|candidate| candidate.exists())
    }

    /// Located file (or defaults) with process env overrides applied.
    pub fn load() -> Result<Self, ConfigError> {
        let mut cfg = match Self::locate() {
            Some(path) => {
                tracing::info!("Loading {} from {}", CONFIG_FILE, path.display());
                Self::load_from_file(&path)?
            }
            None => {
                tracing::info!("No {} found, using defaults", CONFIG_FILE);
                Self::default()
            }
        };

        cfg.apply_env(|key| env::var(key).ok())?;
        Ok(cfg)
    }

    /// Apply `RECEIVER_URL`, `AUTH_PORT`, `PORT` and `LOG_LEVEL` on top of
    /// the file values.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("RECEIVER_URL") {
            self.auth.receiver_url = url;
        }

        if let Some(port) = lookup("AUTH_PORT") {
            self.auth.port = parse_port("AUTH_PORT", &port)?;
        }

        if let Some(port) = lookup("PORT") {
            self.receiver.port = parse_port("PORT", &port)?;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            self.auth.log_level = level.clone();
            self.receiver.log_level = level;
        }

        Ok(())
    }
}

fn parse_port(key: &'static str, value: &str) -> Result<u16, ConfigError> {
    value.trim().parse::<u16>().map_err(|_| ConfigError::InvalidEnv {
        key,
        value: value.to_string(),
    })
}
