//! Configuration for the chat TCP server.
//!
//! Values are layered, later sources winning:
//!
//! 1. built-in defaults,
//! 2. an optional TOML file (`--config path`),
//! 3. environment variables,
//! 4. command-line flags (applied in `main`).
//!
//! Environment variables:
//!
//! - `CHAT_BIND_ADDR`       (default: "0.0.0.0")
//! - `CHAT_PORT`            (default: "8888")
//! - `CHAT_MAX_CLIENTS`     (default: "1024")
//! - `CHAT_QUEUE_CAPACITY`  (default: "64")
//! - `CHAT_MAX_LINE_LENGTH` (default: "4096")
//! - `CHAT_NICKNAME_LENGTH` (default: "8")
//! - `CHAT_PROMPT`          (default: unset, no prompt)

use std::env;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// Depth of the command queue feeding the dispatcher. A full queue
    /// makes connection tasks wait.
    pub queue_capacity: usize,

    /// Longest accepted input line in bytes; longer lines close the
    /// connection.
    pub max_line_length: usize,

    /// Length of generated placeholder nicknames.
    pub nickname_length: usize,

    /// Prompt redrawn after every outbound line, e.g. `"> "`.
    pub prompt: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 8888,
            max_clients: 1024,
            queue_capacity: 64,
            max_line_length: 4096,
            nickname_length: 8,
            prompt: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    InvalidEnv {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Load a TOML file (missing keys take defaults), then apply the
    /// environment on top.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Config::from_toml_file(path)?;
        config.apply_env()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Config::from_toml_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Override fields with any `CHAT_*` variables that are set.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(addr) = env::var("CHAT_BIND_ADDR") {
            self.bind_addr = addr;
        }
        if let Some(port) = read_env("CHAT_PORT")? {
            self.port = port;
        }
        if let Some(max) = read_env("CHAT_MAX_CLIENTS")? {
            self.max_clients = max;
        }
        if let Some(cap) = read_env("CHAT_QUEUE_CAPACITY")? {
            self.queue_capacity = cap;
        }
        if let Some(len) = read_env("CHAT_MAX_LINE_LENGTH")? {
            self.max_line_length = len;
        }
        if let Some(len) = read_env("CHAT_NICKNAME_LENGTH")? {
            self.nickname_length = len;
        }
        if let Ok(prompt) = env::var("CHAT_PROMPT") {
            self.prompt = Some(prompt).filter(|p| !p.is_empty());
        }
        Ok(())
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limits = [
            ("max_clients", self.max_clients),
            ("queue_capacity", self.queue_capacity),
            ("max_line_length", self.max_line_length),
            ("nickname_length", self.nickname_length),
        ];
        match limits.into_iter().find(|(_, value)| *value == 0) {
            Some((name, _)) => Err(ConfigError::Zero(name)),
            None => Ok(()),
        }
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_env<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| ConfigError::InvalidEnv {
                key,
                reason: err.to_string(),
                value,
            }),
        Err(_) => Ok(None),
    }
}
