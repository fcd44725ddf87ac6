//! API endpoint and token resolution.
//!
//! Each value is taken from the first source that has it: command-line flag,
//! environment variable, YAML config file, then the built-in default (API URL
//! only). A `.swo-cli.yaml` in the working directory replaces the `--config`
//! path when present. The file is only read if a value is still missing.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_CONFIG_FILE: &str = "~/.swo-cli.yml";
pub const LOCAL_CONFIG_FILE: &str = ".swo-cli.yaml";
pub const DEFAULT_API_URL: &str = "https://api.na-01.cloud.solarwinds.com";

pub const ENV_API_URL: &str = "SWO_API_URL";
pub const ENV_API_TOKEN: &str = "SWO_API_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to find token")]
    MissingToken,

    #[error("error while reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error while unmarshaling {} config file: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("error while resolving home directory to read configuration file")]
    HomeDir,
}

/// On-disk config file layout.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(rename = "api-url", default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Values gathered from flags and the environment before the file is
/// consulted.
#[derive(Debug, Clone, Default)]
pub struct ConfigInputs {
    pub flag_api_url: Option<String>,
    pub flag_token: Option<String>,
    pub env_api_url: Option<String>,
    pub env_token: Option<String>,
    /// `--config` value, before `~/` expansion.
    pub config_path: String,
}

impl ConfigInputs {
    /// Inputs from flags plus the process environment.
    pub fn from_env(api_url: Option<String>, token: Option<String>, config_path: &str) -> Self {
        Self {
            flag_api_url: api_url,
            flag_token: token,
            env_api_url: std::env::var(ENV_API_URL).ok(),
            env_token: std::env::var(ENV_API_TOKEN).ok(),
            config_path: config_path.to_string(),
        }
    }
}

/// Resolved connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub token: String,
}

impl Config {
    /// Resolve from flags, the process environment and the working directory.
    pub fn load(
        api_url: Option<String>,
        token: Option<String>,
        config_path: &str,
    ) -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
            path: PathBuf::from("."),
            source,
        })?;
        Self::resolve(ConfigInputs::from_env(api_url, token, config_path), &cwd)
    }

    /// Resolve from explicit inputs; `cwd` is searched for the local file.
    pub fn resolve(inputs: ConfigInputs, cwd: &Path) -> Result<Self, ConfigError> {
        let mut api_url = first_non_empty([inputs.flag_api_url, inputs.env_api_url]);
        let mut token = first_non_empty([inputs.flag_token, inputs.env_token]);

        if api_url.is_none() || token.is_none() {
            let path = config_file_path(&inputs.config_path, cwd)?;
            let file = read_config_file(&path)?;
            api_url = api_url.or_else(|| non_empty(file.api_url));
            token = token.or_else(|| non_empty(file.token));
        }

        let api_url = api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let token = token.ok_or(ConfigError::MissingToken)?;
        tracing::debug!(api_url = %api_url, "configuration resolved");
        Ok(Self { api_url, token })
    }
}

/// The config file to read: the local file if it exists, else `config_path`
/// with a leading `~/` expanded.
pub fn config_file_path(config_path: &str, cwd: &Path) -> Result<PathBuf, ConfigError> {
    let local = cwd.join(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Ok(local);
    }
    match config_path.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::HomeDir)?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(config_path)),
    }
}

/// Read and parse a config file. A missing or empty file yields defaults.
pub fn read_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "config file not found");
            return Ok(FileConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    tracing::debug!(path = %path.display(), "reading config file");
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn first_non_empty<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values.into_iter().find_map(non_empty)
}
