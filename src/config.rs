use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Overrides `general.proc_root`, e.g. when reading a host's `/proc` from a container.
pub const HOST_PROC_ENV: &str = "HOST_PROC";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub tools: ToolsConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub proc_root: String,
    /// `auto`, `linux` or `darwin`.
    pub platform: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            proc_root: "/proc".to_string(),
            platform: "auto".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ps: String,
    pub sysctl: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            ps: "ps".to_string(),
            sysctl: "/usr/sbin/sysctl".to_string(),
        }
    }
}

impl Config {
    /// The user's config file, if any, with environment overrides applied.
    pub fn load() -> Result<Self> {
        let mut config = load_config()?;
        config.apply_env();
        Ok(config)
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    pub fn apply_env(&mut self) {
        self.apply_host_proc(std::env::var(HOST_PROC_ENV).ok());
    }

    fn apply_host_proc(&mut self, host_proc: Option<String>) {
        if let Some(root) = host_proc
            && !root.is_empty()
        {
            self.general.proc_root = root;
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("hostload").join("config.toml"))
}

/// Reads [`config_path`]. No config directory or no file means defaults.
pub fn load_config() -> Result<Config> {
    match config_path() {
        Some(path) => load_config_from_path(&path),
        None => Ok(Config::default()),
    }
}

/// A missing file yields the defaults; an unreadable or malformed one is an
/// error rather than a silent fallback.
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => return Err(Error::read(path, e)),
    };
    toml::from_str(&contents).map_err(|source| Error::Config {
        path: path.to_path_buf(),
        source,
    })
}
