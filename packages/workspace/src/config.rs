//! Project configuration, shared by the CLI and `atelier-server`

use atelier_composer::CssFramework;
use atelier_protocol::InteractionMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CONFIG_NAME: &str = "atelier.config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Atelier configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding index.html, style.css and script.js
    #[serde(default = "default_src_dir")]
    pub src_dir: String,

    /// Interaction mode baked into composed documents
    #[serde(default)]
    pub mode: InteractionMode,

    #[serde(default)]
    pub framework: CssFramework,

    /// Composed document, relative to the project directory
    #[serde(default = "default_output")]
    pub output: String,

    /// Port for atelier-server
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_src_dir() -> String {
    ".".to_string()
}

fn default_output() -> String {
    "preview.html".to_string()
}

fn default_port() -> u16 {
    3030
}

impl Config {
    /// Load config from a directory; a missing file means defaults
    pub fn load(cwd: &Path) -> ConfigResult<Self> {
        let path = cwd.join(DEFAULT_CONFIG_NAME);
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Get absolute path to source directory
    pub fn get_src_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.src_dir)
    }

    /// Composed document path inside a resolved project directory
    pub fn get_output(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.output)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            mode: InteractionMode::default(),
            framework: CssFramework::default(),
            output: default_output(),
            port: default_port(),
        }
    }
}
