//! Project configuration (postgen.yaml).
//!
//! Every key is optional. A missing file means all defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PostError, Result};

/// File name looked for in the working directory.
pub const CONFIG_FILE: &str = "postgen.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding template JSON files.
    pub templates: PathBuf,
    /// Base directory font paths are resolved against.
    pub fonts: PathBuf,
    /// Default output directory.
    pub output: PathBuf,
    pub server: ServerConfig,
    pub news: NewsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            templates: PathBuf::from("templates"),
            fonts: PathBuf::from("."),
            output: PathBuf::from("output"),
            server: ServerConfig::default(),
            news: NewsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub language: String,
    pub country: String,
    pub max_results: usize,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            country: "US".to_string(),
            max_results: 10,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PostError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| PostError::Parse {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILE)),
        })
    }

    /// Load `explicit` if given, else `postgen.yaml` in `dir` if present,
    /// else the defaults.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using config file");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }
}
