//! Viewer configuration.
//!
//! Read from `osview.toml` in the working directory, or from
//! `<config dir>/osview/config.toml`. Every key is optional.
//!
//! ```toml
//! [display]
//! color = true
//! max_depth = 3
//! examples = 5
//!
//! [summary]
//! scope = "top-level"
//!
//! [compare]
//! ignore_settings = ["uuid", "creation_date"]
//! ```

use crate::error::{ViewerError, ViewerResult};
use crate::summary::{EXAMPLE_LIMIT, SummaryScope};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const LOCAL_CONFIG_FILE: &str = "osview.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    pub display: DisplayConfig,
    pub summary: SummaryConfig,
    pub compare: CompareConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    pub color: bool,
    /// Deepest tree level to draw. `None` draws everything.
    pub max_depth: Option<usize>,
    /// Example paths kept per type.
    pub examples: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            max_depth: None,
            examples: EXAMPLE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SummaryConfig {
    pub scope: SummaryScope,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompareConfig {
    pub ignore_settings: Vec<String>,
}

impl ViewerConfig {
    /// Load configuration.
    ///
    /// An explicit path must exist. Otherwise the first existing default
    /// location wins, and no file at all means defaults.
    pub fn load(explicit: Option<&Path>) -> ViewerResult<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ViewerError::Config(format!(
                    "config file '{}' not found",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match default_locations().into_iter().find(|p| p.exists()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> ViewerResult<Self> {
        debug!("Reading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
            .map_err(|e| ViewerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml_str(content: &str) -> ViewerResult<Self> {
        toml::from_str(content).map_err(|e| ViewerError::Config(e.to_string()))
    }
}

fn default_locations() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("osview").join("config.toml"));
    }
    paths
}
