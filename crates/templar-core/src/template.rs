//! Per-template configuration files.
//!
//! Every template directory carries a `template.toml`:
//!
//! ```toml
//! id = "nodejs-v16"
//! files_dir = "files"
//! code_cells_dir = "files/code"
//! setup_cmd = "npm install"
//! start_cmd = "node index.js"
//! ```
//!
//! A standalone custom environment carries a `dbk.toml` instead
//! (see [`EnvConfig`]).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the per-template configuration.
pub const TEMPLATE_FILE_NAME: &str = "template.toml";

/// File name of a custom environment configuration.
pub const ENV_FILE_NAME: &str = "dbk.toml";

/// Parsed `template.toml`. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Stable identifier; names the image and the manifest object
    pub id: String,
    /// Directory (relative to the template directory) copied into the image
    pub files_dir: String,
    /// Directory holding code cells; must be nested under `files_dir`
    pub code_cells_dir: String,
    /// Command run once while building the image
    pub setup_cmd: String,
    /// Command run when a runner starts
    pub start_cmd: String,
}

impl TemplateConfig {
    /// Load `template.toml` from a template directory.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigLoad`](crate::Error::ConfigLoad) if the file is missing or unreadable
    /// - [`Error::ConfigParse`](crate::Error::ConfigParse) if it is not valid TOML or lacks a key
    /// - [`Error::InvalidTemplateId`](crate::Error::InvalidTemplateId) if `id` is malformed
    pub fn load(template_dir: &Path) -> crate::Result<Self> {
        let path = template_dir.join(TEMPLATE_FILE_NAME);
        tracing::info!(directory = %template_dir.display(), "parsing template.toml");

        let config: Self = read_toml(&path)?;
        validate_id(&config.id, &path)?;
        Ok(config)
    }
}

/// Parsed `dbk.toml` for a single custom environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvConfig {
    pub id: String,
    #[serde(default)]
    pub root_dir: Option<String>,
    pub start_cmd: String,
}

impl EnvConfig {
    /// Load `dbk.toml` from an environment directory.
    pub fn load(env_dir: &Path) -> crate::Result<Self> {
        let path = env_dir.join(ENV_FILE_NAME);
        let config: Self = read_toml(&path)?;
        validate_id(&config.id, &path)?;
        Ok(config)
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> crate::Result<T> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::Error::ConfigLoad {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Check that `id` starts with a lowercase letter and contains only
/// lowercase letters, digits, or `-`.
pub fn validate_id(id: &str, path: &Path) -> crate::Result<()> {
    if is_valid_id(id) {
        Ok(())
    } else {
        Err(crate::Error::InvalidTemplateId {
            id: id.to_owned(),
            path: PathBuf::from(path),
        })
    }
}

fn is_valid_id(id: &str) -> bool {
    let mut chars = id.chars();
    chars.next().is_some_and(|c| c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
