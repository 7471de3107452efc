use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the optional tool configuration in the build context.
pub const CONFIG_FILE_NAME: &str = "templar.toml";

/// templar.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplarConfig {
    #[serde(default)]
    pub registry: RegistrySection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub publish: PublishSection,
    #[serde(default)]
    pub env: EnvSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrySection {
    /// Image repository prefix; images are named `{prefix}/{id}`
    #[serde(default = "default_registry_prefix")]
    pub prefix: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageSection {
    /// Cloud Storage bucket receiving `<id>.json` manifests.
    /// Required for production publishing.
    pub bucket: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSection {
    /// Directory (relative to the build context) holding one subdirectory per template
    #[serde(default = "default_templates_dir")]
    pub templates_dir: PathBuf,
    /// Maximum number of template chains in flight (defaults to all of them)
    #[serde(default)]
    pub concurrency: Option<usize>,
    /// Per-template timeout in seconds covering build, push, and upload
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvSection {
    /// Base image pulled before building a custom env (defaults to `{prefix}/base`)
    #[serde(default)]
    pub base_image: Option<String>,
    /// Local alias the base image is tagged with
    #[serde(default = "default_base_alias")]
    pub base_alias: String,
}

impl Default for RegistrySection {
    fn default() -> Self {
        Self {
            prefix: default_registry_prefix(),
        }
    }
}

impl Default for PublishSection {
    fn default() -> Self {
        Self {
            templates_dir: default_templates_dir(),
            concurrency: None,
            timeout_secs: None,
        }
    }
}

impl Default for EnvSection {
    fn default() -> Self {
        Self {
            base_image: None,
            base_alias: default_base_alias(),
        }
    }
}

impl TemplarConfig {
    /// Load from templar.toml in the given directory, or return defaults if not found.
    pub fn load(context_dir: &Path) -> crate::Result<Self> {
        let config_path = context_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path).map_err(|e| {
                crate::Error::ToolConfigLoad {
                    path: config_path.clone(),
                    source: e,
                }
            })?;
            tracing::debug!(path = %config_path.display(), "loaded templar.toml");
            toml::from_str(&content).map_err(|e| crate::Error::ToolConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Base image for `env push`, falling back to `{prefix}/base`.
    pub fn base_image(&self) -> String {
        self.env
            .base_image
            .clone()
            // arch-lint: allow(no-silent-result-drop) reason="Option: base_image is optional in templar.toml"
            .unwrap_or_else(|| format!("{}/base", self.registry.prefix))
    }
}

fn default_registry_prefix() -> String {
    "us-central1-docker.pkg.dev/devbookhq/devbook-runner-templates".to_owned()
}

fn default_templates_dir() -> PathBuf {
    PathBuf::from("templates")
}

fn default_base_alias() -> String {
    "devbook".to_owned()
}
