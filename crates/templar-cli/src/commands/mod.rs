mod doctor;
mod env;
mod list;
mod publish;

use std::path::PathBuf;

use templar_core::{Mode, TemplarConfig};
use templar_publish::PipelineOptions;

pub use doctor::doctor;
pub use env::env_push;
pub use list::list;
pub use publish::{PublishOverrides, publish};

/// Command-line selection of templates, merged over templar.toml.
pub struct Target {
    pub context: PathBuf,
    pub templates_dir: Option<PathBuf>,
    pub registry: Option<String>,
    pub mode: Mode,
}

impl Target {
    /// Load templar.toml from the context and apply CLI overrides.
    fn options(&self) -> anyhow::Result<PipelineOptions> {
        let config = TemplarConfig::load(&self.context)?;
        let mut options = PipelineOptions::from_config(&self.context, &config, self.mode);

        if let Some(dir) = &self.templates_dir {
            options.templates_dir = dir.clone();
        }
        if let Some(registry) = &self.registry {
            options.registry = registry.clone();
        }
        Ok(options)
    }
}
