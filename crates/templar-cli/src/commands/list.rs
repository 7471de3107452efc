use templar_build::BuildPlan;
use templar_core::{TemplateConfig, discover_templates};

use super::Target;

/// Print every template and the image it would be built as, without building.
pub fn list(target: &Target) -> anyhow::Result<()> {
    let options = target.options()?;
    let directories = discover_templates(&options.templates_root())?;

    if directories.is_empty() {
        println!("No templates found in {}", options.templates_root().display());
        return Ok(());
    }

    let mut invalid = 0;
    for directory in &directories {
        let plan = TemplateConfig::load(directory)
            .map_err(anyhow::Error::from)
            .and_then(|config| {
                BuildPlan::new(
                    directory,
                    &options.context_dir,
                    &config,
                    &options.registry,
                    options.mode,
                )
                .map_err(anyhow::Error::from)
            });

        match plan {
            Ok(plan) => println!(
                "  {:<24} {}  (code cells: {})",
                plan.id, plan.image, plan.code_cells_dir
            ),
            Err(e) => {
                invalid += 1;
                println!("  {:<24} invalid: {e}", directory.display());
            }
        }
    }

    if invalid > 0 {
        anyhow::bail!("{invalid} template(s) are invalid; see above for details");
    }

    Ok(())
}
