use std::path::Path;

use templar_cloud::DockerClient;
use templar_core::TemplarConfig;
use templar_publish::EnvPush;

/// Build and push the custom environment in `dir`.
pub async fn env_push(dir: &Path) -> anyhow::Result<()> {
    let config = TemplarConfig::load(dir)?;
    let base_image = config.base_image();

    let docker = DockerClient::new();

    let image = EnvPush::new(
        &docker,
        &config.registry.prefix,
        &base_image,
        &config.env.base_alias,
    )
    .run(dir)
    .await?;

    println!();
    println!("Created and pushed custom env: {image}");
    Ok(())
}
