//! Build and push a single custom environment from a `dbk.toml` directory.

use std::path::{Path, PathBuf};

use templar_build::{EnvDockerfile, ImageRef};
use templar_cloud::{DockerClient, DockerError, Executor, RealExecutor};
use templar_core::EnvConfig;

/// Dockerfile the user writes for a custom environment.
pub const ENV_DOCKERFILE_NAME: &str = "Dockerfile.dbk";

/// Builds a user environment on top of the shared base image.
pub struct EnvPush<'a, E: Executor = RealExecutor> {
    docker: &'a DockerClient<E>,
    registry: &'a str,
    base_image: &'a str,
    base_alias: &'a str,
}

impl<'a, E: Executor> EnvPush<'a, E> {
    pub fn new(
        docker: &'a DockerClient<E>,
        registry: &'a str,
        base_image: &'a str,
        base_alias: &'a str,
    ) -> Self {
        Self {
            docker,
            registry,
            base_image,
            base_alias,
        }
    }

    /// Pull the base image, build the env twice (user Dockerfile, then env
    /// vars layered on top), and push it. Returns the pushed image.
    ///
    /// `dbk.toml` and [`ENV_DOCKERFILE_NAME`] are checked before docker is
    /// contacted.
    pub async fn run(&self, env_dir: &Path) -> Result<String, EnvError> {
        let config = EnvConfig::load(env_dir)?;

        let dockerfile = env_dir.join(ENV_DOCKERFILE_NAME);
        if !dockerfile.is_file() {
            return Err(EnvError::MissingDockerfile(dockerfile));
        }

        let version = self.docker.check_installed().await?;
        tracing::debug!(%version, "docker available");

        tracing::info!(id = %config.id, "building and pushing env");

        tracing::info!(base = self.base_image, alias = self.base_alias, "updating base image");
        self.docker.pull(self.base_image).await?;
        self.docker.tag(self.base_image, self.base_alias).await?;

        let without_envs = ImageRef::new(self.registry, &config.id, "no-envs").to_string();
        tracing::info!(image = %without_envs, "building custom env from {ENV_DOCKERFILE_NAME}");
        self.docker
            .build_dockerfile(&config.id, env_dir, &dockerfile, &without_envs)
            .await?;

        let image = ImageRef::new(self.registry, &config.id, "latest").to_string();
        let env_dockerfile = EnvDockerfile::new(&without_envs, &config).render();
        tracing::info!(%image, "injecting env vars");
        self.docker
            .build_from_stdin(&config.id, &env_dockerfile, &image)
            .await?;

        self.docker.push(&image).await?;
        tracing::info!(id = %config.id, %image, "created and pushed custom env");

        Ok(image)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error(transparent)]
    Config(#[from] templar_core::Error),

    #[error("file {0} is missing")]
    MissingDockerfile(PathBuf),

    #[error(transparent)]
    Docker(#[from] DockerError),
}
