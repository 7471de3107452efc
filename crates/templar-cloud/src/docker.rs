use std::path::Path;

use templar_build::BuildPlan;

use crate::error::ExecError;
use crate::executor::{Executor, RealExecutor};

/// Docker operations client, parameterized over the executor for testability.
pub struct DockerClient<E: Executor = RealExecutor> {
    executor: E,
}

impl DockerClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::docker(),
        }
    }
}

impl Default for DockerClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Executor> DockerClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    // ── Preflight ──

    /// Return the Docker server version, failing if the daemon is unreachable.
    pub async fn check_installed(&self) -> Result<String, DockerError> {
        self.executor
            .exec(&args(["version", "--format", "{{.Server.Version}}"]))
            .await
            .map(|v| v.trim().to_owned())
            .map_err(|e| DockerError::NotInstalled { source: e })
    }

    // ── Build ──

    /// Build a template image from its plan, streaming docker output.
    pub async fn build(&self, plan: &BuildPlan) -> Result<(), DockerError> {
        tracing::info!(id = %plan.id, image = %plan.image, "building template image");
        tracing::debug!(command = %plan.command_line(), "docker build");

        self.executor
            .exec_streaming(&plan.docker_args())
            .await
            .map_err(|e| DockerError::Build {
                id: plan.id.clone(),
                source: e,
            })
    }

    /// Build `image` from `dockerfile` inside `context_dir`.
    pub async fn build_dockerfile(
        &self,
        id: &str,
        context_dir: &Path,
        dockerfile: &Path,
        image: &str,
    ) -> Result<(), DockerError> {
        let context = context_dir.display().to_string();
        let dockerfile = dockerfile.display().to_string();

        self.executor
            .exec_streaming(&args([
                "build", "-f", &dockerfile, "-t", image, &context,
            ]))
            .await
            .map_err(|e| DockerError::Build {
                id: id.to_owned(),
                source: e,
            })
    }

    /// Build `image` from a Dockerfile passed on stdin, with no build context.
    pub async fn build_from_stdin(
        &self,
        id: &str,
        dockerfile_content: &str,
        image: &str,
    ) -> Result<(), DockerError> {
        self.executor
            .exec_with_stdin(
                &args(["build", "-t", image, "-"]),
                dockerfile_content.as_bytes(),
            )
            .await
            .map(|_| ())
            .map_err(|e| DockerError::Build {
                id: id.to_owned(),
                source: e,
            })
    }

    // ── Registry ──

    /// Push an image. Single attempt.
    pub async fn push(&self, image: &str) -> Result<(), DockerError> {
        tracing::info!(image, "pushing template image");

        self.executor
            .exec_streaming(&args(["push", image]))
            .await
            .map_err(|e| DockerError::Push {
                image: image.to_owned(),
                source: e,
            })
    }

    pub async fn pull(&self, image: &str) -> Result<(), DockerError> {
        self.executor
            .exec(&args(["pull", image]))
            .await
            .map(|_| ())
            .map_err(|e| DockerError::Pull {
                image: image.to_owned(),
                source: e,
            })
    }

    pub async fn tag(&self, source: &str, target: &str) -> Result<(), DockerError> {
        self.executor
            .exec(&args(["tag", source, target]))
            .await
            .map(|_| ())
            .map_err(|e| DockerError::Tag {
                source_image: source.to_owned(),
                target: target.to_owned(),
                source: e,
            })
    }
}

// ── Helper ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

// ── Error types ──

#[derive(Debug, thiserror::Error)]
pub enum DockerError {
    #[error("docker not available: install Docker and make sure the daemon is running")]
    NotInstalled { source: ExecError },

    #[error("error building template image {id:?}")]
    Build { id: String, source: ExecError },

    #[error("error pushing template image {image:?}")]
    Push { image: String, source: ExecError },

    #[error("error pulling image {image:?}")]
    Pull { image: String, source: ExecError },

    #[error("error tagging image {source_image:?} as {target:?}")]
    Tag {
        source_image: String,
        target: String,
        source: ExecError,
    },
}
