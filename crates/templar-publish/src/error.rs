use std::path::PathBuf;

use templar_build::PlanError;
use templar_cloud::{DockerError, ExecError, UploadError};

/// Failure of a single template's chain.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error(transparent)]
    Config(#[from] templar_core::Error),

    #[error(transparent)]
    InvariantViolation(#[from] PlanError),

    #[error(transparent)]
    Build(DockerError),

    #[error(transparent)]
    Push(DockerError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("failed to serialize manifest for template {id:?}")]
    Serialize {
        id: String,
        source: serde_json::Error,
    },

    #[error("no storage bucket configured; set [storage].bucket in templar.toml or pass --bucket")]
    MissingBucket,

    #[error("template in {directory} timed out after {secs}s")]
    Timeout { directory: PathBuf, secs: u64 },
}

/// Checks run once before any template is touched.
#[derive(Debug, thiserror::Error)]
pub enum PreflightError {
    #[error(transparent)]
    Docker(#[from] DockerError),

    #[error("gcloud CLI not available: install https://cloud.google.com/sdk/docs/install")]
    Gcloud { source: ExecError },

    #[error("no Dockerfile in build context {0}")]
    MissingDockerfile(PathBuf),

    #[error("no storage bucket configured; set [storage].bucket in templar.toml or pass --bucket")]
    MissingBucket,
}
