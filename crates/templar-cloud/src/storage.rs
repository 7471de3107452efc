use base64::Engine;
use md5::{Digest, Md5};

use crate::error::ExecError;
use crate::executor::{Executor, RealExecutor};

const JSON_CONTENT_TYPE: &str = "application/json";
const NO_CACHE: &str = "no-cache, max-age=0";

/// Cloud Storage client backed by `gcloud storage`.
///
/// Built once per run and shared by every template chain.
pub struct StorageClient<E: Executor = RealExecutor> {
    executor: E,
}

impl StorageClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::gcloud(),
        }
    }
}

impl Default for StorageClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Executor> StorageClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Return the installed gcloud SDK version.
    pub async fn check_installed(&self) -> Result<String, ExecError> {
        let out = self.executor.exec(&["version".to_owned()]).await?;
        let version = out
            .lines()
            .next()
            .and_then(|line| line.strip_prefix("Google Cloud SDK "))
            // arch-lint: allow(no-silent-result-drop) reason="Option: unrecognized version output is reported verbatim"
            .unwrap_or(out.trim());
        Ok(version.trim().to_owned())
    }

    /// Upload a JSON document to `gs://{bucket}/{key}`.
    ///
    /// The object is publicly readable, never cached, and the store checks
    /// the body against the MD5 digest sent with it.
    pub async fn upload_json(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
    ) -> Result<(), UploadError> {
        let url = format!("gs://{bucket}/{key}");
        tracing::info!(%url, bytes = body.len(), "uploading object");

        self.executor
            .exec_with_stdin(&upload_args(&url, body), body)
            .await
            .map(|_| ())
            .map_err(|e| UploadError {
                key: key.to_owned(),
                source: e,
            })
    }
}

fn upload_args(url: &str, body: &[u8]) -> Vec<String> {
    vec![
        "storage".to_owned(),
        "cp".to_owned(),
        "-".to_owned(),
        url.to_owned(),
        format!("--content-type={JSON_CONTENT_TYPE}"),
        format!("--cache-control={NO_CACHE}"),
        "--predefined-acl=publicRead".to_owned(),
        format!("--content-md5={}", content_md5(body)),
    ]
}

/// Base64-encoded MD5 digest, the form Cloud Storage expects.
fn content_md5(body: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(Md5::digest(body))
}

#[derive(Debug, thiserror::Error)]
#[error("error uploading template config {key:?}")]
pub struct UploadError {
    pub key: String,
    pub source: ExecError,
}
