use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::StreamExt;
use templar_build::BuildPlan;
use templar_cloud::{DockerClient, Executor, RealExecutor, StorageClient};
use templar_core::{Mode, TemplarConfig, TemplateConfig, discover_templates};

use crate::error::{PreflightError, TemplateError};
use crate::publisher::Publisher;
use crate::report::{RunReport, Stage, TemplateOutcome, TemplateReport};

/// Explicit inputs of a publish run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Docker build context; template paths are resolved against it
    pub context_dir: PathBuf,
    /// Templates root, relative to `context_dir`
    pub templates_dir: PathBuf,
    pub registry: String,
    pub bucket: Option<String>,
    pub mode: Mode,
    /// Maximum template chains in flight; `None` runs all at once
    pub concurrency: Option<usize>,
    /// Budget for one template's whole chain
    pub timeout: Option<Duration>,
}

impl PipelineOptions {
    /// Options from `templar.toml` values for the given context and mode.
    pub fn from_config(context_dir: &Path, config: &TemplarConfig, mode: Mode) -> Self {
        Self {
            context_dir: context_dir.to_path_buf(),
            templates_dir: config.publish.templates_dir.clone(),
            registry: config.registry.prefix.clone(),
            bucket: config.storage.bucket.clone(),
            mode,
            concurrency: config.publish.concurrency,
            timeout: config.publish.timeout_secs.map(Duration::from_secs),
        }
    }

    pub fn templates_root(&self) -> PathBuf {
        self.context_dir.join(&self.templates_dir)
    }
}

/// Drives every discovered template through build, push, and publish.
///
/// Clients are created once and shared by reference across all chains.
pub struct Pipeline<D: Executor = RealExecutor, S: Executor = RealExecutor> {
    options: PipelineOptions,
    docker: DockerClient<D>,
    publisher: Publisher<S>,
}

impl Pipeline<RealExecutor, RealExecutor> {
    pub fn new(options: PipelineOptions) -> Self {
        Self::with_clients(options, DockerClient::new(), StorageClient::new())
    }
}

impl<D: Executor, S: Executor> Pipeline<D, S> {
    pub fn with_clients(
        options: PipelineOptions,
        docker: DockerClient<D>,
        storage: StorageClient<S>,
    ) -> Self {
        let publisher = Publisher::new(storage, options.mode, options.bucket.clone());
        Self {
            options,
            docker,
            publisher,
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Verify tooling and inputs before any template is touched.
    pub async fn preflight(&self) -> Result<(), PreflightError> {
        let version = self.docker.check_installed().await?;
        tracing::debug!(%version, "docker available");

        let dockerfile = self.options.context_dir.join("Dockerfile");
        if !dockerfile.is_file() {
            return Err(PreflightError::MissingDockerfile(
                self.options.context_dir.clone(),
            ));
        }

        if !self.options.mode.is_development() {
            if self.options.bucket.is_none() {
                return Err(PreflightError::MissingBucket);
            }
            let version = self
                .publisher
                .storage()
                .check_installed()
                .await
                .map_err(|e| PreflightError::Gcloud { source: e })?;
            tracing::debug!(%version, "gcloud available");
        }

        Ok(())
    }

    /// Discover templates and run every chain to completion.
    ///
    /// Only a discovery failure aborts the run; per-template failures are
    /// collected in the returned report.
    pub async fn run(&self) -> templar_core::Result<RunReport> {
        let root = self.options.templates_root();
        let directories = discover_templates(&root)?;

        tracing::info!(
            count = directories.len(),
            mode = %self.options.mode,
            "publishing templates"
        );

        let limit = self
            .options
            .concurrency
            // arch-lint: allow(no-silent-result-drop) reason="Option: no limit configured runs every template at once"
            .unwrap_or(directories.len())
            .max(1);

        let templates = futures::stream::iter(directories)
            .map(|directory| async move {
                let result = self
                    .run_with_timeout(&directory)
                    .await
                    .inspect_err(|e| {
                        tracing::error!(directory = %directory.display(), error = %e, "template failed");
                    });
                TemplateReport { directory, result }
            })
            .buffer_unordered(limit)
            .collect::<Vec<_>>()
            .await;

        Ok(RunReport { templates })
    }

    async fn run_with_timeout(&self, directory: &Path) -> Result<TemplateOutcome, TemplateError> {
        match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, self.run_template(directory))
                .await
                .map_err(|_| TemplateError::Timeout {
                    directory: directory.to_path_buf(),
                    secs: limit.as_secs(),
                })?,
            None => self.run_template(directory).await,
        }
    }

    /// Run one template's chain: parse, plan, build, push, publish.
    pub async fn run_template(&self, directory: &Path) -> Result<TemplateOutcome, TemplateError> {
        tracing::debug!(directory = %directory.display(), stage = %Stage::Discovered);

        let config = TemplateConfig::load(directory)?;
        tracing::debug!(id = %config.id, stage = %Stage::ConfigParsed);

        let plan = BuildPlan::new(
            directory,
            &self.options.context_dir,
            &config,
            &self.options.registry,
            self.options.mode,
        )?;

        self.docker.build(&plan).await.map_err(TemplateError::Build)?;
        tracing::debug!(id = %plan.id, stage = %Stage::Built);

        let image = plan.image.to_string();
        self.docker.push(&image).await.map_err(TemplateError::Push)?;
        tracing::debug!(id = %plan.id, stage = %Stage::Pushed);

        let published = self.publisher.publish(&plan.manifest()).await?;

        let outcome = TemplateOutcome {
            id: plan.id,
            image,
            published,
        };
        tracing::info!(id = %outcome.id, stage = %outcome.final_stage(), "template done");
        Ok(outcome)
    }
}
