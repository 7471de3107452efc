use std::path::{Path, PathBuf};

use templar_core::{Mode, TemplateConfig};

use crate::image::ImageRef;
use crate::manifest::Manifest;

/// Working directory of the runner inside the image.
pub const RUNNER_ROOT_DIR: &str = "/home/runner";

/// Where template files are copied while the image is built.
pub const SETUP_FILES_DIR: &str = "/home/setup";

/// A named value passed to `docker build --build-arg`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArg {
    pub name: &'static str,
    pub value: String,
}

impl BuildArg {
    fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Everything needed to build one template image.
///
/// Construction validates that `code_cells_dir` is nested under
/// `files_dir`; an invalid template never yields a plan.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub id: String,
    pub image: ImageRef,
    /// Docker build context
    pub context_dir: PathBuf,
    /// Build args in the order they are passed to docker
    pub build_args: Vec<BuildArg>,
    /// Code cells directory inside the image
    pub code_cells_dir: String,
}

impl BuildPlan {
    /// Derive the build plan for the template in `template_dir`.
    ///
    /// `repo_files_dir` is expressed relative to `context_dir` so the
    /// Dockerfile can `COPY` it.
    ///
    /// # Errors
    ///
    /// [`PlanError::InvariantViolation`] if the first segment of
    /// `code_cells_dir` is not `files_dir`, [`PlanError::ParentTraversal`]
    /// if it climbs out with `..`, and [`PlanError::OutsideContext`] if
    /// `template_dir` is not inside `context_dir`.
    pub fn new(
        template_dir: &Path,
        context_dir: &Path,
        config: &TemplateConfig,
        registry: &str,
        mode: Mode,
    ) -> Result<Self, PlanError> {
        let code_cells_dir = container_code_cells_dir(config)?;
        let image = ImageRef::for_template(registry, &config.id, mode);

        let repo_files_dir = template_dir
            .strip_prefix(context_dir)
            .map_err(|_| PlanError::OutsideContext {
                id: config.id.clone(),
                template_dir: template_dir.to_path_buf(),
                context_dir: context_dir.to_path_buf(),
            })?
            .join(&config.files_dir);

        let build_args = vec![
            BuildArg::new("root_dir", RUNNER_ROOT_DIR),
            BuildArg::new("repo_files_dir", repo_files_dir.display().to_string()),
            BuildArg::new("files_dir", SETUP_FILES_DIR),
            BuildArg::new("setup_cmd", config.setup_cmd.as_str()),
            BuildArg::new("start_cmd", config.start_cmd.as_str()),
            BuildArg::new("code_cells_dir", code_cells_dir.as_str()),
        ];

        tracing::debug!(id = %config.id, image = %image, "build plan ready");

        Ok(Self {
            id: config.id.clone(),
            image,
            context_dir: context_dir.to_path_buf(),
            build_args,
            code_cells_dir,
        })
    }

    /// Arguments for `docker`, executed without a shell.
    pub fn docker_args(&self) -> Vec<String> {
        let mut args = vec![
            "build".to_owned(),
            self.context_dir.display().to_string(),
        ];
        for arg in &self.build_args {
            args.push("--build-arg".to_owned());
            args.push(format!("{}={}", arg.name, arg.value));
        }
        args.push("-t".to_owned());
        args.push(self.image.to_string());
        args
    }

    /// Equivalent shell command with every build arg name and value quoted.
    pub fn command_line(&self) -> String {
        let mut line = format!("docker build {}", self.context_dir.display());
        for arg in &self.build_args {
            line.push_str(&format!(
                " --build-arg {}={}",
                shell_quote(arg.name),
                shell_quote(&arg.value)
            ));
        }
        line.push_str(&format!(" -t {}", self.image));
        line
    }

    /// Manifest describing the image this plan produces.
    pub fn manifest(&self) -> Manifest {
        Manifest {
            id: self.id.clone(),
            image: self.image.to_string(),
            root_dir: RUNNER_ROOT_DIR.to_owned(),
            code_cells_dir: self.code_cells_dir.clone(),
        }
    }

    pub fn build_arg(&self, name: &str) -> Option<&str> {
        self.build_args
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }
}

/// Re-root `code_cells_dir` from `files_dir` to [`RUNNER_ROOT_DIR`].
///
/// The first segment is compared verbatim, so a leading `/` or a
/// `files_dir` with a trailing `/` never matches.
fn container_code_cells_dir(config: &TemplateConfig) -> Result<String, PlanError> {
    let mut segments = config.code_cells_dir.split('/');

    if config.files_dir.is_empty() || segments.next() != Some(config.files_dir.as_str()) {
        return Err(PlanError::InvariantViolation {
            id: config.id.clone(),
            code_cells_dir: config.code_cells_dir.clone(),
            files_dir: config.files_dir.clone(),
        });
    }

    let mut dir = RUNNER_ROOT_DIR.to_owned();
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(PlanError::ParentTraversal {
                    id: config.id.clone(),
                    code_cells_dir: config.code_cells_dir.clone(),
                });
            }
            _ => {
                dir.push('/');
                dir.push_str(segment);
            }
        }
    }
    Ok(dir)
}

/// Double-quote `s` the way a POSIX shell expects inside `"..."`.
fn shell_quote(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(
        "template {id:?}: parent directory of code_cells_dir ({code_cells_dir:?}) must be files_dir ({files_dir:?})"
    )]
    InvariantViolation {
        id: String,
        code_cells_dir: String,
        files_dir: String,
    },

    #[error("template {id:?}: code_cells_dir ({code_cells_dir:?}) must not contain '..'")]
    ParentTraversal { id: String, code_cells_dir: String },

    #[error(
        "template {id:?}: directory {} is outside the build context {}",
        template_dir.display(),
        context_dir.display()
    )]
    OutsideContext {
        id: String,
        template_dir: PathBuf,
        context_dir: PathBuf,
    },
}
