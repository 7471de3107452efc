//! Pure build planning for templar: everything decided before a process runs.
//!
//! # Publish pipeline
//!
//! ```text
//! templar publish
//!   1. Discover ── subdirectories of <templates_dir>
//!   2. Parse    ── <dir>/template.toml → TemplateConfig
//!   3. Plan     ── BuildPlan::new() (image ref, build args, nesting check)
//!   4. Build    ── docker build <context> --build-arg ... -t <image>
//!   5. Push     ── docker push <image>
//!   6. Publish  ── gcloud storage cp - gs://<bucket>/<id>.json (production only)
//! ```
//!
//! # Container layout
//!
//! Template files are copied to `/home/setup` while the image is built and
//! the runner works out of `/home/runner`. `code_cells_dir` must live
//! inside `files_dir`; its path below `files_dir` is re-rooted at
//! `/home/runner`.

pub mod dockerfile;
pub mod image;
pub mod manifest;
pub mod plan;

pub use dockerfile::EnvDockerfile;
pub use image::ImageRef;
pub use manifest::Manifest;
pub use plan::{BuildArg, BuildPlan, PlanError, RUNNER_ROOT_DIR, SETUP_FILES_DIR};
