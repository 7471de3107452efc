//! The templar publish pipeline.
//!
//! Each discovered template runs through its own chain:
//!
//! ```text
//! Discovered → ConfigParsed → Built → Pushed → Published | Skipped
//! ```
//!
//! Chains are independent: one template failing never stops a sibling.
//! The [`RunReport`] collects every outcome once all chains have settled.

pub mod env;
pub mod error;
pub mod pipeline;
pub mod publisher;
pub mod report;

pub use env::{EnvError, EnvPush};
pub use error::{PreflightError, TemplateError};
pub use pipeline::{Pipeline, PipelineOptions};
pub use publisher::{Published, Publisher};
pub use report::{RunReport, Stage, TemplateOutcome, TemplateReport};
