use std::fmt;
use std::path::PathBuf;

use crate::error::TemplateError;
use crate::publisher::Published;

/// Lifecycle of one template within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Discovered,
    ConfigParsed,
    Built,
    Pushed,
    Published,
    Skipped,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Discovered => "discovered",
            Self::ConfigParsed => "config parsed",
            Self::Built => "built",
            Self::Pushed => "pushed",
            Self::Published => "published",
            Self::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// A template that made it through its whole chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOutcome {
    pub id: String,
    pub image: String,
    pub published: Published,
}

impl TemplateOutcome {
    pub fn final_stage(&self) -> Stage {
        match self.published {
            Published::Uploaded { .. } => Stage::Published,
            Published::Skipped => Stage::Skipped,
        }
    }
}

#[derive(Debug)]
pub struct TemplateReport {
    pub directory: PathBuf,
    pub result: Result<TemplateOutcome, TemplateError>,
}

/// Aggregate outcome of a publish run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub templates: Vec<TemplateReport>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.templates.iter().all(|t| t.result.is_ok())
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &TemplateOutcome> {
        self.templates
            .iter()
            // arch-lint: allow(no-silent-result-drop) reason="errors are kept in the report and exposed by failures()"
            .filter_map(|t| t.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&PathBuf, &TemplateError)> {
        self.templates
            .iter()
            .filter_map(|t| t.result.as_ref().err().map(|e| (&t.directory, e)))
    }

    /// First failure in completion order.
    pub fn first_error(&self) -> Option<&TemplateError> {
        self.failures().next().map(|(_, e)| e)
    }
}
