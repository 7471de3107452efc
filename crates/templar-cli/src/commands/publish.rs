use std::time::Duration;

use templar_publish::{Pipeline, Published};

use super::Target;

/// Publish settings that only apply to `templar publish`.
pub struct PublishOverrides {
    pub bucket: Option<String>,
    pub concurrency: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub skip_preflight: bool,
}

/// Build, push, and publish every template under the context.
pub async fn publish(target: &Target, overrides: PublishOverrides) -> anyhow::Result<()> {
    let mut options = target.options()?;
    if overrides.bucket.is_some() {
        options.bucket = overrides.bucket;
    }
    if overrides.concurrency.is_some() {
        options.concurrency = overrides.concurrency;
    }
    if let Some(secs) = overrides.timeout_secs {
        options.timeout = Some(Duration::from_secs(secs));
    }

    tracing::debug!(?options, "publish options");
    let pipeline = Pipeline::new(options);

    if !overrides.skip_preflight {
        pipeline.preflight().await?;
    }

    println!("Publishing templates ({})...", pipeline.options().mode);
    let report = pipeline.run().await?;

    println!();
    for outcome in report.succeeded() {
        match &outcome.published {
            Published::Uploaded { key } => {
                println!("  OK  {} → {} (manifest {key})", outcome.id, outcome.image)
            }
            Published::Skipped => {
                println!("  OK  {} → {} (manifest not uploaded)", outcome.id, outcome.image)
            }
        }
    }
    for (directory, err) in report.failures() {
        println!("  NG  {}: {err}", directory.display());
    }

    if let Some(err) = report.first_error() {
        let failed = report.failures().count();
        anyhow::bail!(
            "{failed} of {total} template(s) failed; first error: {err}",
            total = report.templates.len()
        );
    }

    println!();
    println!("Published {} template(s)", report.templates.len());
    Ok(())
}
