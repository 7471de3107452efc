use std::fmt;
use std::path::Path;

use templar_cloud::{DockerClient, StorageClient};
use templar_core::TemplarConfig;

/// Run all diagnostic checks without early return.
pub async fn doctor(context: &Path) -> anyhow::Result<()> {
    let mut report = DoctorReport::default();

    report.docker = match DockerClient::new().check_installed().await {
        Ok(version) => CheckResult::ok(&version),
        Err(e) => CheckResult::fail(&e.to_string()),
    };

    report.gcloud = match StorageClient::new().check_installed().await {
        Ok(version) => CheckResult::ok(&version),
        Err(e) => CheckResult::fail(&e.to_string()),
    };

    report.dockerfile = if context.join("Dockerfile").is_file() {
        CheckResult::ok("Found")
    } else {
        CheckResult::fail("Not found")
    };

    match TemplarConfig::load(context) {
        Ok(config) => {
            report.config_file = if context.join(templar_core::config::CONFIG_FILE_NAME).exists() {
                CheckResult::ok("Found")
            } else {
                CheckResult::ok("Not found (using defaults)")
            };
            report.bucket = match &config.storage.bucket {
                Some(bucket) => CheckResult::ok(bucket),
                None => CheckResult::fail("[storage].bucket not set (required to publish)"),
            };
            let root = context.join(&config.publish.templates_dir);
            report.templates = match templar_core::discover_templates(&root) {
                Ok(dirs) => CheckResult::ok(&format!("{} in {}", dirs.len(), root.display())),
                Err(e) => CheckResult::fail(&e.to_string()),
            };
        }
        Err(e) => report.config_file = CheckResult::fail(&e.to_string()),
    }

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed; see above for details");
    }

    Ok(())
}

#[derive(Debug, Default)]
struct DoctorReport {
    docker: CheckResult,
    gcloud: CheckResult,
    dockerfile: CheckResult,
    config_file: CheckResult,
    bucket: CheckResult,
    templates: CheckResult,
}

impl DoctorReport {
    fn all_passed(&self) -> bool {
        self.checks().iter().all(|(_, c)| c.passed)
    }

    fn checks(&self) -> [(&'static str, &CheckResult); 6] {
        [
            ("Docker", &self.docker),
            ("gcloud CLI", &self.gcloud),
            ("Dockerfile", &self.dockerfile),
            ("templar.toml", &self.config_file),
            ("Bucket", &self.bucket),
            ("Templates", &self.templates),
        ]
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "templar doctor")?;
        writeln!(f, "------------------------------")?;
        for (label, check) in self.checks() {
            writeln!(f, "{:<16}{}  {}", label, check.icon(), check.detail)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
struct CheckResult {
    passed: bool,
    detail: String,
}

impl CheckResult {
    fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}
