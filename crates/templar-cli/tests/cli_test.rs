use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn templar() -> assert_cmd::Command {
    cargo_bin_cmd!("templar")
}

fn write_template(context: &Path, name: &str, id: &str, code_cells_dir: &str) {
    let dir = context.join("templates").join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("template.toml"),
        format!(
            "id = \"{id}\"\nfiles_dir = \"files\"\ncode_cells_dir = \"{code_cells_dir}\"\n\
             setup_cmd = \"make\"\nstart_cmd = \"./start.sh\"\n"
        ),
    )
    .unwrap();
}

// ── Help / Version ──

#[test]
fn shows_help() {
    templar()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build, push, and publish"));
}

#[test]
fn shows_version() {
    templar()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("templar"));
}

#[test]
fn rejects_unknown_mode() {
    templar()
        .args(["list", "--mode", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("staging"));
}

// ── List Command ──

#[test]
fn list_shows_production_images() {
    let tmp = TempDir::new().unwrap();
    write_template(tmp.path(), "node", "nodejs", "files/code");
    std::fs::write(
        tmp.path().join("templar.toml"),
        "[registry]\nprefix = \"gcr.io/acme/tpl\"\n",
    )
    .unwrap();

    templar()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("gcr.io/acme/tpl/nodejs:latest"))
        .stdout(predicate::str::contains("/home/runner/code"));
}

#[test]
fn list_dev_mode_uses_dev_tag() {
    let tmp = TempDir::new().unwrap();
    write_template(tmp.path(), "node", "nodejs", "files/code");

    templar()
        .args(["list", "--dev", "--registry", "localhost:5000/tpl", "-C"])
        .arg(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("localhost:5000/tpl/nodejs:dev"));
}

#[test]
fn list_reports_invalid_nesting() {
    let tmp = TempDir::new().unwrap();
    write_template(tmp.path(), "node", "nodejs", "files/code");
    write_template(tmp.path(), "py", "python", "code");

    templar()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .failure()
        .stdout(predicate::str::contains("nodejs"))
        .stdout(predicate::str::contains("must be files_dir"));
}

#[test]
fn list_ignores_files_in_templates_root() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("templates")).unwrap();
    std::fs::write(tmp.path().join("templates/README.md"), "# templates").unwrap();

    templar()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates found"));
}

// ── Publish Command ──

#[test]
fn publish_without_templates_dir_fails() {
    let tmp = TempDir::new().unwrap();

    templar()
        .current_dir(tmp.path())
        .args(["publish", "--dev", "--skip-preflight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to list template directories"));
}

#[test]
fn publish_with_no_templates_succeeds() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir(tmp.path().join("templates")).unwrap();

    templar()
        .current_dir(tmp.path())
        .args(["publish", "--dev", "--skip-preflight"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Published 0 template(s)"));
}

#[test]
fn publish_config_error_exits_nonzero() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("templates/broken");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("template.toml"), "id = ").unwrap();

    templar()
        .current_dir(tmp.path())
        .args(["publish", "--dev", "--skip-preflight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 of 1 template(s) failed"));
}

#[test]
fn invalid_templar_toml_is_reported() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("templar.toml"), "not valid {{{{ toml").unwrap();

    templar()
        .current_dir(tmp.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

// ── Env Command ──

#[test]
fn env_push_requires_dbk_toml() {
    let tmp = TempDir::new().unwrap();

    templar()
        .args(["env", "push"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("dbk.toml"));
}

#[test]
fn env_push_requires_dockerfile_dbk() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("dbk.toml"),
        "id = \"my-env\"\nstart_cmd = \"./start.sh\"\n",
    )
    .unwrap();

    templar()
        .args(["env", "push"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dockerfile.dbk"));
}
