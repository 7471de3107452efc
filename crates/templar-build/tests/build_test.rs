use std::path::{Path, PathBuf};

use templar_build::{BuildPlan, PlanError};
use templar_core::{Mode, TemplateConfig};

const REGISTRY: &str = "us-central1-docker.pkg.dev/acme/templates";

fn template() -> TemplateConfig {
    TemplateConfig {
        id: "foo".to_owned(),
        files_dir: "files".to_owned(),
        code_cells_dir: "files/code".to_owned(),
        setup_cmd: "npm install".to_owned(),
        start_cmd: "node index.js".to_owned(),
    }
}

fn plan(config: &TemplateConfig, mode: Mode) -> Result<BuildPlan, PlanError> {
    BuildPlan::new(
        Path::new("./templates/foo"),
        Path::new("."),
        config,
        REGISTRY,
        mode,
    )
}

// ── Image naming ──

#[test]
fn development_image_is_tagged_dev() {
    let plan = plan(&template(), Mode::Development).unwrap();
    assert_eq!(
        plan.image.to_string(),
        "us-central1-docker.pkg.dev/acme/templates/foo:dev"
    );
}

#[test]
fn production_image_is_tagged_latest() {
    let plan = plan(&template(), Mode::Production).unwrap();
    assert!(plan.image.to_string().ends_with("/foo:latest"));
}

// ── Build args ──

#[test]
fn build_args_are_the_six_substitutions_in_order() {
    let plan = plan(&template(), Mode::Production).unwrap();
    let names: Vec<&str> = plan.build_args.iter().map(|a| a.name).collect();

    assert_eq!(
        names,
        vec![
            "root_dir",
            "repo_files_dir",
            "files_dir",
            "setup_cmd",
            "start_cmd",
            "code_cells_dir",
        ]
    );
    assert_eq!(plan.build_arg("root_dir"), Some("/home/runner"));
    assert_eq!(plan.build_arg("repo_files_dir"), Some("templates/foo/files"));
    assert_eq!(plan.build_arg("files_dir"), Some("/home/setup"));
    assert_eq!(plan.build_arg("setup_cmd"), Some("npm install"));
    assert_eq!(plan.build_arg("start_cmd"), Some("node index.js"));
    assert_eq!(plan.build_arg("code_cells_dir"), Some("/home/runner/code"));
}

#[test]
fn docker_args_contain_build_args_and_tag() {
    let plan = plan(&template(), Mode::Development).unwrap();
    let args = plan.docker_args();

    assert_eq!(args[0], "build");
    assert_eq!(args[1], ".");
    assert_eq!(args.iter().filter(|a| *a == "--build-arg").count(), 6);
    assert!(args.contains(&"setup_cmd=npm install".to_owned()));
    assert_eq!(args[args.len() - 2], "-t");
    assert_eq!(
        args[args.len() - 1],
        "us-central1-docker.pkg.dev/acme/templates/foo:dev"
    );
    assert_eq!(args.len(), 2 + 12 + 2);
}

#[test]
fn command_line_quotes_every_build_arg() {
    let plan = plan(&template(), Mode::Production).unwrap();
    let line = plan.command_line();

    assert!(line.starts_with("docker build . "));
    assert!(line.contains(r#"--build-arg "root_dir"="/home/runner""#));
    assert!(line.contains(r#"--build-arg "setup_cmd"="npm install""#));
    assert!(line.contains(r#"--build-arg "code_cells_dir"="/home/runner/code""#));
    assert!(line.ends_with("-t us-central1-docker.pkg.dev/acme/templates/foo:latest"));
}

#[test]
fn changing_setup_cmd_changes_only_its_argument() {
    let original = plan(&template(), Mode::Production).unwrap();

    let mut changed_config = template();
    changed_config.setup_cmd = "pip install -r requirements.txt".to_owned();
    let changed = plan(&changed_config, Mode::Production).unwrap();

    let a = original.docker_args();
    let b = changed.docker_args();
    assert_eq!(a.len(), b.len());

    let differing: Vec<(&String, &String)> = a.iter().zip(&b).filter(|(x, y)| x != y).collect();
    assert_eq!(differing.len(), 1);
    assert_eq!(differing[0].0, "setup_cmd=npm install");
    assert_eq!(differing[0].1, "setup_cmd=pip install -r requirements.txt");
}

#[test]
fn repo_files_dir_is_relative_to_context() {
    let config = template();
    let plan = BuildPlan::new(
        Path::new("/work/repo/templates/foo"),
        Path::new("/work/repo"),
        &config,
        REGISTRY,
        Mode::Production,
    )
    .unwrap();

    assert_eq!(
        plan.build_arg("repo_files_dir").map(PathBuf::from),
        Some(PathBuf::from("templates/foo/files"))
    );
    assert_eq!(plan.docker_args()[1], "/work/repo");
}

// ── Nesting invariant ──

#[test]
fn code_cells_outside_files_dir_is_invariant_violation() {
    let mut config = template();
    config.code_cells_dir = "cells".to_owned();

    let err = plan(&config, Mode::Production).unwrap_err();
    assert!(matches!(
        err,
        PlanError::InvariantViolation { ref id, ref code_cells_dir, .. }
            if id == "foo" && code_cells_dir == "cells"
    ));
}

#[test]
fn leading_slash_in_code_cells_is_invariant_violation() {
    let mut config = template();
    config.code_cells_dir = "/files/code".to_owned();

    let err = plan(&config, Mode::Production).unwrap_err();
    assert!(matches!(err, PlanError::InvariantViolation { .. }));
}

#[test]
fn code_cells_cannot_climb_out_of_files_dir() {
    let mut config = template();
    config.code_cells_dir = "files/../../etc".to_owned();

    let err = plan(&config, Mode::Production).unwrap_err();
    assert!(matches!(
        err,
        PlanError::ParentTraversal { ref code_cells_dir, .. } if code_cells_dir == "files/../../etc"
    ));
}

#[test]
fn template_outside_context_is_rejected() {
    let err = BuildPlan::new(
        Path::new("/elsewhere/templates/foo"),
        Path::new("/work/repo"),
        &template(),
        REGISTRY,
        Mode::Production,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        PlanError::OutsideContext { ref template_dir, .. }
            if template_dir == Path::new("/elsewhere/templates/foo")
    ));
}

// ── Manifest ──

#[test]
fn manifest_reflects_plan() {
    let plan = plan(&template(), Mode::Production).unwrap();
    let manifest = plan.manifest();

    assert_eq!(manifest.id, "foo");
    assert_eq!(manifest.image, plan.image.to_string());
    assert_eq!(manifest.root_dir, "/home/runner");
    assert_eq!(manifest.code_cells_dir, "/home/runner/code");
    assert_eq!(manifest.object_key(), "foo.json");
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_]{0,8}"
    }

    proptest! {
        #[test]
        fn nested_code_cells_always_planned(
            files_dir in segment(),
            rest in proptest::collection::vec(segment(), 0..4),
        ) {
            let mut config = template();
            config.code_cells_dir = std::iter::once(files_dir.clone())
                .chain(rest.iter().cloned())
                .collect::<Vec<_>>()
                .join("/");
            config.files_dir = files_dir;

            let plan = plan(&config, Mode::Production).unwrap();
            let expected = std::iter::once("/home/runner".to_owned())
                .chain(rest)
                .collect::<Vec<_>>()
                .join("/");
            prop_assert_eq!(plan.code_cells_dir, expected);
        }

        #[test]
        fn foreign_first_segment_always_rejected(
            files_dir in segment(),
            other in segment(),
            rest in proptest::collection::vec(segment(), 0..3),
        ) {
            prop_assume!(files_dir != other);
            let mut config = template();
            config.files_dir = files_dir;
            config.code_cells_dir = std::iter::once(other)
                .chain(rest)
                .collect::<Vec<_>>()
                .join("/");

            prop_assert!(plan(&config, Mode::Development).is_err());
        }

        #[test]
        fn always_six_build_args(setup in ".{0,40}", start in ".{0,40}") {
            let mut config = template();
            config.setup_cmd = setup;
            config.start_cmd = start;

            let plan = plan(&config, Mode::Production).unwrap();
            prop_assert_eq!(plan.build_args.len(), 6);
        }
    }
}
