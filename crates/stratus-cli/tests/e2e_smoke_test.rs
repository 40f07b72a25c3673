use std::{fs, path::Path};

use tempfile::tempdir;

use stratus::StratusError;
use stratus_cli::{Args, run};

fn output_files(dir: &Path) -> Vec<String> {
    let mut files: Vec<_> = fs::read_dir(dir)
        .expect("Failed to read output directory")
        .flatten()
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    files.sort();
    files
}

fn dot_args(out_dir: &Path) -> Args {
    Args {
        out_dir: Some(out_dir.to_string_lossy().into_owned()),
        format: Some("dot".to_string()),
        log_level: "off".to_string(),
        ..Args::default()
    }
}

#[test]
fn e2e_smoke_test_cloud_architecture() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    run(&dot_args(temp_dir.path())).expect("Failed to render cloud architecture");

    assert_eq!(
        output_files(temp_dir.path()),
        vec!["cloud_architecture_diagram.dot".to_string()]
    );
    let source = fs::read_to_string(temp_dir.path().join("cloud_architecture_diagram.dot"))
        .expect("Failed to read DOT output");
    assert!(source.contains("CSYE6225 Cloud Architecture with CI/CD"));
    assert!(source.contains("Provision Infrastructure"));
    assert!(source.contains("expressjs-icon.svg"));
}

#[test]
fn e2e_smoke_test_filename_override() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = Args {
        filename: Some("architecture".to_string()),
        ..dot_args(temp_dir.path())
    };

    run(&args).expect("Failed to render cloud architecture");

    assert_eq!(
        output_files(temp_dir.path()),
        vec!["architecture.dot".to_string()]
    );
}

#[test]
fn e2e_smoke_test_direction_override() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let args = Args {
        direction: Some("TB".to_string()),
        ..dot_args(temp_dir.path())
    };

    run(&args).expect("Failed to render cloud architecture");

    let source = fs::read_to_string(temp_dir.path().join("cloud_architecture_diagram.dot"))
        .expect("Failed to read DOT output");
    assert!(source.contains("rankdir=\"TB\""));
    assert!(!source.contains("rankdir=\"LR\""));
}

#[test]
fn e2e_smoke_test_missing_icons() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let empty_icons = tempdir().expect("Failed to create temp directory");
    let args = Args {
        icon_root: Some(empty_icons.path().to_string_lossy().into_owned()),
        ..dot_args(temp_dir.path())
    };

    let err = run(&args).expect_err("Rendering without icons should fail");

    assert!(matches!(err, StratusError::Export(_)));
    assert!(output_files(temp_dir.path()).is_empty());
}
