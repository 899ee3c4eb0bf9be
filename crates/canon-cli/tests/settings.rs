//! Integration tests for configuration resolution.

use std::fs;

use canon_cli::settings::{load_config, open_workspace};
use canon_model::{MatchStatus, Vocabulary};
use tempfile::tempdir;

#[test]
fn missing_config_file_uses_defaults() {
    let dir = tempdir().unwrap();
    let config = load_config(&dir.path().join("canon.toml"), None).unwrap();
    assert_eq!(config.company.auto_threshold, 0.8);
    assert_eq!(config.company.suggest_threshold, 0.6);
    assert_eq!(config.mappings_dir, std::path::PathBuf::from("mappings"));
}

#[test]
fn mappings_dir_flag_overrides_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("canon.toml");
    fs::write(&path, "mappings_dir = \"from-file\"\n").unwrap();

    let from_file = load_config(&path, None).unwrap();
    assert_eq!(from_file.mappings_dir, std::path::PathBuf::from("from-file"));

    let overridden = load_config(&path, Some(dir.path().join("flag"))).unwrap();
    assert_eq!(overridden.mappings_dir, dir.path().join("flag"));
}

#[test]
fn invalid_config_error_names_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("canon.toml");
    fs::write(&path, "[company]\nauto_threshold = 0.4\nsuggest_threshold = 0.5\n").unwrap();

    let error = load_config(&path, None).unwrap_err();
    let message = format!("{error:#}");
    assert!(message.contains("canon.toml"), "{message}");
    assert!(message.contains("suggest_threshold"), "{message}");
}

#[test]
fn workspace_uses_configured_thresholds() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("canon.toml");
    // With auto at 1.0 nothing short of an exact key match is auto-mapped.
    fs::write(
        &path,
        "[company]\nauto_threshold = 1.0\nsuggest_threshold = 0.5\n",
    )
    .unwrap();

    let workspace = open_workspace(&path, Some(dir.path().join("mappings"))).unwrap();
    workspace
        .normalize(Vocabulary::Company, "Taft Electric Company")
        .unwrap();
    let outcome = workspace
        .normalize(Vocabulary::Company, "TaftElectric")
        .unwrap();
    assert_eq!(outcome.status, MatchStatus::PendingReview);
    assert!(dir.path().join("mappings").join("company_pending.json").exists());
}
