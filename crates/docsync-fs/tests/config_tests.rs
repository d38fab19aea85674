use docsync_fs::{ConfigStore, Error};
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct TestConfig {
    repos: String,
    branch: Option<String>,
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join(".docs-sync.toml");
    fs::write(&file_path, "repos = \"acme/billing,acme/search\"\nbranch = \"trunk\"\n").unwrap();

    let config: TestConfig = ConfigStore::new().load(&file_path).unwrap();

    assert_eq!(config.repos, "acme/billing,acme/search");
    assert_eq!(config.branch.as_deref(), Some("trunk"));
}

#[test]
fn test_load_json() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("sync.json");
    fs::write(&file_path, r#"{"repos": "acme/billing"}"#).unwrap();

    let config: TestConfig = ConfigStore::new().load(&file_path).unwrap();

    assert_eq!(config.repos, "acme/billing");
    assert_eq!(config.branch, None);
}

#[test]
fn test_load_yaml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("sync.yml");
    fs::write(&file_path, "repos: acme/billing\nbranch: main\n").unwrap();

    let config: TestConfig = ConfigStore::new().load(&file_path).unwrap();

    assert_eq!(config.branch.as_deref(), Some("main"));
}

#[test]
fn test_unsupported_format() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("sync.env");
    fs::write(&file_path, "DOCS_SYNC_REPOS=acme/billing").unwrap();

    let result: docsync_fs::Result<TestConfig> = ConfigStore::new().load(&file_path);

    assert!(matches!(result, Err(Error::UnsupportedFormat { .. })));
}

#[test]
fn test_parse_error_names_format_and_path() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("broken.toml");
    fs::write(&file_path, "repos = [unterminated").unwrap();

    let err = ConfigStore::new()
        .load::<TestConfig>(&file_path)
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("TOML"), "got: {message}");
    assert!(message.contains("broken.toml"), "got: {message}");
}

#[test]
fn test_missing_file_is_io_error() {
    let temp = TempDir::new().unwrap();
    let result: docsync_fs::Result<TestConfig> =
        ConfigStore::new().load(&temp.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Io { .. })));
}
