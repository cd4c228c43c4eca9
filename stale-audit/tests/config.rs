use std::fs;
use std::path::PathBuf;

use stale_audit::{ConfigError, ConfigFile, Settings};
use tempfile::TempDir;

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/stale-audit.toml")
}

#[test]
fn loads_settings_from_fixture() {
    let mut settings = Settings::default();
    settings.merge_file(ConfigFile::load(&fixture()).unwrap());

    let policy = settings.policy().unwrap();
    assert_eq!(policy.stale_days_for_prs(), 21);
    assert_eq!(policy.stale_days_for_branches(), 30);
    assert_eq!(policy.alert_lead_days(), 7);
    assert!(policy.is_ignored_branch("release"));
    assert!(!policy.is_ignored_branch("master"));
    assert!(policy.exempt_pr_branches());

    let scan = settings.scan_config().unwrap();
    assert_eq!(scan.organizations(), ["acme".to_string(), "widgets-inc".to_string()]);
    assert_eq!(scan.concurrency(), 8);
    assert_eq!(scan.per_page(), 100);
    assert!(scan.matches_repository("svc-billing"));
    assert!(!scan.matches_repository("website"));

    let api_url = settings.api_url().unwrap().unwrap();
    assert_eq!(api_url.path(), "/api/v3/");
}

#[test]
fn rejects_alert_window_wider_than_threshold() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("stale-audit.toml");
    fs::write(
        &path,
        r#"
organizations = ["acme"]
pr-stale-days = 5
alert-days = 7
"#,
    )
    .unwrap();

    let mut settings = Settings::default();
    settings.merge_file(ConfigFile::load(&path).unwrap());

    assert!(matches!(
        settings.policy(),
        Err(ConfigError::InvalidPolicy { .. })
    ));
}

#[test]
fn rejects_malformed_file() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("stale-audit.toml");
    fs::write(&path, "pr-stale-days = \"soon\"").unwrap();

    assert!(matches!(
        ConfigFile::load(&path),
        Err(ConfigError::TomlError { .. })
    ));
}

#[test]
fn missing_organizations_fail_validation() {
    let settings = Settings::default();

    assert!(matches!(
        settings.scan_config(),
        Err(ConfigError::ValidationError { .. })
    ));
}
