use awsm_dashboard::config::{Settings, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_config_file() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("awsm-dashboard.toml");

    let toml = r#"
[api]
base_url = "https://assets.example.com/api"
timeout_secs = 10

[log]
level = "debug"
"#;
    fs::write(&path, toml)?;

    let settings = Settings::from_file(&path)?;
    assert_eq!(settings.api.base_url, "https://assets.example.com/api");
    assert_eq!(settings.api.timeout_secs, 10);
    assert_eq!(settings.log.level, "debug");

    Ok(())
}

#[test]
fn test_partial_file_keeps_defaults() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("awsm-dashboard.toml");
    fs::write(&path, "[api]\ntimeout_secs = 5\n")?;

    let settings = Settings::from_file(&path)?;
    assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.api.timeout_secs, 5);
    assert_eq!(settings.log.level, "info");

    Ok(())
}

#[test]
fn test_missing_file_uses_defaults() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let settings = Settings::from_file(&temp_dir.path().join("absent.toml"))?;

    assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.api.timeout_secs, DEFAULT_TIMEOUT_SECS);

    Ok(())
}

#[test]
fn test_invalid_file_is_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("awsm-dashboard.toml");
    fs::write(&path, "[api]\nbase_url = \"assets.example.com\"\ntimeout_secs = 0\n")?;

    let err = Settings::from_file(&path).unwrap_err().to_string();
    assert!(err.contains("Configuration validation failed"));
    assert!(err.contains("api.base_url"));
    assert!(err.contains("api.timeout_secs"));

    Ok(())
}
