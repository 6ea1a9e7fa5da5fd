//! Settings loading from config files.

use std::path::PathBuf;

use ged_admin::config::{load_settings_with_options, Config, LoadOptions, DEFAULT_API_URL};

#[tokio::test]
async fn test_relative_download_dir_resolves_against_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ged.yaml");
    std::fs::write(
        &path,
        "download_dir: exports\nuse_kdrive: true\nsession:\n  role: admin\n",
    )
    .unwrap();

    let (settings, config) = load_settings_with_options(LoadOptions {
        config_path: Some(path.clone()),
        ..Default::default()
    })
    .await;

    assert_eq!(config.source_path, Some(path));
    assert_eq!(settings.download_dir, dir.path().join("exports"));
    assert!(settings.use_kdrive);
}

#[tokio::test]
async fn test_cli_api_url_beats_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ged.json");
    std::fs::write(&path, r#"{"api_url": "http://from-file:8000/api"}"#).unwrap();

    let (settings, _) = load_settings_with_options(LoadOptions {
        config_path: Some(path),
        api_url: Some("https://from-cli.example.com/api/".to_string()),
        ..Default::default()
    })
    .await;

    assert_eq!(settings.api_url, "https://from-cli.example.com/api");
}

#[tokio::test]
async fn test_unreadable_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ged.toml");
    std::fs::write(&path, "this is = = not toml").unwrap();

    assert!(Config::load_from_path(&path).await.is_err());

    let (_, config) = load_settings_with_options(LoadOptions {
        config_path: Some(path),
        api_url: Some(DEFAULT_API_URL.to_string()),
        ..Default::default()
    })
    .await;
    assert_eq!(config.source_path, None::<PathBuf>);
    assert_eq!(config.api_url, None);
}
