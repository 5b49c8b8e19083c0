use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config: Config = serde_yaml::from_str("name: sparkify").unwrap();
    assert_eq!(config.name, "sparkify");
    assert_eq!(config.file_extension, "json");
    assert_eq!(config.on_error, FailurePolicy::Abort);
    assert_eq!(config.resolution.duration_tolerance, 0.0);

    let root = PathBuf::from("/tmp/project");
    assert_eq!(
        config.song_data_absolute(&root),
        root.join("data/song_data")
    );
    assert_eq!(config.log_data_absolute(&root), root.join("data/log_data"));
    assert_eq!(
        config.database_path(&root),
        root.join("target/playlog.duckdb").display().to_string()
    );
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: sparkify
song_data: raw/songs
log_data: raw/events
file_extension: ndjson
on_error: skip
database:
  path: ":memory:"
resolution:
  duration_tolerance: 0.001
"#;
    let config: Config = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(config.song_data, "raw/songs");
    assert_eq!(config.log_data, "raw/events");
    assert_eq!(config.file_extension, "ndjson");
    assert_eq!(config.on_error, FailurePolicy::Skip);
    assert!(config.database.is_memory());
    assert_eq!(config.database_path(Path::new("/x")), ":memory:");
    assert_eq!(config.resolution.duration_tolerance, 0.001);
}

#[test]
fn test_unknown_key_rejected() {
    let result: Result<Config, _> = serde_yaml::from_str("name: a\nsongs_data: x");
    assert!(result.is_err());
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(&dir.path().join("playlog.yml")).unwrap_err();
    assert!(matches!(err, CoreError::ConfigNotFound { .. }));
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("playlog.yml"), "name: first").unwrap();
    std::fs::write(dir.path().join("playlog.yaml"), "name: second").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "first");
}

#[test]
fn test_load_from_dir_yaml_fallback() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("playlog.yaml"), "name: second").unwrap();
    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "second");
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_dir(dir.path()).unwrap_err();
    assert!(err.to_string().contains("playlog.yml"));
}

#[test]
fn test_validate_empty_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("playlog.yml");
    std::fs::write(&path, "name: \"\"").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigInvalid { .. }));
}

#[test]
fn test_validate_negative_tolerance() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("playlog.yml");
    std::fs::write(
        &path,
        "name: a\nresolution:\n  duration_tolerance: -1.0\n",
    )
    .unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(err.to_string().contains("duration_tolerance"));
}

#[test]
fn test_validate_dotted_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("playlog.yml");
    std::fs::write(&path, "name: a\nfile_extension: .json\n").unwrap();
    assert!(Config::load(&path).is_err());
}

#[test]
fn test_invalid_yaml_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("playlog.yml");
    std::fs::write(&path, "name: [unclosed").unwrap();
    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, CoreError::ConfigParse(_)));
}

#[test]
fn test_failure_policy_display() {
    assert_eq!(FailurePolicy::Abort.to_string(), "abort");
    assert_eq!(FailurePolicy::Skip.to_string(), "skip");
}
