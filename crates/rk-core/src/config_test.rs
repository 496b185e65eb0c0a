use super::*;

#[test]
fn test_parse_minimal_config() {
    let config = Config::parse("{}").unwrap();
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.schema, "main");
    assert!(config.safe_mode);
    assert_eq!(config.codec, CodecKind::Tagged);
    assert!(config.is_in_memory());
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
database:
  path: "./lab.duckdb"
schema: lab
safe_mode: false
codec: tagged
"#;
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.database.path, "./lab.duckdb");
    assert_eq!(config.schema, "lab");
    assert!(!config.safe_mode);
    assert!(!config.is_in_memory());
}

#[test]
fn test_unknown_field_rejected() {
    let result = Config::parse("safemode: false");
    assert!(matches!(result, Err(CoreError::ConfigParseError { .. })));
}

#[test]
fn test_empty_schema_rejected() {
    let result = Config::parse("schema: \"\"");
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_qualified_schema_rejected() {
    let result = Config::parse("schema: a.b");
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_empty_db_path_rejected() {
    let result = Config::parse("database:\n  path: \" \"");
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(&dir.path().join("relkit.yml"));
    assert!(matches!(result, Err(CoreError::ConfigNotFound { .. })));
}

#[test]
fn test_load_from_dir_prefers_yml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("relkit.yml"), "schema: from_yml").unwrap();
    std::fs::write(dir.path().join("relkit.yaml"), "schema: from_yaml").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.schema, "from_yml");
}

#[test]
fn test_load_from_dir_yaml_extension() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("relkit.yaml"), "safe_mode: false").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert!(!config.safe_mode);
}

#[test]
fn test_load_from_empty_dir() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load_from_dir(dir.path());
    assert!(matches!(result, Err(CoreError::ConfigNotFound { .. })));
}
