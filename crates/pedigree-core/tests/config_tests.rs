use std::collections::HashMap;
use std::io::Write;

use pedigree_core::config::{Config, ConfigError, DEFAULT_MAX_DEPTH, DEFAULT_SHARE_ORIGIN};
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config(
        r#"
[store]
url = "https://demo.supabase.co"
table = "cavalos"

[tree]
node_width = 160.0
"#,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.store.url.as_deref(), Some("https://demo.supabase.co"));
    assert_eq!(config.store.table, "cavalos");
    assert_eq!(config.store.bucket, "horse-photos");
    assert_eq!(config.tree.node_width, 160.0);
    assert_eq!(config.tree.node_height, 72.0);
    assert_eq!(config.lineage.max_depth, DEFAULT_MAX_DEPTH);
}

#[test]
fn test_invalid_toml() {
    let file = write_config("[store\nurl = ");
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::ParseError(_))
    ));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert!(matches!(
        Config::from_file(missing),
        Err(ConfigError::ReadError(_))
    ));
}

#[test]
fn test_bad_scale_range_rejected() {
    let file = write_config(
        r#"
[tree]
min_scale = 3.0
max_scale = 1.0
"#,
    );
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_non_finite_scale_rejected() {
    let file = write_config(
        r#"
[tree]
min_scale = nan
"#,
    );
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::Invalid(_))
    ));

    let file = write_config(
        r#"
[tree]
max_scale = inf
"#,
    );
    assert!(matches!(
        Config::from_file(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn test_overrides_take_precedence() {
    let vars: HashMap<&str, &str> = [
        ("PEDIGREE_STORE_URL", "https://env.supabase.co"),
        ("PEDIGREE_STORE_KEY", "env-key"),
        ("PEDIGREE_MAX_DEPTH", "3"),
        ("PEDIGREE_SHARE_ORIGIN", "https://stud.example"),
        ("PEDIGREE_LOG", "debug"),
    ]
    .into_iter()
    .collect();

    let mut config = Config::default();
    config.store.url = Some("https://file.supabase.co".to_string());
    config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(config.store.url.as_deref(), Some("https://env.supabase.co"));
    assert_eq!(config.store.api_key.as_deref(), Some("env-key"));
    assert_eq!(config.lineage.max_depth, 3);
    assert_eq!(config.share.origin, "https://stud.example");
    assert_eq!(config.log.level, "debug");
}

#[test]
fn test_unparsable_depth_override_ignored() {
    let mut config = Config::default();
    config.apply_overrides(|key| (key == "PEDIGREE_MAX_DEPTH").then(|| "deep".to_string()));
    assert_eq!(config.lineage.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(config.share.origin, DEFAULT_SHARE_ORIGIN);
}

#[test]
fn test_default_string_round_trips() {
    let text = Config::default_config_string();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed.lineage.max_depth, DEFAULT_MAX_DEPTH);
    assert_eq!(parsed.server.port, 3333);
    assert!(parsed.validate().is_ok());
}
