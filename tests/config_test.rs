//! Integration tests for Settings config loading with layered merge semantics.
//!
//! These tests run without a global config (temp directories only), so the
//! local file merges onto compiled defaults.

use std::fs;

use tempfile::TempDir;

use unitminer::config::Settings;
use unitminer::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

#[test]
fn given_local_config_when_load_then_unions_tags_and_overrides_scalars() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("run.toml");
    fs::write(
        &path,
        r#"
min_support = 3
forbidden_tags = ["-LRB-", "!CC"]
forbidden_words = ["copyright"]
"#,
    )
    .unwrap();

    // Act
    let settings = Settings::load(Some(&path)).expect("load settings");

    // Assert
    assert_eq!(settings.min_support, 3);
    assert!(settings.forbidden_tags.contains(&"-LRB-".to_string()));
    assert!(settings.forbidden_tags.contains(&"IN".to_string()));
    assert!(!settings.forbidden_tags.contains(&"CC".to_string()));
    assert_eq!(
        settings.forbidden_words,
        vec!["copyright".to_string(), "elsevier".to_string()]
    );

    let policy = settings.policy();
    assert_eq!(policy.min_support, 3);
    assert!(policy.is_forbidden_tag("-LRB-"));
    assert!(!policy.is_forbidden_tag("CC"));
}

#[test]
fn given_missing_local_config_when_load_then_errors() {
    let dir = TempDir::new().unwrap();
    assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
}

#[test]
fn given_invalid_toml_when_load_then_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "min_support = \"many\"").unwrap();

    assert!(Settings::load(Some(&path)).is_err());
}
