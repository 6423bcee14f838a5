use std::fs;
use std::path::PathBuf;

use ifacemaker::config::*;
use ifacemaker::errors::IfaceError;
use tempfile::TempDir;

#[test]
fn test_default_config_copies_docs() {
    let config = MakerConfig::default();
    assert!(config.copy_docs);
    assert!(config.output.is_none());
    assert!(config.validate().is_err());
}

#[test]
fn test_load_partial_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ifacemaker.json");
    fs::write(
        &path,
        r#"{ "struct_name": "Store", "iface_name": "StoreAPI", "copy_docs": false }"#,
    )
    .unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(config.struct_name, "Store");
    assert_eq!(config.iface_name, "StoreAPI");
    assert_eq!(config.pkg_name, "");
    assert!(!config.copy_docs);
    assert!(matches!(
        config.validate(),
        Err(IfaceError::Config { ref message }) if message == "package name is required"
    ));
}

#[test]
fn test_load_invalid_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_config(&path), Err(IfaceError::Config { .. })));
    assert!(matches!(
        load_config(&dir.path().join("missing.json")),
        Err(IfaceError::Config { .. })
    ));
}

#[test]
fn test_target_dir_is_output_parent() {
    let config = MakerConfig::new("Foo", "FooIface", "bar").with_output("/src/app/store/iface.go");
    assert_eq!(config.target_dir(), Some(PathBuf::from("/src/app/store")));
    assert_eq!(
        MakerConfig::new("Foo", "FooIface", "bar")
            .with_output("iface.go")
            .target_dir(),
        None
    );
    assert_eq!(MakerConfig::new("Foo", "FooIface", "bar").target_dir(), None);
}

#[test]
fn test_config_serde_roundtrip() {
    let config = MakerConfig::new("Foo", "FooIface", "bar")
        .with_copy_docs(false)
        .with_output("/tmp/out.go");
    let json = serde_json::to_string_pretty(&config).unwrap();
    let deserialized: MakerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, deserialized);
}
