use std::fs;

use sysview_app::settings::SettingsStore;
use sysview_core::Setting;

fn write_settings(dir: &tempfile::TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("settings.json");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_load_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_settings(
        &dir,
        r#"[
            {"name": "a", "description": "first", "command": "echo a"},
            {"name": "b", "description": "second", "command": "echo b"}
        ]"#,
    );
    let store = SettingsStore::load(&path).unwrap();
    assert_eq!(store.entries.len(), 2);
    assert_eq!(store.entries[1].command, "echo b");
}

#[test]
fn test_single_object_becomes_one_element_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_settings(
        &dir,
        r#"{"name": "only", "description": "lone entry", "command": "uname -a"}"#,
    );
    let store = SettingsStore::load(&path).unwrap();
    assert_eq!(store.entries.len(), 1);
    assert_eq!(store.entries[0].name, "only");
}

#[test]
fn test_missing_file_yields_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = SettingsStore::load(&dir.path().join("nope.json")).unwrap();
    assert!(store.entries.is_empty());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_settings(&dir, "{not json");
    assert!(SettingsStore::load(&path).is_err());
}

#[test]
fn test_record_command_writes_back_to_load_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_settings(
        &dir,
        r#"[{"name": "upgrade", "description": "", "command": "pkg upgrade -y"}]"#,
    );

    let mut store = SettingsStore::load(&path).unwrap();
    store
        .record_command(0, "sudo pkg upgrade -y".to_string())
        .unwrap();

    let reloaded = SettingsStore::load(&path).unwrap();
    assert_eq!(reloaded.entries[0].command, "sudo pkg upgrade -y");
}

#[test]
fn test_saved_file_is_valid_json_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_settings(
        &dir,
        r#"{"name": "one", "description": "", "command": "true"}"#,
    );

    let store = SettingsStore::load(&path).unwrap();
    store.save().unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let parsed: Vec<Setting> = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.len(), 1);
}
