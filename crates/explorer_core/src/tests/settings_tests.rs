use std::fs;

use super::*;

#[test]
fn missing_file_yields_defaults() {
    let path = std::env::temp_dir().join("explorer-settings-missing-3f1c.toml");
    let _ = fs::remove_file(&path);
    let settings = load_settings(&path).expect("settings");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.step_advance_delay(), Duration::from_millis(500));
}

#[test]
fn file_overrides_only_named_keys() {
    let path = std::env::temp_dir().join(format!(
        "explorer-settings-{}.toml",
        std::process::id()
    ));
    fs::write(&path, "step_advance_delay_ms = 0\ncopy_suffix = \" (2)\"\n").expect("write");

    let settings = load_settings(&path).expect("settings");
    let _ = fs::remove_file(&path);

    assert_eq!(settings.step_advance_delay_ms, 0);
    assert_eq!(settings.copy_suffix, " (2)");
    assert_eq!(settings.archive_name, "Archive.zip");
    assert_eq!(settings.start_level(), LevelId(1));
}

#[test]
fn renders_as_toml() {
    let rendered = Settings::default().to_toml().expect("toml");
    assert!(rendered.contains("default_folder_name = \"New Folder\""));
    assert!(rendered.contains("notification_capacity = 64"));
}
