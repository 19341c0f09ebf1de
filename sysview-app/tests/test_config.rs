use std::path::PathBuf;

use sysview_app::config::Config;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.tick_rate_ms, 2000);
    assert_eq!(config.settings_path, PathBuf::from("resources/settings.json"));
    assert_eq!(config.syslog_path, PathBuf::from("/var/log/messages"));
    assert_eq!(config.command_timeout_secs, 30);
}

#[test]
fn test_parse_full_config() {
    let raw = r#"
tick_rate_ms = 500
settings_path = "/etc/sysview/settings.json"
syslog_path = "/var/log/all.log"
log_path = "/var/log/sysview.log"
command_timeout_secs = 5
"#;
    let config: Config = toml::from_str(raw).unwrap();
    assert_eq!(config.tick_rate_ms, 500);
    assert_eq!(config.settings_path, PathBuf::from("/etc/sysview/settings.json"));
    assert_eq!(config.command_timeout_secs, 5);
}

#[test]
fn test_parse_partial_config_falls_back_to_defaults() {
    let config: Config = toml::from_str("tick_rate_ms = 1000\n").unwrap();
    assert_eq!(config.tick_rate_ms, 1000);
    assert_eq!(config.syslog_path, PathBuf::from("/var/log/messages"));
    assert_eq!(config.command_timeout_secs, 30);
}

#[test]
fn test_empty_config_is_all_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.tick_rate_ms, Config::default().tick_rate_ms);
}
