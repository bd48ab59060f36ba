use super::load_config;
use super::settings::Settings;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.world.name, "World");
    assert_eq!(settings.world.namespace, "/ambf/env");
    assert_eq!(settings.world.freq_min, 1.0);
    assert_eq!(settings.world.freq_max, 50.0);
    assert_eq!(settings.world.reconcile_hz, 10.0);
    assert_eq!(settings.params.file, "config/params.json");
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    // load_config reads config/default.toml relative to the working directory
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [world]
        name = "Arena"
        reconcile_hz = 20.0

        [params]
        file = "/tmp/arena_params.json"
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config();
    env::set_current_dir(orig).expect("restore cwd");

    let cfg = cfg.expect("load_config failed");
    assert_eq!(cfg.world.name, "Arena");
    assert_eq!(cfg.world.reconcile_hz, 20.0);
    assert_eq!(cfg.params.file, "/tmp/arena_params.json");
    // untouched sections keep their defaults
    assert_eq!(cfg.world.namespace, "/ambf/env");
    assert_eq!(cfg.logging.level, "info");
}

#[test]
#[serial]
fn load_config_from_env_overrides_defaults() {
    let cfg = temp_env::with_vars(
        [
            ("PCTOPICS_WORLD__NAMESPACE", Some("/sim")),
            ("PCTOPICS_WORLD__FREQ_MAX", Some("120")),
            ("PCTOPICS_LOGGING__LEVEL", Some("debug")),
        ],
        load_config,
    )
    .expect("load_config failed");

    assert_eq!(cfg.world.namespace, "/sim");
    assert_eq!(cfg.world.freq_max, 120.0);
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.world.name, "World");
}
