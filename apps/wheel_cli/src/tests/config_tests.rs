use super::{load_settings_from, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

fn temp_settings_file(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("wheel_cli_config_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("wheel.toml");
    fs::write(&path, contents).expect("write settings");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn missing_file_yields_defaults() {
    let settings = load_settings_from(&PathBuf::from("/nonexistent/wheel.toml"), no_env);

    assert_eq!(settings, Settings::default());
    assert_eq!(settings.tick_interval_ms, 50);
    assert_eq!((settings.min_spin_secs, settings.max_spin_secs), (1, 5));
    assert_eq!(settings.image_url, "https://loremflickr.com/320/240");
    settings.validate().expect("defaults are valid");
}

#[test]
fn file_values_override_defaults() {
    let path = temp_settings_file(
        r#"
image_url = "http://localhost:9000/cat.png"
fetch_timeout_secs = 4
angle_step = 7.5
wheel_size = "80"
spin_seed = 11
"#,
    );

    let settings = load_settings_from(&path, no_env);

    assert_eq!(settings.image_url, "http://localhost:9000/cat.png");
    assert_eq!(settings.fetch_timeout(), Duration::from_secs(4));
    assert_eq!(settings.angle_step, 7.5);
    assert_eq!(settings.wheel_size, 80);
    assert_eq!(settings.spin_seed, Some(11));
    assert!(settings.ignored.is_empty());

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn environment_wins_over_file() {
    let path = temp_settings_file("max_spin_secs = 3\nlog_filter = \"debug\"\n");
    let env_vars = HashMap::from([
        ("APP__MAX_SPIN_SECS", "4"),
        ("WHEEL_IMAGE_URL", "http://first.example/img"),
        ("APP__IMAGE_URL", "http://second.example/img"),
    ]);

    let settings = load_settings_from(&path, |key| env_vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.max_spin_secs, 4);
    assert_eq!(settings.log_filter, "debug");
    assert_eq!(settings.image_url, "http://second.example/img");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn bad_values_are_ignored_and_reported() {
    let path = temp_settings_file("tick_interval_ms = \"fast\"\ncolour = \"red\"\nnested = [1, 2]\n");
    let settings = load_settings_from(&path, |key| {
        (key == "APP__WHEEL_SIZE").then(|| "huge".to_string())
    });

    assert_eq!(settings.tick_interval_ms, 50);
    assert_eq!(settings.wheel_size, 50);
    assert_eq!(settings.ignored.len(), 4);
    assert!(settings.ignored.iter().any(|msg| msg.contains("unknown setting 'colour'")));
    assert!(settings.ignored.iter().any(|msg| msg.contains("APP__WHEEL_SIZE")));

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn unparseable_file_is_reported() {
    let path = temp_settings_file("this is = = not toml");
    let settings = load_settings_from(&path, no_env);

    assert_eq!(settings.ignored.len(), 1);
    assert!(settings.ignored[0].contains("not valid toml"));

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn validation_rejects_inconsistent_settings() {
    let mut settings = Settings::default();
    settings.min_spin_secs = 6;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.tick_interval_ms = 0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.wheel_size = 0;
    assert!(settings.validate().is_err());
}

#[test]
fn engine_config_carries_timing() {
    let mut settings = Settings::default();
    settings.tick_interval_ms = 20;
    settings.angle_step = 5.0;

    let config = settings.engine_config();

    assert_eq!(config.tick_interval, Duration::from_millis(20));
    assert_eq!(config.angle_step, 5.0);
    assert_eq!(settings.settle_deadline(), Duration::from_secs(5 + 30 + 5));
}
