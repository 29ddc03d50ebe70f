use pemit::config::load_config;
use pemit::{DEFAULT_MAX_LISTENERS, EmitterConfig, PemitError};
use serial_test::serial;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Config file path for the child test run. Must not start with `PEMIT__`.
const CHILD_CONFIG_FILE: &str = "EMITTER_TEST_CONFIG_FILE";

fn write(dir: &TempDir, file: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(file);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
#[serial]
fn test_load_emitter_config_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "emitter.toml", "name = \"orders\"\nmax_listeners = 3\n");

    let config: EmitterConfig = load_config(Some(&path)).unwrap();

    assert_eq!(config.name, "orders");
    assert_eq!(config.max_listeners, Some(3));
}

#[test]
#[serial]
fn test_missing_fields_fall_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "emitter.toml", "name = \"audit\"\n");

    let config: EmitterConfig = load_config(Some(&path)).unwrap();

    assert_eq!(config.name, "audit");
    assert_eq!(config.max_listeners, Some(DEFAULT_MAX_LISTENERS));
}

#[test]
#[serial]
fn test_extension_may_be_omitted() {
    let dir = TempDir::new().unwrap();
    write(&dir, "emitter.json", r#"{ "name": "json", "max_listeners": 1 }"#);

    let config: EmitterConfig = load_config(Some(dir.path().join("emitter"))).unwrap();

    assert_eq!(config.name, "json");
    assert_eq!(config.max_listeners, Some(1));
}

#[test]
#[serial]
fn test_default_path_is_resolved_from_working_directory() {
    let dir = TempDir::new().unwrap();
    write(&dir, "pemit.toml", "name = \"cwd\"\n");
    let previous = std::env::current_dir().unwrap();

    std::env::set_current_dir(dir.path()).unwrap();
    let loaded = load_config::<EmitterConfig>(None::<&Path>);
    std::env::set_current_dir(previous).unwrap();

    assert_eq!(loaded.unwrap().name, "cwd");
}

#[test]
#[serial]
fn test_environment_overrides_file_values() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "emitter.toml", "name = \"file\"\nmax_listeners = 3\n");

    let output = Command::new(std::env::current_exe().unwrap())
        .args(["--exact", "environment_layer_in_child_process", "--ignored", "--test-threads=1"])
        .env("PEMIT__NAME", "env")
        .env("PEMIT__MAX_LISTENERS", "25")
        .env(CHILD_CONFIG_FILE, &path)
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "{stdout}{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("1 passed"), "{stdout}");
}

#[test]
#[ignore = "spawned by test_environment_overrides_file_values with PEMIT__ variables set"]
fn environment_layer_in_child_process() {
    let Ok(path) = std::env::var(CHILD_CONFIG_FILE) else {
        return;
    };

    let config: EmitterConfig = load_config(Some(path)).unwrap();

    assert_eq!(config.name, "env");
    assert_eq!(config.max_listeners, Some(25));
}

#[test]
#[serial]
fn test_missing_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();

    let err = load_config::<EmitterConfig>(Some(dir.path().join("absent.toml"))).unwrap_err();

    assert!(matches!(err, PemitError::Config { context: Some(_), .. }));
    assert!(err.to_string().contains("Failed to build config"));
}

#[test]
#[serial]
fn test_mismatched_types_fail_deserialization() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "emitter.toml", "max_listeners = \"many\"\n");

    let err = load_config::<EmitterConfig>(Some(&path)).unwrap_err();

    assert!(err.to_string().contains("Failed to deserialize config"));
}
