use std::env;
use std::io::Write;

use holdem_engine::config::{
    TableConfig, BIG_BLIND_ENV, CONFIG_ENV, SEED_ENV, SMALL_BLIND_ENV,
};
use holdem_engine::errors::ConfigError;
use serial_test::serial;
use tempfile::NamedTempFile;

fn clear_env() {
    for key in [CONFIG_ENV, SEED_ENV, SMALL_BLIND_ENV, BIG_BLIND_ENV] {
        env::remove_var(key);
    }
}

#[test]
fn defaults_are_valid() {
    let cfg = TableConfig::default();
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.blinds().to_string(), "10/20");
}

#[test]
fn toml_overrides_only_present_keys() {
    let cfg = TableConfig::from_toml_str("seats = 6\nbig_blind = 50\nseed = 99\n").unwrap();
    assert_eq!(cfg.seats, 6);
    assert_eq!(cfg.small_blind, 10);
    assert_eq!(cfg.big_blind, 50);
    assert_eq!(cfg.seed, Some(99));
}

#[test]
fn invalid_values_are_rejected() {
    for doc in [
        "seats = 1",
        "seats = 23",
        "small_blind = 0",
        "small_blind = 30\nbig_blind = 20",
    ] {
        assert!(
            matches!(TableConfig::from_toml_str(doc), Err(ConfigError::Invalid(_))),
            "{doc}"
        );
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(
        TableConfig::from_toml_str("seats = \"many\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn reads_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "seats = 4\nsmall_blind = 25\nbig_blind = 50").unwrap();
    let cfg = TableConfig::from_file(file.path()).unwrap();
    assert_eq!((cfg.seats, cfg.small_blind, cfg.big_blind), (4, 25, 50));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = TableConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
#[serial]
fn load_without_environment_gives_defaults() {
    clear_env();
    assert_eq!(TableConfig::load().unwrap(), TableConfig::default());
}

#[test]
#[serial]
fn environment_overrides_file() {
    clear_env();
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "seats = 6\nsmall_blind = 5\nbig_blind = 10\nseed = 1").unwrap();
    env::set_var(CONFIG_ENV, file.path());
    env::set_var(SEED_ENV, "42");
    env::set_var(BIG_BLIND_ENV, "40");

    let cfg = TableConfig::load().unwrap();
    clear_env();

    assert_eq!(cfg.seats, 6);
    assert_eq!(cfg.small_blind, 5);
    assert_eq!(cfg.big_blind, 40);
    assert_eq!(cfg.seed, Some(42));
}

#[test]
#[serial]
fn bad_environment_value_is_invalid() {
    clear_env();
    env::set_var(SMALL_BLIND_ENV, "lots");
    let result = TableConfig::load();
    clear_env();
    assert!(matches!(result, Err(ConfigError::Invalid(_))));
}
