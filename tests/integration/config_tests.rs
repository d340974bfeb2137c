use dupescan::config::{Config, ENV_PREFIX};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();

    assert_eq!(config.io_threads, 4);
    assert_eq!(config.block_size, 64 * 1024);
    assert!(!config.verify);
}

#[test]
fn test_config_load_from_env() {
    std::env::set_var("DUPESCAN_IO_THREADS", "16");
    std::env::set_var("DUPESCAN_STRICT", "true");

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .unwrap();

    std::env::remove_var("DUPESCAN_IO_THREADS");
    std::env::remove_var("DUPESCAN_STRICT");

    assert_eq!(config.io_threads, 16);
    assert!(config.strict);
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
io_threads = 8
block_size = 4096
verify = true
skip_hidden = true
show_timings = true
ignore_patterns = ["*.tmp", "node_modules/"]
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract()
        .unwrap();

    assert_eq!(config.io_threads, 8);
    assert_eq!(config.block_size, 4096);
    assert!(config.verify);
    assert!(config.skip_hidden);
    assert!(config.show_timings);
    assert!(!config.skip_empty);
    assert_eq!(config.ignore_patterns, vec!["*.tmp", "node_modules/"]);
}

#[test]
fn test_config_invalid_type_is_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "io_threads = \"many\"\n").unwrap();

    let result: Result<Config, _> = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract();

    assert!(result.is_err());
}

#[test]
fn test_config_save_round_trip() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("sub").join("config.toml");

    let config = Config {
        strict: true,
        ignore_patterns: vec!["target/".to_string()],
        ..Default::default()
    };
    config.save(&config_path).unwrap();

    let saved = fs::read_to_string(&config_path).unwrap();
    assert!(saved.contains("strict = true"));

    let loaded: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract()
        .unwrap();
    assert_eq!(loaded, config);
}
