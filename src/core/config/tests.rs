use super::data::{path_display, Config, FriendConfig, DEFAULT_MAX_TOKENS};
use super::io::ConfigError;
use super::orchestrator::ConfigOrchestrator;
use crate::core::personality::Personality;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn config_orchestrator_detects_external_updates() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    let orchestrator = ConfigOrchestrator::new(config_path.clone());

    orchestrator
        .mutate(|config| {
            config.default_provider = Some("claude".to_string());
            Ok(())
        })
        .expect("mutate failed");

    let persisted = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(persisted.default_provider.as_deref(), Some("claude"));

    let cached = orchestrator.load_with_cache().expect("cached load failed");
    assert_eq!(cached.default_provider.as_deref(), Some("claude"));

    std::thread::sleep(Duration::from_millis(1100));

    let external = Config {
        default_provider: Some("chatgpt".to_string()),
        ..Default::default()
    };
    external
        .save_to_path(&config_path)
        .expect("external save failed");

    let reloaded = orchestrator.load_with_cache().expect("reload failed");
    assert_eq!(reloaded.default_provider.as_deref(), Some("chatgpt"));
}

#[test]
fn missing_config_file_yields_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nonexistent_config.toml");

    let config = Config::load_from_path(&config_path).expect("Failed to load config");

    assert_eq!(config, Config::default());
    assert_eq!(config.request_timeout(), Duration::from_secs(60));
    assert_eq!(config.max_tokens(), DEFAULT_MAX_TOKENS);
    assert!((config.temperature() - 0.7).abs() < f32::EPSILON);
    assert_eq!(config.main_personality(), Ok(Personality::Default));
}

#[test]
fn friends_and_overrides_parse_from_toml() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
default_provider = "chatgpt"
personality = "wise"
request_timeout_secs = 15

[default_models]
claude = "claude-sonnet-4-20250514"

[base_urls]
ChatGPT = "http://localhost:9999/v1"

[[friends]]
name = "Alex"
personality = "funny"

[[friends]]
name = "Sam"
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&config_path).expect("load failed");
    assert_eq!(config.main_personality(), Ok(Personality::Wise));
    assert_eq!(config.request_timeout(), Duration::from_secs(15));
    assert_eq!(
        config.get_default_model("CLAUDE").map(String::as_str),
        Some("claude-sonnet-4-20250514")
    );
    assert_eq!(
        config.friends,
        vec![
            FriendConfig {
                name: "Alex".to_string(),
                personality: Some("funny".to_string()),
            },
            FriendConfig {
                name: "Sam".to_string(),
                personality: None,
            },
        ]
    );
    assert_eq!(
        config.get_base_url("chatgpt").map(String::as_str),
        Some("http://localhost:9999/v1")
    );
}

#[test]
fn zero_timeout_falls_back_to_default() {
    let config = Config {
        request_timeout_secs: Some(0),
        ..Default::default()
    };
    assert_eq!(config.request_timeout(), Duration::from_secs(60));
}

#[test]
fn unknown_personality_is_reported() {
    let config = Config {
        personality: Some("grumpy".to_string()),
        ..Default::default()
    };
    assert_eq!(config.main_personality(), Err("grumpy".to_string()));
}

#[test]
fn test_config_persistence_lifecycle() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut config = Config {
        default_provider: Some("claude".to_string()),
        ..Default::default()
    };
    config.set_default_model("ChatGPT", "gpt-4o-mini".to_string());
    config
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let mut loaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);
    assert_eq!(
        loaded.get_default_model("chatgpt").map(String::as_str),
        Some("gpt-4o-mini")
    );

    loaded.unset_default_model("CHATGPT");
    loaded.default_provider = None;
    loaded
        .save_to_path(&config_path)
        .expect("Failed to save config");

    let reloaded = Config::load_from_path(&config_path).expect("Failed to load config");
    assert!(reloaded.default_models.is_empty());
    assert_eq!(reloaded.default_provider, None);
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "default_provider = [unterminated").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().starts_with("Failed to parse config at "));
}

#[test]
#[cfg(unix)]
fn path_display_shortens_home() {
    if let Some(home) = std::env::var_os("HOME") {
        let path = std::path::PathBuf::from(home).join(".config/banter/config.toml");
        assert_eq!(path_display(&path), "~/.config/banter/config.toml");
    }
}
