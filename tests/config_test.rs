use conductor_rs::config::{Config, DEFAULT_SERVER_URL};
use conductor_rs::config::secrets::ExposeSecret;
use conductor_rs::engine::EngineConfig;
use conductor_rs::error::Error;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

fn config_from(vars: &[(&str, &str)]) -> Result<Config, Error> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|name| vars.get(name).cloned())
}

#[test]
fn empty_environment_uses_defaults() {
    let config = config_from(&[]).unwrap();
    assert_eq!(config.mcp_server_url, DEFAULT_SERVER_URL);
    assert_eq!(config.target_file, "fibonacci.py");
    assert!(config.default_repo_url.is_none());
    assert!(config.anthropic_api_key.is_none());
    assert!(config.teams_webhook_url.is_none());
    assert_eq!(config.http_timeout, Duration::from_secs(30));
    assert_eq!(config.git_timeout, Duration::from_secs(300));
    assert_eq!(config.log_level, "info");
    assert!(config.workspace_root.ends_with("mcp_workspace"));
}

#[test]
fn overrides_are_applied() {
    let config = config_from(&[
        ("MCP_SERVER_URL", "http://tools.internal:9000/"),
        ("DEFAULT_REPO_URL", "https://github.com/octo/widgets.git"),
        ("WORKSPACE_ROOT", "/var/tmp/ws"),
        ("CODE_TARGET_FILE", "src/generated.rs"),
        ("ANTHROPIC_API_KEY", "sk-ant-test"),
        ("HTTP_TIMEOUT_SECS", "5"),
        ("GIT_AUTHOR_NAME", "Conductor Bot"),
    ])
    .unwrap();

    assert_eq!(config.mcp_server_url, "http://tools.internal:9000");
    assert_eq!(config.workspace_root, PathBuf::from("/var/tmp/ws"));
    assert_eq!(config.target_file, "src/generated.rs");
    assert_eq!(
        config.anthropic_api_key.as_ref().unwrap().expose_secret(),
        "sk-ant-test"
    );
    assert_eq!(config.http_timeout, Duration::from_secs(5));
    assert_eq!(config.git_author_name.as_deref(), Some("Conductor Bot"));

    let engine = EngineConfig::from(&config);
    assert_eq!(engine.workspace_root, PathBuf::from("/var/tmp/ws"));
    assert_eq!(
        engine.default_repo_url.as_deref(),
        Some("https://github.com/octo/widgets.git")
    );
}

#[test]
fn placeholder_secrets_count_as_unset() {
    let config = config_from(&[
        ("ANTHROPIC_API_KEY", "YOUR_ANTHROPIC_API_KEY"),
        ("TEAMS_WEBHOOK_URL", "YOUR_TEAMS_WEBHOOK_URL"),
        ("DEFAULT_REPO_URL", "  "),
    ])
    .unwrap();
    assert!(config.anthropic_api_key.is_none());
    assert!(config.teams_webhook_url.is_none());
    assert!(config.default_repo_url.is_none());
}

#[test]
fn malformed_timeout_is_a_config_error() {
    let err = config_from(&[("GIT_TIMEOUT_SECS", "five minutes")]).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
    assert!(err.to_string().contains("GIT_TIMEOUT_SECS"));
}

#[test]
fn secrets_are_redacted_in_debug_output() {
    let config = config_from(&[("TEAMS_WEBHOOK_URL", "https://hooks.example.com/secret-token")]).unwrap();
    let debug = format!("{config:?}");
    assert!(!debug.contains("secret-token"));
}
