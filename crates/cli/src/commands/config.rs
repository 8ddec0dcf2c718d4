use std::env;
use std::fs;
use std::path::Path;

use fyndy_core::config::{resolve_config_path, AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", &["FYNDY_SERVER_BIND_ADDRESS"]),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", &["FYNDY_SERVER_PORT", "PORT"]),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        source("server.graceful_shutdown_secs", &["FYNDY_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
    ));

    let api_key = config
        .access
        .api_key
        .as_ref()
        .map(|key| redact_key(key.expose_secret()))
        .unwrap_or_else(|| "<unset> (access control disabled)".to_string());
    lines.push(render_line("access.api_key", &api_key, source("access.api_key", &["FYNDY_API_KEY"])));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["FYNDY_LOGGING_LEVEL", "FYNDY_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["FYNDY_LOGGING_FORMAT", "FYNDY_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env_override_present(key)) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

// Mirrors the loader, which skips blank values.
fn env_override_present(key: &str) -> bool {
    env::var(key).is_ok_and(|value| !value.trim().is_empty())
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps at most the first two characters so operators can tell keys apart.
fn redact_key(key: &str) -> String {
    let visible: String = key.trim().chars().take(2).collect();
    if key.trim().chars().count() <= 4 {
        return "<redacted>".to_string();
    }
    format!("{visible}***")
}

#[cfg(test)]
mod tests {
    use super::{contains_path, redact_key};

    #[test]
    fn short_keys_are_fully_redacted() {
        assert_eq!(redact_key("abcd"), "<redacted>");
        assert_eq!(redact_key("prod-key-123"), "pr***");
    }

    #[test]
    fn nested_paths_are_resolved() {
        let doc: toml::Value = "[server]\nport = 1\n".parse().expect("toml");
        assert!(contains_path(&doc, "server.port"));
        assert!(!contains_path(&doc, "server.bind_address"));
        assert!(!contains_path(&doc, "access.api_key"));
    }
}
