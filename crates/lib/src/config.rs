//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.messenger/config.json`) and environment.
//! The SDK types take credentials directly; this file is for the CLI and webhook server.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::api::MessengerClient;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Graph API settings (page token, host, version).
    #[serde(default)]
    pub api: ApiConfig,

    /// Webhook server settings.
    #[serde(default)]
    pub webhook: WebhookConfig,
}

/// Graph API settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// Page access token. Overridden by MESSENGER_PAGE_ACCESS_TOKEN env.
    pub page_access_token: Option<String>,
    /// Graph API host (default https://graph.facebook.com).
    pub base_url: Option<String>,
    /// Graph API version path segment (default v2.8).
    pub api_version: Option<String>,
}

/// Webhook bind, port, path, and secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    /// Port for the webhook server (default 5000).
    #[serde(default = "default_webhook_port")]
    pub port: u16,

    /// Bind address (default "127.0.0.1"). Put a TLS-terminating proxy in front for the platform.
    #[serde(default = "default_webhook_bind")]
    pub bind: String,

    /// Route for subscription GET and event POST (default "/webhook").
    #[serde(default = "default_webhook_path")]
    pub path: String,

    /// Token compared against hub.verify_token. Overridden by MESSENGER_VERIFY_TOKEN env.
    pub verify_token: Option<String>,

    /// App secret for x-hub-signature. Overridden by MESSENGER_APP_SECRET env. Unset disables the check.
    pub app_secret: Option<String>,
}

fn default_webhook_port() -> u16 {
    5000
}

fn default_webhook_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_webhook_path() -> String {
    "/webhook".to_string()
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            port: default_webhook_port(),
            bind: default_webhook_bind(),
            path: default_webhook_path(),
            verify_token: None,
            app_secret: None,
        }
    }
}

/// Env var value if set and non-blank, else the trimmed config value if non-blank.
fn env_or_config(var: &str, configured: Option<&String>) -> Option<String> {
    std::env::var(var)
        .ok()
        .and_then(|s| {
            let t = s.trim();
            if t.is_empty() {
                None
            } else {
                Some(t.to_string())
            }
        })
        .or_else(|| {
            configured
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

/// Resolve the page access token: env MESSENGER_PAGE_ACCESS_TOKEN overrides config.
pub fn resolve_page_access_token(config: &Config) -> Option<String> {
    env_or_config(
        "MESSENGER_PAGE_ACCESS_TOKEN",
        config.api.page_access_token.as_ref(),
    )
}

/// Resolve the app secret: env MESSENGER_APP_SECRET overrides config.
pub fn resolve_app_secret(config: &Config) -> Option<String> {
    env_or_config("MESSENGER_APP_SECRET", config.webhook.app_secret.as_ref())
}

/// Resolve the webhook verify token: env MESSENGER_VERIFY_TOKEN overrides config.
pub fn resolve_verify_token(config: &Config) -> Option<String> {
    env_or_config("MESSENGER_VERIFY_TOKEN", config.webhook.verify_token.as_ref())
}

/// Leading slash added; empty or "/" falls back to "/webhook" (the root serves health).
pub fn normalize_webhook_path(path: &str) -> String {
    let p = path.trim().trim_end_matches('/');
    if p.is_empty() {
        default_webhook_path()
    } else if p.starts_with('/') {
        p.to_string()
    } else {
        format!("/{}", p)
    }
}

/// Build an API client from config (token, host, and version overrides).
pub fn build_client(config: &Config) -> MessengerClient {
    let mut client = MessengerClient::new(resolve_page_access_token(config));
    if let Some(base) = config.api.base_url.as_deref().filter(|s| !s.trim().is_empty()) {
        client = client.with_base_url(base.trim());
    }
    if let Some(version) = config.api.api_version.as_deref().filter(|s| !s.trim().is_empty()) {
        client = client.with_api_version(version.trim());
    }
    client
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("MESSENGER_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".messenger").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, else the default path (or MESSENGER_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_webhook_settings() {
        let w = WebhookConfig::default();
        assert_eq!(w.port, 5000);
        assert_eq!(w.bind, "127.0.0.1");
        assert_eq!(w.path, "/webhook");
        assert!(w.app_secret.is_none());
    }

    #[test]
    fn parses_camel_case_file() {
        let config: Config = serde_json::from_str(
            r#"{
                "api": { "pageAccessToken": "tok", "apiVersion": "v19.0" },
                "webhook": { "port": 8080, "verifyToken": "vt", "appSecret": "s" }
            }"#,
        )
        .unwrap();
        assert_eq!(config.api.page_access_token.as_deref(), Some("tok"));
        assert_eq!(config.webhook.port, 8080);
        assert_eq!(config.webhook.bind, "127.0.0.1");
        assert_eq!(config.webhook.verify_token.as_deref(), Some("vt"));
        assert_eq!(config.webhook.app_secret.as_deref(), Some("s"));
    }

    #[test]
    fn blank_config_values_are_none() {
        assert_eq!(env_or_config("MESSENGER_TEST_UNSET_VAR", Some(&"  ".to_string())), None);
        assert_eq!(
            env_or_config("MESSENGER_TEST_UNSET_VAR", Some(&" x ".to_string())),
            Some("x".to_string())
        );
    }

    #[test]
    fn webhook_path_normalized() {
        assert_eq!(normalize_webhook_path("webhook"), "/webhook");
        assert_eq!(normalize_webhook_path("/hooks/fb/"), "/hooks/fb");
        assert_eq!(normalize_webhook_path("/"), "/webhook");
        assert_eq!(normalize_webhook_path(""), "/webhook");
    }

    #[test]
    fn build_client_applies_overrides() {
        let mut config = Config::default();
        config.api.base_url = Some("http://127.0.0.1:9/".to_string());
        config.api.api_version = Some("v19.0".to_string());
        let client = build_client(&config);
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
        assert_eq!(client.api_version(), "v19.0");
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = std::env::temp_dir().join("messenger-config-test-missing").join("config.json");
        let (config, used) = load_config(Some(path.clone())).unwrap();
        assert_eq!(used, path);
        assert_eq!(config.webhook.port, 5000);
    }
}
