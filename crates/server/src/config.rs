use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use storage::PoolSettings;
use tracing::warn;

pub const CONFIG_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub static_dir: PathBuf,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            database_url: "sqlite://./data/menu.db".into(),
            static_dir: PathBuf::from("./frontend"),
            max_connections: 10,
            acquire_timeout_secs: 10,
            idle_timeout_secs: 30,
        }
    }
}

impl Settings {
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            max_connections: self.max_connections.max(1),
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
        }
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(CONFIG_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then `config_path` if it exists, then environment variables.
/// For each setting the `APP__` variable wins over the short legacy name.
pub fn load_settings_from(config_path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        match toml::from_str::<HashMap<String, toml::Value>>(&raw) {
            Ok(file_cfg) => apply(&mut settings, |key| file_value(&file_cfg, key)),
            Err(error) => warn!(
                path = %config_path.display(),
                %error,
                "ignoring unreadable config file"
            ),
        }
    }

    apply(&mut settings, |key| {
        let (app_key, legacy_key) = env_keys(key);
        env(app_key).or_else(|| legacy_key.and_then(&env))
    });

    settings
}

fn apply(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("bind_addr") {
        settings.server_bind = v;
    }
    if let Some(v) = lookup("database_url") {
        settings.database_url = v;
    }
    if let Some(v) = lookup("static_dir") {
        settings.static_dir = PathBuf::from(v);
    }
    if let Some(parsed) = lookup("max_connections").and_then(|v| v.trim().parse().ok()) {
        settings.max_connections = parsed;
    }
    if let Some(parsed) = lookup("acquire_timeout_secs").and_then(|v| v.trim().parse().ok()) {
        settings.acquire_timeout_secs = parsed;
    }
    if let Some(parsed) = lookup("idle_timeout_secs").and_then(|v| v.trim().parse().ok()) {
        settings.idle_timeout_secs = parsed;
    }
}

fn env_keys(key: &str) -> (&'static str, Option<&'static str>) {
    match key {
        "bind_addr" => ("APP__BIND_ADDR", Some("SERVER_BIND")),
        "database_url" => ("APP__DATABASE_URL", Some("DATABASE_URL")),
        "static_dir" => ("APP__STATIC_DIR", Some("STATIC_DIR")),
        "max_connections" => ("APP__MAX_CONNECTIONS", None),
        "acquire_timeout_secs" => ("APP__ACQUIRE_TIMEOUT_SECS", None),
        _ => ("APP__IDLE_TIMEOUT_SECS", None),
    }
}

fn file_value(file_cfg: &HashMap<String, toml::Value>, key: &str) -> Option<String> {
    match file_cfg.get(key)? {
        toml::Value::String(v) => Some(v.clone()),
        toml::Value::Integer(v) => Some(v.to_string()),
        _ => None,
    }
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url.starts_with("sqlite::memory:") || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
