use anyhow::{Result, anyhow};
use config::{Config, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub database: Database,
    pub http: Http,
    pub log: Log,
    pub password: Password,
    pub user: User,
}

#[derive(Deserialize)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

// The connection string usually embeds credentials.
impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_ms", &self.acquire_timeout_ms)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
    pub port: u16,
    pub cert_path: Option<String>,
    pub key_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Password {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Deserialize)]
pub struct User {
    pub backend: String, // "postgres" or "memory"
    pub request_timeout_ms: u64,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Environment variables that override keys from the settings file.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("APP_PORT", "http.port"),
    ("CONNECTION_STRING", "database.url"),
];

pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    parse_settings_with_env(path, |name| std::env::var(name).ok())
}

pub fn parse_settings_with_env<E>(path: Option<&str>, env: E) -> Result<Settings>
where
    E: Fn(&str) -> Option<String>,
{
    let path = path.unwrap_or(SETTINGS_PATH);

    let mut builder = Config::builder().add_source(File::with_name(path));
    for &(var, key) in ENV_OVERRIDES {
        builder = builder
            .set_override_option(key, env(var))
            .map_err(|e| anyhow!(e))?;
    }

    let settings: Settings = builder
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
