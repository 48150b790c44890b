//! Process configuration, read once at startup from a JSON file.

use std::{fs, net::SocketAddr, path::Path};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub jwt: JwtConfig,
    pub user: UserConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub chat: ChatConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserConfig {
    /// Prefixed to every user id before hashing it into a handle.
    pub salt: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://chat.db?mode=rwc".to_owned(),
            max_connections: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub title: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub cors_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 12041)),
            cors_origin: None,
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> anyhow::Result<Config> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Config> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&json).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Loads from `CONFIG_PATH` (or `config.json`), letting `DATABASE_URL` override the
    /// database url. Both may come from a `.env` file.
    pub fn from_env() -> anyhow::Result<Config> {
        let path = dotenv::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
        let mut config = Self::load(path)?;
        if let Ok(url) = dotenv::var("DATABASE_URL") {
            config.database.url = url;
        }
        Ok(config)
    }
}
