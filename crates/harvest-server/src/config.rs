use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use harvest_chat::{ChatConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Placeholder JWT secret used when none is configured. Fine for local
/// development only.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

/// Longest accepted session, one year.
pub const MAX_SESSION_HOURS: i64 = 8760;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub template_dir: PathBuf,
    pub static_dir: PathBuf,
    pub jwt_secret: String,
    pub session_hours: i64,
    pub chat: ChatConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests don't have to touch
    /// the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let jwt_secret = var("HARVEST_JWT_SECRET", DEV_JWT_SECRET);
        if jwt_secret == DEV_JWT_SECRET {
            warn!("HARVEST_JWT_SECRET is unset; using the development placeholder");
        }

        let session_hours = parse(&lookup, "HARVEST_SESSION_HOURS", 24)?;
        if !(1..=MAX_SESSION_HOURS).contains(&session_hours) {
            anyhow::bail!(
                "invalid value for HARVEST_SESSION_HOURS: {} (expected 1..={})",
                session_hours,
                MAX_SESSION_HOURS
            );
        }

        let api_key = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty());

        Ok(Self {
            host: var("HARVEST_HOST", "0.0.0.0"),
            port: parse(&lookup, "HARVEST_PORT", 5000)?,
            db_path: var("HARVEST_DB_PATH", "harvest.db").into(),
            template_dir: var("HARVEST_TEMPLATE_DIR", "templates").into(),
            static_dir: var("HARVEST_STATIC_DIR", "static").into(),
            jwt_secret,
            session_hours,
            chat: ChatConfig {
                api_key,
                model: var("HARVEST_CHAT_MODEL", DEFAULT_MODEL),
                base_url: var("HARVEST_CHAT_BASE_URL", DEFAULT_BASE_URL),
                timeout: Duration::from_secs(parse(&lookup, "HARVEST_CHAT_TIMEOUT_SECS", 30)?),
            },
        })
    }
}

fn parse<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
