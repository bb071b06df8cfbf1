use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    /// JSON file at `session_store_path`; survives restarts.
    File,
    /// Process memory; every restart starts signed out.
    Memory,
}

impl FromStr for SessionBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(SessionBackend::File),
            "memory" => Ok(SessionBackend::Memory),
            other => anyhow::bail!("unknown session backend '{other}' (expected file|memory)"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub session_backend: SessionBackend,
    /// Durable key/value file holding the persisted session record.
    pub session_store_path: PathBuf,
    /// Key of the session record inside the store.
    pub session_key: String,
    /// Lifetime of sessions created without "remember me".
    pub session_ttl_hours: i64,
    /// How long simulated analysis tasks take.
    pub task_duration_ms: u64,
    /// How long finished tasks stay readable before they are dropped.
    pub task_retention_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            session_backend: SessionBackend::File,
            session_store_path: PathBuf::from("./data/session.json"),
            session_key: "user".to_string(),
            session_ttl_hours: 24,
            task_duration_ms: 3000,
            task_retention_secs: 3600,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let session_ttl_hours: i64 = parse_env("SESSION_TTL_HOURS", defaults.session_ttl_hours)?;
        if session_ttl_hours <= 0 {
            anyhow::bail!("SESSION_TTL_HOURS must be positive, got {session_ttl_hours}");
        }

        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            session_backend: parse_env("SESSION_BACKEND", defaults.session_backend)?,
            session_store_path: std::env::var("SESSION_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_store_path),
            session_key: std::env::var("SESSION_KEY").unwrap_or(defaults.session_key),
            session_ttl_hours,
            task_duration_ms: parse_env("TASK_DURATION_MS", defaults.task_duration_ms)?,
            task_retention_secs: parse_env("TASK_RETENTION_SECS", defaults.task_retention_secs)?,
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Into<anyhow::Error>,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(Into::<anyhow::Error>::into)
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
