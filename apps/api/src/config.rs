use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
///
/// Nothing here is strictly required: a missing API key or compiler puts the
/// service into its degraded modes instead of refusing to start.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Explicit compiler binary. `None` means auto-detect at startup.
    pub pdflatex_path: Option<PathBuf>,
    /// Repair budget for the compile-repair loop.
    pub max_repair_attempts: u32,
    pub compile_timeout: Duration,
    pub max_concurrent_compiles: usize,
    pub llm_timeout: Duration,
    pub suggestion_timeout: Duration,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            pdflatex_path: optional_env("PDFLATEX_PATH").map(PathBuf::from),
            max_repair_attempts: parse_env("LATEX_MAX_REPAIR_ATTEMPTS", 3)?,
            compile_timeout: Duration::from_secs(parse_env("LATEX_COMPILE_TIMEOUT_SECS", 60)?),
            max_concurrent_compiles: parse_env("LATEX_MAX_CONCURRENT_COMPILES", 4)?,
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 60)?),
            suggestion_timeout: Duration::from_secs(parse_env("SUGGESTION_TIMEOUT_SECS", 30)?),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }

    pub fn llm_configured(&self) -> bool {
        self.anthropic_api_key.is_some()
    }
}

/// Reads a variable, treating empty or whitespace-only values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}
