use anyhow::{bail, Context, Result};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Engine binary name or path (`LATEX_ENGINE`).
    pub latex_engine: String,
    pub compile_timeout_secs: u64,
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let compile_timeout_secs = env_or("COMPILE_TIMEOUT_SECS", "60")
            .parse::<u64>()
            .context("COMPILE_TIMEOUT_SECS must be a whole number of seconds")?;
        if compile_timeout_secs == 0 {
            bail!("COMPILE_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Config {
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            latex_engine: env_or("LATEX_ENGINE", "tectonic"),
            compile_timeout_secs,
            cors_allowed_origins: parse_origins(&env_or("CORS_ALLOWED_ORIGINS", DEFAULT_CORS_ORIGINS)),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Splits a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
