use anyhow::{bail, Context, Result};

use crate::affinity::weights::ScoreMode;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Trailing window size N: both the recompute cadence (every Nth
    /// interaction) and the number of recent interactions scored. The
    /// upstream call sites disagreed on this value, so it is injectable;
    /// default 7.
    pub recompute_window: u32,
    /// How per-action weights combine into one raw tag score. Default: sum.
    pub score_mode: ScoreMode,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let recompute_window = match std::env::var("RECOMPUTE_WINDOW") {
            Ok(v) => {
                let n: u32 = v
                    .parse()
                    .context("RECOMPUTE_WINDOW must be a positive integer")?;
                if n == 0 {
                    bail!("RECOMPUTE_WINDOW must be a positive integer");
                }
                n
            }
            Err(_) => 7,
        };

        let score_mode = match std::env::var("SCORE_MODE") {
            Ok(v) => v.parse::<ScoreMode>().map_err(anyhow::Error::msg)?,
            Err(_) => ScoreMode::Sum,
        };

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            recompute_window,
            score_mode,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
