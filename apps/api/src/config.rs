use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::resume::policy::{EmptyContentPolicy, ResumePolicy};

/// Application configuration loaded from environment variables.
/// Nothing is required: without `ANTHROPIC_API_KEY` every resume uses the template.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub generation_timeout: Duration,
    pub one_page_char_limit: usize,
    pub policy: ResumePolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mut policy = ResumePolicy::default();
        policy.bounds.max_projects = parse_env("RESUME_MAX_PROJECTS", policy.bounds.max_projects)?;
        policy.bounds.max_internships =
            parse_env("RESUME_MAX_INTERNSHIPS", policy.bounds.max_internships)?;
        policy.bounds.max_languages = parse_env("RESUME_MAX_SKILLS", policy.bounds.max_languages)?;
        if parse_env("RESUME_REJECT_EMPTY_CONTENT", false)? {
            policy.empty_content = EmptyContentPolicy::Reject;
        }
        policy
            .bounds
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid resume policy: {e}"))?;

        Ok(Config {
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            generation_timeout: Duration::from_secs(parse_env("GENERATION_TIMEOUT_SECS", 30)?),
            one_page_char_limit: parse_env("ONE_PAGE_CHAR_LIMIT", 3500)?,
            policy,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
