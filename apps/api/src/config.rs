use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::analysis::heuristic::HeuristicConfig;

/// Application configuration loaded from environment variables.
/// Only `DATABASE_URL` is required; storage and LLM backends are optional.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub s3_bucket: Option<String>,
    pub s3_endpoint: Option<String>,
    pub s3_region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub local_upload_dir: String,
    pub anthropic_api_key: Option<String>,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub scoring: ScoringConfig,
    pub port: u16,
    pub rust_log: String,
}

/// Tuning constants for tier selection, truncation and archetype matching.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Text must be longer than this (chars) for the LLM tier to be attempted.
    pub llm_min_text_chars: usize,
    /// Text must be longer than this (chars) for the heuristic tier.
    pub heuristic_min_text_chars: usize,
    pub llm_text_budget_chars: usize,
    pub match_text_budget_chars: usize,
    pub pdf_max_pages: usize,
    pub heuristic: HeuristicConfig,
    /// Half-width of the uniform perturbation added to archetype scores.
    pub archetype_jitter: f64,
    pub archetype_top_n: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            llm_min_text_chars: 100,
            heuristic_min_text_chars: 50,
            llm_text_budget_chars: 6000,
            match_text_budget_chars: 3000,
            pdf_max_pages: 3,
            heuristic: HeuristicConfig::default(),
            archetype_jitter: 0.05,
            archetype_top_n: 3,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            db_max_connections: parse_env("DB_MAX_CONNECTIONS", 10)?,
            s3_bucket: optional_env("S3_BUCKET"),
            s3_endpoint: optional_env("S3_ENDPOINT"),
            s3_region: optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
            aws_access_key_id: optional_env("AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: optional_env("AWS_SECRET_ACCESS_KEY"),
            local_upload_dir: optional_env("LOCAL_UPLOAD_DIR")
                .unwrap_or_else(|| "./uploads/resumes".to_string()),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            llm_model: optional_env("LLM_MODEL")
                .unwrap_or_else(|| crate::llm_client::DEFAULT_MODEL.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 30)?,
            scoring: ScoringConfig::from_env()?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// True when bucket and credentials are all present.
    pub fn remote_storage_configured(&self) -> bool {
        self.s3_bucket.is_some()
            && self.aws_access_key_id.is_some()
            && self.aws_secret_access_key.is_some()
    }

    pub fn llm_configured(&self) -> bool {
        self.anthropic_api_key.is_some()
    }

    /// Local-only storage, no model, default scoring.
    #[cfg(test)]
    pub fn for_tests(upload_dir: &str) -> Self {
        Config {
            database_url: "postgres://localhost/resume_intel_test".to_string(),
            db_max_connections: 1,
            s3_bucket: None,
            s3_endpoint: None,
            s3_region: "us-east-1".to_string(),
            aws_access_key_id: None,
            aws_secret_access_key: None,
            local_upload_dir: upload_dir.to_string(),
            anthropic_api_key: None,
            llm_model: crate::llm_client::DEFAULT_MODEL.to_string(),
            llm_timeout_secs: 30,
            scoring: ScoringConfig::default(),
            port: 0,
            rust_log: "info".to_string(),
        }
    }
}

impl ScoringConfig {
    fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let mut heuristic = defaults.heuristic.clone();
        if let Some(raw) = optional_env("HEURISTIC_WEIGHTS") {
            let (skills, experience, format) = parse_weights(&raw)?;
            heuristic.weight_skills = skills;
            heuristic.weight_experience = experience;
            heuristic.weight_format = format;
        }

        Ok(Self {
            llm_min_text_chars: parse_env("LLM_MIN_TEXT_CHARS", defaults.llm_min_text_chars)?,
            heuristic_min_text_chars: parse_env(
                "HEURISTIC_MIN_TEXT_CHARS",
                defaults.heuristic_min_text_chars,
            )?,
            llm_text_budget_chars: parse_env(
                "LLM_TEXT_BUDGET_CHARS",
                defaults.llm_text_budget_chars,
            )?,
            match_text_budget_chars: parse_env(
                "MATCH_TEXT_BUDGET_CHARS",
                defaults.match_text_budget_chars,
            )?,
            pdf_max_pages: parse_env("PDF_MAX_PAGES", defaults.pdf_max_pages)?,
            heuristic,
            archetype_jitter: parse_env("ARCHETYPE_JITTER", defaults.archetype_jitter)?,
            archetype_top_n: parse_env("ARCHETYPE_TOP_N", defaults.archetype_top_n)?,
        })
    }
}

/// Parses `"skills,experience,format"` weights, e.g. `"0.4,0.4,0.2"`.
fn parse_weights(raw: &str) -> Result<(f64, f64, f64)> {
    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("HEURISTIC_WEIGHTS must be three numbers, got '{raw}'"))?;
    match parts.as_slice() {
        [s, e, f] => Ok((*s, *e, *f)),
        _ => bail!("HEURISTIC_WEIGHTS must be three numbers, got '{raw}'"),
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats unset and blank variables the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: FromStr>(key: &str, default: T) -> Result<T> {
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
