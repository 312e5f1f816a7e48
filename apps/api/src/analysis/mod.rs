//! Analysis Engine: tiered resume scoring that never fails the request.
//!
//! Tiers are tried in order (`llm`, `heuristic`, `mock`). A tier is skipped
//! when the text is too short for it; a tier that errors is logged and the
//! next eligible one runs. The mock tier accepts everything and cannot fail,
//! so `AnalysisEngine::analyze` is infallible.
//!
//! Every tier returns the same `ScoreCard` shape and the engine clamps it
//! before handing it out, so nothing downstream needs to know which tier ran.

pub mod candidate_name;
pub mod handlers;
pub mod heuristic;
pub mod llm_tier;
pub mod mock;
mod prompts;
pub mod service;
pub mod taxonomy;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ScoringConfig;
use crate::llm_client::{CompletionBackend, LlmError};

pub const MAX_SUB_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Llm,
    Heuristic,
    Mock,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Llm => "llm",
            Tier::Heuristic => "heuristic",
            Tier::Mock => "mock",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized output of every tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub tier: Tier,
    pub score_overall: f64,
    pub score_format: f64,
    pub score_skills: f64,
    pub score_experience: f64,
    pub strengths: String,
    pub weaknesses: String,
    pub suggestions: String,
    pub candidate_name: Option<String>,
}

impl ScoreCard {
    /// Forces every sub-score into [0, 10]. Non-finite values become 0.
    pub fn clamped(mut self) -> Self {
        self.score_overall = clamp_score(self.score_overall, MAX_SUB_SCORE);
        self.score_format = clamp_score(self.score_format, MAX_SUB_SCORE);
        self.score_skills = clamp_score(self.score_skills, MAX_SUB_SCORE);
        self.score_experience = clamp_score(self.score_experience, MAX_SUB_SCORE);
        self
    }
}

/// Clamps into [0, max], mapping NaN and infinities to 0.
pub fn clamp_score(value: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, max)
    } else {
        0.0
    }
}

/// Character count of the trimmed text; tier eligibility is based on this.
pub fn text_len(text: &str) -> usize {
    text.trim().chars().count()
}

#[derive(Debug, Error)]
pub enum TierError {
    #[error("language model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("tier rejected the response: {0}")]
    Rejected(String),
}

/// One scoring strategy in the fallback chain.
#[async_trait]
pub trait ScoringTier: Send + Sync {
    fn tier(&self) -> Tier;

    /// Whether this tier should be attempted for `text`.
    fn accepts(&self, text: &str) -> bool;

    async fn score(&self, text: &str) -> Result<ScoreCard, TierError>;
}

pub struct AnalysisEngine {
    tiers: Vec<Box<dyn ScoringTier>>,
}

impl AnalysisEngine {
    pub fn new(tiers: Vec<Box<dyn ScoringTier>>) -> Self {
        Self { tiers }
    }

    /// Builds the standard chain. The LLM tier is only included when a backend is configured.
    pub fn from_config(llm: Option<Arc<dyn CompletionBackend>>, config: &ScoringConfig) -> Self {
        let mut tiers: Vec<Box<dyn ScoringTier>> = Vec::with_capacity(3);
        if let Some(backend) = llm {
            tiers.push(Box::new(llm_tier::LlmTier::new(backend, config)));
        }
        tiers.push(Box::new(heuristic::HeuristicTier::new(
            config.heuristic.clone(),
            config.heuristic_min_text_chars,
        )));
        tiers.push(Box::new(mock::MockTier));
        Self::new(tiers)
    }

    /// First eligible tier to succeed wins.
    pub async fn analyze(&self, text: &str) -> ScoreCard {
        let len = text_len(text);
        for tier in &self.tiers {
            if !tier.accepts(text) {
                continue;
            }
            match tier.score(text).await {
                Ok(card) => {
                    info!("Scored resume text ({len} chars) with {} tier", tier.tier());
                    return card.clamped();
                }
                Err(e) => {
                    warn!("{} tier failed, falling back: {e}", tier.tier());
                }
            }
        }
        mock::mock_card()
    }
}
