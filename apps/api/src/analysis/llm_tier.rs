use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use super::candidate_name::candidate_first_name;
use super::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use super::{text_len, ScoreCard, ScoringTier, Tier, TierError};
use crate::config::ScoringConfig;
use crate::llm_client::prompts::SECOND_PERSON_INSTRUCTION;
use crate::llm_client::{call_json, truncate_chars, CompletionBackend};

/// Shape the model must return. All fields except the name are mandatory, so
/// a partial reply fails deserialization and the engine falls through.
#[derive(Debug, Deserialize)]
struct LlmAnalysis {
    score_overall: f64,
    score_format: f64,
    score_skills: f64,
    score_experience: f64,
    #[serde(default)]
    candidate_name: Option<String>,
    strengths: String,
    weaknesses: String,
    suggestions: String,
}

pub struct LlmTier {
    backend: Arc<dyn CompletionBackend>,
    min_text_chars: usize,
    text_budget_chars: usize,
}

impl LlmTier {
    pub fn new(backend: Arc<dyn CompletionBackend>, config: &ScoringConfig) -> Self {
        Self {
            backend,
            min_text_chars: config.llm_min_text_chars,
            text_budget_chars: config.llm_text_budget_chars,
        }
    }

    fn build_prompt(&self, text: &str) -> String {
        ANALYSIS_PROMPT_TEMPLATE
            .replace("{second_person}", SECOND_PERSON_INSTRUCTION.trim())
            .replace("{resume_text}", truncate_chars(text, self.text_budget_chars))
    }
}

#[async_trait]
impl ScoringTier for LlmTier {
    fn tier(&self) -> Tier {
        Tier::Llm
    }

    fn accepts(&self, text: &str) -> bool {
        text_len(text) > self.min_text_chars
    }

    async fn score(&self, text: &str) -> Result<ScoreCard, TierError> {
        let prompt = self.build_prompt(text);
        let reply: LlmAnalysis = call_json(self.backend.as_ref(), &prompt, ANALYSIS_SYSTEM).await?;

        if [&reply.strengths, &reply.weaknesses, &reply.suggestions]
            .iter()
            .any(|s| s.trim().is_empty())
        {
            return Err(TierError::Rejected("empty narrative field".to_string()));
        }

        let candidate_name = reply
            .candidate_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| candidate_first_name(text));

        Ok(ScoreCard {
            tier: Tier::Llm,
            score_overall: reply.score_overall,
            score_format: reply.score_format,
            score_skills: reply.score_skills,
            score_experience: reply.score_experience,
            strengths: reply.strengths,
            weaknesses: reply.weaknesses,
            suggestions: reply.suggestions,
            candidate_name: Some(candidate_name),
        })
    }
}
