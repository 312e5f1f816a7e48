use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::ScoreCard;

/// One append-only row in `resume_scores`. The current analysis is the newest.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    /// "llm" | "heuristic" | "mock"
    pub tier: String,
    pub score_overall: f64,
    pub score_format: f64,
    pub score_skills: f64,
    pub score_experience: f64,
    pub strengths: String,
    pub weaknesses: String,
    pub suggestions: String,
    pub candidate_name: Option<String>,
    pub evaluated_at: DateTime<Utc>,
}

impl AnalysisRow {
    pub fn from_card(resume_id: Uuid, card: ScoreCard) -> Self {
        Self {
            id: Uuid::new_v4(),
            resume_id,
            tier: card.tier.as_str().to_string(),
            score_overall: card.score_overall,
            score_format: card.score_format,
            score_skills: card.score_skills,
            score_experience: card.score_experience,
            strengths: card.strengths,
            weaknesses: card.weaknesses,
            suggestions: card.suggestions,
            candidate_name: card.candidate_name,
            evaluated_at: Utc::now(),
        }
    }
}
