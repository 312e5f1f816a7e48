use async_trait::async_trait;

use super::candidate_name::CANDIDATE_PLACEHOLDER;
use super::{ScoreCard, ScoringTier, Tier, TierError};

/// Last resort in the chain. Accepts any text and always succeeds.
pub struct MockTier;

/// Fixed mid-range card returned when nothing better is available.
pub fn mock_card() -> ScoreCard {
    ScoreCard {
        tier: Tier::Mock,
        score_overall: 5.5,
        score_format: 6.0,
        score_skills: 5.0,
        score_experience: 5.5,
        strengths: "Your resume was received and is ready for a closer review.".to_string(),
        weaknesses: "We could not read enough of your resume to assess it in detail."
            .to_string(),
        suggestions: "Upload a text-based PDF or DOCX so your skills and experience can be \
                      evaluated."
            .to_string(),
        candidate_name: Some(CANDIDATE_PLACEHOLDER.to_string()),
    }
}

#[async_trait]
impl ScoringTier for MockTier {
    fn tier(&self) -> Tier {
        Tier::Mock
    }

    fn accepts(&self, _text: &str) -> bool {
        true
    }

    async fn score(&self, _text: &str) -> Result<ScoreCard, TierError> {
        Ok(mock_card())
    }
}
