//! Job Matcher: targeted (one job, persisted) and exploratory (archetypes,
//! transient) matching.

pub mod archetypes;
pub mod handlers;
mod prompts;
pub mod service;
pub mod targeted;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ScoringConfig;
use crate::llm_client::CompletionBackend;
use crate::models::job::JobRow;

pub use archetypes::ArchetypeMatch;
pub use targeted::{ScorerBackend, TargetedMatch};

pub struct JobMatcher {
    llm: Option<Arc<dyn CompletionBackend>>,
    text_budget_chars: usize,
    archetype_jitter: f64,
    archetype_top_n: usize,
}

impl JobMatcher {
    pub fn new(llm: Option<Arc<dyn CompletionBackend>>, config: &ScoringConfig) -> Self {
        Self {
            llm,
            text_budget_chars: config.match_text_budget_chars,
            archetype_jitter: config.archetype_jitter,
            archetype_top_n: config.archetype_top_n,
        }
    }

    /// LLM first when configured, keyword scoring otherwise or on failure.
    pub async fn match_job(&self, resume_text: &str, job: &JobRow) -> TargetedMatch {
        if let Some(backend) = &self.llm {
            match targeted::llm_match(backend.as_ref(), resume_text, job, self.text_budget_chars)
                .await
            {
                Ok(m) => return m,
                Err(e) => warn!("LLM match failed for job {}, using keyword scorer: {e}", job.id),
            }
        }
        let m = targeted::keyword_match(resume_text, job);
        info!("Keyword match for job {}: {:.2}", job.id, m.match_score);
        m
    }

    pub fn recommend_with<R: rand::Rng + ?Sized>(
        &self,
        resume_text: &str,
        rng: &mut R,
    ) -> Vec<ArchetypeMatch> {
        archetypes::rank_archetypes(resume_text, self.archetype_jitter, self.archetype_top_n, rng)
    }

    /// Archetype recommendations using the thread-local rng.
    pub fn recommend(&self, resume_text: &str) -> Vec<ArchetypeMatch> {
        self.recommend_with(resume_text, &mut rand::thread_rng())
    }
}
