//! Targeted match: one resume against one job.
//!
//! Uses the language model when one is configured. Without one, or when the
//! single call fails, a keyword scorer compares the job's listed skills (plus
//! any taxonomy terms in its title and description) against the resume.

use serde::{Deserialize, Serialize};

use super::prompts::{MATCH_PROMPT_TEMPLATE, MATCH_SYSTEM};
use crate::analysis::clamp_score;
use crate::analysis::taxonomy::{contains_term, matched_terms, SKILL_TERMS};
use crate::llm_client::prompts::SECOND_PERSON_INSTRUCTION;
use crate::llm_client::{call_json, truncate_chars, CompletionBackend, LlmError};
use crate::models::job::JobRow;

/// Missing skills listed in the keyword summary.
const GAPS_NAMED: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScorerBackend {
    Llm,
    Keyword,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetedMatch {
    pub match_score: f64,
    pub match_summary: String,
    pub scorer_backend: ScorerBackend,
}

#[derive(Debug, Deserialize)]
struct LlmMatch {
    match_score: f64,
    match_summary: String,
}

/// Single model call. Any failure, including a blank summary, is returned for
/// the caller to degrade on.
pub async fn llm_match(
    backend: &dyn CompletionBackend,
    resume_text: &str,
    job: &JobRow,
    budget_chars: usize,
) -> Result<TargetedMatch, LlmError> {
    let prompt = MATCH_PROMPT_TEMPLATE
        .replace("{job_title}", &job.title)
        .replace("{job_description}", job.description.as_deref().unwrap_or(""))
        .replace("{job_skills}", job.skills.as_deref().unwrap_or(""))
        .replace("{second_person}", SECOND_PERSON_INSTRUCTION.trim())
        .replace("{resume_text}", truncate_chars(resume_text, budget_chars));

    let reply: LlmMatch = call_json(backend, &prompt, MATCH_SYSTEM).await?;
    if reply.match_summary.trim().is_empty() {
        return Err(LlmError::EmptyContent);
    }

    Ok(TargetedMatch {
        match_score: clamp_score(reply.match_score, 1.0),
        match_summary: reply.match_summary,
        scorer_backend: ScorerBackend::Llm,
    })
}

/// Terms the job asks for: its skills list plus taxonomy skills named in the posting.
fn job_terms(job: &JobRow) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    let mut push = |term: &str| {
        let term = term.trim().to_lowercase();
        if !term.is_empty() && !terms.contains(&term) {
            terms.push(term);
        }
    };

    if let Some(skills) = &job.skills {
        skills.split(&[',', ';', '\n'][..]).for_each(&mut push);
    }
    let posting = format!(
        "{} {}",
        job.title,
        job.description.as_deref().unwrap_or_default()
    )
    .to_lowercase();
    matched_terms(&posting, SKILL_TERMS)
        .into_iter()
        .for_each(&mut push);

    terms
}

/// Deterministic lexical fallback.
pub fn keyword_match(resume_text: &str, job: &JobRow) -> TargetedMatch {
    let terms = job_terms(job);
    if terms.is_empty() {
        return TargetedMatch {
            match_score: 0.0,
            match_summary: format!(
                "The {} posting lists no specific skills, so there was nothing to compare your \
                 resume against.",
                job.title
            ),
            scorer_backend: ScorerBackend::Keyword,
        };
    }

    let resume = resume_text.to_lowercase();
    let (found, missing): (Vec<&String>, Vec<&String>) =
        terms.iter().partition(|t| contains_term(&resume, t));
    let score = clamp_score(found.len() as f64 / terms.len() as f64, 1.0);

    let mut summary = format!(
        "You match {} of {} skills the {} role asks for",
        found.len(),
        terms.len(),
        job.title
    );
    if found.is_empty() {
        summary.push('.');
    } else {
        summary.push_str(&format!(": {}.", join_terms(&found, usize::MAX)));
    }
    if !missing.is_empty() {
        summary.push_str(&format!(
            " Consider highlighting experience with {}.",
            join_terms(&missing, GAPS_NAMED)
        ));
    }

    TargetedMatch {
        match_score: score,
        match_summary: summary,
        scorer_backend: ScorerBackend::Keyword,
    }
}

fn join_terms(terms: &[&String], limit: usize) -> String {
    terms
        .iter()
        .take(limit)
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
