use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use super::ScorerBackend;
use crate::analysis::service::extract_resume_text;
use crate::analysis::text_len;
use crate::errors::AppError;
use crate::models::job::JobMatchRow;
use crate::resumes::load_owned_resume;
use crate::state::AppState;

/// Below this there is nothing meaningful to compare.
pub const MIN_MATCH_TEXT_CHARS: usize = 20;

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub job_match: JobMatchRow,
    pub scorer_backend: ScorerBackend,
}

/// Scores the resume against one job and upserts the (resume, job) row.
/// Uses the text cached by the last analyze call when there is one.
pub async fn match_resume_to_job(
    state: &AppState,
    caller: Uuid,
    resume_id: Uuid,
    job_id: Uuid,
) -> Result<MatchResponse, AppError> {
    let resume = load_owned_resume(state.repo.as_ref(), resume_id, caller).await?;
    let job = state
        .repo
        .get_job(job_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;

    let text = match resume.extracted_text.as_deref() {
        Some(cached) if !cached.trim().is_empty() => cached.to_string(),
        _ => extract_resume_text(state, &resume).await?,
    };
    if text_len(&text) < MIN_MATCH_TEXT_CHARS {
        return Err(AppError::Validation(
            "Not enough readable text in the resume to match against a job".to_string(),
        ));
    }

    let result = state.matcher.match_job(&text, &job).await;
    let row = JobMatchRow {
        id: Uuid::new_v4(),
        resume_id: resume.id,
        job_id: job.id,
        match_score: result.match_score,
        match_summary: result.match_summary,
        matched_at: Utc::now(),
    };
    let stored = state.repo.upsert_match(&row).await?;

    info!(
        "Matched resume {resume_id} to job {job_id}: {:.2} ({:?})",
        stored.match_score, result.scorer_backend
    );
    Ok(MatchResponse {
        job_match: stored,
        scorer_backend: result.scorer_backend,
    })
}
