//! Analyze and Get-analysis: fetch → extract → score → persist → recommend.

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::Tier;
use crate::errors::AppError;
use crate::extraction::extract_text;
use crate::matching::ArchetypeMatch;
use crate::models::analysis::AnalysisRow;
use crate::models::resume::ResumeRow;
use crate::resumes::load_owned_resume;
use crate::state::AppState;
use crate::storage::file_extension;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: AnalysisRow,
    pub tier: Tier,
    pub text_extracted: bool,
    pub job_matches: Vec<ArchetypeMatch>,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub analysis: AnalysisRow,
    pub job_matches: Vec<ArchetypeMatch>,
}

/// Fetches the stored document and extracts its text. Fails on a missing
/// object or an unreadable document.
pub async fn extract_resume_text(state: &AppState, resume: &ResumeRow) -> Result<String, AppError> {
    let ext = file_extension(&resume.file_url).unwrap_or_default();
    let bytes = state.storage.fetch(&resume.file_url).await?;
    Ok(extract_text(bytes, ext, state.config.scoring.pdf_max_pages).await?)
}

/// Always produces an analysis. Fetch and extraction failures degrade to
/// empty text, which the engine scores with the mock tier; the previously
/// cached text is kept in that case.
pub async fn analyze_resume(
    state: &AppState,
    caller: Uuid,
    resume_id: Uuid,
) -> Result<AnalyzeResponse, AppError> {
    let resume = load_owned_resume(state.repo.as_ref(), resume_id, caller).await?;

    let (text, text_extracted) = match extract_resume_text(state, &resume).await {
        Ok(text) => (text, true),
        Err(e) => {
            warn!("Could not read resume {resume_id}, scoring without text: {e}");
            (String::new(), false)
        }
    };

    let card = state.engine.analyze(&text).await;
    let tier = card.tier;
    let analysis = AnalysisRow::from_card(resume.id, card);
    state
        .repo
        .record_analysis(&analysis, text_extracted.then_some(text.as_str()))
        .await?;

    info!(
        "Analyzed resume {resume_id}: tier={tier}, overall={:.1}",
        analysis.score_overall
    );

    // An unreadable document still has whatever an earlier call cached.
    let match_text = if text_extracted {
        Some(text.as_str())
    } else {
        resume.extracted_text.as_deref()
    };

    Ok(AnalyzeResponse {
        analysis,
        tier,
        text_extracted,
        job_matches: recommend_for(state, match_text),
    })
}

/// Latest stored analysis plus freshly ranked archetypes (not persisted).
pub async fn get_analysis(
    state: &AppState,
    caller: Uuid,
    resume_id: Uuid,
) -> Result<AnalysisResponse, AppError> {
    let resume = load_owned_resume(state.repo.as_ref(), resume_id, caller).await?;
    let analysis = state
        .repo
        .latest_analysis(resume.id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No analysis found for resume {resume_id}")))?;

    Ok(AnalysisResponse {
        analysis,
        job_matches: recommend_for(state, resume.extracted_text.as_deref()),
    })
}

/// Archetype ranking needs text to overlap with; without any the list is empty.
fn recommend_for(state: &AppState, text: Option<&str>) -> Vec<ArchetypeMatch> {
    match text.filter(|t| !t.trim().is_empty()) {
        Some(text) => state.matcher.recommend(text),
        None => Vec::new(),
    }
}
