use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::service::{analyze_resume, get_analysis, AnalysisResponse, AnalyzeResponse};
use crate::auth::CallerId;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/resumes/:id/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    Ok(Json(analyze_resume(&state, caller, id).await?))
}

/// GET /api/v1/resumes/:id/analysis
pub async fn handle_get_analysis(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisResponse>, AppError> {
    Ok(Json(get_analysis(&state, caller, id).await?))
}
