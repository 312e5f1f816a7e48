use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use super::service::{match_resume_to_job, MatchResponse};
use crate::auth::CallerId;
use crate::errors::AppError;
use crate::state::AppState;

/// POST /api/v1/resumes/:id/jobs/:job_id/match
pub async fn handle_match(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path((id, job_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<MatchResponse>, AppError> {
    Ok(Json(match_resume_to_job(&state, caller, id, job_id).await?))
}
