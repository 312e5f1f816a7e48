use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::{
    delete_resume, load_owned_resume, read_upload_form, update_resume, upload_resume,
    UploadResponse,
};
use crate::auth::CallerId;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::state::AppState;

/// POST /api/v1/resumes
pub async fn handle_upload(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), AppError> {
    let form = read_upload_form(multipart).await?;
    let response = upload_resume(&state, caller, form).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// GET /api/v1/resumes
pub async fn handle_list(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    Ok(Json(state.repo.list_resumes_for_user(caller).await?))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(load_owned_resume(state.repo.as_ref(), id, caller).await?))
}

/// PUT /api/v1/resumes/:id
pub async fn handle_update(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<ResumeRow>, AppError> {
    let form = read_upload_form(multipart).await?;
    Ok(Json(update_resume(&state, caller, id, form).await?))
}

/// DELETE /api/v1/resumes/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    delete_resume(&state, caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
