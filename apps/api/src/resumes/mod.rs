//! Resume CRUD over the repository and the Storage Gateway. Every lookup is
//! scoped to the caller; a resume owned by someone else reads as missing.

pub mod handlers;

use axum::extract::Multipart;
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::repository::ResumeRepository;
use crate::state::AppState;
use crate::storage::{allowed_extension, StorageType};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const MAX_RESUMES_PER_USER: i64 = 10;

#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub title: Option<String>,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub resume: ResumeRow,
    pub storage_type: StorageType,
}

/// Collects the `file` and `title` parts; other parts are ignored.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.file = Some(UploadedFile { filename, bytes });
            }
            Some("title") => {
                let title = field.text().await?;
                form.title = Some(title.trim().to_string()).filter(|t| !t.is_empty());
            }
            _ => {}
        }
    }
    Ok(form)
}

/// Rejects bad uploads before any storage or database call.
pub fn validate_upload(file: &UploadedFile) -> Result<(), AppError> {
    if file.filename.trim().is_empty() {
        return Err(AppError::Validation("No file selected".to_string()));
    }
    allowed_extension(&file.filename)?;
    if file.bytes.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(format!(
            "File exceeds the {} MB limit",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }
    Ok(())
}

fn upload_limit_error() -> AppError {
    AppError::Validation(format!(
        "Upload limit reached: at most {MAX_RESUMES_PER_USER} resumes per user"
    ))
}

/// Fetches a resume the caller owns, or `NotFound`.
pub async fn load_owned_resume(
    repo: &dyn ResumeRepository,
    id: Uuid,
    caller: Uuid,
) -> Result<ResumeRow, AppError> {
    repo.get_resume(id)
        .await?
        .filter(|r| r.is_owned_by(caller))
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

pub async fn upload_resume(
    state: &AppState,
    caller: Uuid,
    form: UploadForm,
) -> Result<UploadResponse, AppError> {
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("No file provided".to_string()))?;
    validate_upload(&file)?;

    // Early exit so a user at the limit never touches storage. The insert
    // below re-checks atomically.
    if state.repo.count_resumes_for_user(caller).await? >= MAX_RESUMES_PER_USER {
        return Err(upload_limit_error());
    }

    let stored = state.storage.store(file.bytes, &file.filename).await?;
    let title = form.title.or_else(|| Some(file.filename.clone()));
    let resume = ResumeRow::new(caller, stored.locator, title);

    // Don't leave an orphan behind when the row isn't written.
    match state.repo.insert_resume(&resume, MAX_RESUMES_PER_USER).await {
        Ok(true) => {}
        Ok(false) => {
            state.storage.delete(&resume.file_url).await;
            return Err(upload_limit_error());
        }
        Err(e) => {
            state.storage.delete(&resume.file_url).await;
            return Err(e.into());
        }
    }

    info!(
        "Uploaded resume {} for user {caller} ({:?} storage)",
        resume.id, stored.storage_type
    );
    Ok(UploadResponse {
        resume,
        storage_type: stored.storage_type,
    })
}

/// Applies a new title and/or document. The replaced object is deleted
/// best-effort once the row points at the new one.
pub async fn update_resume(
    state: &AppState,
    caller: Uuid,
    id: Uuid,
    form: UploadForm,
) -> Result<ResumeRow, AppError> {
    if form.file.is_none() && form.title.is_none() {
        return Err(AppError::Validation("Nothing to update".to_string()));
    }
    if let Some(file) = &form.file {
        validate_upload(file)?;
    }

    let mut resume = load_owned_resume(state.repo.as_ref(), id, caller).await?;
    if let Some(title) = form.title {
        resume.title = Some(title);
    }

    let mut replaced = None;
    if let Some(file) = form.file {
        let stored = state.storage.store(file.bytes, &file.filename).await?;
        replaced = Some(std::mem::replace(&mut resume.file_url, stored.locator));
        resume.extracted_text = None;
    }

    if let Err(e) = state.repo.update_resume(&resume).await {
        if replaced.is_some() {
            state.storage.delete(&resume.file_url).await;
        }
        return Err(e.into());
    }

    if let Some(old) = replaced {
        if !state.storage.delete(&old).await {
            warn!("Left orphaned document for resume {id}");
        }
    }
    Ok(resume)
}

pub async fn delete_resume(state: &AppState, caller: Uuid, id: Uuid) -> Result<(), AppError> {
    let resume = load_owned_resume(state.repo.as_ref(), id, caller).await?;
    state.storage.delete(&resume.file_url).await;
    state.repo.delete_resume(id).await?;
    info!("Deleted resume {id}");
    Ok(())
}
