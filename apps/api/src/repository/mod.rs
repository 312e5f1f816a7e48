//! Persistence seam. Handlers and services only see `ResumeRepository`;
//! `PgResumeRepository` is the production implementation.

#[cfg(test)]
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::analysis::AnalysisRow;
use crate::models::job::{JobMatchRow, JobRow};
use crate::models::resume::ResumeRow;

pub use postgres::PgResumeRepository;

#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn count_resumes_for_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error>;

    /// Inserts `resume` unless its owner already has `max_per_user` rows.
    /// The count and insert are atomic per user. Returns false when refused.
    async fn insert_resume(
        &self,
        resume: &ResumeRow,
        max_per_user: i64,
    ) -> Result<bool, sqlx::Error>;

    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error>;

    /// Newest first.
    async fn list_resumes_for_user(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, sqlx::Error>;

    /// Writes `title` and `file_url`.
    async fn update_resume(&self, resume: &ResumeRow) -> Result<(), sqlx::Error>;

    /// Removes the resume with its scores and matches. Returns false if absent.
    async fn delete_resume(&self, id: Uuid) -> Result<bool, sqlx::Error>;

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, sqlx::Error>;

    /// Appends the score row and, when `extracted_text` is present, caches it
    /// in the same transaction. `None` leaves any earlier cached text intact.
    async fn record_analysis(
        &self,
        analysis: &AnalysisRow,
        extracted_text: Option<&str>,
    ) -> Result<(), sqlx::Error>;

    async fn latest_analysis(&self, resume_id: Uuid) -> Result<Option<AnalysisRow>, sqlx::Error>;

    /// Inserts or updates the row for (resume_id, job_id) and returns what is stored.
    async fn upsert_match(&self, m: &JobMatchRow) -> Result<JobMatchRow, sqlx::Error>;
}
