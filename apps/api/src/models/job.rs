use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Job posting owned by the wider application; read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Free text, usually comma separated.
    pub skills: Option<String>,
}

/// At most one row per (resume_id, job_id).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobMatchRow {
    pub id: Uuid,
    pub resume_id: Uuid,
    pub job_id: Uuid,
    pub match_score: f64,
    pub match_summary: String,
    pub matched_at: DateTime<Utc>,
}
