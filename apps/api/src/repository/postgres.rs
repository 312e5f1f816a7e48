use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::ResumeRepository;
use crate::models::analysis::AnalysisRow;
use crate::models::job::{JobMatchRow, JobRow};
use crate::models::resume::ResumeRow;

#[derive(Clone)]
pub struct PgResumeRepository {
    pool: PgPool,
}

impl PgResumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResumeRepository for PgResumeRepository {
    async fn count_resumes_for_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn insert_resume(
        &self,
        resume: &ResumeRow,
        max_per_user: i64,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent uploads by the same user until commit.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1::text, 0))")
            .bind(resume.user_id)
            .execute(&mut *tx)
            .await?;

        let owned: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM resumes WHERE user_id = $1")
            .bind(resume.user_id)
            .fetch_one(&mut *tx)
            .await?;
        if owned >= max_per_user {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO resumes (id, user_id, file_url, title, extracted_text, uploaded_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(resume.id)
        .bind(resume.user_id)
        .bind(&resume.file_url)
        .bind(&resume.title)
        .bind(&resume.extracted_text)
        .bind(resume.uploaded_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM resumes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn list_resumes_for_user(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM resumes WHERE user_id = $1 ORDER BY uploaded_at DESC")
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
    }

    async fn update_resume(&self, resume: &ResumeRow) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE resumes SET title = $2, file_url = $3, extracted_text = $4 WHERE id = $1")
            .bind(resume.id)
            .bind(&resume.title)
            .bind(&resume.file_url)
            .bind(&resume.extracted_text)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        // resume_scores and resume_job_matches cascade
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
        sqlx::query_as("SELECT id, title, description, skills FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn record_analysis(
        &self,
        analysis: &AnalysisRow,
        extracted_text: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO resume_scores
                (id, resume_id, tier, score_overall, score_format, score_skills,
                 score_experience, strengths, weaknesses, suggestions, candidate_name,
                 evaluated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(analysis.id)
        .bind(analysis.resume_id)
        .bind(&analysis.tier)
        .bind(analysis.score_overall)
        .bind(analysis.score_format)
        .bind(analysis.score_skills)
        .bind(analysis.score_experience)
        .bind(&analysis.strengths)
        .bind(&analysis.weaknesses)
        .bind(&analysis.suggestions)
        .bind(&analysis.candidate_name)
        .bind(analysis.evaluated_at)
        .execute(&mut *tx)
        .await?;

        if let Some(text) = extracted_text {
            sqlx::query("UPDATE resumes SET extracted_text = $2 WHERE id = $1")
                .bind(analysis.resume_id)
                .bind(text)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await
    }

    async fn latest_analysis(&self, resume_id: Uuid) -> Result<Option<AnalysisRow>, sqlx::Error> {
        sqlx::query_as(
            "SELECT * FROM resume_scores WHERE resume_id = $1 ORDER BY evaluated_at DESC LIMIT 1",
        )
        .bind(resume_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_match(&self, m: &JobMatchRow) -> Result<JobMatchRow, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let stored: JobMatchRow = sqlx::query_as(
            r#"
            INSERT INTO resume_job_matches
                (id, resume_id, job_id, match_score, match_summary, matched_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (resume_id, job_id) DO UPDATE
               SET match_score   = EXCLUDED.match_score,
                   match_summary = EXCLUDED.match_summary,
                   matched_at    = EXCLUDED.matched_at
            RETURNING *
            "#,
        )
        .bind(m.id)
        .bind(m.resume_id)
        .bind(m.job_id)
        .bind(m.match_score)
        .bind(&m.match_summary)
        .bind(m.matched_at)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(stored)
    }
}
