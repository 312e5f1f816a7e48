//! In-process repository for handler and service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::ResumeRepository;
use crate::models::analysis::AnalysisRow;
use crate::models::job::{JobMatchRow, JobRow};
use crate::models::resume::ResumeRow;

#[derive(Default)]
pub struct MemoryRepository {
    pub resumes: Mutex<Vec<ResumeRow>>,
    pub jobs: Mutex<Vec<JobRow>>,
    pub analyses: Mutex<Vec<AnalysisRow>>,
    pub matches: Mutex<Vec<JobMatchRow>>,
}

impl MemoryRepository {
    pub fn with_job(self, job: JobRow) -> Self {
        self.jobs.lock().unwrap().push(job);
        self
    }

    pub fn resume_count(&self) -> usize {
        self.resumes.lock().unwrap().len()
    }

    pub fn cached_text(&self, resume_id: Uuid) -> Option<String> {
        let resumes = self.resumes.lock().unwrap();
        resumes
            .iter()
            .find(|r| r.id == resume_id)
            .and_then(|r| r.extracted_text.clone())
    }

    pub fn match_rows(&self) -> Vec<JobMatchRow> {
        self.matches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResumeRepository for MemoryRepository {
    async fn count_resumes_for_user(&self, user_id: Uuid) -> Result<i64, sqlx::Error> {
        let resumes = self.resumes.lock().unwrap();
        Ok(resumes.iter().filter(|r| r.user_id == user_id).count() as i64)
    }

    async fn insert_resume(
        &self,
        resume: &ResumeRow,
        max_per_user: i64,
    ) -> Result<bool, sqlx::Error> {
        let mut resumes = self.resumes.lock().unwrap();
        let owned = resumes.iter().filter(|r| r.user_id == resume.user_id).count() as i64;
        if owned >= max_per_user {
            return Ok(false);
        }
        resumes.push(resume.clone());
        Ok(true)
    }

    async fn get_resume(&self, id: Uuid) -> Result<Option<ResumeRow>, sqlx::Error> {
        let resumes = self.resumes.lock().unwrap();
        Ok(resumes.iter().find(|r| r.id == id).cloned())
    }

    async fn list_resumes_for_user(&self, user_id: Uuid) -> Result<Vec<ResumeRow>, sqlx::Error> {
        let mut found: Vec<ResumeRow> = self
            .resumes
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        Ok(found)
    }

    async fn update_resume(&self, resume: &ResumeRow) -> Result<(), sqlx::Error> {
        let mut resumes = self.resumes.lock().unwrap();
        if let Some(existing) = resumes.iter_mut().find(|r| r.id == resume.id) {
            *existing = resume.clone();
        }
        Ok(())
    }

    async fn delete_resume(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut resumes = self.resumes.lock().unwrap();
        let before = resumes.len();
        resumes.retain(|r| r.id != id);
        self.analyses.lock().unwrap().retain(|a| a.resume_id != id);
        self.matches.lock().unwrap().retain(|m| m.resume_id != id);
        Ok(resumes.len() < before)
    }

    async fn get_job(&self, id: Uuid) -> Result<Option<JobRow>, sqlx::Error> {
        Ok(self.jobs.lock().unwrap().iter().find(|j| j.id == id).cloned())
    }

    async fn record_analysis(
        &self,
        analysis: &AnalysisRow,
        extracted_text: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        self.analyses.lock().unwrap().push(analysis.clone());
        let Some(text) = extracted_text else {
            return Ok(());
        };
        let mut resumes = self.resumes.lock().unwrap();
        if let Some(resume) = resumes.iter_mut().find(|r| r.id == analysis.resume_id) {
            resume.extracted_text = Some(text.to_string());
        }
        Ok(())
    }

    async fn latest_analysis(&self, resume_id: Uuid) -> Result<Option<AnalysisRow>, sqlx::Error> {
        let analyses = self.analyses.lock().unwrap();
        Ok(analyses
            .iter()
            .filter(|a| a.resume_id == resume_id)
            .max_by_key(|a| a.evaluated_at)
            .cloned())
    }

    async fn upsert_match(&self, m: &JobMatchRow) -> Result<JobMatchRow, sqlx::Error> {
        let mut matches = self.matches.lock().unwrap();
        match matches
            .iter_mut()
            .find(|existing| existing.resume_id == m.resume_id && existing.job_id == m.job_id)
        {
            Some(existing) => {
                existing.match_score = m.match_score;
                existing.match_summary = m.match_summary.clone();
                existing.matched_at = m.matched_at;
                Ok(existing.clone())
            }
            None => {
                matches.push(m.clone());
                Ok(m.clone())
            }
        }
    }
}
