use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Storage Gateway locator; opaque outside `storage`.
    pub file_url: String,
    pub title: Option<String>,
    /// Cached by the last successful analyze call.
    #[serde(skip_serializing)]
    pub extracted_text: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

impl ResumeRow {
    pub fn new(user_id: Uuid, file_url: String, title: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            file_url,
            title,
            extracted_text: None,
            uploaded_at: Utc::now(),
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}
