use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An unstructured complaint/suggestion record, independent of any pulse
/// form. Never mutated after creation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct FeedbackItem {
    pub id: i64,
    pub content: String,
    pub category: String,
    pub kind: String,
    pub member_id: Option<i64>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
}

impl FeedbackItem {
    /// Member reference as shown in the aggregator table.
    pub fn member_ref(&self) -> String {
        match self.member_id {
            Some(id) => format!("#{id}"),
            None => "anonymous".to_string(),
        }
    }

    pub fn submitted_on(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M").to_string()
    }
}

/// Form input from the hub feedback composer.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackForm {
    pub content: String,
    #[serde(default)]
    pub category: String,
    pub anonymous: Option<String>,
    pub csrf_token: String,
}
