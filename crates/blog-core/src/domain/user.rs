use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User entity - the author of posts. Managed outside this application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, email: String) -> Self {
        Self {
            id: 0,
            username,
            email,
            created_at: Utc::now(),
        }
    }
}
