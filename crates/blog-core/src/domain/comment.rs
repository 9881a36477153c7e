use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Comment entity - a reader's note attached to exactly one post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    /// Moderation flag. Only active comments are shown.
    pub active: bool,
}

/// Validated comment input, not yet bound to a post.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub name: String,
    pub email: String,
    pub body: String,
}

impl Comment {
    /// Bind validated input to a post. The result is unsaved (`id == 0`).
    pub fn new(post_id: i64, input: NewComment) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            post_id,
            name: input.name,
            email: input.email,
            body: input.body,
            created: now,
            updated: now,
            active: true,
        }
    }
}
