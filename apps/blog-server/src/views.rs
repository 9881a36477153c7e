//! Template-facing shapes of domain values.

use serde::Serialize;

use blog_core::domain::{Post, SearchHit};

/// A post plus the links its templates need.
#[derive(Debug, Serialize)]
pub struct PostView {
    #[serde(flatten)]
    pub post: Post,
    pub url: String,
    pub share_url: String,
    pub comment_url: String,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self {
            url: post.absolute_url(),
            share_url: format!("/blog/{}/share/", post.id),
            comment_url: format!("/blog/{}/comment/", post.id),
            post,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResult {
    pub post: PostView,
    pub similarity: f32,
}

impl From<SearchHit> for SearchResult {
    fn from(hit: SearchHit) -> Self {
        Self {
            post: hit.post.into(),
            similarity: hit.similarity,
        }
    }
}
