use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Publication state of a post. Draft -> Published is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

/// Post entity - a blog article written by one author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub status: PostStatus,
}

impl Post {
    /// Create an unsaved draft. The slug is derived from the title and
    /// `publish` defaults to now.
    pub fn new(author_id: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        let title = title.into();
        let now = Utc::now();
        Self {
            id: 0,
            slug: slugify(&title),
            title,
            author_id,
            body: body.into(),
            publish: now,
            created: now,
            updated: now,
            status: PostStatus::Draft,
        }
    }

    pub fn is_published(&self) -> bool {
        self.status == PostStatus::Published
    }

    /// Calendar day (UTC) the slug is unique within.
    pub fn publish_date(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    /// Canonical path of the detail page.
    pub fn absolute_url(&self) -> String {
        format!(
            "/blog/{}/{}/{}/{}/",
            self.publish.year(),
            self.publish.month(),
            self.publish.day(),
            self.slug
        )
    }
}

/// A post ranked by title similarity to a search query.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub post: Post,
    pub similarity: f32,
}

/// Turn a title into a URL-safe slug: lowercase ASCII alphanumerics
/// separated by single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust   & SQL -- notes "), "rust-sql-notes");
        assert_eq!(slugify("snake_case_title"), "snake-case-title");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_new_posts_are_drafts() {
        assert_eq!(PostStatus::default(), PostStatus::Draft);
    }

    #[test]
    fn test_absolute_url_has_no_zero_padding() {
        let mut post = Post::new(1, "Who was Django Reinhardt?", "...");
        post.publish = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 0).unwrap();

        assert_eq!(post.slug, "who-was-django-reinhardt");
        assert_eq!(post.absolute_url(), "/blog/2024/3/7/who-was-django-reinhardt/");
        assert_eq!(post.publish_date(), NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
    }

    #[test]
    fn test_new_post_is_draft() {
        let post = Post::new(7, "Title", "Body");
        assert!(!post.is_published());
        assert_eq!(post.author_id, 7);
        assert_eq!(post.id, 0);
    }
}
