//! Blog service - the operations behind every page.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::instrument;

use crate::domain::{
    Comment, NewComment, Page, Post, SearchHit, Tag, User, num_pages, resolve_page_number,
};
use crate::error::DomainError;
use crate::ports::{
    CommentRepository, Mailer, OutgoingMail, PostRepository, TagRepository, UserRepository,
};

/// Posts shown per listing page.
pub const POSTS_PER_PAGE: u64 = 3;
/// Maximum number of recommendations on a detail page.
pub const SIMILAR_POSTS_LIMIT: u64 = 4;
/// Titles must be strictly more similar than this to match a search.
pub const SEARCH_SIMILARITY_THRESHOLD: f32 = 0.1;

/// Result of the listing page.
#[derive(Debug, Clone)]
pub struct PostListing {
    pub page: Page<Post>,
    pub tag: Option<Tag>,
}

/// Everything the detail page shows.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub author: Option<User>,
    pub tags: Vec<Tag>,
    pub comments: Vec<Comment>,
    pub similar_posts: Vec<Post>,
    pub tag: Option<Tag>,
}

/// Validated share-by-email input.
#[derive(Debug, Clone)]
pub struct ShareRequest {
    pub name: String,
    pub email: String,
    pub to: String,
    pub comments: String,
}

impl ShareRequest {
    /// Compose the recommendation for `post`, reachable at `post_url`.
    pub fn compose(&self, post: &Post, post_url: &str) -> OutgoingMail {
        OutgoingMail {
            subject: format!("{} recommends you read {}", self.name, post.title),
            body: format!(
                "Read {} at {}\n\n{}'s comments: {}",
                post.title, post_url, self.name, self.comments
            ),
            from: self.email.clone(),
            to: vec![self.to.clone()],
        }
    }
}

#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    tags: Arc<dyn TagRepository>,
    users: Arc<dyn UserRepository>,
    mailer: Arc<dyn Mailer>,
}

impl BlogService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        tags: Arc<dyn TagRepository>,
        users: Arc<dyn UserRepository>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            posts,
            comments,
            tags,
            users,
            mailer,
        }
    }

    async fn tag_by_slug(&self, slug: &str) -> Result<Tag, DomainError> {
        self.tags
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag", slug))
    }

    /// Published posts, newest first, three per page.
    #[instrument(skip(self))]
    pub async fn list_posts(
        &self,
        tag_slug: Option<&str>,
        page: Option<&str>,
    ) -> Result<PostListing, DomainError> {
        let tag = match tag_slug {
            Some(slug) => Some(self.tag_by_slug(slug).await?),
            None => None,
        };
        let tag_id = tag.as_ref().map(|t| t.id);

        let total = self.posts.count_published(tag_id).await?;
        let number = resolve_page_number(page, num_pages(total, POSTS_PER_PAGE));
        let items = self
            .posts
            .find_published(
                tag_id,
                Page::<Post>::offset(number, POSTS_PER_PAGE),
                POSTS_PER_PAGE,
            )
            .await?;

        Ok(PostListing {
            page: Page::new(items, number, total, POSTS_PER_PAGE),
            tag,
        })
    }

    /// The published post at `/{year}/{month}/{day}/{slug}/`.
    #[instrument(skip(self))]
    pub async fn post_detail(
        &self,
        year: i32,
        month: u32,
        day: u32,
        slug: &str,
        tag_slug: Option<&str>,
    ) -> Result<PostDetail, DomainError> {
        let key = format!("{year}/{month}/{day}/{slug}");
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DomainError::not_found("Post", &key))?;
        let post = self
            .posts
            .find_published_by_date(date, slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", &key))?;

        let tag = match tag_slug {
            Some(slug) => Some(self.tag_by_slug(slug).await?),
            None => None,
        };

        let comments = self.comments.find_active_by_post(post.id).await?;
        let tags = self.tags.find_by_post(post.id).await?;
        let similar_posts = if tags.is_empty() {
            Vec::new()
        } else {
            let tag_ids: Vec<i64> = tags.iter().map(|t| t.id).collect();
            self.posts
                .find_similar_published(post.id, &tag_ids, SIMILAR_POSTS_LIMIT)
                .await?
        };
        let author = self.users.find_by_id(post.author_id).await?;

        Ok(PostDetail {
            post,
            author,
            tags,
            comments,
            similar_posts,
            tag,
        })
    }

    /// A published post by id. Drafts are reported as missing.
    pub async fn published_post(&self, id: i64) -> Result<Post, DomainError> {
        self.posts
            .find_published_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post", id))
    }

    /// Email a recommendation for a published post.
    #[instrument(skip(self, request), fields(to = %request.to))]
    pub async fn share_post(
        &self,
        post_id: i64,
        request: &ShareRequest,
        post_url: &str,
    ) -> Result<Post, DomainError> {
        let post = self.published_post(post_id).await?;
        self.mailer.send(request.compose(&post, post_url)).await?;

        tracing::info!(post_id = post.id, "post shared by email");
        Ok(post)
    }

    /// Attach a new comment to a published post.
    #[instrument(skip(self, input))]
    pub async fn add_comment(
        &self,
        post_id: i64,
        input: NewComment,
    ) -> Result<Comment, DomainError> {
        let post = self.published_post(post_id).await?;
        let comment = self.comments.save(Comment::new(post.id, input)).await?;

        tracing::info!(post_id = post.id, comment_id = comment.id, "comment created");
        Ok(comment)
    }

    /// Published posts ranked by title similarity to `query`.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, DomainError> {
        Ok(self
            .posts
            .search_published_titles(query, SEARCH_SIMILARITY_THRESHOLD)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_compose_share_mail() {
        let mut post = Post::new(1, "Notes on Rust", "...");
        post.publish = Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap();
        let request = ShareRequest {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            to: "bob@example.com".to_string(),
            comments: "Worth a look".to_string(),
        };

        let mail = request.compose(&post, "http://localhost/blog/2024/1/5/notes-on-rust/");

        assert_eq!(mail.subject, "Ada recommends you read Notes on Rust");
        assert_eq!(
            mail.body,
            "Read Notes on Rust at http://localhost/blog/2024/1/5/notes-on-rust/\n\nAda's comments: Worth a look"
        );
        assert_eq!(mail.from, "ada@example.com");
        assert_eq!(mail.to, vec!["bob@example.com".to_string()]);
    }
}
