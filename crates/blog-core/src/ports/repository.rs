use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Comment, Post, SearchHit, Tag, User};
use crate::error::RepoError;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Save an entity. Unsaved entities (id 0) are inserted, others updated.
    async fn save(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// Post repository. Every `*_published` method only sees posts whose status
/// is Published, newest first unless stated otherwise.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i64> {
    /// Number of published posts, optionally restricted to one tag.
    async fn count_published(&self, tag_id: Option<i64>) -> Result<u64, RepoError>;

    /// A window of published posts, optionally restricted to one tag.
    async fn find_published(
        &self,
        tag_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    async fn find_published_by_id(&self, id: i64) -> Result<Option<Post>, RepoError>;

    /// The published post with `slug` whose publish timestamp falls on `date` (UTC).
    async fn find_published_by_date(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Published posts sharing at least one of `tag_ids`, excluding `post_id`,
    /// ordered by number of shared tags then publish time, both descending.
    async fn find_similar_published(
        &self,
        post_id: i64,
        tag_ids: &[i64],
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Published posts whose title trigram similarity to `query` is strictly
    /// above `threshold`, most similar first.
    async fn search_published_titles(
        &self,
        query: &str,
        threshold: f32,
    ) -> Result<Vec<SearchHit>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i64> {
    /// Active comments of a post, oldest first.
    async fn find_active_by_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;
}

/// Tag lookups. Tags and their links to posts are owned by the tagging tables.
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;

    /// Tags attached to a post, by name.
    async fn find_by_post(&self, post_id: i64) -> Result<Vec<Tag>, RepoError>;
}

/// Authors, looked up by id for the detail page.
pub trait UserRepository: BaseRepository<User, i64> {}
