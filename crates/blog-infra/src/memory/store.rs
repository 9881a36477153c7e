//! In-memory blog store - used when no database is configured, and in tests.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use blog_core::domain::{Comment, Post, SearchHit, Tag, User, slugify};
use blog_core::error::RepoError;
use blog_core::ports::{
    BaseRepository, CommentRepository, PostRepository, TagRepository, UserRepository,
};

use super::trigram::similarity;

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    comments: BTreeMap<i64, Comment>,
    tags: BTreeMap<i64, Tag>,
    /// (post_id, tag_id)
    post_tags: BTreeSet<(i64, i64)>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    /// Published posts, newest first.
    fn published(&self) -> Vec<&Post> {
        let mut posts: Vec<&Post> = self.posts.values().filter(|p| p.is_published()).collect();
        posts.sort_by_key(|p| Reverse((p.publish, p.id)));
        posts
    }

    fn has_tag(&self, post_id: i64, tag_id: i64) -> bool {
        self.post_tags.contains(&(post_id, tag_id))
    }
}

/// Process-local implementation of every repository port.
///
/// Mirrors the PostgreSQL schema's constraints: slugs are unique per publish
/// date, foreign keys must resolve, and deleting a post cascades.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryBlogStore {
    tables: RwLock<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an author and return it with its id.
    pub async fn insert_user(&self, username: &str, email: &str) -> User {
        let mut tables = self.tables.write().await;
        let mut user = User::new(username.to_string(), email.to_string());
        user.id = tables.next_id();
        tables.users.insert(user.id, user.clone());
        user
    }

    /// Find or create the tag called `name`.
    pub async fn insert_tag(&self, name: &str) -> Tag {
        let mut tables = self.tables.write().await;
        if let Some(tag) = tables.tags.values().find(|t| t.name == name) {
            return tag.clone();
        }
        let tag = Tag {
            id: tables.next_id(),
            name: name.to_string(),
            slug: slugify(name),
        };
        tables.tags.insert(tag.id, tag.clone());
        tag
    }

    /// Attach tags (created on demand) to a post.
    pub async fn tag_post(&self, post_id: i64, names: &[&str]) -> Result<Vec<Tag>, RepoError> {
        let mut tags = Vec::with_capacity(names.len());
        for name in names {
            tags.push(self.insert_tag(name).await);
        }

        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&post_id) {
            return Err(RepoError::Constraint(format!("post {post_id} does not exist")));
        }
        for tag in &tags {
            tables.post_tags.insert((post_id, tag.id));
        }
        Ok(tags)
    }

    /// Number of comments stored for a post, active or not.
    pub async fn comment_count(&self, post_id: i64) -> usize {
        let tables = self.tables.read().await;
        tables.comments.values().filter(|c| c.post_id == post_id).count()
    }
}

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn save(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&post.author_id) {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                post.author_id
            )));
        }
        let clash = tables.posts.values().any(|p| {
            p.id != post.id && p.slug == post.slug && p.publish_date() == post.publish_date()
        });
        if clash {
            return Err(RepoError::Constraint(format!(
                "slug '{}' already used on {}",
                post.slug,
                post.publish_date()
            )));
        }

        if post.id == 0 {
            post.id = tables.next_id();
        } else if !tables.posts.contains_key(&post.id) {
            return Err(RepoError::NotFound);
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        tables.comments.retain(|_, c| c.post_id != id);
        tables.post_tags.retain(|(post_id, _)| *post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn count_published(&self, tag_id: Option<i64>) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        let count = tables
            .published()
            .into_iter()
            .filter(|p| tag_id.is_none_or(|t| tables.has_tag(p.id, t)))
            .count();
        Ok(count as u64)
    }

    async fn find_published(
        &self,
        tag_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .published()
            .into_iter()
            .filter(|p| tag_id.is_none_or(|t| tables.has_tag(p.id, t)))
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn find_published_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).filter(|p| p.is_published()).cloned())
    }

    async fn find_published_by_date(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .published()
            .into_iter()
            .find(|p| p.slug == slug && p.publish_date() == date)
            .cloned())
    }

    async fn find_similar_published(
        &self,
        post_id: i64,
        tag_ids: &[i64],
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut ranked: Vec<(usize, &Post)> = tables
            .published()
            .into_iter()
            .filter(|p| p.id != post_id)
            .map(|p| {
                let shared = tag_ids.iter().filter(|t| tables.has_tag(p.id, **t)).count();
                (shared, p)
            })
            .filter(|(shared, _)| *shared > 0)
            .collect();
        ranked.sort_by_key(|(shared, p)| Reverse((*shared, p.publish, p.id)));

        Ok(ranked
            .into_iter()
            .take(limit as usize)
            .map(|(_, p)| p.clone())
            .collect())
    }

    async fn search_published_titles(
        &self,
        query: &str,
        threshold: f32,
    ) -> Result<Vec<SearchHit>, RepoError> {
        let tables = self.tables.read().await;
        let mut hits: Vec<SearchHit> = tables
            .published()
            .into_iter()
            .map(|p| SearchHit {
                similarity: similarity(&p.title, query),
                post: p.clone(),
            })
            .filter(|hit| hit.similarity > threshold)
            .collect();
        // Stable sort keeps newest-first among equal scores.
        hits.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        Ok(hits)
    }
}

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn save(&self, mut comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.contains_key(&comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }

        if comment.id == 0 {
            comment.id = tables.next_id();
        } else if !tables.comments.contains_key(&comment.id) {
            return Err(RepoError::NotFound);
        }
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables
            .comments
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn find_active_by_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id && c.active)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created, c.id));
        Ok(comments)
    }
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.values().find(|t| t.slug == slug).cloned())
    }

    async fn find_by_post(&self, post_id: i64) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables
            .post_tags
            .iter()
            .filter(|(p, _)| *p == post_id)
            .filter_map(|(_, t)| tables.tags.get(t).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}

#[async_trait]
impl BaseRepository<User, i64> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn save(&self, mut user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .users
            .values()
            .any(|u| u.id != user.id && u.username == user.username);
        if taken {
            return Err(RepoError::Constraint(format!(
                "username '{}' already exists",
                user.username
            )));
        }

        if user.id == 0 {
            user.id = tables.next_id();
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Err(RepoError::NotFound);
        }
        let owned: Vec<i64> = tables
            .posts
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned {
            tables.posts.remove(&post_id);
            tables.comments.retain(|_, c| c.post_id != post_id);
            tables.post_tags.retain(|(p, _)| *p != post_id);
        }
        Ok(())
    }
}

impl UserRepository for InMemoryBlogStore {}
