//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveTime};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select, Value,
};

use blog_core::domain::{Comment, Post, SearchHit, Tag};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, PostRepository, TagRepository, UserRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag;
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::Entity as UserEntity;
use super::postgres_base::{PostgresBaseRepository, repo_error};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// Published posts, restricted to one tag when given.
pub(crate) fn published_with_tag(tag_id: Option<i64>) -> Select<PostEntity> {
    let select = PostEntity::published();
    match tag_id {
        Some(tag_id) => select
            .join(JoinType::InnerJoin, post::Relation::PostTags.def())
            .filter(post_tag::Column::TagId.eq(tag_id)),
        None => select,
    }
}

/// Published posts sharing any of `tag_ids`, most shared tags first.
pub(crate) fn similar_published(post_id: i64, tag_ids: &[i64], limit: u64) -> Select<PostEntity> {
    post::reorder(PostEntity::published())
        .join(JoinType::InnerJoin, post::Relation::PostTags.def())
        .filter(post_tag::Column::TagId.is_in(tag_ids.iter().copied()))
        .filter(post::Column::Id.ne(post_id))
        .group_by(post::Column::Id)
        .order_by_desc(Expr::col((post_tag::Entity, post_tag::Column::TagId)).count())
        .order_by_desc(post::Column::Publish)
        .limit(limit)
}

/// Published posts annotated with `similarity(title, query)` above `threshold`.
pub(crate) fn ranked_by_title(query: &str, threshold: f32) -> Select<PostEntity> {
    let similarity = || {
        Expr::cust_with_values(
            r#"similarity("posts"."title", $1)"#,
            [Value::from(query.to_owned())],
        )
    };

    post::reorder(PostEntity::published())
        .column_as(similarity(), "similarity")
        .filter(Expr::cust_with_values(
            r#"similarity("posts"."title", $1) > $2"#,
            [Value::from(query.to_owned()), Value::from(threshold)],
        ))
        .order_by_desc(similarity())
}

/// A post row plus its search rank.
#[derive(Debug, FromQueryResult)]
struct RankedPost {
    id: i64,
    title: String,
    slug: String,
    author_id: i64,
    body: String,
    publish: sea_orm::prelude::DateTimeWithTimeZone,
    created: sea_orm::prelude::DateTimeWithTimeZone,
    updated: sea_orm::prelude::DateTimeWithTimeZone,
    status: post::Status,
    similarity: f32,
}

impl From<RankedPost> for SearchHit {
    fn from(row: RankedPost) -> Self {
        let similarity = row.similarity;
        let model = post::Model {
            id: row.id,
            title: row.title,
            slug: row.slug,
            author_id: row.author_id,
            body: row.body,
            publish: row.publish,
            created: row.created,
            updated: row.updated,
            status: row.status,
        };
        Self {
            post: model.into(),
            similarity,
        }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count_published(&self, tag_id: Option<i64>) -> Result<u64, RepoError> {
        published_with_tag(tag_id)
            .count(&self.db)
            .await
            .map_err(repo_error)
    }

    async fn find_published(
        &self,
        tag_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(?tag_id, offset, limit, "Listing published posts");

        let result = published_with_tag(tag_id)
            .offset(offset)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_published_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::published()
            .filter(post::Column::Id.eq(id))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_published_by_date(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let start = date.and_time(NaiveTime::MIN).and_utc();
        // The last representable day has no upper bound to compare against.
        let Some(end) = start.checked_add_days(Days::new(1)) else {
            return Ok(None);
        };

        let result = PostEntity::published()
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Publish.gte(start))
            .filter(post::Column::Publish.lt(end))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_similar_published(
        &self,
        post_id: i64,
        tag_ids: &[i64],
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        if tag_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = similar_published(post_id, tag_ids, limit)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn search_published_titles(
        &self,
        query: &str,
        threshold: f32,
    ) -> Result<Vec<SearchHit>, RepoError> {
        tracing::debug!(query, threshold, "Trigram search on titles");

        let rows = ranked_by_title(query, threshold)
            .into_model::<RankedPost>()
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_active_by_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::Created)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_post(&self, post_id: i64) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .join(JoinType::InnerJoin, tag::Relation::PostTags.def())
            .filter(post_tag::Column::PostId.eq(post_id))
            .order_by_asc(tag::Column::Name)
            .all(&self.db)
            .await
            .map_err(repo_error)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

impl UserRepository for PostgresUserRepository {}
