use chrono::{NaiveDate, TimeZone, Utc};
use sea_orm::sea_query::PostgresQueryBuilder;
use sea_orm::{
    ConnAcquireErr, DatabaseBackend, DbErr, EntityTrait, MockDatabase, MockExecResult,
    QueryTrait, RuntimeErr,
};

use blog_core::domain::{Comment, NewComment, PostStatus};
use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, CommentRepository, PostRepository, TagRepository};

use crate::database::entity::{comment, post, post_tag, tag};
use crate::database::postgres_base::repo_error;
use crate::database::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository, published_with_tag,
    ranked_by_title, similar_published,
};

fn post_model(id: i64, slug: &str, status: post::Status) -> post::Model {
    let publish = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
    post::Model {
        id,
        title: format!("Post {id}"),
        slug: slug.to_owned(),
        author_id: 1,
        body: "Body".to_owned(),
        publish: publish.into(),
        created: publish.into(),
        updated: publish.into(),
        status,
    }
}

fn sql(select: sea_orm::Select<post::Entity>) -> String {
    select.into_query().to_string(PostgresQueryBuilder)
}

#[test]
fn test_published_query_filters_status_and_orders_by_publish() {
    let sql = sql(post::Entity::published());

    assert!(sql.contains(r#""posts"."status" = 'PB'"#), "{sql}");
    assert!(sql.ends_with(r#"ORDER BY "posts"."publish" DESC"#), "{sql}");
}

#[test]
fn test_published_query_composes_with_tag_filter() {
    let sql = sql(published_with_tag(Some(7)));

    assert!(sql.contains(r#"INNER JOIN "post_tags""#), "{sql}");
    assert!(sql.contains(r#""post_tags"."tag_id" = 7"#), "{sql}");
    assert!(sql.contains(r#""posts"."status" = 'PB'"#), "{sql}");
}

#[test]
fn test_similar_query_ranks_by_shared_tags_then_publish() {
    let sql = sql(similar_published(3, &[1, 2], 4));

    assert!(sql.contains(r#""post_tags"."tag_id" IN (1, 2)"#), "{sql}");
    assert!(sql.contains(r#""posts"."id" <> 3"#), "{sql}");
    assert!(sql.contains(r#"GROUP BY "posts"."id""#), "{sql}");
    assert!(
        sql.contains(
            r#"ORDER BY COUNT("post_tags"."tag_id") DESC, "posts"."publish" DESC LIMIT 4"#
        ),
        "{sql}"
    );
}

#[test]
fn test_search_query_uses_trigram_similarity() {
    let sql = sql(ranked_by_title("djnago", 0.1));

    assert!(
        sql.contains(r#"similarity("posts"."title", 'djnago') AS "similarity""#),
        "{sql}"
    );
    assert!(sql.contains(r#"similarity("posts"."title", 'djnago') > 0.1"#), "{sql}");
    assert!(
        sql.ends_with(r#"ORDER BY similarity("posts"."title", 'djnago') DESC"#),
        "{sql}"
    );
    assert!(!sql.contains(r#""posts"."publish" DESC"#), "{sql}");
}

#[test]
fn test_post_tags_join_to_posts_and_tags() {
    let to_posts = post_tag::Entity::find()
        .inner_join(post::Entity)
        .into_query()
        .to_string(PostgresQueryBuilder);
    assert!(
        to_posts.contains(r#"INNER JOIN "posts" ON "post_tags"."post_id" = "posts"."id""#),
        "{to_posts}"
    );

    let to_tags = post_tag::Entity::find()
        .inner_join(tag::Entity)
        .into_query()
        .to_string(PostgresQueryBuilder);
    assert!(
        to_tags.contains(r#"INNER JOIN "tags" ON "post_tags"."tag_id" = "tags"."id""#),
        "{to_tags}"
    );
}

#[test]
fn test_connection_errors_map_to_connection() {
    let refused = repo_error(DbErr::Conn(RuntimeErr::Internal("refused".to_owned())));
    assert!(matches!(refused, RepoError::Connection(ref msg) if msg.contains("refused")));

    let timeout = repo_error(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout));
    assert!(matches!(timeout, RepoError::Connection(_)));

    assert!(matches!(
        repo_error(DbErr::RecordNotFound("posts".to_owned())),
        RepoError::NotFound
    ));
}

#[tokio::test]
async fn test_find_published_by_id() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![post_model(5, "hello", post::Status::Published)]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let post = repo.find_published_by_id(5).await.unwrap().unwrap();
    assert_eq!(post.id, 5);
    assert_eq!(post.status, PostStatus::Published);
    assert_eq!(post.absolute_url(), "/blog/2024/5/17/hello/");
}

#[tokio::test]
async fn test_find_published_by_date_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<post::Model>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let date = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap();

    assert!(repo.find_published_by_date(date, "hello").await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_published_by_date_on_last_day_is_missing() {
    // No query results are queued: any database access would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);

    assert!(repo.find_published_by_date(NaiveDate::MAX, "hello").await.unwrap().is_none());
}

#[tokio::test]
async fn test_similar_posts_skip_query_without_tags() {
    // No query results are queued: any database access would fail.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let repo = PostgresPostRepository::new(db);

    assert!(repo.find_similar_published(1, &[], 4).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_comment_inserts_and_returns_id() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![comment::Model {
            id: 11,
            post_id: 5,
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            body: "Great read".to_owned(),
            created: now.into(),
            updated: now.into(),
            active: true,
        }]])
        .append_exec_results([MockExecResult {
            last_insert_id: 11,
            rows_affected: 1,
        }])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comment = Comment::new(
        5,
        NewComment {
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            body: "Great read".to_owned(),
        },
    );

    let saved: Comment = repo.save(comment).await.unwrap();
    assert_eq!(saved.id, 11);
    assert_eq!(saved.post_id, 5);
    assert!(saved.active);
}

#[tokio::test]
async fn test_active_comments_for_post() {
    let now = Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![comment::Model {
            id: 1,
            post_id: 5,
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            body: "First".to_owned(),
            created: now.into(),
            updated: now.into(),
            active: true,
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comments = repo.find_active_by_post(5).await.unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].body, "First");
}

#[tokio::test]
async fn test_find_tag_by_slug() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![tag::Model {
            id: 2,
            name: "Rust".to_owned(),
            slug: "rust".to_owned(),
        }]])
        .into_connection();

    let repo = PostgresTagRepository::new(db);
    let tag = repo.find_by_slug("rust").await.unwrap().unwrap();

    assert_eq!(tag.id, 2);
    assert_eq!(tag.name, "Rust");
}

#[tokio::test]
async fn test_delete_missing_post_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let result = BaseRepository::<blog_core::domain::Post, i64>::delete(&repo, 99).await;

    assert!(matches!(result, Err(blog_core::RepoError::NotFound)));
}
