//! Post listing and detail pages.

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use blog_shared::{CommentForm, FormErrors};

use super::form_context;
use crate::error::AppResult;
use crate::state::AppState;
use crate::views::PostView;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<String>,
}

/// GET / - the blog lives under /blog/.
pub async fn index() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/blog/"))
        .finish()
}

/// GET /blog/
pub async fn post_list(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    render_list(&state, None, query.page.as_deref()).await
}

/// GET /blog/tag/{tag_slug}/
pub async fn post_list_by_tag(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<ListQuery>,
) -> AppResult<HttpResponse> {
    render_list(&state, Some(path.as_str()), query.page.as_deref()).await
}

async fn render_list(
    state: &AppState,
    tag_slug: Option<&str>,
    page: Option<&str>,
) -> AppResult<HttpResponse> {
    let listing = state.blog.list_posts(tag_slug, page).await?;

    let mut context = tera::Context::new();
    context.insert("page", &listing.page.map(PostView::from));
    context.insert("tag", &listing.tag);
    state.templates.page("blog/post/list.html", &context)
}

/// GET /blog/{year}/{month}/{day}/{slug}/
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug) = path.into_inner();
    render_detail(&state, year, month, day, &slug, None).await
}

/// GET /blog/{year}/{month}/{day}/{slug}/tag/{tag_slug}/
pub async fn post_detail_by_tag(
    state: web::Data<AppState>,
    path: web::Path<(i32, u32, u32, String, String)>,
) -> AppResult<HttpResponse> {
    let (year, month, day, slug, tag_slug) = path.into_inner();
    render_detail(&state, year, month, day, &slug, Some(&tag_slug)).await
}

async fn render_detail(
    state: &AppState,
    year: i32,
    month: u32,
    day: u32,
    slug: &str,
    tag_slug: Option<&str>,
) -> AppResult<HttpResponse> {
    let detail = state
        .blog
        .post_detail(year, month, day, slug, tag_slug)
        .await?;

    let similar: Vec<PostView> = detail.similar_posts.into_iter().map(Into::into).collect();

    let mut context = form_context(&CommentForm::default(), &FormErrors::default());
    context.insert("post", &PostView::from(detail.post));
    context.insert("author", &detail.author);
    context.insert("tags", &detail.tags);
    context.insert("comments", &detail.comments);
    context.insert("similar_posts", &similar);
    context.insert("tag", &detail.tag);
    state.templates.page("blog/post/detail.html", &context)
}
