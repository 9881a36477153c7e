//! HTTP handlers and route configuration.

mod comments;
mod health;
mod posts;
mod search;
mod share;


use actix_web::{HttpResponse, web};
use serde::Serialize;
use tera::Context;

use blog_shared::FormErrors;

use crate::error::{AppError, AppResult};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(posts::index))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/blog")
                .route("/", web::get().to(posts::post_list))
                .route("/search/", web::get().to(search::post_search))
                .route("/tag/{tag_slug}/", web::get().to(posts::post_list_by_tag))
                .route(
                    "/{year}/{month}/{day}/{slug}/",
                    web::get().to(posts::post_detail),
                )
                .route(
                    "/{year}/{month}/{day}/{slug}/tag/{tag_slug}/",
                    web::get().to(posts::post_detail_by_tag),
                )
                .service(
                    web::resource("/{post_id}/share/")
                        .route(web::get().to(share::share_form))
                        .route(web::post().to(share::share_submit))
                        .default_service(web::to(|| method_not_allowed("GET, POST"))),
                )
                .service(
                    web::resource("/{post_id}/comment/")
                        .route(web::post().to(comments::post_comment))
                        .default_service(web::to(|| method_not_allowed("POST"))),
                ),
        );
}

/// Fallback for unmatched paths.
pub async fn not_found() -> AppResult<HttpResponse> {
    Err(AppError::NotFound("page".to_string()))
}

async fn method_not_allowed(allow: &'static str) -> AppResult<HttpResponse> {
    Err(AppError::MethodNotAllowed(allow))
}

/// Context for a page that shows a form.
fn form_context<F: Serialize>(form: &F, errors: &FormErrors) -> Context {
    let mut context = Context::new();
    context.insert("form", form);
    context.insert("errors", errors);
    context
}
