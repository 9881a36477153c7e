//! Recommend a post by email.

use actix_web::{HttpRequest, HttpResponse, web};

use blog_core::domain::Post;
use blog_core::service::ShareRequest;
use blog_shared::{EmailPostForm, Form, FormErrors};

use super::form_context;
use crate::error::AppResult;
use crate::state::AppState;
use crate::views::PostView;

fn render(
    state: &AppState,
    post: Post,
    form: &EmailPostForm,
    errors: &FormErrors,
    sent: bool,
) -> AppResult<HttpResponse> {
    let mut context = form_context(form, errors);
    context.insert("post", &PostView::from(post));
    context.insert("sent", &sent);
    state.templates.page("blog/post/share.html", &context)
}

/// Absolute URL of the post, as seen by the client that made `req`.
fn absolute_post_url(req: &HttpRequest, post: &Post) -> String {
    let info = req.connection_info();
    format!("{}://{}{}", info.scheme(), info.host(), post.absolute_url())
}

/// GET /blog/{post_id}/share/
pub async fn share_form(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let post = state.blog.published_post(path.into_inner()).await?;
    render(&state, post, &EmailPostForm::default(), &FormErrors::default(), false)
}

/// POST /blog/{post_id}/share/
pub async fn share_submit(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    form: web::Form<EmailPostForm>,
) -> AppResult<HttpResponse> {
    let post = state.blog.published_post(path.into_inner()).await?;
    let mut form = form.into_inner();

    if let Err(errors) = form.clean() {
        return render(&state, post, &form, &errors, false);
    }

    let request = ShareRequest {
        name: form.name.clone(),
        email: form.email.clone(),
        to: form.to.clone(),
        comments: form.comments.clone(),
    };
    let url = absolute_post_url(&req, &post);
    let post = state.blog.share_post(post.id, &request, &url).await?;

    render(&state, post, &form, &FormErrors::default(), true)
}
