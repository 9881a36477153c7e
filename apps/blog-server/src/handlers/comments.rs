//! Comment submission.

use actix_web::{HttpResponse, web};

use blog_core::domain::{Comment, NewComment};
use blog_shared::{CommentForm, Form, FormErrors};

use super::form_context;
use crate::error::AppResult;
use crate::state::AppState;
use crate::views::PostView;

/// POST /blog/{post_id}/comment/
///
/// The comment always belongs to the post in the URL; any `post` field in
/// the submitted form is ignored.
pub async fn post_comment(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let post = state.blog.published_post(path.into_inner()).await?;
    let mut form = form.into_inner();

    let (comment, errors): (Option<Comment>, FormErrors) = match form.clean() {
        Ok(()) => {
            let input = NewComment {
                name: form.name.clone(),
                email: form.email.clone(),
                body: form.body.clone(),
            };
            (Some(state.blog.add_comment(post.id, input).await?), FormErrors::default())
        }
        Err(errors) => {
            tracing::debug!(post_id = post.id, ?errors, "Rejected comment");
            (None, errors)
        }
    };

    let mut context = form_context(&form, &errors);
    context.insert("post", &PostView::from(post));
    context.insert("comment", &comment);
    state.templates.page("blog/post/comment.html", &context)
}
