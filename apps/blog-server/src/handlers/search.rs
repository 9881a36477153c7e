//! Trigram search over post titles.

use actix_web::{HttpResponse, web};
use serde::Deserialize;

use blog_shared::{Form, FormErrors, SearchForm};

use super::form_context;
use crate::error::AppResult;
use crate::state::AppState;
use crate::views::SearchResult;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
}

/// GET /blog/search/
pub async fn post_search(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> AppResult<HttpResponse> {
    let mut form = SearchForm::default();
    let mut errors = FormErrors::default();
    let mut query = None;
    let mut results: Vec<SearchResult> = Vec::new();

    // No `query` key at all means the empty form is shown.
    if let Some(raw) = params.into_inner().query {
        form.query = raw;
        match form.clean() {
            Ok(()) => {
                let hits = state.blog.search(&form.query).await?;
                results = hits.into_iter().map(Into::into).collect();
                query = Some(form.query.clone());
            }
            Err(e) => errors = e,
        }
    }

    let mut context = form_context(&form, &errors);
    context.insert("query", &query);
    context.insert("results", &results);
    state.templates.page("blog/post/search.html", &context)
}
