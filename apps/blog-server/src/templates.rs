//! Tera templates compiled into the binary.

use std::collections::HashMap;

use actix_web::HttpResponse;
use actix_web::http::header::ContentType;
use tera::{Context, Tera, Value};

use crate::error::{AppError, AppResult};

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("blog/pagination.html", include_str!("../templates/blog/pagination.html")),
    ("blog/post/list.html", include_str!("../templates/blog/post/list.html")),
    ("blog/post/detail.html", include_str!("../templates/blog/post/detail.html")),
    (
        "blog/post/includes/comment_form.html",
        include_str!("../templates/blog/post/includes/comment_form.html"),
    ),
    ("blog/post/comment.html", include_str!("../templates/blog/post/comment.html")),
    ("blog/post/share.html", include_str!("../templates/blog/post/share.html")),
    ("blog/post/search.html", include_str!("../templates/blog/post/search.html")),
];

/// Keep the first `count` (default 30) words, marking the cut with an ellipsis.
fn truncatewords(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = tera::try_get_value!("truncatewords", "value", String, value);
    let count = match args.get("count") {
        Some(count) => tera::try_get_value!("truncatewords", "count", usize, count),
        None => 30,
    };

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= count {
        return Ok(Value::String(text));
    }
    Ok(Value::String(format!("{} …", words[..count].join(" "))))
}

/// Page templates. Autoescaping is on for every `.html` template.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn new() -> Result<Self, tera::Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        tera.register_filter("truncatewords", truncatewords);

        tracing::debug!(count = TEMPLATES.len(), "Templates loaded");
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<String, AppError> {
        self.tera
            .render(name, context)
            .map_err(|e| AppError::Internal(format!("failed to render {name}: {e:?}")))
    }

    /// Render `name` as a 200 HTML response.
    pub fn page(&self, name: &str, context: &Context) -> AppResult<HttpResponse> {
        let body = self.render(name, context)?;
        Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_templates_parse() {
        let templates = Templates::new().unwrap();
        let names: Vec<&str> = templates.tera.get_template_names().collect();
        assert_eq!(names.len(), TEMPLATES.len());
    }

    #[test]
    fn test_truncatewords() {
        let mut args = HashMap::new();
        args.insert("count".to_string(), Value::from(3));

        let short = truncatewords(&Value::from("one two"), &args).unwrap();
        assert_eq!(short, Value::from("one two"));

        let long = truncatewords(&Value::from("one two  three\nfour five"), &args).unwrap();
        assert_eq!(long, Value::from("one two three …"));
    }

    #[test]
    fn test_output_is_escaped() {
        let templates = Templates::new().unwrap();
        let mut context = Context::new();
        context.insert("form", &blog_shared::SearchForm::default());
        context.insert("errors", &blog_shared::FormErrors::default());
        context.insert("query", "<script>");
        context.insert("results", &Vec::<crate::views::SearchResult>::new());

        let html = templates.render("blog/post/search.html", &context).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
