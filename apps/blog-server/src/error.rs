//! Error responses - rendered as small HTML pages.

use actix_web::http::{StatusCode, header};
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use blog_core::error::DomainError;

const ERROR_TEMPLATE: &str = include_str!("../templates/error.html");

/// Application-level error type that converts to an HTML error page.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Carries the value of the `Allow` header.
    #[error("Method not allowed")]
    MethodNotAllowed(&'static str),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn title(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "Page not found",
            AppError::MethodNotAllowed(_) => "Method not allowed",
            AppError::BadRequest(_) => "Bad request",
            AppError::Internal(_) => "Server error",
        }
    }

    fn render_page(&self) -> String {
        let status = self.status_code();
        let mut context = tera::Context::new();
        context.insert("status", &status.as_u16());
        context.insert("title", self.title());
        if let AppError::NotFound(detail) | AppError::BadRequest(detail) = self {
            context.insert("detail", detail);
        }

        tera::Tera::one_off(ERROR_TEMPLATE, &context, true).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to render error page");
            format!("{} {}", status.as_u16(), self.title())
        })
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal(detail) = self {
            tracing::error!("Internal error: {}", detail);
        }

        let mut response = HttpResponse::build(self.status_code());
        if let AppError::MethodNotAllowed(allow) = self {
            response.insert_header((header::ALLOW, *allow));
        }
        response
            .content_type(header::ContentType::html())
            .body(self.render_page())
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{entity_type} {key} not found"))
            }
            DomainError::Validation(msg) => AppError::BadRequest(msg),
            DomainError::Mail(e) => AppError::Internal(format!("mail delivery failed: {e}")),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;
    use blog_core::error::MailError;

    fn body_text(response: HttpResponse) -> String {
        let bytes = response.into_body().try_into_bytes().unwrap_or_default();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_domain_errors_map_to_status() {
        let not_found: AppError = DomainError::not_found("Post", 7).into();
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let mail: AppError = DomainError::Mail(MailError::Transport("down".into())).into();
        assert_eq!(mail.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let invalid: AppError = DomainError::Validation("slug taken".into()).into();
        assert_eq!(invalid.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_page_hides_internal_detail() {
        let response = AppError::Internal("password=hunter2".into()).error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_text(response);
        assert!(body.contains("Server error"));
        assert!(!body.contains("hunter2"));
    }

    #[test]
    fn test_method_not_allowed_sets_allow_header() {
        let response = AppError::MethodNotAllowed("POST").error_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers().get(header::ALLOW).unwrap(), "POST");
    }
}
