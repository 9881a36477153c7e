//! Application state - shared across all handlers.

use std::sync::Arc;

use thiserror::Error;

use blog_core::BlogService;
use blog_core::error::MailError;
use blog_core::ports::Mailer;
use blog_infra::{ConsoleMailer, InMemoryBlogStore};

#[cfg(feature = "postgres")]
use blog_infra::database::{
    DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
    PostgresTagRepository, PostgresUserRepository,
};
#[cfg(feature = "smtp")]
use blog_infra::SmtpMailer;

use crate::config::{AppConfig, EmailBackend};
use crate::templates::Templates;

/// Failures that stop the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load templates: {0}")]
    Templates(#[from] tera::Error),

    #[error("failed to configure mail: {0}")]
    Mail(#[from] MailError),
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub blog: BlogService,
    pub templates: Arc<Templates>,
    #[cfg(feature = "postgres")]
    pub db: Option<Arc<DatabaseConnections>>,
}

fn mailer(backend: &EmailBackend) -> Result<Arc<dyn Mailer>, MailError> {
    match backend {
        EmailBackend::Console => {
            tracing::info!("Mail is written to the log (console backend)");
            Ok(Arc::new(ConsoleMailer::new()))
        }
        #[cfg(feature = "smtp")]
        EmailBackend::Smtp(config) => Ok(Arc::new(SmtpMailer::new(config)?)),
    }
}

fn in_memory_blog(store: Arc<InMemoryBlogStore>, mailer: Arc<dyn Mailer>) -> BlogService {
    BlogService::new(store.clone(), store.clone(), store.clone(), store, mailer)
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let templates = Arc::new(Templates::new()?);
        let mailer = mailer(&config.email)?;

        #[cfg(feature = "postgres")]
        let (db, blog) = {
            if let Some(db_config) = &config.database {
                match DatabaseConnections::init(db_config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        let blog = BlogService::new(
                            Arc::new(PostgresPostRepository::new(conn.main.clone())),
                            Arc::new(PostgresCommentRepository::new(conn.main.clone())),
                            Arc::new(PostgresTagRepository::new(conn.main.clone())),
                            Arc::new(PostgresUserRepository::new(conn.main.clone())),
                            mailer,
                        );
                        (Some(conn), blog)
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        (None, in_memory_blog(Arc::new(InMemoryBlogStore::new()), mailer))
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                (None, in_memory_blog(Arc::new(InMemoryBlogStore::new()), mailer))
            }
        };

        #[cfg(not(feature = "postgres"))]
        let blog = {
            tracing::info!("Running without postgres feature - using in-memory store");
            in_memory_blog(Arc::new(InMemoryBlogStore::new()), mailer)
        };

        tracing::info!("Application state initialized");

        Ok(Self {
            blog,
            templates,
            #[cfg(feature = "postgres")]
            db,
        })
    }

    /// State over an existing in-memory store.
    #[cfg(test)]
    pub fn in_memory(
        store: Arc<InMemoryBlogStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, StartupError> {
        Ok(Self {
            blog: in_memory_blog(store, mailer),
            templates: Arc::new(Templates::new()?),
            #[cfg(feature = "postgres")]
            db: None,
        })
    }
}
