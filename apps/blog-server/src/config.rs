//! Application configuration loaded from environment variables.

use std::env;

#[cfg(feature = "postgres")]
use blog_infra::DatabaseConfig;
#[cfg(feature = "smtp")]
use blog_infra::SmtpConfig;

/// Where outgoing mail goes.
#[derive(Debug, Clone)]
pub enum EmailBackend {
    /// Log every message instead of sending it.
    Console,
    #[cfg(feature = "smtp")]
    Smtp(SmtpConfig),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub email: EmailBackend,
}

fn parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        #[cfg(feature = "postgres")]
        let database = env::var("DATABASE_URL").ok().map(|url| DatabaseConfig {
            url,
            max_connections: parsed("DB_MAX_CONNECTIONS", 20),
            min_connections: parsed("DB_MIN_CONNECTIONS", 2),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parsed("PORT", 8080),
            #[cfg(feature = "postgres")]
            database,
            email: Self::email_backend(),
        }
    }

    fn email_backend() -> EmailBackend {
        let backend = env::var("EMAIL_BACKEND").unwrap_or_else(|_| "console".to_string());

        match backend.to_lowercase().as_str() {
            #[cfg(feature = "smtp")]
            "smtp" => EmailBackend::Smtp(SmtpConfig {
                host: env::var("SMTP_HOST").unwrap_or_else(|_| "localhost".to_string()),
                port: parsed("SMTP_PORT", 587),
                username: env::var("SMTP_USERNAME").ok(),
                password: env::var("SMTP_PASSWORD").ok(),
            }),
            "console" => EmailBackend::Console,
            other => {
                tracing::warn!(backend = other, "Unknown EMAIL_BACKEND, using console");
                EmailBackend::Console
            }
        }
    }
}
