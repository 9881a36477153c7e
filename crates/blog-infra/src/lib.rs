//! # Blog Infrastructure
//!
//! Concrete implementations of the ports defined in `blog-core`.
//! This crate contains the PostgreSQL repositories, the in-memory store and
//! the mail transports.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store and console mail only
//! - `postgres` - PostgreSQL repositories via SeaORM (trigram search needs `pg_trgm`)
//! - `smtp` - SMTP delivery via lettre

pub mod database;
pub mod mail;
pub mod memory;

// Re-exports - In-Memory
pub use mail::{ConsoleMailer, InMemoryMailer};
pub use memory::InMemoryBlogStore;

#[cfg(feature = "postgres")]
pub use database::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "smtp")]
pub use mail::{SmtpConfig, SmtpMailer};
