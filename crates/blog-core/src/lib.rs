//! # Blog Core
//!
//! The domain layer of the blog.
//! Entities, pagination, the ports infrastructure must implement, and the
//! [`BlogService`] that drives every page. No I/O happens here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::{DomainError, RepoError};
pub use service::BlogService;
