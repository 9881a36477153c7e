//! # Blog Shared
//!
//! Form types shared by the server and anything that posts to it.
//! Each form deserializes from url-encoded bodies or query strings and
//! validates with field-level messages.

pub mod forms;

pub use forms::{CommentForm, EmailPostForm, Form, FormErrors, SearchForm};
