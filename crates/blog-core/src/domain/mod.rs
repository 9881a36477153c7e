//! Domain entities - the core business objects.

mod comment;
mod page;
mod post;
mod tag;
mod user;

pub use comment::{Comment, NewComment};
pub use page::{Page, num_pages, resolve_page_number};
pub use post::{Post, PostStatus, SearchHit, slugify};
pub use tag::Tag;
pub use user::User;
