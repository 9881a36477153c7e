mod store;
pub mod trigram;

pub use store::InMemoryBlogStore;
