pub mod client;
pub mod payload;
pub mod posts;
pub mod tags;
pub mod users;

pub use client::ApiClient;
pub use payload::PostsPayload;
pub use posts::{HttpPostRepository, PostRepository};
pub use tags::{HttpTagCatalog, TagCatalog};
