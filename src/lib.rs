// Library exports for forum-feed
// This allows integration tests and the binary to share the page core

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod render;
pub mod terminal;
