use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use crate::models::Post;

/// Wire shapes accepted for the post feed: a bare array or `{ "posts": [...] }`.
/// Anything else is kept as `Other` and read as an empty feed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PostsPayload {
    Bare(Vec<Value>),
    Envelope { posts: Vec<Value> },
    Other(Value),
}

impl PostsPayload {
    /// Entries that do not parse as a post are skipped, as are repeated ids
    /// (the first occurrence wins).
    pub fn into_posts(self) -> Vec<Post> {
        let entries = match self {
            Self::Bare(entries) | Self::Envelope { posts: entries } => entries,
            Self::Other(value) => {
                tracing::warn!(
                    "Expected an array of posts or {{ posts: [...] }}, got {}",
                    shape(&value)
                );
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Post>(entry) {
                Ok(post) => Some(post),
                Err(e) => {
                    tracing::warn!("Skipping malformed post: {}", e);
                    None
                }
            })
            .filter(|post| {
                let fresh = seen.insert(post.id.clone());
                if !fresh {
                    tracing::warn!("Skipping duplicate post id {}", post.id);
                }
                fresh
            })
            .collect()
    }
}

fn shape(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
