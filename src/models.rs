use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::auth::Identity;

/// Shown in place of the author name for posts without one.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Pre-formatted by the server ("3h ago"), displayed as-is.
    #[serde(default)]
    pub time_ago: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default, alias = "user")]
    pub author: Option<Author>,
    #[serde(default)]
    pub replies_count: u32,
}

impl Post {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags
            .as_ref()
            .is_some_and(|tags| tags.iter().any(|t| t == tag))
    }

    /// True only when the post has an author and that author is the
    /// (non-anonymous) identity.
    pub fn is_owned_by(&self, identity: &Identity) -> bool {
        if identity.is_anonymous() {
            return false;
        }
        self.author
            .as_ref()
            .is_some_and(|author| author.id == identity.user_id())
    }

    pub fn author_name(&self) -> &str {
        match &self.author {
            Some(author) if !author.name.is_empty() => &author.name,
            _ => ANONYMOUS_AUTHOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Accepts ids sent either as JSON strings or as numbers.
pub(crate) fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or numeric id, got {}",
            other
        ))),
    }
}
