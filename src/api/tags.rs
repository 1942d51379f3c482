use std::collections::HashSet;

use async_trait::async_trait;

use crate::api::client::ApiClient;
use crate::auth::Credential;
use crate::error::ApiResult;

/// Known tags offered by the filter control.
#[async_trait]
pub trait TagCatalog: Send + Sync {
    /// Failures are logged and read as no tags; the filter then only offers
    /// "All Tags".
    async fn list_tags(&self, credential: Option<&Credential>) -> Vec<String>;
}

#[derive(Debug, Clone)]
pub struct HttpTagCatalog {
    client: ApiClient,
}

impl HttpTagCatalog {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn fetch_tags(&self, credential: Option<&Credential>) -> ApiResult<Vec<String>> {
        let tags: Vec<String> = self.client.get_json(&["tags"], credential).await?;
        Ok(dedupe_tags(tags))
    }
}

#[async_trait]
impl TagCatalog for HttpTagCatalog {
    async fn list_tags(&self, credential: Option<&Credential>) -> Vec<String> {
        match self.fetch_tags(credential).await {
            Ok(tags) => tags,
            Err(e) => {
                tracing::warn!("Error loading tags: {}", e);
                Vec::new()
            }
        }
    }
}

/// Keeps server order; drops repeats and the empty tag, which would collide
/// with "no tag selected".
pub fn dedupe_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| !tag.is_empty() && seen.insert(tag.clone()))
        .collect()
}
