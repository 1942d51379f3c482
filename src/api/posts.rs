use async_trait::async_trait;

use crate::api::client::ApiClient;
use crate::api::payload::PostsPayload;
use crate::auth::Credential;
use crate::error::ApiResult;
use crate::models::Post;

/// Source of the post feed and sink for deletions.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// The whole feed, in server order. Failures are logged and read as an
    /// empty feed so the page stays usable.
    async fn list_posts(&self, credential: Option<&Credential>) -> Vec<Post>;

    /// Succeeds only on a 2xx response. Never retried.
    async fn delete_post(&self, id: &str, credential: Option<&Credential>) -> ApiResult<()>;
}

#[derive(Debug, Clone)]
pub struct HttpPostRepository {
    client: ApiClient,
}

impl HttpPostRepository {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// `GET /api/posts` without the degrade-to-empty policy.
    pub async fn fetch_posts(&self, credential: Option<&Credential>) -> ApiResult<Vec<Post>> {
        let payload: PostsPayload = self.client.get_json(&["posts"], credential).await?;
        Ok(payload.into_posts())
    }
}

#[async_trait]
impl PostRepository for HttpPostRepository {
    async fn list_posts(&self, credential: Option<&Credential>) -> Vec<Post> {
        match self.fetch_posts(credential).await {
            Ok(posts) => {
                tracing::debug!(count = posts.len(), "Loaded posts");
                posts
            }
            Err(e) => {
                tracing::warn!("Error fetching posts: {}", e);
                Vec::new()
            }
        }
    }

    async fn delete_post(&self, id: &str, credential: Option<&Credential>) -> ApiResult<()> {
        self.client.delete(&["posts", id], credential).await?;
        tracing::info!(post_id = id, "Deleted post");
        Ok(())
    }
}
