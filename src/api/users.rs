use crate::api::client::ApiClient;
use crate::auth::Credential;
use crate::error::ApiResult;
use crate::models::UserProfile;

impl ApiClient {
    /// `GET /api/users/{id}`
    pub async fn fetch_profile(
        &self,
        user_id: &str,
        credential: Option<&Credential>,
    ) -> ApiResult<UserProfile> {
        self.get_json(&["users", user_id], credential).await
    }
}
