// Shared stub backend for the integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{delete, get};
use axum::Router;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use forum_feed::api::ApiClient;
use forum_feed::auth::Credential;
use forum_feed::config::ApiConfig;

/// Canned responses plus a record of what the client sent.
pub struct Stub {
    pub posts: Mutex<(StatusCode, String)>,
    pub tags: Mutex<(StatusCode, String)>,
    pub delete_status: Mutex<StatusCode>,
    pub deleted: Mutex<Vec<(String, Option<String>)>>,
    pub authorization: Mutex<Vec<Option<String>>>,
}

impl Default for Stub {
    fn default() -> Self {
        Self {
            posts: Mutex::new((StatusCode::OK, "[]".to_string())),
            tags: Mutex::new((StatusCode::OK, "[]".to_string())),
            delete_status: Mutex::new(StatusCode::NO_CONTENT),
            deleted: Mutex::new(Vec::new()),
            authorization: Mutex::new(Vec::new()),
        }
    }
}

impl Stub {
    pub fn set_posts(&self, status: StatusCode, body: impl Into<String>) {
        *self.posts.lock().unwrap() = (status, body.into());
    }

    pub fn set_tags(&self, status: StatusCode, body: impl Into<String>) {
        *self.tags.lock().unwrap() = (status, body.into());
    }

    pub fn set_delete_status(&self, status: StatusCode) {
        *self.delete_status.lock().unwrap() = status;
    }

    pub fn deleted(&self) -> Vec<(String, Option<String>)> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn authorization(&self) -> Vec<Option<String>> {
        self.authorization.lock().unwrap().clone()
    }

    fn record(&self, headers: &HeaderMap) -> Option<String> {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.authorization.lock().unwrap().push(value.clone());
        value
    }
}

async fn list_posts(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> (StatusCode, String) {
    stub.record(&headers);
    stub.posts.lock().unwrap().clone()
}

async fn list_tags(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> (StatusCode, String) {
    stub.record(&headers);
    stub.tags.lock().unwrap().clone()
}

async fn delete_post(
    State(stub): State<Arc<Stub>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> StatusCode {
    let auth = stub.record(&headers);
    stub.deleted.lock().unwrap().push((id, auth));
    *stub.delete_status.lock().unwrap()
}

async fn user_profile(Path(id): Path<String>) -> (StatusCode, String) {
    (
        StatusCode::OK,
        format!(r#"{{"id":"{}","name":"Ana","email":"ana@example.org"}}"#, id),
    )
}

/// Serve the stub on an ephemeral port. Returns its base URL.
pub async fn serve(stub: Arc<Stub>) -> String {
    let app = Router::new()
        .route("/api/posts", get(list_posts))
        .route("/api/posts/{id}", delete(delete_post))
        .route("/api/tags", get(list_tags))
        .route("/api/users/{id}", get(user_profile))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

pub fn client(base_url: &str) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

/// An unsigned JWT whose `id` claim is `user_id`.
pub fn token_for(user_id: &str) -> Credential {
    Credential::new(format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(format!(r#"{{"id":"{}"}}"#, user_id))
    ))
}
