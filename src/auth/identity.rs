use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::auth::credential::Credential;

/// Claims read from a bearer token's payload segment.
///
/// The signature is never checked: these claims only decide what the client
/// displays (whose posts get a delete affordance). The backend authorizes
/// every request on its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    #[serde(deserialize_with = "crate::models::id_string")]
    pub id: String,
}

/// Parse the payload of a JWT without verifying it. Only the second
/// segment is read, so an unsigned `header.payload` token works too.
pub fn decode_claims(token: &str) -> Option<Claims> {
    let Some(segment) = token.split('.').nth(1) else {
        tracing::debug!("Credential is not a JWT (no payload segment)");
        return None;
    };

    let payload = match URL_SAFE_NO_PAD.decode(segment.trim_end_matches('=')) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!("Credential payload is not base64url: {}", e);
            return None;
        }
    };

    match serde_json::from_slice(&payload) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("Credential payload has no usable id claim: {}", e);
            None
        }
    }
}

/// The current visitor. An empty user id means anonymous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    user_id: String,
}

impl Identity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Never fails; a missing or malformed credential resolves to anonymous.
    pub fn resolve(credential: Option<&Credential>) -> Self {
        credential
            .and_then(|c| decode_claims(c.expose()))
            .map(|claims| Self::new(claims.id))
            .unwrap_or_default()
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_empty()
    }
}
