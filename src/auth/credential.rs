use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Environment variable that overrides the session token file.
pub const TOKEN_ENV: &str = "FORUM_FEED_TOKEN";

/// Bearer token proving the session to the backend.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Source of the current session credential.
pub trait CredentialStore: Send + Sync {
    fn credential(&self) -> Option<Credential>;
}

/// In-memory store scoped to one session; nothing outlives it.
#[derive(Debug, Default)]
pub struct SessionStore {
    token: RwLock<Option<Credential>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential(credential: Credential) -> Self {
        Self {
            token: RwLock::new(Some(credential)),
        }
    }

    pub fn set(&self, credential: Credential) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(credential);
    }

    pub fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}

impl CredentialStore for SessionStore {
    fn credential(&self) -> Option<Credential> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Reads the token saved by the login flow, re-reading on every lookup so a
/// new sign-in is picked up without restarting.
#[derive(Debug, Clone)]
pub struct TokenFileStore {
    path: PathBuf,
    env_override: Option<&'static str>,
}

impl TokenFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_override: None,
        }
    }

    /// Like [`TokenFileStore::new`], but `FORUM_FEED_TOKEN` wins when set.
    pub fn from_env_or_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            env_override: Some(TOKEN_ENV),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for TokenFileStore {
    fn credential(&self) -> Option<Credential> {
        if let Some(var) = self.env_override {
            if let Some(token) = std::env::var(var).ok().and_then(non_empty) {
                return Some(Credential::new(token));
            }
        }

        match fs::read_to_string(&self.path) {
            Ok(content) => non_empty(content).map(Credential::new),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!("Could not read token file {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

fn non_empty(raw: String) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
