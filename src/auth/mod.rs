pub mod credential;
pub mod identity;

pub use credential::{Credential, CredentialStore, SessionStore, TokenFileStore};
pub use identity::{decode_claims, Claims, Identity};
