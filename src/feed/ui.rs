//! Boundaries to the collaborators the page talks to but does not own:
//! notifications, the confirmation dialog and navigation.

use std::fmt;

use async_trait::async_trait;

pub const CONFIRM_DELETE_MESSAGE: &str = "Are you sure you want to delete this post?";
pub const DELETE_SUCCESS_MESSAGE: &str = "Post deleted successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

#[async_trait]
pub trait ConfirmDialog: Send + Sync {
    /// Resolves to `true` only on explicit confirmation.
    async fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Post(String),
    AddPost,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Post(id) => format!("/post/{}", id),
            Route::AddPost => "/add-post".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: &Route);
}
