// Confirm-then-delete state machine. Pure: transitions never touch the
// network or the post collection.
use crate::models::Post;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeletionState {
    #[default]
    Idle,

    /// Waiting for the user to confirm or cancel
    PendingConfirmation { post_id: String },

    /// Confirmed; the delete request is in flight
    Deleting { post_id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeletionError {
    #[error("Post {0} is not in the feed")]
    UnknownPost(String),

    #[error("Post {0} does not belong to the current user")]
    NotOwned(String),

    #[error("No deletion is waiting for confirmation")]
    NothingPending,

    #[error("Post {0} is already being deleted")]
    InFlight(String),

    #[error("Not signed in")]
    SignedOut,

    #[error("The page has been closed")]
    Closed,

    #[error("{0}")]
    InvalidTransition(String),
}

impl DeletionState {
    /// Get state name for debugging/logging
    pub fn state_name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::PendingConfirmation { .. } => "PendingConfirmation",
            Self::Deleting { .. } => "Deleting",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn pending_post(&self) -> Option<&str> {
        match self {
            Self::PendingConfirmation { post_id } => Some(post_id),
            _ => None,
        }
    }

    pub fn deleting_post(&self) -> Option<&str> {
        match self {
            Self::Deleting { post_id } => Some(post_id),
            _ => None,
        }
    }

    /// Transition: Idle | PendingConfirmation → PendingConfirmation.
    /// A new request replaces the pending target.
    pub fn request(&self, post_id: impl Into<String>) -> Result<Self, DeletionError> {
        match self {
            Self::Idle | Self::PendingConfirmation { .. } => Ok(Self::PendingConfirmation {
                post_id: post_id.into(),
            }),
            Self::Deleting { post_id } => Err(DeletionError::InFlight(post_id.clone())),
        }
    }

    /// Transition: PendingConfirmation → Idle. Cancelling while idle is a no-op.
    pub fn cancel(&self) -> Result<Self, DeletionError> {
        match self {
            Self::Deleting { post_id } => Err(DeletionError::InFlight(post_id.clone())),
            _ => Ok(Self::Idle),
        }
    }

    /// Transition: PendingConfirmation → Deleting.
    /// Returns the id of the post to delete.
    pub fn confirm(&self) -> Result<(Self, String), DeletionError> {
        match self {
            Self::PendingConfirmation { post_id } => Ok((
                Self::Deleting {
                    post_id: post_id.clone(),
                },
                post_id.clone(),
            )),
            Self::Idle => Err(DeletionError::NothingPending),
            Self::Deleting { post_id } => Err(DeletionError::InFlight(post_id.clone())),
        }
    }

    /// Transition: Deleting → Idle, whatever the outcome.
    pub fn finish(&self, post_id: &str) -> Result<Self, DeletionError> {
        match self {
            Self::Deleting { post_id: current } if current == post_id => Ok(Self::Idle),
            other => Err(DeletionError::InvalidTransition(format!(
                "Cannot finish deleting {} from {} state",
                post_id,
                other.state_name()
            ))),
        }
    }
}

/// Removes exactly the post with `id`, keeping the others in order.
pub fn remove_post(posts: &mut Vec<Post>, id: &str) -> Option<Post> {
    posts
        .iter()
        .position(|post| post.id == id)
        .map(|index| posts.remove(index))
}
