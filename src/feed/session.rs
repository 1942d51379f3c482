//! Drives a [`ForumPage`] against real collaborators: spawns the fetches and
//! the delete call, then feeds their completions back into the page one at
//! a time.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::{PostRepository, TagCatalog};
use crate::auth::{Credential, CredentialStore, Identity};
use crate::feed::deletion::{DeletionError, DeletionState};
use crate::feed::page::{ForumPage, PageEvent};
use crate::feed::ui::{
    ConfirmDialog, Notification, NotificationKind, Notifier, CONFIRM_DELETE_MESSAGE,
};

/// Backends the session reads from and writes to.
#[derive(Clone)]
pub struct FeedServices {
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagCatalog>,
    pub credentials: Arc<dyn CredentialStore>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined the confirmation
    Cancelled,
    Deleted,
    /// The backend refused or could not be reached; carries the message shown
    Failed(String),
}

pub struct ForumSession {
    page: ForumPage,
    services: FeedServices,
    notifier: Arc<dyn Notifier>,
    events_tx: mpsc::UnboundedSender<PageEvent>,
    events_rx: mpsc::UnboundedReceiver<PageEvent>,
    in_flight: usize,
}

impl ForumSession {
    pub fn new(services: FeedServices, notifier: Arc<dyn Notifier>) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            page: ForumPage::default(),
            services,
            notifier,
            events_tx,
            events_rx,
            in_flight: 0,
        }
    }

    pub fn page(&self) -> &ForumPage {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut ForumPage {
        &mut self.page
    }

    pub fn lifetime(&self) -> CancellationToken {
        self.page.lifetime()
    }

    /// Close the page. Work still in flight is abandoned and its results
    /// never reach the page.
    pub fn teardown(&mut self) {
        self.page.teardown();
        self.in_flight = 0;
    }

    /// Resolve the visitor and start both fetches concurrently.
    pub fn activate(&mut self) {
        let credential = self.refresh_identity();
        tracing::debug!(
            user_id = self.page.identity().user_id(),
            "Activating forum page"
        );

        let tags = self.services.tags.clone();
        let tag_credential = credential.clone();
        self.spawn(async move {
            PageEvent::TagsLoaded(tags.list_tags(tag_credential.as_ref()).await)
        });

        let posts = self.services.posts.clone();
        self.spawn(async move {
            PageEvent::PostsLoaded(posts.list_posts(credential.as_ref()).await)
        });
    }

    /// Re-read the credential and recompute ownership from it.
    pub fn refresh_identity(&mut self) -> Option<Credential> {
        let credential = self.services.credentials.credential();
        self.page.set_identity(Identity::resolve(credential.as_ref()));
        credential
    }

    /// Apply the next completion. Returns `false` when nothing is left in
    /// flight or the page has been torn down.
    pub async fn process_next(&mut self) -> bool {
        match self.next_event().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    /// Process completions until the post list has arrived.
    pub async fn wait_until_loaded(&mut self) -> bool {
        while self.page.is_loading() {
            if !self.process_next().await {
                return false;
            }
        }
        true
    }

    /// Process completions until nothing is in flight.
    pub async fn settle(&mut self) {
        while self.process_next().await {}
    }

    pub fn request_delete(&mut self, post_id: &str) -> Result<(), DeletionError> {
        self.page.request_delete(post_id)
    }

    pub fn cancel_delete(&mut self) -> Result<(), DeletionError> {
        self.page.cancel_delete()
    }

    /// Confirm the pending request and send the delete. Ownership is checked
    /// again against the current credential; without one, or when it no
    /// longer owns the post, the request is abandoned and nothing is sent.
    pub fn confirm_delete(&mut self) -> Result<String, DeletionError> {
        let Some(credential) = self.services.credentials.credential() else {
            return Err(self.abandon_unauthenticated());
        };

        // The credential may belong to someone else by now
        let pending = self.page.deletion().pending_post().map(str::to_string);
        self.page.set_identity(Identity::resolve(Some(&credential)));
        if let Some(pending) = pending {
            if self.page.deletion().is_idle() {
                return Err(DeletionError::NotOwned(pending));
            }
        }

        let post_id = self.page.confirm_delete()?;
        tracing::debug!(post_id = %post_id, "Sending delete");

        let posts = self.services.posts.clone();
        let id = post_id.clone();
        self.spawn(async move {
            let result = posts.delete_post(&id, Some(&credential)).await;
            PageEvent::DeleteFinished { post_id: id, result }
        });
        Ok(post_id)
    }

    /// The whole workflow for one post: request, ask, and if confirmed
    /// delete and wait for the outcome.
    pub async fn delete_with_confirmation(
        &mut self,
        post_id: &str,
        dialog: &dyn ConfirmDialog,
    ) -> Result<DeleteOutcome, DeletionError> {
        self.request_delete(post_id)?;

        let lifetime = self.lifetime();
        let confirmed = tokio::select! {
            _ = lifetime.cancelled() => return Err(DeletionError::Closed),
            answer = dialog.confirm(CONFIRM_DELETE_MESSAGE) => answer,
        };
        if !confirmed {
            self.cancel_delete()?;
            return Ok(DeleteOutcome::Cancelled);
        }

        let post_id = self.confirm_delete()?;
        while let Some(event) = self.next_event().await {
            let finished =
                matches!(&event, PageEvent::DeleteFinished { post_id: id, .. } if *id == post_id);
            let notification = self.dispatch(event);
            if finished {
                return match notification {
                    Some(n) if n.kind == NotificationKind::Success => Ok(DeleteOutcome::Deleted),
                    Some(n) => Ok(DeleteOutcome::Failed(n.message)),
                    None => Err(DeletionError::Closed),
                };
            }
        }
        Err(DeletionError::Closed)
    }

    fn spawn<F>(&mut self, work: F)
    where
        F: Future<Output = PageEvent> + Send + 'static,
    {
        let events = self.events_tx.clone();
        let lifetime = self.page.lifetime();
        self.in_flight += 1;

        tokio::spawn(async move {
            tokio::select! {
                _ = lifetime.cancelled() => {
                    tracing::debug!("Page torn down, abandoning request");
                }
                event = work => {
                    // Receiver gone means the session was dropped
                    let _ = events.send(event);
                }
            }
        });
    }

    async fn next_event(&mut self) -> Option<PageEvent> {
        if self.in_flight == 0 || self.page.is_torn_down() {
            return None;
        }
        let lifetime = self.page.lifetime();
        let event = tokio::select! {
            biased;
            _ = lifetime.cancelled() => None,
            event = self.events_rx.recv() => event,
        };
        match event {
            Some(event) => {
                self.in_flight -= 1;
                Some(event)
            }
            None => {
                self.in_flight = 0;
                None
            }
        }
    }

    fn dispatch(&mut self, event: PageEvent) -> Option<Notification> {
        let notification = self.page.apply(event)?;
        self.notifier.notify(&notification);
        Some(notification)
    }

    fn abandon_unauthenticated(&mut self) -> DeletionError {
        if self.page.is_torn_down() {
            return DeletionError::Closed;
        }
        match self.page.deletion().clone() {
            DeletionState::PendingConfirmation { post_id } => {
                tracing::warn!(post_id = %post_id, "Not signed in, dropping delete request");
                match self.page.cancel_delete() {
                    Ok(()) => DeletionError::SignedOut,
                    Err(e) => e,
                }
            }
            DeletionState::Deleting { post_id } => DeletionError::InFlight(post_id),
            DeletionState::Idle => DeletionError::NothingPending,
        }
    }
}
