use tokio_util::sync::CancellationToken;

use crate::auth::Identity;
use crate::error::ApiResult;
use crate::feed::deletion::{remove_post, DeletionError, DeletionState};
use crate::feed::filter::{self, FilterCriteria};
use crate::feed::ui::{Notification, DELETE_SUCCESS_MESSAGE};
use crate::models::Post;

/// Label of the filter option that clears the tag selection.
pub const ALL_TAGS_LABEL: &str = "All Tags";

/// Completion of one of the page's asynchronous operations.
#[derive(Debug)]
pub enum PageEvent {
    TagsLoaded(Vec<String>),
    PostsLoaded(Vec<Post>),
    DeleteFinished {
        post_id: String,
        result: ApiResult<()>,
    },
}

impl PageEvent {
    fn name(&self) -> &'static str {
        match self {
            Self::TagsLoaded(_) => "TagsLoaded",
            Self::PostsLoaded(_) => "PostsLoaded",
            Self::DeleteFinished { .. } => "DeleteFinished",
        }
    }
}

/// One rendered post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostCard {
    pub id: String,
    pub author: String,
    pub time_ago: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub replies_count: u32,
    pub can_delete: bool,
}

impl PostCard {
    pub fn tag_line(&self) -> String {
        self.tags.join(", ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOption {
    /// `None` for "All Tags"
    pub value: Option<String>,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedView {
    Loading,
    Ready(Vec<PostCard>),
}

/// State of the forum page: the fetched collections, who is looking, what
/// they filter on and where the delete workflow stands.
///
/// All mutation goes through `&mut self`; completions arrive as
/// [`PageEvent`]s and are ignored once the page is torn down.
#[derive(Debug)]
pub struct ForumPage {
    posts: Option<Vec<Post>>,
    tags: Vec<String>,
    identity: Identity,
    criteria: FilterCriteria,
    deletion: DeletionState,
    lifetime: CancellationToken,
}

impl Default for ForumPage {
    fn default() -> Self {
        Self::new(Identity::anonymous())
    }
}

impl ForumPage {
    pub fn new(identity: Identity) -> Self {
        Self {
            posts: None,
            tags: Vec::new(),
            identity,
            criteria: FilterCriteria::default(),
            deletion: DeletionState::default(),
            lifetime: CancellationToken::new(),
        }
    }

    // --- Lifecycle ---

    /// Token cancelled on teardown; in-flight work races against it.
    pub fn lifetime(&self) -> CancellationToken {
        self.lifetime.clone()
    }

    pub fn teardown(&self) {
        self.lifetime.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.lifetime.is_cancelled()
    }

    /// Apply a completion. Returns the notification to show, if any.
    pub fn apply(&mut self, event: PageEvent) -> Option<Notification> {
        if self.is_torn_down() {
            tracing::debug!("Ignoring {} after teardown", event.name());
            return None;
        }

        match event {
            PageEvent::TagsLoaded(tags) => {
                self.tags = tags;
                None
            }
            PageEvent::PostsLoaded(posts) => {
                self.posts = Some(posts);
                self.drop_stale_request();
                None
            }
            PageEvent::DeleteFinished { post_id, result } => self.finish_delete(&post_id, result),
        }
    }

    // --- Accessors ---

    pub fn is_loading(&self) -> bool {
        self.posts.is_none()
    }

    /// The held collection in fetch order; empty while loading.
    pub fn posts(&self) -> &[Post] {
        self.posts.as_deref().unwrap_or_default()
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn deletion(&self) -> &DeletionState {
        &self.deletion
    }

    // --- Inputs ---

    /// Recompute ownership for a changed credential. A pending request for a
    /// post the new identity does not own is dropped.
    pub fn set_identity(&mut self, identity: Identity) {
        self.identity = identity;
        self.drop_stale_request();
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.criteria.set_search(term);
    }

    pub fn select_tag(&mut self, tag: Option<&str>) {
        self.criteria.select_tag(tag);
    }

    // --- Derived view ---

    pub fn can_delete(&self, post: &Post) -> bool {
        post.is_owned_by(&self.identity)
    }

    /// Filtered posts, newest first.
    pub fn visible_posts(&self) -> Vec<&Post> {
        filter::filter(self.posts(), &self.criteria)
    }

    pub fn view(&self) -> FeedView {
        if self.is_loading() {
            return FeedView::Loading;
        }
        let cards = self
            .visible_posts()
            .into_iter()
            .map(|post| self.card(post))
            .collect();
        FeedView::Ready(cards)
    }

    pub fn tag_options(&self) -> Vec<TagOption> {
        let selected = self.criteria.selected_tag();
        let mut options = vec![TagOption {
            value: None,
            label: ALL_TAGS_LABEL.to_string(),
            selected: selected.is_none(),
        }];
        options.extend(self.tags.iter().map(|tag| TagOption {
            value: Some(tag.clone()),
            label: tag_label(tag),
            selected: selected == Some(tag.as_str()),
        }));
        options
    }

    fn card(&self, post: &Post) -> PostCard {
        PostCard {
            id: post.id.clone(),
            author: post.author_name().to_string(),
            time_ago: post.time_ago.clone(),
            title: post.title.clone(),
            content: post.content.clone(),
            tags: post
                .tags
                .iter()
                .flatten()
                .map(|tag| tag_label(tag))
                .collect(),
            replies_count: post.replies_count,
            can_delete: self.can_delete(post),
        }
    }

    // --- Deletion workflow ---

    /// Ask to delete a post. Only the author's own posts qualify.
    pub fn request_delete(&mut self, post_id: &str) -> Result<(), DeletionError> {
        if self.is_torn_down() {
            return Err(DeletionError::Closed);
        }
        let post = self
            .posts()
            .iter()
            .find(|post| post.id == post_id)
            .ok_or_else(|| DeletionError::UnknownPost(post_id.to_string()))?;
        if !self.can_delete(post) {
            return Err(DeletionError::NotOwned(post_id.to_string()));
        }

        self.deletion = self.deletion.request(post_id)?;
        Ok(())
    }

    pub fn cancel_delete(&mut self) -> Result<(), DeletionError> {
        self.deletion = self.deletion.cancel()?;
        Ok(())
    }

    /// Move the pending request to `Deleting`. Returns the id the caller
    /// must send to the repository.
    pub fn confirm_delete(&mut self) -> Result<String, DeletionError> {
        if self.is_torn_down() {
            return Err(DeletionError::Closed);
        }
        let (next, post_id) = self.deletion.confirm()?;
        self.deletion = next;
        Ok(post_id)
    }

    fn finish_delete(&mut self, post_id: &str, result: ApiResult<()>) -> Option<Notification> {
        match self.deletion.finish(post_id) {
            Ok(next) => self.deletion = next,
            Err(e) => tracing::warn!("{}", e),
        }

        match result {
            Ok(()) => {
                if let Some(posts) = self.posts.as_mut() {
                    remove_post(posts, post_id);
                }
                Some(Notification::success(DELETE_SUCCESS_MESSAGE))
            }
            Err(e) => {
                tracing::warn!(post_id, "Delete failed: {}", e);
                Some(Notification::error(e.delete_failure_message()))
            }
        }
    }

    fn drop_stale_request(&mut self) {
        let Some(post_id) = self.deletion.pending_post() else {
            return;
        };
        let still_owned = self
            .posts()
            .iter()
            .any(|post| post.id == post_id && self.can_delete(post));
        if !still_owned {
            tracing::debug!(post_id, "Dropping delete request for a post no longer owned");
            self.deletion = DeletionState::Idle;
        }
    }
}

/// Display form of a tag: the first underscore reads as a space.
pub fn tag_label(tag: &str) -> String {
    tag.replacen('_', " ", 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::feed::ui::NotificationKind;
    use crate::models::Author;

    fn post(id: &str, author: Option<&str>, tags: &[&str]) -> Post {
        Post {
            id: id.to_string(),
            title: format!("Title {}", id),
            content: format!("Content {}", id),
            time_ago: "1h ago".to_string(),
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
            author: author.map(|id| Author {
                id: id.to_string(),
                name: format!("Name {}", id),
            }),
            replies_count: 2,
        }
    }

    fn loaded_page(identity: &str) -> ForumPage {
        let mut page = ForumPage::new(Identity::new(identity));
        page.apply(PageEvent::PostsLoaded(vec![
            post("a", Some("u1"), &["math"]),
            post("b", Some("u1"), &["art"]),
            post("c", Some("u2"), &["math"]),
            post("d", None, &[]),
        ]));
        page
    }

    fn card_ids(page: &ForumPage) -> Vec<String> {
        match page.view() {
            FeedView::Ready(cards) => cards.into_iter().map(|c| c.id).collect(),
            FeedView::Loading => panic!("page still loading"),
        }
    }

    #[test]
    fn loading_until_posts_arrive() {
        let mut page = ForumPage::default();
        assert_eq!(page.view(), FeedView::Loading);

        page.apply(PageEvent::TagsLoaded(vec!["math".into()]));
        assert!(page.is_loading());

        page.apply(PageEvent::PostsLoaded(Vec::new()));
        assert_eq!(page.view(), FeedView::Ready(Vec::new()));
    }

    #[test]
    fn view_is_newest_first_with_ownership_flags() {
        let page = loaded_page("u1");
        let FeedView::Ready(cards) = page.view() else {
            panic!("page still loading");
        };
        let flags: Vec<(&str, bool)> = cards
            .iter()
            .map(|c| (c.id.as_str(), c.can_delete))
            .collect();
        assert_eq!(flags, [("d", false), ("c", false), ("b", true), ("a", true)]);
        assert_eq!(cards[0].author, "Anonymous");
    }

    #[test]
    fn anonymous_visitor_sees_no_delete_affordance() {
        let page = loaded_page("");
        assert!(page.posts().iter().all(|p| !page.can_delete(p)));
    }

    #[test]
    fn filters_apply_before_and_after_load() {
        let mut page = ForumPage::new(Identity::new("u1"));
        page.select_tag(Some("math"));
        page.apply(PageEvent::PostsLoaded(vec![
            post("a", Some("u1"), &["math"]),
            post("b", Some("u1"), &["art"]),
        ]));
        assert_eq!(card_ids(&page), ["a"]);

        page.select_tag(None);
        page.set_search("title b");
        assert_eq!(card_ids(&page), ["b"]);
    }

    #[test]
    fn tag_options_start_with_all_tags() {
        let mut page = ForumPage::default();
        page.apply(PageEvent::TagsLoaded(vec!["math".into(), "cs_intro_101".into()]));
        page.select_tag(Some("math"));

        let options = page.tag_options();
        assert_eq!(options.len(), 3);
        assert_eq!(options[0].label, ALL_TAGS_LABEL);
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert_eq!(options[2].label, "cs intro_101");
        assert_eq!(options[2].value.as_deref(), Some("cs_intro_101"));
    }

    #[test]
    fn request_delete_is_ownership_gated() {
        let mut page = loaded_page("u1");
        assert_eq!(
            page.request_delete("c"),
            Err(DeletionError::NotOwned("c".into()))
        );
        assert_eq!(
            page.request_delete("d"),
            Err(DeletionError::NotOwned("d".into()))
        );
        assert_eq!(
            page.request_delete("zz"),
            Err(DeletionError::UnknownPost("zz".into()))
        );
        assert!(page.deletion().is_idle());

        page.request_delete("a").unwrap();
        assert_eq!(page.deletion().pending_post(), Some("a"));
    }

    #[test]
    fn successful_delete_removes_exactly_one_post() {
        let mut page = loaded_page("u1");
        page.request_delete("b").unwrap();
        let post_id = page.confirm_delete().unwrap();
        assert_eq!(post_id, "b");

        let notification = page
            .apply(PageEvent::DeleteFinished {
                post_id,
                result: Ok(()),
            })
            .unwrap();

        assert_eq!(notification.kind, NotificationKind::Success);
        assert_eq!(notification.message, DELETE_SUCCESS_MESSAGE);
        let ids: Vec<&str> = page.posts().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["a", "c", "d"]);
        assert!(page.deletion().is_idle());
    }

    #[test]
    fn failed_delete_keeps_collection() {
        let mut page = loaded_page("u1");
        page.request_delete("a").unwrap();
        let post_id = page.confirm_delete().unwrap();

        let notification = page
            .apply(PageEvent::DeleteFinished {
                post_id,
                result: Err(ApiError::Status {
                    status: 500,
                    message: String::new(),
                }),
            })
            .unwrap();

        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(notification.message, "Could not delete the post.");
        assert_eq!(page.posts().len(), 4);
        assert!(page.deletion().is_idle());
    }

    #[test]
    fn cancel_leaves_collection_untouched() {
        let mut page = loaded_page("u1");
        page.request_delete("a").unwrap();
        page.cancel_delete().unwrap();
        assert!(page.deletion().is_idle());
        assert_eq!(page.posts().len(), 4);
    }

    #[test]
    fn no_second_confirmation_while_deleting() {
        let mut page = loaded_page("u1");
        page.request_delete("a").unwrap();
        page.confirm_delete().unwrap();

        assert_eq!(
            page.request_delete("a"),
            Err(DeletionError::InFlight("a".into()))
        );
        assert_eq!(page.confirm_delete(), Err(DeletionError::InFlight("a".into())));
    }

    #[test]
    fn identity_change_drops_pending_request() {
        let mut page = loaded_page("u1");
        page.request_delete("a").unwrap();

        page.set_identity(Identity::new("u2"));
        assert!(page.deletion().is_idle());
        assert!(!page.can_delete(&page.posts()[0]));
    }

    #[test]
    fn refetch_replaces_collection_and_drops_vanished_request() {
        let mut page = loaded_page("u1");
        page.request_delete("a").unwrap();

        page.apply(PageEvent::PostsLoaded(vec![post("x", Some("u1"), &[])]));
        let ids: Vec<&str> = page.posts().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["x"]);
        assert!(page.deletion().is_idle());
    }

    #[test]
    fn torn_down_page_ignores_late_completions() {
        let mut page = ForumPage::new(Identity::new("u1"));
        page.teardown();

        assert!(page
            .apply(PageEvent::PostsLoaded(vec![post("a", Some("u1"), &[])]))
            .is_none());
        assert!(page.is_loading());
        assert_eq!(page.request_delete("a"), Err(DeletionError::Closed));
    }

    #[test]
    fn delete_completion_after_teardown_is_dropped() {
        let mut page = loaded_page("u1");
        page.request_delete("a").unwrap();
        let post_id = page.confirm_delete().unwrap();
        page.teardown();

        let notification = page.apply(PageEvent::DeleteFinished {
            post_id,
            result: Ok(()),
        });
        assert!(notification.is_none());
        assert_eq!(page.posts().len(), 4);
    }

    #[test]
    fn tag_label_replaces_first_underscore() {
        assert_eq!(tag_label("linear_algebra"), "linear algebra");
        assert_eq!(tag_label("a_b_c"), "a b_c");
        assert_eq!(tag_label("math"), "math");
    }
}
