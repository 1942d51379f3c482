pub mod deletion;
pub mod filter;
pub mod page;
pub mod session;
pub mod ui;

pub use deletion::{DeletionError, DeletionState};
pub use filter::FilterCriteria;
pub use page::{FeedView, ForumPage, PageEvent, PostCard, TagOption};
pub use session::{DeleteOutcome, FeedServices, ForumSession};
pub use ui::{ConfirmDialog, Navigator, Notification, NotificationKind, Notifier, Route};
