use serde::{Deserialize, Serialize};

/// The message handed to the notifier after a like commits. Also returned to
/// the liker as confirmation of what was dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct LikeNotification {
    pub(crate) post_title: String,
    pub(crate) author_username: String,
    pub(crate) author_email: String,
    pub(crate) liker_username: String,
}
