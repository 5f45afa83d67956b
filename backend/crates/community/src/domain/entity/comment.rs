//! Comment entity

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, DiscussionId, UserId};

/// A comment on a discussion. `parent_id` points at a top-level
/// comment; replies to replies are not allowed.
#[derive(Debug, Clone)]
pub struct Comment {
    pub comment_id: CommentId,
    pub discussion_id: DiscussionId,
    pub author_id: UserId,
    pub parent_id: Option<CommentId>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(
        discussion_id: DiscussionId,
        author_id: UserId,
        parent_id: Option<CommentId>,
        content: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            comment_id: CommentId::new(),
            discussion_id,
            author_id,
            parent_id,
            content,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    pub fn edit(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }
}
