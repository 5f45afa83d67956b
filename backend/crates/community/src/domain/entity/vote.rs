//! Comment votes

use kernel::id::{CommentId, UserId};

/// A single up or down vote, unique per user and comment
#[derive(Debug, Clone, Copy)]
pub struct Vote {
    pub user_id: UserId,
    pub comment_id: CommentId,
    /// +1 or -1
    pub value: i16,
}

/// Aggregated votes for one comment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub upvotes: i64,
    pub downvotes: i64,
}

impl VoteTally {
    pub fn score(&self) -> i64 {
        self.upvotes - self.downvotes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_up_minus_down() {
        let tally = VoteTally {
            upvotes: 7,
            downvotes: 3,
        };
        assert_eq!(tally.score(), 4);
        assert_eq!(VoteTally::default().score(), 0);
    }
}
