//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use std::collections::HashMap;

use kernel::id::{CommentId, CourseId, DepartmentId, DiscussionId, UserId};

use crate::domain::entity::comment::Comment;
use crate::domain::entity::discussion::Discussion;
use crate::domain::entity::vote::VoteTally;
use crate::error::CommunityResult;

/// Filters for discussion listing
#[derive(Debug, Clone, Default)]
pub struct DiscussionFilter {
    pub course_id: Option<CourseId>,
    pub department_id: Option<DepartmentId>,
    pub tag: Option<String>,
    /// `Some(true)` resolved only, `Some(false)` open only
    pub resolved: Option<bool>,
    /// Substring match over title and content
    pub search: Option<String>,
}

/// Discussion repository trait
#[trait_variant::make(DiscussionRepository: Send)]
pub trait LocalDiscussionRepository {
    async fn create(&self, discussion: &Discussion) -> CommunityResult<()>;

    async fn find_by_id(&self, discussion_id: &DiscussionId)
    -> CommunityResult<Option<Discussion>>;

    /// Pinned threads first, newest first within each group. Returns
    /// the page plus the total row count.
    async fn list(
        &self,
        filter: &DiscussionFilter,
        limit: i64,
        offset: i64,
    ) -> CommunityResult<(Vec<Discussion>, i64)>;

    async fn update(&self, discussion: &Discussion) -> CommunityResult<()>;

    async fn delete(&self, discussion_id: &DiscussionId) -> CommunityResult<()>;
}

/// Comment repository trait
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    async fn create(&self, comment: &Comment) -> CommunityResult<()>;

    async fn find_by_id(&self, comment_id: &CommentId) -> CommunityResult<Option<Comment>>;

    /// All comments of a thread, oldest first
    async fn list_by_discussion(
        &self,
        discussion_id: &DiscussionId,
    ) -> CommunityResult<Vec<Comment>>;

    async fn update(&self, comment: &Comment) -> CommunityResult<()>;

    async fn delete(&self, comment_id: &CommentId) -> CommunityResult<()>;
}

/// Vote repository trait
#[trait_variant::make(VoteRepository: Send)]
pub trait LocalVoteRepository {
    /// Insert or replace the caller's vote
    async fn upsert(
        &self,
        user_id: &UserId,
        comment_id: &CommentId,
        value: i16,
    ) -> CommunityResult<()>;

    async fn remove(&self, user_id: &UserId, comment_id: &CommentId) -> CommunityResult<()>;

    async fn tally(&self, comment_id: &CommentId) -> CommunityResult<VoteTally>;

    /// Tallies for a whole thread keyed by comment, missing entries
    /// mean zero votes
    async fn tallies_for_discussion(
        &self,
        discussion_id: &DiscussionId,
    ) -> CommunityResult<HashMap<CommentId, VoteTally>>;

    /// The caller's votes within a thread
    async fn own_votes(
        &self,
        user_id: &UserId,
        discussion_id: &DiscussionId,
    ) -> CommunityResult<HashMap<CommentId, i16>>;
}

/// Course and department facts the community flows need
#[trait_variant::make(CommunityAccessRepository: Send)]
pub trait LocalCommunityAccessRepository {
    async fn course_exists(&self, course_id: &CourseId) -> CommunityResult<bool>;

    async fn department_exists(&self, department_id: &DepartmentId) -> CommunityResult<bool>;

    async fn is_enrolled(&self, student_id: &UserId, course_id: &CourseId)
    -> CommunityResult<bool>;
}
