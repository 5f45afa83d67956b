//! Comments on discussion threads

use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::id::{CommentId, DiscussionId};

use crate::domain::entity::comment::Comment;
use crate::domain::repository::{CommentRepository, DiscussionRepository};
use crate::error::{CommunityError, CommunityResult};

pub struct CommentUseCase<R> {
    repo: Arc<R>,
}

impl<R> CommentUseCase<R>
where
    R: CommentRepository + DiscussionRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Post a comment or a reply. Replying to a reply is rejected to
    /// keep threads one level deep.
    pub async fn create(
        &self,
        actor: &CurrentUser,
        discussion_id: &DiscussionId,
        parent_id: Option<CommentId>,
        content: String,
    ) -> CommunityResult<Comment> {
        DiscussionRepository::find_by_id(&*self.repo, discussion_id)
            .await?
            .ok_or(CommunityError::DiscussionNotFound)?;

        if let Some(parent_id) = &parent_id {
            let parent = CommentRepository::find_by_id(&*self.repo, parent_id)
                .await?
                .ok_or(CommunityError::CommentNotFound)?;

            if parent.discussion_id != *discussion_id {
                return Err(CommunityError::CommentNotFound);
            }
            if parent.is_reply() {
                return Err(CommunityError::ReplyDepthExceeded);
            }
        }

        let comment = Comment::new(*discussion_id, actor.id, parent_id, content);
        CommentRepository::create(&*self.repo, &comment).await?;

        tracing::info!(
            comment_id = %comment.comment_id,
            discussion_id = %discussion_id,
            "Comment posted"
        );
        Ok(comment)
    }

    pub async fn update(
        &self,
        actor: &CurrentUser,
        comment_id: &CommentId,
        content: String,
    ) -> CommunityResult<Comment> {
        let mut comment = self.require(comment_id).await?;

        if !actor.owns_or_admin(comment.author_id) {
            return Err(CommunityError::Forbidden);
        }

        comment.edit(content);
        CommentRepository::update(&*self.repo, &comment).await?;

        Ok(comment)
    }

    pub async fn delete(&self, actor: &CurrentUser, comment_id: &CommentId) -> CommunityResult<()> {
        let comment = self.require(comment_id).await?;

        if !actor.owns_or_admin(comment.author_id) {
            return Err(CommunityError::Forbidden);
        }

        CommentRepository::delete(&*self.repo, comment_id).await?;

        tracing::info!(comment_id = %comment_id, "Comment deleted");
        Ok(())
    }

    async fn require(&self, comment_id: &CommentId) -> CommunityResult<Comment> {
        CommentRepository::find_by_id(&*self.repo, comment_id)
            .await?
            .ok_or(CommunityError::CommentNotFound)
    }
}
