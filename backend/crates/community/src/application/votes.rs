//! Comment voting

use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::error::app_error::FieldError;
use kernel::id::CommentId;

use crate::domain::entity::vote::VoteTally;
use crate::domain::repository::{CommentRepository, VoteRepository};
use crate::error::{CommunityError, CommunityResult};

pub struct VoteUseCase<R> {
    repo: Arc<R>,
}

impl<R> VoteUseCase<R>
where
    R: VoteRepository + CommentRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Cast a vote. `1` and `-1` upsert, `0` withdraws. Returns the
    /// refreshed tally.
    pub async fn cast(
        &self,
        actor: &CurrentUser,
        comment_id: &CommentId,
        value: i16,
    ) -> CommunityResult<VoteTally> {
        if !matches!(value, -1 | 0 | 1) {
            return Err(CommunityError::Validation(vec![FieldError::new(
                "value",
                "Vote must be -1, 0 or 1",
            )]));
        }

        CommentRepository::find_by_id(&*self.repo, comment_id)
            .await?
            .ok_or(CommunityError::CommentNotFound)?;

        if value == 0 {
            self.repo.remove(&actor.id, comment_id).await?;
        } else {
            self.repo.upsert(&actor.id, comment_id, value).await?;
        }

        self.repo.tally(comment_id).await
    }
}
