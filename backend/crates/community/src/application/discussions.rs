//! Discussion thread management.
//!
//! Repository methods are called fully qualified since one store backs
//! several traits with overlapping method names.

use std::collections::HashMap;
use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::id::{CommentId, DiscussionId};
use kernel::page::PageQuery;

use crate::domain::entity::comment::Comment;
use crate::domain::entity::discussion::{
    Discussion, DiscussionScope, DiscussionUpdate, ModerationUpdate,
};
use crate::domain::entity::vote::VoteTally;
use crate::domain::repository::{
    CommentRepository, CommunityAccessRepository, DiscussionFilter, DiscussionRepository,
    VoteRepository,
};
use crate::error::{CommunityError, CommunityResult};

/// A comment with its vote tallies and the viewer's own vote
pub struct CommentWithVotes {
    pub comment: Comment,
    pub tally: VoteTally,
    pub own_vote: Option<i16>,
    pub replies: Vec<CommentWithVotes>,
}

/// A full thread as served to the client
pub struct DiscussionDetail {
    pub discussion: Discussion,
    pub comments: Vec<CommentWithVotes>,
}

pub struct DiscussionPage {
    pub discussions: Vec<Discussion>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

pub struct DiscussionUseCase<R> {
    repo: Arc<R>,
}

impl<R> DiscussionUseCase<R>
where
    R: DiscussionRepository + CommentRepository + VoteRepository + CommunityAccessRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Open a thread. Course-scoped threads require enrollment unless
    /// the author is staff.
    pub async fn create(
        &self,
        actor: &CurrentUser,
        title: String,
        content: String,
        scope: DiscussionScope,
        tags: Vec<String>,
    ) -> CommunityResult<Discussion> {
        match scope {
            DiscussionScope::Course(course_id) => {
                if !self.repo.course_exists(&course_id).await? {
                    return Err(CommunityError::DiscussionNotFound);
                }
                if !actor.role.is_educator_or_admin()
                    && !self.repo.is_enrolled(&actor.id, &course_id).await?
                {
                    return Err(CommunityError::EnrollmentRequired);
                }
            }
            DiscussionScope::Department(department_id) => {
                if !self.repo.department_exists(&department_id).await? {
                    return Err(CommunityError::DiscussionNotFound);
                }
            }
            DiscussionScope::General => {}
        }

        let discussion = Discussion::new(actor.id, title, content, scope, tags);
        DiscussionRepository::create(&*self.repo, &discussion).await?;

        tracing::info!(
            discussion_id = %discussion.discussion_id,
            scope = discussion.scope.code(),
            "Discussion created"
        );
        Ok(discussion)
    }

    pub async fn list(
        &self,
        filter: DiscussionFilter,
        page: PageQuery,
    ) -> CommunityResult<DiscussionPage> {
        let (discussions, total) = self
            .repo
            .list(&filter, page.limit(), page.offset())
            .await?;

        Ok(DiscussionPage {
            discussions,
            total,
            page: page.page(),
            limit: page.limit(),
        })
    }

    /// Thread with its comment tree, tallies and the viewer's votes
    pub async fn get(
        &self,
        actor: &CurrentUser,
        discussion_id: &DiscussionId,
    ) -> CommunityResult<DiscussionDetail> {
        let discussion = self.require(discussion_id).await?;

        let comments = self.repo.list_by_discussion(discussion_id).await?;
        let tallies = self.repo.tallies_for_discussion(discussion_id).await?;
        let own = self.repo.own_votes(&actor.id, discussion_id).await?;

        Ok(DiscussionDetail {
            discussion,
            comments: build_tree(comments, &tallies, &own),
        })
    }

    /// Author edit plus staff moderation in one call. Content changes
    /// need the author or an admin, pin/resolve need staff.
    pub async fn update(
        &self,
        actor: &CurrentUser,
        discussion_id: &DiscussionId,
        update: DiscussionUpdate,
        moderation: ModerationUpdate,
    ) -> CommunityResult<Discussion> {
        let mut discussion = self.require(discussion_id).await?;

        let edits_content =
            update.title.is_some() || update.content.is_some() || update.tags.is_some();
        if edits_content && !actor.owns_or_admin(discussion.author_id) {
            return Err(CommunityError::Forbidden);
        }
        if !moderation.is_empty() && !actor.role.is_educator_or_admin() {
            return Err(CommunityError::Forbidden);
        }

        discussion.apply(update);
        discussion.moderate(moderation);
        DiscussionRepository::update(&*self.repo, &discussion).await?;

        Ok(discussion)
    }

    pub async fn delete(
        &self,
        actor: &CurrentUser,
        discussion_id: &DiscussionId,
    ) -> CommunityResult<()> {
        let discussion = self.require(discussion_id).await?;

        if !actor.owns_or_admin(discussion.author_id) {
            return Err(CommunityError::Forbidden);
        }

        DiscussionRepository::delete(&*self.repo, discussion_id).await?;

        tracing::info!(discussion_id = %discussion_id, "Discussion deleted");
        Ok(())
    }

    async fn require(&self, discussion_id: &DiscussionId) -> CommunityResult<Discussion> {
        DiscussionRepository::find_by_id(&*self.repo, discussion_id)
            .await?
            .ok_or(CommunityError::DiscussionNotFound)
    }
}

/// Group replies under their top-level parents, both levels oldest
/// first
fn build_tree(
    comments: Vec<Comment>,
    tallies: &HashMap<CommentId, VoteTally>,
    own: &HashMap<CommentId, i16>,
) -> Vec<CommentWithVotes> {
    let mut roots: Vec<CommentWithVotes> = Vec::new();
    let mut replies: Vec<Comment> = Vec::new();

    for comment in comments {
        if comment.is_reply() {
            replies.push(comment);
        } else {
            roots.push(node(comment, tallies, own));
        }
    }

    for reply in replies {
        let Some(parent_id) = reply.parent_id else {
            continue;
        };
        if let Some(parent) = roots
            .iter_mut()
            .find(|r| r.comment.comment_id == parent_id)
        {
            parent.replies.push(node(reply, tallies, own));
        }
        // Orphans (parent deleted concurrently) are dropped
    }

    roots
}

fn node(
    comment: Comment,
    tallies: &HashMap<CommentId, VoteTally>,
    own: &HashMap<CommentId, i16>,
) -> CommentWithVotes {
    let tally = tallies.get(&comment.comment_id).copied().unwrap_or_default();
    let own_vote = own.get(&comment.comment_id).copied();
    CommentWithVotes {
        comment,
        tally,
        own_vote,
        replies: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::id::{DiscussionId, UserId};

    fn comment(discussion: DiscussionId, parent: Option<CommentId>) -> Comment {
        Comment::new(discussion, UserId::new(), parent, "text".to_string())
    }

    #[test]
    fn tree_nests_replies_one_level() {
        let discussion = DiscussionId::new();
        let root_a = comment(discussion, None);
        let root_b = comment(discussion, None);
        let reply = comment(discussion, Some(root_a.comment_id));
        let root_a_id = root_a.comment_id;

        let tree = build_tree(
            vec![root_a, root_b, reply],
            &HashMap::new(),
            &HashMap::new(),
        );

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].comment.comment_id, root_a_id);
        assert_eq!(tree[0].replies.len(), 1);
        assert!(tree[1].replies.is_empty());
    }

    #[test]
    fn tree_attaches_tallies_and_own_votes() {
        let discussion = DiscussionId::new();
        let root = comment(discussion, None);
        let id = root.comment_id;

        let mut tallies = HashMap::new();
        tallies.insert(
            id,
            VoteTally {
                upvotes: 3,
                downvotes: 1,
            },
        );
        let mut own = HashMap::new();
        own.insert(id, 1i16);

        let tree = build_tree(vec![root], &tallies, &own);

        assert_eq!(tree[0].tally.score(), 2);
        assert_eq!(tree[0].own_vote, Some(1));
    }

    #[test]
    fn orphaned_replies_are_dropped() {
        let discussion = DiscussionId::new();
        let orphan = comment(discussion, Some(CommentId::new()));

        let tree = build_tree(vec![orphan], &HashMap::new(), &HashMap::new());
        assert!(tree.is_empty());
    }
}
