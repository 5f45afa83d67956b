//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use std::sync::Arc;

use kernel::actor::CurrentUser;
use kernel::id::{CommentId, DiscussionId};
use kernel::response;

use crate::application::comments::CommentUseCase;
use crate::application::discussions::DiscussionUseCase;
use crate::application::votes::VoteUseCase;
use crate::domain::repository::{
    CommentRepository, CommunityAccessRepository, DiscussionRepository, VoteRepository,
};
use crate::error::{CommunityError, CommunityResult};
use crate::presentation::dto::{
    CommentResponse, CreateCommentRequest, CreateDiscussionRequest, DiscussionDetailResponse,
    DiscussionListQuery, DiscussionResponse, UpdateCommentRequest, UpdateDiscussionRequest,
    VoteRequest, VoteTallyResponse,
};

/// Everything the community handlers need from persistence
pub trait CommunityRepository:
    DiscussionRepository
    + CommentRepository
    + VoteRepository
    + CommunityAccessRepository
    + Send
    + Sync
    + 'static
{
}

impl<T> CommunityRepository for T where
    T: DiscussionRepository
        + CommentRepository
        + VoteRepository
        + CommunityAccessRepository
        + Send
        + Sync
        + 'static
{
}

/// Shared state for community handlers
pub struct CommunityAppState<R>
where
    R: CommunityRepository,
{
    pub repo: Arc<R>,
}

impl<R: CommunityRepository> Clone for CommunityAppState<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

fn parse_discussion_id(raw: &str) -> CommunityResult<DiscussionId> {
    DiscussionId::parse(raw).map_err(|_| CommunityError::DiscussionNotFound)
}

fn parse_comment_id(raw: &str) -> CommunityResult<CommentId> {
    CommentId::parse(raw).map_err(|_| CommunityError::CommentNotFound)
}

// ============================================================================
// Discussions
// ============================================================================

pub async fn create_discussion<R: CommunityRepository>(
    State(state): State<CommunityAppState<R>>,
    actor: CurrentUser,
    Json(payload): Json<CreateDiscussionRequest>,
) -> CommunityResult<Response> {
    let input = payload.validate().map_err(CommunityError::Validation)?;
    let discussion = DiscussionUseCase::new(state.repo)
        .create(&actor, input.title, input.content, input.scope, input.tags)
        .await?;
    Ok(response::created(DiscussionResponse::from(&discussion)))
}

pub async fn list_discussions<R: CommunityRepository>(
    State(state): State<CommunityAppState<R>>,
    Query(query): Query<DiscussionListQuery>,
) -> CommunityResult<Response> {
    let filter = query.filter().map_err(CommunityError::Validation)?;
    let page = DiscussionUseCase::new(state.repo)
        .list(filter, query.page)
        .await?;

    let body: Vec<DiscussionResponse> = page.discussions.iter().map(Into::into).collect();
    Ok(response::paginated(body, page.total, page.page, page.limit))
}

pub async fn get_discussion<R: CommunityRepository>(
    State(state): State<CommunityAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CommunityResult<Response> {
    let discussion_id = parse_discussion_id(&id)?;
    let detail = DiscussionUseCase::new(state.repo)
        .get(&actor, &discussion_id)
        .await?;
    Ok(response::ok(DiscussionDetailResponse::from(&detail)))
}

pub async fn update_discussion<R: CommunityRepository>(
    State(state): State<CommunityAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateDiscussionRequest>,
) -> CommunityResult<Response> {
    let discussion_id = parse_discussion_id(&id)?;
    let (update, moderation) = payload.validate().map_err(CommunityError::Validation)?;
    let discussion = DiscussionUseCase::new(state.repo)
        .update(&actor, &discussion_id, update, moderation)
        .await?;
    Ok(response::ok(DiscussionResponse::from(&discussion)))
}

pub async fn delete_discussion<R: CommunityRepository>(
    State(state): State<CommunityAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CommunityResult<Response> {
    let discussion_id = parse_discussion_id(&id)?;
    DiscussionUseCase::new(state.repo)
        .delete(&actor, &discussion_id)
        .await?;
    Ok(response::ok(serde_json::json!({ "deleted": true })))
}

// ============================================================================
// Comments
// ============================================================================

pub async fn create_comment<R: CommunityRepository>(
    State(state): State<CommunityAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<CreateCommentRequest>,
) -> CommunityResult<Response> {
    let discussion_id = parse_discussion_id(&id)?;
    let (content, parent_id) = payload.validate().map_err(CommunityError::Validation)?;
    let comment = CommentUseCase::new(state.repo)
        .create(&actor, &discussion_id, parent_id, content)
        .await?;

    // A fresh comment has no votes yet
    let node = crate::application::discussions::CommentWithVotes {
        comment,
        tally: Default::default(),
        own_vote: None,
        replies: Vec::new(),
    };
    Ok(response::created(CommentResponse::from(&node)))
}

pub async fn update_comment<R: CommunityRepository>(
    State(state): State<CommunityAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateCommentRequest>,
) -> CommunityResult<Response> {
    let comment_id = parse_comment_id(&id)?;
    if payload.content.trim().is_empty() {
        return Err(CommunityError::Validation(vec![
            kernel::error::app_error::FieldError::new("content", "This field is required"),
        ]));
    }

    let comment = CommentUseCase::new(state.repo.clone())
        .update(&actor, &comment_id, payload.content.trim().to_string())
        .await?;
    let tally = VoteRepository::tally(&*state.repo, &comment_id).await?;

    let node = crate::application::discussions::CommentWithVotes {
        comment,
        tally,
        own_vote: None,
        replies: Vec::new(),
    };
    Ok(response::ok(CommentResponse::from(&node)))
}

pub async fn delete_comment<R: CommunityRepository>(
    State(state): State<CommunityAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
) -> CommunityResult<Response> {
    let comment_id = parse_comment_id(&id)?;
    CommentUseCase::new(state.repo)
        .delete(&actor, &comment_id)
        .await?;
    Ok(response::ok(serde_json::json!({ "deleted": true })))
}

// ============================================================================
// Votes
// ============================================================================

pub async fn vote_comment<R: CommunityRepository>(
    State(state): State<CommunityAppState<R>>,
    actor: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<VoteRequest>,
) -> CommunityResult<Response> {
    let comment_id = parse_comment_id(&id)?;
    let tally = VoteUseCase::new(state.repo)
        .cast(&actor, &comment_id, payload.value)
        .await?;
    Ok(response::ok(VoteTallyResponse::from(&tally)))
}
