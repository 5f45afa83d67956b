//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::error::app_error::FieldError;
use kernel::id::{CommentId, CourseId, DepartmentId};
use kernel::page::PageQuery;
use serde::{Deserialize, Serialize};

use crate::application::discussions::{CommentWithVotes, DiscussionDetail};
use crate::domain::entity::discussion::{
    Discussion, DiscussionScope, DiscussionUpdate, ModerationUpdate,
};
use crate::domain::entity::vote::VoteTally;
use crate::domain::repository::DiscussionFilter;

fn non_empty(value: &str, field: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, "This field is required"));
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned
}

// ============================================================================
// Discussions
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiscussionRequest {
    pub title: String,
    pub content: String,
    pub scope: String,
    pub course_id: Option<String>,
    pub department_id: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Validated discussion creation payload
#[derive(Debug)]
pub struct CreateDiscussionInput {
    pub title: String,
    pub content: String,
    pub scope: DiscussionScope,
    pub tags: Vec<String>,
}

impl CreateDiscussionRequest {
    pub fn validate(self) -> Result<CreateDiscussionInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        let title = non_empty(&self.title, "title", &mut errors);
        let content = non_empty(&self.content, "content", &mut errors);

        let scope = match self.scope.to_uppercase().as_str() {
            "COURSE" => match &self.course_id {
                Some(raw) => CourseId::parse(raw)
                    .map(DiscussionScope::Course)
                    .map_err(|_| errors.push(FieldError::new("courseId", "Invalid course id")))
                    .ok(),
                None => {
                    errors.push(FieldError::new(
                        "courseId",
                        "Course-scoped threads need a course id",
                    ));
                    None
                }
            },
            "DEPARTMENT" => match &self.department_id {
                Some(raw) => DepartmentId::parse(raw)
                    .map(DiscussionScope::Department)
                    .map_err(|_| {
                        errors.push(FieldError::new("departmentId", "Invalid department id"))
                    })
                    .ok(),
                None => {
                    errors.push(FieldError::new(
                        "departmentId",
                        "Department-scoped threads need a department id",
                    ));
                    None
                }
            },
            "GENERAL" => Some(DiscussionScope::General),
            _ => {
                errors.push(FieldError::new(
                    "scope",
                    "Scope must be COURSE, DEPARTMENT or GENERAL",
                ));
                None
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(CreateDiscussionInput {
            title: title.unwrap(),
            content: content.unwrap(),
            scope: scope.unwrap(),
            tags: clean_tags(self.tags),
        })
    }
}

/// Query string for discussion listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionListQuery {
    #[serde(flatten)]
    pub page: PageQuery,
    pub course_id: Option<String>,
    pub department_id: Option<String>,
    pub tag: Option<String>,
    /// `open` or `resolved`
    pub status: Option<String>,
    pub search: Option<String>,
}

impl DiscussionListQuery {
    pub fn filter(&self) -> Result<DiscussionFilter, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut filter = DiscussionFilter::default();

        if let Some(raw) = &self.course_id {
            match CourseId::parse(raw) {
                Ok(id) => filter.course_id = Some(id),
                Err(_) => errors.push(FieldError::new("courseId", "Invalid course id")),
            }
        }
        if let Some(raw) = &self.department_id {
            match DepartmentId::parse(raw) {
                Ok(id) => filter.department_id = Some(id),
                Err(_) => errors.push(FieldError::new("departmentId", "Invalid department id")),
            }
        }
        if let Some(status) = &self.status {
            match status.to_lowercase().as_str() {
                "open" => filter.resolved = Some(false),
                "resolved" => filter.resolved = Some(true),
                _ => errors.push(FieldError::new("status", "Status must be open or resolved")),
            }
        }
        filter.tag = self
            .tag
            .as_ref()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty());
        filter.search = self
            .search
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(filter)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDiscussionRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub pinned: Option<bool>,
    pub resolved: Option<bool>,
}

impl UpdateDiscussionRequest {
    pub fn validate(self) -> Result<(DiscussionUpdate, ModerationUpdate), Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut update = DiscussionUpdate {
            tags: self.tags.map(clean_tags),
            ..Default::default()
        };

        if let Some(title) = self.title {
            update.title = non_empty(&title, "title", &mut errors);
        }
        if let Some(content) = self.content {
            update.content = non_empty(&content, "content", &mut errors);
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok((
            update,
            ModerationUpdate {
                pinned: self.pinned,
                resolved: self.resolved,
            },
        ))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionResponse {
    pub id: String,
    pub author_id: String,
    pub title: String,
    pub content: String,
    pub scope: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    pub tags: Vec<String>,
    pub pinned: bool,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Discussion> for DiscussionResponse {
    fn from(d: &Discussion) -> Self {
        Self {
            id: d.discussion_id.to_string(),
            author_id: d.author_id.to_string(),
            title: d.title.clone(),
            content: d.content.clone(),
            scope: d.scope.code().to_string(),
            course_id: d.scope.course_id().map(|id| id.to_string()),
            department_id: d.scope.department_id().map(|id| id.to_string()),
            tags: d.tags.clone(),
            pinned: d.pinned,
            resolved: d.resolved,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

// ============================================================================
// Comments and votes
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_id: Option<String>,
}

impl CreateCommentRequest {
    pub fn validate(self) -> Result<(String, Option<CommentId>), Vec<FieldError>> {
        let mut errors = Vec::new();

        let content = non_empty(&self.content, "content", &mut errors);
        let parent_id = match &self.parent_id {
            Some(raw) => CommentId::parse(raw)
                .map(Some)
                .map_err(|_| errors.push(FieldError::new("parentId", "Invalid comment id")))
                .ok()
                .flatten(),
            None => None,
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok((content.unwrap(), parent_id))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub value: i16,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTallyResponse {
    pub upvotes: i64,
    pub downvotes: i64,
    pub score: i64,
}

impl From<&VoteTally> for VoteTallyResponse {
    fn from(t: &VoteTally) -> Self {
        Self {
            upvotes: t.upvotes,
            downvotes: t.downvotes,
            score: t.score(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: String,
    pub discussion_id: String,
    pub author_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    pub content: String,
    pub votes: VoteTallyResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_vote: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub replies: Vec<CommentResponse>,
}

impl From<&CommentWithVotes> for CommentResponse {
    fn from(node: &CommentWithVotes) -> Self {
        Self {
            id: node.comment.comment_id.to_string(),
            discussion_id: node.comment.discussion_id.to_string(),
            author_id: node.comment.author_id.to_string(),
            parent_id: node.comment.parent_id.map(|id| id.to_string()),
            content: node.comment.content.clone(),
            votes: VoteTallyResponse::from(&node.tally),
            my_vote: node.own_vote,
            created_at: node.comment.created_at,
            replies: node.replies.iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionDetailResponse {
    #[serde(flatten)]
    pub discussion: DiscussionResponse,
    pub comments: Vec<CommentResponse>,
}

impl From<&DiscussionDetail> for DiscussionDetailResponse {
    fn from(detail: &DiscussionDetail) -> Self {
        Self {
            discussion: DiscussionResponse::from(&detail.discussion),
            comments: detail.comments.iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_scope_requires_course_id() {
        let req = CreateDiscussionRequest {
            title: "Help".to_string(),
            content: "Question about recursion".to_string(),
            scope: "course".to_string(),
            course_id: None,
            department_id: None,
            tags: vec![],
        };
        let errors = req.validate().unwrap_err();
        assert_eq!(errors[0].field, "courseId");
    }

    #[test]
    fn tags_are_normalized_and_deduped() {
        let req = CreateDiscussionRequest {
            title: "Help".to_string(),
            content: "Question".to_string(),
            scope: "GENERAL".to_string(),
            course_id: None,
            department_id: None,
            tags: vec![
                " Exams ".to_string(),
                "exams".to_string(),
                "".to_string(),
                "week3".to_string(),
            ],
        };
        let input = req.validate().unwrap();
        assert_eq!(input.tags, vec!["exams", "week3"]);
    }

    #[test]
    fn status_filter_maps_to_resolved_flag() {
        let query = DiscussionListQuery {
            status: Some("open".to_string()),
            ..Default::default()
        };
        assert_eq!(query.filter().unwrap().resolved, Some(false));

        let query = DiscussionListQuery {
            status: Some("archived".to_string()),
            ..Default::default()
        };
        assert!(query.filter().is_err());
    }

    #[test]
    fn moderation_flags_split_from_content_edit() {
        let req = UpdateDiscussionRequest {
            pinned: Some(true),
            ..Default::default()
        };
        let (update, moderation) = req.validate().unwrap();

        assert!(update.title.is_none() && update.content.is_none() && update.tags.is_none());
        assert_eq!(moderation.pinned, Some(true));
        assert!(!moderation.is_empty());
    }
}
