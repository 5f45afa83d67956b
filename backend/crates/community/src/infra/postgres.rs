//! PostgreSQL Repository Implementation

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use kernel::id::{CommentId, CourseId, DepartmentId, DiscussionId, UserId};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::entity::comment::Comment;
use crate::domain::entity::discussion::{Discussion, DiscussionScope};
use crate::domain::entity::vote::VoteTally;
use crate::domain::repository::{
    CommentRepository, CommunityAccessRepository, DiscussionFilter, DiscussionRepository,
    VoteRepository,
};
use crate::error::{CommunityError, CommunityResult};

const DISCUSSION_COLUMNS: &str = "discussion_id, author_id, title, content, scope, course_id, \
     department_id, tags, pinned, resolved, created_at, updated_at";

const COMMENT_COLUMNS: &str =
    "comment_id, discussion_id, author_id, parent_id, content, created_at, updated_at";

/// PostgreSQL-backed community repository
#[derive(Clone)]
pub struct PgCommunityRepository {
    pool: PgPool,
}

impl PgCommunityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Discussions
// ============================================================================

fn push_discussion_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &DiscussionFilter) {
    builder.push(" WHERE TRUE");

    if let Some(course_id) = &filter.course_id {
        builder.push(" AND course_id = ");
        builder.push_bind(*course_id.as_uuid());
    }
    if let Some(department_id) = &filter.department_id {
        builder.push(" AND department_id = ");
        builder.push_bind(*department_id.as_uuid());
    }
    if let Some(tag) = &filter.tag {
        builder.push(" AND ");
        builder.push_bind(tag.clone());
        builder.push(" = ANY(tags)");
    }
    if let Some(resolved) = filter.resolved {
        builder.push(" AND resolved = ");
        builder.push_bind(resolved);
    }
    if let Some(search) = &filter.search {
        let pattern = format!("%{}%", search.replace('%', "\\%").replace('_', "\\_"));
        builder.push(" AND (title ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR content ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }
}

impl DiscussionRepository for PgCommunityRepository {
    async fn create(&self, discussion: &Discussion) -> CommunityResult<()> {
        sqlx::query(
            "INSERT INTO discussions (discussion_id, author_id, title, content, scope, \
             course_id, department_id, tags, pinned, resolved, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(discussion.discussion_id.as_uuid())
        .bind(discussion.author_id.as_uuid())
        .bind(&discussion.title)
        .bind(&discussion.content)
        .bind(discussion.scope.code())
        .bind(discussion.scope.course_id().map(|id| id.into_uuid()))
        .bind(discussion.scope.department_id().map(|id| id.into_uuid()))
        .bind(&discussion.tags)
        .bind(discussion.pinned)
        .bind(discussion.resolved)
        .bind(discussion.created_at)
        .bind(discussion.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        discussion_id: &DiscussionId,
    ) -> CommunityResult<Option<Discussion>> {
        let row = sqlx::query_as::<_, DiscussionRow>(&format!(
            "SELECT {DISCUSSION_COLUMNS} FROM discussions WHERE discussion_id = $1"
        ))
        .bind(discussion_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(DiscussionRow::into_discussion).transpose()
    }

    async fn list(
        &self,
        filter: &DiscussionFilter,
        limit: i64,
        offset: i64,
    ) -> CommunityResult<(Vec<Discussion>, i64)> {
        let mut count_builder = QueryBuilder::new("SELECT COUNT(*) FROM discussions");
        push_discussion_filter(&mut count_builder, filter);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder =
            QueryBuilder::new(format!("SELECT {DISCUSSION_COLUMNS} FROM discussions"));
        push_discussion_filter(&mut builder, filter);
        builder.push(" ORDER BY pinned DESC, created_at DESC LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);

        let rows: Vec<DiscussionRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        let discussions = rows
            .into_iter()
            .map(DiscussionRow::into_discussion)
            .collect::<CommunityResult<Vec<_>>>()?;

        Ok((discussions, total))
    }

    async fn update(&self, discussion: &Discussion) -> CommunityResult<()> {
        sqlx::query(
            "UPDATE discussions SET title = $2, content = $3, tags = $4, pinned = $5, \
             resolved = $6, updated_at = $7 WHERE discussion_id = $1",
        )
        .bind(discussion.discussion_id.as_uuid())
        .bind(&discussion.title)
        .bind(&discussion.content)
        .bind(&discussion.tags)
        .bind(discussion.pinned)
        .bind(discussion.resolved)
        .bind(discussion.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, discussion_id: &DiscussionId) -> CommunityResult<()> {
        sqlx::query("DELETE FROM discussions WHERE discussion_id = $1")
            .bind(discussion_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Comments
// ============================================================================

impl CommentRepository for PgCommunityRepository {
    async fn create(&self, comment: &Comment) -> CommunityResult<()> {
        sqlx::query(
            "INSERT INTO comments (comment_id, discussion_id, author_id, parent_id, content, \
             created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.discussion_id.as_uuid())
        .bind(comment.author_id.as_uuid())
        .bind(comment.parent_id.map(|id| id.into_uuid()))
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, comment_id: &CommentId) -> CommunityResult<Option<Comment>> {
        let row = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE comment_id = $1"
        ))
        .bind(comment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CommentRow::into_comment))
    }

    async fn list_by_discussion(
        &self,
        discussion_id: &DiscussionId,
    ) -> CommunityResult<Vec<Comment>> {
        let rows = sqlx::query_as::<_, CommentRow>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE discussion_id = $1 ORDER BY created_at"
        ))
        .bind(discussion_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CommentRow::into_comment).collect())
    }

    async fn update(&self, comment: &Comment) -> CommunityResult<()> {
        sqlx::query("UPDATE comments SET content = $2, updated_at = $3 WHERE comment_id = $1")
            .bind(comment.comment_id.as_uuid())
            .bind(&comment.content)
            .bind(comment.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, comment_id: &CommentId) -> CommunityResult<()> {
        sqlx::query("DELETE FROM comments WHERE comment_id = $1")
            .bind(comment_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Votes
// ============================================================================

impl VoteRepository for PgCommunityRepository {
    async fn upsert(
        &self,
        user_id: &UserId,
        comment_id: &CommentId,
        value: i16,
    ) -> CommunityResult<()> {
        sqlx::query(
            "INSERT INTO comment_votes (user_id, comment_id, value) VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, comment_id) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(user_id.as_uuid())
        .bind(comment_id.as_uuid())
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove(&self, user_id: &UserId, comment_id: &CommentId) -> CommunityResult<()> {
        sqlx::query("DELETE FROM comment_votes WHERE user_id = $1 AND comment_id = $2")
            .bind(user_id.as_uuid())
            .bind(comment_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn tally(&self, comment_id: &CommentId) -> CommunityResult<VoteTally> {
        let row = sqlx::query_as::<_, TallyRow>(
            "SELECT comment_id, \
             COUNT(*) FILTER (WHERE value > 0) AS upvotes, \
             COUNT(*) FILTER (WHERE value < 0) AS downvotes \
             FROM comment_votes WHERE comment_id = $1 GROUP BY comment_id",
        )
        .bind(comment_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_tally()).unwrap_or_default())
    }

    async fn tallies_for_discussion(
        &self,
        discussion_id: &DiscussionId,
    ) -> CommunityResult<HashMap<CommentId, VoteTally>> {
        let rows = sqlx::query_as::<_, TallyRow>(
            "SELECT v.comment_id, \
             COUNT(*) FILTER (WHERE v.value > 0) AS upvotes, \
             COUNT(*) FILTER (WHERE v.value < 0) AS downvotes \
             FROM comment_votes v \
             JOIN comments c ON c.comment_id = v.comment_id \
             WHERE c.discussion_id = $1 GROUP BY v.comment_id",
        )
        .bind(discussion_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (CommentId::from_uuid(r.comment_id), r.into_tally()))
            .collect())
    }

    async fn own_votes(
        &self,
        user_id: &UserId,
        discussion_id: &DiscussionId,
    ) -> CommunityResult<HashMap<CommentId, i16>> {
        let rows = sqlx::query_as::<_, OwnVoteRow>(
            "SELECT v.comment_id, v.value FROM comment_votes v \
             JOIN comments c ON c.comment_id = v.comment_id \
             WHERE v.user_id = $1 AND c.discussion_id = $2",
        )
        .bind(user_id.as_uuid())
        .bind(discussion_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| (CommentId::from_uuid(r.comment_id), r.value))
            .collect())
    }
}

// ============================================================================
// Cross-domain access (reads catalog tables)
// ============================================================================

impl CommunityAccessRepository for PgCommunityRepository {
    async fn course_exists(&self, course_id: &CourseId) -> CommunityResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM courses WHERE course_id = $1)",
        )
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn department_exists(&self, department_id: &DepartmentId) -> CommunityResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE department_id = $1)",
        )
        .bind(department_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn is_enrolled(
        &self,
        student_id: &UserId,
        course_id: &CourseId,
    ) -> CommunityResult<bool> {
        let enrolled = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE student_id = $1 AND course_id = $2)",
        )
        .bind(student_id.as_uuid())
        .bind(course_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(enrolled)
    }
}

// ============================================================================
// Row types
// ============================================================================

#[derive(sqlx::FromRow)]
struct DiscussionRow {
    discussion_id: Uuid,
    author_id: Uuid,
    title: String,
    content: String,
    scope: String,
    course_id: Option<Uuid>,
    department_id: Option<Uuid>,
    tags: Vec<String>,
    pinned: bool,
    resolved: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DiscussionRow {
    fn into_discussion(self) -> CommunityResult<Discussion> {
        let scope = match (self.scope.as_str(), self.course_id, self.department_id) {
            ("COURSE", Some(course_id), _) => {
                DiscussionScope::Course(CourseId::from_uuid(course_id))
            }
            ("DEPARTMENT", _, Some(department_id)) => {
                DiscussionScope::Department(DepartmentId::from_uuid(department_id))
            }
            ("GENERAL", _, _) => DiscussionScope::General,
            (other, _, _) => {
                return Err(CommunityError::Internal(format!(
                    "Corrupt discussion scope: {other}"
                )));
            }
        };

        Ok(Discussion {
            discussion_id: DiscussionId::from_uuid(self.discussion_id),
            author_id: UserId::from_uuid(self.author_id),
            title: self.title,
            content: self.content,
            scope,
            tags: self.tags,
            pinned: self.pinned,
            resolved: self.resolved,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    comment_id: Uuid,
    discussion_id: Uuid,
    author_id: Uuid,
    parent_id: Option<Uuid>,
    content: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            comment_id: CommentId::from_uuid(self.comment_id),
            discussion_id: DiscussionId::from_uuid(self.discussion_id),
            author_id: UserId::from_uuid(self.author_id),
            parent_id: self.parent_id.map(CommentId::from_uuid),
            content: self.content,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct TallyRow {
    comment_id: Uuid,
    upvotes: i64,
    downvotes: i64,
}

impl TallyRow {
    fn into_tally(self) -> VoteTally {
        VoteTally {
            upvotes: self.upvotes,
            downvotes: self.downvotes,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OwnVoteRow {
    comment_id: Uuid,
    value: i16,
}
