//! Discussion thread entity

use chrono::{DateTime, Utc};
use kernel::id::{CourseId, DepartmentId, DiscussionId, UserId};

/// Where a thread lives and who it is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscussionScope {
    Course(CourseId),
    Department(DepartmentId),
    General,
}

impl DiscussionScope {
    pub const fn code(&self) -> &'static str {
        match self {
            DiscussionScope::Course(_) => "COURSE",
            DiscussionScope::Department(_) => "DEPARTMENT",
            DiscussionScope::General => "GENERAL",
        }
    }

    pub fn course_id(&self) -> Option<CourseId> {
        match self {
            DiscussionScope::Course(id) => Some(*id),
            _ => None,
        }
    }

    pub fn department_id(&self) -> Option<DepartmentId> {
        match self {
            DiscussionScope::Department(id) => Some(*id),
            _ => None,
        }
    }
}

/// Discussion thread entity
#[derive(Debug, Clone)]
pub struct Discussion {
    pub discussion_id: DiscussionId,
    pub author_id: UserId,
    pub title: String,
    pub content: String,
    pub scope: DiscussionScope,
    pub tags: Vec<String>,
    pub pinned: bool,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author-editable fields
#[derive(Debug, Clone, Default)]
pub struct DiscussionUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Staff-only flags, absent fields stay untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct ModerationUpdate {
    pub pinned: Option<bool>,
    pub resolved: Option<bool>,
}

impl ModerationUpdate {
    pub fn is_empty(&self) -> bool {
        self.pinned.is_none() && self.resolved.is_none()
    }
}

impl Discussion {
    pub fn new(
        author_id: UserId,
        title: String,
        content: String,
        scope: DiscussionScope,
        tags: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            discussion_id: DiscussionId::new(),
            author_id,
            title,
            content,
            scope,
            tags,
            pinned: false,
            resolved: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: DiscussionUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        self.updated_at = Utc::now();
    }

    pub fn moderate(&mut self, update: ModerationUpdate) {
        if let Some(pinned) = update.pinned {
            self.pinned = pinned;
        }
        if let Some(resolved) = update.resolved {
            self.resolved = resolved;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread() -> Discussion {
        Discussion::new(
            UserId::new(),
            "Exam prep".to_string(),
            "Anyone up for a study group?".to_string(),
            DiscussionScope::General,
            vec!["exams".to_string()],
        )
    }

    #[test]
    fn scope_codes_and_ids() {
        let course = CourseId::new();
        let scope = DiscussionScope::Course(course);
        assert_eq!(scope.code(), "COURSE");
        assert_eq!(scope.course_id(), Some(course));
        assert_eq!(scope.department_id(), None);
        assert_eq!(DiscussionScope::General.course_id(), None);
    }

    #[test]
    fn moderation_touches_only_given_flags() {
        let mut d = thread();
        d.moderate(ModerationUpdate {
            pinned: Some(true),
            resolved: None,
        });

        assert!(d.pinned);
        assert!(!d.resolved);
    }

    #[test]
    fn update_replaces_tags() {
        let mut d = thread();
        d.apply(DiscussionUpdate {
            tags: Some(vec!["midterm".to_string(), "week3".to_string()]),
            ..Default::default()
        });

        assert_eq!(d.tags, vec!["midterm", "week3"]);
        assert_eq!(d.title, "Exam prep");
    }
}
