//! Assignment and submission entities

use chrono::{DateTime, Utc};
use kernel::id::{AssignmentId, CourseId, SectionId, SubmissionId, UserId};

/// Assignment entity, course-scoped with an optional section
#[derive(Debug, Clone)]
pub struct Assignment {
    pub assignment_id: AssignmentId,
    pub course_id: CourseId,
    pub section_id: Option<SectionId>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_score: i32,
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial assignment update. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct AssignmentUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub max_score: Option<i32>,
    pub file_url: Option<Option<String>>,
    pub section_id: Option<Option<SectionId>>,
}

impl Assignment {
    pub fn new(course_id: CourseId, title: String, max_score: i32) -> Self {
        let now = Utc::now();
        Self {
            assignment_id: AssignmentId::new(),
            course_id,
            section_id: None,
            title,
            description: None,
            due_date: None,
            max_score,
            file_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: AssignmentUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(max_score) = update.max_score {
            self.max_score = max_score;
        }
        if let Some(file_url) = update.file_url {
            self.file_url = file_url;
        }
        if let Some(section_id) = update.section_id {
            self.section_id = section_id;
        }
        self.updated_at = Utc::now();
    }

    /// Whether submissions are still accepted at `now`
    pub fn accepts_submissions(&self, now: DateTime<Utc>) -> bool {
        match self.due_date {
            Some(due) => now <= due,
            None => true,
        }
    }
}

/// Submission lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStatus {
    Submitted,
    Graded,
}

impl SubmissionStatus {
    pub const fn code(&self) -> &'static str {
        match self {
            SubmissionStatus::Submitted => "SUBMITTED",
            SubmissionStatus::Graded => "GRADED",
        }
    }

    pub fn try_from_code(code: &str) -> Option<Self> {
        match code {
            "SUBMITTED" => Some(SubmissionStatus::Submitted),
            "GRADED" => Some(SubmissionStatus::Graded),
            _ => None,
        }
    }
}

/// One student's submission, unique per assignment
#[derive(Debug, Clone)]
pub struct AssignmentSubmission {
    pub submission_id: SubmissionId,
    pub assignment_id: AssignmentId,
    pub student_id: UserId,
    pub text: Option<String>,
    pub file_url: Option<String>,
    pub status: SubmissionStatus,
    pub score: Option<i32>,
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AssignmentSubmission {
    pub fn new(
        assignment_id: AssignmentId,
        student_id: UserId,
        text: Option<String>,
        file_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            submission_id: SubmissionId::new(),
            assignment_id,
            student_id,
            text,
            file_url,
            status: SubmissionStatus::Submitted,
            score: None,
            feedback: None,
            submitted_at: now,
            updated_at: now,
        }
    }

    /// Overwrite content and reset any previous grade
    pub fn resubmit(&mut self, text: Option<String>, file_url: Option<String>) {
        self.text = text;
        self.file_url = file_url;
        self.status = SubmissionStatus::Submitted;
        self.score = None;
        self.feedback = None;
        self.submitted_at = Utc::now();
        self.updated_at = self.submitted_at;
    }

    pub fn grade(&mut self, score: i32, feedback: Option<String>) {
        self.score = Some(score);
        self.feedback = feedback;
        self.status = SubmissionStatus::Graded;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn due_date_gates_submissions() {
        let mut assignment = Assignment::new(CourseId::new(), "Lab 1".to_string(), 100);
        let now = Utc::now();

        assert!(assignment.accepts_submissions(now));

        assignment.due_date = Some(now - Duration::hours(1));
        assert!(!assignment.accepts_submissions(now));

        assignment.due_date = Some(now + Duration::hours(1));
        assert!(assignment.accepts_submissions(now));
    }

    #[test]
    fn resubmission_resets_grade() {
        let mut submission = AssignmentSubmission::new(
            AssignmentId::new(),
            UserId::new(),
            Some("first draft".to_string()),
            None,
        );
        submission.grade(80, Some("Good work".to_string()));
        assert_eq!(submission.status, SubmissionStatus::Graded);

        submission.resubmit(Some("second draft".to_string()), None);

        assert_eq!(submission.status, SubmissionStatus::Submitted);
        assert_eq!(submission.score, None);
        assert_eq!(submission.feedback, None);
        assert_eq!(submission.text.as_deref(), Some("second draft"));
    }

    #[test]
    fn status_codes_round_trip() {
        for status in [SubmissionStatus::Submitted, SubmissionStatus::Graded] {
            assert_eq!(SubmissionStatus::try_from_code(status.code()), Some(status));
        }
        assert_eq!(SubmissionStatus::try_from_code("PENDING"), None);
    }
}
