//! Quiz and quiz attempt entities

use chrono::{DateTime, Duration, Utc};
use kernel::id::{CourseId, QuizAttemptId, QuizId, SectionId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Question kinds a quiz can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

/// A single question. The list is stored as JSON on the quiz row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    pub points: i32,
}

/// Quiz entity. Quizzes hang off a course section; the course id is
/// denormalized onto the quiz for ownership and enrollment checks.
#[derive(Debug, Clone)]
pub struct Quiz {
    pub quiz_id: QuizId,
    pub course_id: CourseId,
    pub section_id: SectionId,
    pub title: String,
    pub description: Option<String>,
    pub time_limit_minutes: Option<i32>,
    /// Minimum percentage to pass, 0..=100
    pub passing_score: i32,
    pub max_attempts: Option<i32>,
    pub questions: Vec<QuizQuestion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial quiz update. `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct QuizUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub time_limit_minutes: Option<Option<i32>>,
    pub passing_score: Option<i32>,
    pub max_attempts: Option<Option<i32>>,
    pub questions: Option<Vec<QuizQuestion>>,
}

impl Quiz {
    pub fn new(
        course_id: CourseId,
        section_id: SectionId,
        title: String,
        passing_score: i32,
        questions: Vec<QuizQuestion>,
    ) -> Self {
        let now = Utc::now();
        Self {
            quiz_id: QuizId::new(),
            course_id,
            section_id,
            title,
            description: None,
            time_limit_minutes: None,
            passing_score,
            max_attempts: None,
            questions,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: QuizUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(limit) = update.time_limit_minutes {
            self.time_limit_minutes = limit;
        }
        if let Some(score) = update.passing_score {
            self.passing_score = score;
        }
        if let Some(max) = update.max_attempts {
            self.max_attempts = max;
        }
        if let Some(questions) = update.questions {
            self.questions = questions;
        }
        self.updated_at = Utc::now();
    }
}

/// Answers keyed by question id
pub type AnswerSheet = HashMap<String, String>;

/// One student's run at a quiz. Ongoing until `completed_at` is set.
#[derive(Debug, Clone)]
pub struct QuizAttempt {
    pub attempt_id: QuizAttemptId,
    pub quiz_id: QuizId,
    pub student_id: UserId,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub answers: AnswerSheet,
    pub score_percent: Option<f64>,
    pub passed: Option<bool>,
}

impl QuizAttempt {
    pub fn start(quiz_id: QuizId, student_id: UserId) -> Self {
        Self {
            attempt_id: QuizAttemptId::new(),
            quiz_id,
            student_id,
            started_at: Utc::now(),
            completed_at: None,
            answers: AnswerSheet::new(),
            score_percent: None,
            passed: None,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        self.completed_at.is_none()
    }

    /// Whether the attempt ran past the quiz's time limit
    pub fn expired(&self, time_limit_minutes: Option<i32>, now: DateTime<Utc>) -> bool {
        match time_limit_minutes {
            Some(minutes) => now > self.started_at + Duration::minutes(i64::from(minutes)),
            None => false,
        }
    }

    pub fn complete(&mut self, answers: AnswerSheet, score_percent: f64, passed: bool) {
        self.answers = answers;
        self.score_percent = Some(score_percent);
        self.passed = Some(passed);
        self.completed_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz() -> Quiz {
        Quiz::new(
            CourseId::new(),
            SectionId::new(),
            "Week 1 check".to_string(),
            60,
            vec![],
        )
    }

    #[test]
    fn update_clears_optional_fields() {
        let mut q = quiz();
        q.time_limit_minutes = Some(30);

        q.apply(QuizUpdate {
            time_limit_minutes: Some(None),
            max_attempts: Some(Some(3)),
            ..Default::default()
        });

        assert_eq!(q.time_limit_minutes, None);
        assert_eq!(q.max_attempts, Some(3));
    }

    #[test]
    fn attempt_expiry_follows_time_limit() {
        let attempt = QuizAttempt::start(QuizId::new(), UserId::new());
        let now = attempt.started_at + Duration::minutes(31);

        assert!(attempt.expired(Some(30), now));
        assert!(!attempt.expired(Some(45), now));
        assert!(!attempt.expired(None, now));
    }

    #[test]
    fn completing_records_score_and_closes() {
        let mut attempt = QuizAttempt::start(QuizId::new(), UserId::new());
        assert!(attempt.is_ongoing());

        attempt.complete(AnswerSheet::new(), 75.0, true);

        assert!(!attempt.is_ongoing());
        assert_eq!(attempt.score_percent, Some(75.0));
        assert_eq!(attempt.passed, Some(true));
    }

    #[test]
    fn question_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&QuestionKind::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple-choice\"");
    }
}
