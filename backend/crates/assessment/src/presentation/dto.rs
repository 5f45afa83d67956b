//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::error::app_error::FieldError;
use kernel::id::{CourseId, SectionId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::attempts::AttemptOutcome;
use crate::application::quizzes::QuizView;
use crate::domain::entity::assignment::{Assignment, AssignmentSubmission, AssignmentUpdate};
use crate::domain::entity::quiz::{
    AnswerSheet, QuestionKind, Quiz, QuizAttempt, QuizQuestion, QuizUpdate,
};
use crate::domain::grading::QuestionResult;

/// Distinguishes an absent field ("leave as is") from an explicit null
/// ("clear the value") in PATCH bodies
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

fn non_empty(value: &str, field: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new(field, "This field is required"));
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn check_passing_score(score: i32, errors: &mut Vec<FieldError>) {
    if !(0..=100).contains(&score) {
        errors.push(FieldError::new(
            "passingScore",
            "Passing score must be between 0 and 100",
        ));
    }
}

// ============================================================================
// Quizzes
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionRequest {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    #[serde(default)]
    pub options: Vec<String>,
    pub correct_answer: String,
    pub points: i32,
}

impl QuestionRequest {
    fn validate(self, index: usize, errors: &mut Vec<FieldError>) -> Option<QuizQuestion> {
        let field = |name: &str| format!("questions.{index}.{name}");
        let mut ok = true;

        if self.prompt.trim().is_empty() {
            errors.push(FieldError::new(field("prompt"), "This field is required"));
            ok = false;
        }
        if self.points <= 0 {
            errors.push(FieldError::new(field("points"), "Points must be positive"));
            ok = false;
        }
        match self.kind {
            QuestionKind::MultipleChoice => {
                if self.options.len() < 2 {
                    errors.push(FieldError::new(
                        field("options"),
                        "Multiple-choice questions need at least two options",
                    ));
                    ok = false;
                } else if !self.options.contains(&self.correct_answer) {
                    errors.push(FieldError::new(
                        field("correctAnswer"),
                        "The correct answer must be one of the options",
                    ));
                    ok = false;
                }
            }
            QuestionKind::TrueFalse => {
                if self.correct_answer != "true" && self.correct_answer != "false" {
                    errors.push(FieldError::new(
                        field("correctAnswer"),
                        "True/false answers must be \"true\" or \"false\"",
                    ));
                    ok = false;
                }
            }
            QuestionKind::ShortAnswer => {
                if self.correct_answer.trim().is_empty() {
                    errors.push(FieldError::new(
                        field("correctAnswer"),
                        "This field is required",
                    ));
                    ok = false;
                }
            }
        }

        ok.then(|| QuizQuestion {
            id: self.id,
            prompt: self.prompt.trim().to_string(),
            kind: self.kind,
            options: self.options,
            correct_answer: self.correct_answer,
            points: self.points,
        })
    }
}

fn validate_questions(
    requests: Vec<QuestionRequest>,
    errors: &mut Vec<FieldError>,
) -> Vec<QuizQuestion> {
    if requests.is_empty() {
        errors.push(FieldError::new(
            "questions",
            "A quiz needs at least one question",
        ));
        return Vec::new();
    }

    let mut questions = Vec::with_capacity(requests.len());
    for (index, request) in requests.into_iter().enumerate() {
        if let Some(question) = request.validate(index, errors) {
            questions.push(question);
        }
    }
    questions
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuizRequest {
    pub section_id: String,
    pub title: String,
    pub description: Option<String>,
    pub time_limit_minutes: Option<i32>,
    pub passing_score: i32,
    pub max_attempts: Option<i32>,
    pub questions: Vec<QuestionRequest>,
}

/// Validated quiz creation payload
#[derive(Debug)]
pub struct CreateQuizInput {
    pub section_id: SectionId,
    pub title: String,
    pub passing_score: i32,
    pub questions: Vec<QuizQuestion>,
    pub update: QuizUpdate,
}

impl CreateQuizRequest {
    pub fn validate(self) -> Result<CreateQuizInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        let section_id = SectionId::parse(&self.section_id)
            .map_err(|_| errors.push(FieldError::new("sectionId", "Invalid section id")))
            .ok();
        let title = non_empty(&self.title, "title", &mut errors);
        check_passing_score(self.passing_score, &mut errors);
        if let Some(limit) = self.time_limit_minutes {
            if limit <= 0 {
                errors.push(FieldError::new(
                    "timeLimitMinutes",
                    "Time limit must be positive",
                ));
            }
        }
        if let Some(max) = self.max_attempts {
            if max <= 0 {
                errors.push(FieldError::new("maxAttempts", "Must be positive"));
            }
        }
        let questions = validate_questions(self.questions, &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(CreateQuizInput {
            section_id: section_id.unwrap(),
            title: title.unwrap(),
            passing_score: self.passing_score,
            questions,
            update: QuizUpdate {
                description: Some(self.description.filter(|d| !d.trim().is_empty())),
                time_limit_minutes: Some(self.time_limit_minutes),
                max_attempts: Some(self.max_attempts),
                ..Default::default()
            },
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub time_limit_minutes: Option<Option<i32>>,
    pub passing_score: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub max_attempts: Option<Option<i32>>,
    pub questions: Option<Vec<QuestionRequest>>,
}

impl UpdateQuizRequest {
    pub fn validate(self) -> Result<QuizUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut update = QuizUpdate {
            description: self.description,
            ..Default::default()
        };

        if let Some(title) = self.title {
            update.title = non_empty(&title, "title", &mut errors);
        }
        if let Some(score) = self.passing_score {
            check_passing_score(score, &mut errors);
            update.passing_score = Some(score);
        }
        if let Some(limit) = self.time_limit_minutes {
            if limit.is_some_and(|v| v <= 0) {
                errors.push(FieldError::new(
                    "timeLimitMinutes",
                    "Time limit must be positive",
                ));
            }
            update.time_limit_minutes = Some(limit);
        }
        if let Some(max) = self.max_attempts {
            if max.is_some_and(|v| v <= 0) {
                errors.push(FieldError::new("maxAttempts", "Must be positive"));
            }
            update.max_attempts = Some(max);
        }
        if let Some(questions) = self.questions {
            update.questions = Some(validate_questions(questions, &mut errors));
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(update)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: String,
    pub prompt: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub points: i32,
    /// Present for the course owner and admins only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub id: String,
    pub course_id: String,
    pub section_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_limit_minutes: Option<i32>,
    pub passing_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<i32>,
    pub questions: Vec<QuestionResponse>,
    pub created_at: DateTime<Utc>,
}

impl QuizResponse {
    pub fn render(quiz: &Quiz, with_answers: bool) -> Self {
        Self {
            id: quiz.quiz_id.to_string(),
            course_id: quiz.course_id.to_string(),
            section_id: quiz.section_id.to_string(),
            title: quiz.title.clone(),
            description: quiz.description.clone(),
            time_limit_minutes: quiz.time_limit_minutes,
            passing_score: quiz.passing_score,
            max_attempts: quiz.max_attempts,
            questions: quiz
                .questions
                .iter()
                .map(|q| QuestionResponse {
                    id: q.id.clone(),
                    prompt: q.prompt.clone(),
                    kind: q.kind,
                    options: q.options.clone(),
                    points: q.points,
                    correct_answer: with_answers.then(|| q.correct_answer.clone()),
                })
                .collect(),
            created_at: quiz.created_at,
        }
    }
}

impl From<&QuizView> for QuizResponse {
    fn from(view: &QuizView) -> Self {
        Self::render(&view.quiz, view.with_answers)
    }
}

// ============================================================================
// Attempts
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizRequest {
    pub answers: AnswerSheet,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResponse {
    pub id: String,
    pub quiz_id: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
}

impl From<&QuizAttempt> for AttemptResponse {
    fn from(attempt: &QuizAttempt) -> Self {
        Self {
            id: attempt.attempt_id.to_string(),
            quiz_id: attempt.quiz_id.to_string(),
            started_at: attempt.started_at,
            completed_at: attempt.completed_at,
            score_percent: attempt.score_percent,
            passed: attempt.passed,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResultResponse {
    pub question_id: String,
    pub correct: bool,
    pub points_earned: i32,
    pub points_possible: i32,
}

impl From<&QuestionResult> for QuestionResultResponse {
    fn from(r: &QuestionResult) -> Self {
        Self {
            question_id: r.question_id.clone(),
            correct: r.correct,
            points_earned: r.points_earned,
            points_possible: r.points_possible,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptResultResponse {
    #[serde(flatten)]
    pub attempt: AttemptResponse,
    pub earned: i32,
    pub total: i32,
    pub percentage: f64,
    pub results: Vec<QuestionResultResponse>,
}

impl From<&AttemptOutcome> for AttemptResultResponse {
    fn from(outcome: &AttemptOutcome) -> Self {
        Self {
            attempt: AttemptResponse::from(&outcome.attempt),
            earned: outcome.report.earned,
            total: outcome.report.total,
            percentage: outcome.report.percentage,
            results: outcome.report.results.iter().map(Into::into).collect(),
        }
    }
}

// ============================================================================
// Assignments
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub course_id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub max_score: i32,
    pub file_url: Option<String>,
    pub section_id: Option<String>,
}

/// Validated assignment creation payload
pub struct CreateAssignmentInput {
    pub course_id: CourseId,
    pub title: String,
    pub max_score: i32,
    pub update: AssignmentUpdate,
}

impl CreateAssignmentRequest {
    pub fn validate(self) -> Result<CreateAssignmentInput, Vec<FieldError>> {
        let mut errors = Vec::new();

        let course_id = CourseId::parse(&self.course_id)
            .map_err(|_| errors.push(FieldError::new("courseId", "Invalid course id")))
            .ok();
        let title = non_empty(&self.title, "title", &mut errors);
        if self.max_score <= 0 {
            errors.push(FieldError::new("maxScore", "Max score must be positive"));
        }
        let section_id = match &self.section_id {
            Some(raw) => SectionId::parse(raw)
                .map(Some)
                .map_err(|_| errors.push(FieldError::new("sectionId", "Invalid section id")))
                .ok()
                .flatten(),
            None => None,
        };

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(CreateAssignmentInput {
            course_id: course_id.unwrap(),
            title: title.unwrap(),
            max_score: self.max_score,
            update: AssignmentUpdate {
                description: Some(self.description.filter(|d| !d.trim().is_empty())),
                due_date: Some(self.due_date),
                file_url: Some(self.file_url.filter(|f| !f.trim().is_empty())),
                section_id: Some(section_id),
                ..Default::default()
            },
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub max_score: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    pub file_url: Option<Option<String>>,
}

impl UpdateAssignmentRequest {
    pub fn validate(self) -> Result<AssignmentUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut update = AssignmentUpdate {
            description: self.description,
            due_date: self.due_date,
            file_url: self.file_url,
            ..Default::default()
        };

        if let Some(title) = self.title {
            update.title = non_empty(&title, "title", &mut errors);
        }
        if let Some(max_score) = self.max_score {
            if max_score <= 0 {
                errors.push(FieldError::new("maxScore", "Max score must be positive"));
            } else {
                update.max_score = Some(max_score);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(update)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub id: String,
    pub course_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    pub max_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Assignment> for AssignmentResponse {
    fn from(a: &Assignment) -> Self {
        Self {
            id: a.assignment_id.to_string(),
            course_id: a.course_id.to_string(),
            section_id: a.section_id.map(|id| id.to_string()),
            title: a.title.clone(),
            description: a.description.clone(),
            due_date: a.due_date,
            max_score: a.max_score,
            file_url: a.file_url.clone(),
            created_at: a.created_at,
        }
    }
}

// ============================================================================
// Submissions
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssignmentRequest {
    pub text: Option<String>,
    pub file_url: Option<String>,
}

impl SubmitAssignmentRequest {
    pub fn validate(self) -> Result<(Option<String>, Option<String>), Vec<FieldError>> {
        let text = self.text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        let file_url = self
            .file_url
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());

        if text.is_none() && file_url.is_none() {
            return Err(vec![FieldError::new(
                "text",
                "A submission needs text or a file",
            )]);
        }
        Ok((text, file_url))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeSubmissionRequest {
    pub score: i32,
    pub feedback: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: String,
    pub assignment_id: String,
    pub student_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

impl From<&AssignmentSubmission> for SubmissionResponse {
    fn from(s: &AssignmentSubmission) -> Self {
        Self {
            id: s.submission_id.to_string(),
            assignment_id: s.assignment_id.to_string(),
            student_id: s.student_id.to_string(),
            text: s.text.clone(),
            file_url: s.file_url.clone(),
            status: s.status.code().to_string(),
            score: s.score,
            feedback: s.feedback.clone(),
            submitted_at: s.submitted_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question_json(kind: &str, correct: &str) -> String {
        format!(
            r#"{{"id": "q1", "prompt": "What?", "kind": "{kind}", "options": ["A", "B"], "correctAnswer": "{correct}", "points": 2}}"#
        )
    }

    #[test]
    fn valid_quiz_request_passes() {
        let section = SectionId::new();
        let body = format!(
            r#"{{"sectionId": "{section}", "title": "Check", "passingScore": 60, "questions": [{}]}}"#,
            question_json("multiple-choice", "A")
        );
        let req: CreateQuizRequest = serde_json::from_str(&body).unwrap();
        let input = req.validate().unwrap();

        assert_eq!(input.section_id, section);
        assert_eq!(input.questions.len(), 1);
        assert_eq!(input.questions[0].points, 2);
    }

    #[test]
    fn correct_answer_must_be_an_option() {
        let body = format!(
            r#"{{"sectionId": "{}", "title": "Check", "passingScore": 60, "questions": [{}]}}"#,
            SectionId::new(),
            question_json("multiple-choice", "C")
        );
        let req: CreateQuizRequest = serde_json::from_str(&body).unwrap();
        let errors = req.validate().unwrap_err();

        assert_eq!(errors[0].field, "questions.0.correctAnswer");
    }

    #[test]
    fn quiz_needs_questions_and_valid_score() {
        let body = format!(
            r#"{{"sectionId": "{}", "title": "Check", "passingScore": 150, "questions": []}}"#,
            SectionId::new()
        );
        let req: CreateQuizRequest = serde_json::from_str(&body).unwrap();
        let errors = req.validate().unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"passingScore"));
        assert!(fields.contains(&"questions"));
    }

    #[test]
    fn student_view_strips_correct_answers() {
        let quiz = Quiz::new(
            CourseId::new(),
            SectionId::new(),
            "Check".to_string(),
            60,
            vec![QuizQuestion {
                id: "q1".to_string(),
                prompt: "What?".to_string(),
                kind: QuestionKind::ShortAnswer,
                options: vec![],
                correct_answer: "42".to_string(),
                points: 1,
            }],
        );

        let student = serde_json::to_value(QuizResponse::render(&quiz, false)).unwrap();
        assert!(student["questions"][0].get("correctAnswer").is_none());

        let owner = serde_json::to_value(QuizResponse::render(&quiz, true)).unwrap();
        assert_eq!(owner["questions"][0]["correctAnswer"], "42");
    }

    #[test]
    fn empty_submission_rejected() {
        let req = SubmitAssignmentRequest {
            text: Some("   ".to_string()),
            file_url: None,
        };
        assert!(req.validate().is_err());

        let req = SubmitAssignmentRequest {
            text: None,
            file_url: Some("https://files.example/essay.pdf".to_string()),
        };
        let (text, file_url) = req.validate().unwrap();
        assert_eq!(text, None);
        assert!(file_url.is_some());
    }
}
