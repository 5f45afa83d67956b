//! Automatic quiz grading.
//!
//! Pure scoring over a question list and an answer sheet. Short answers
//! are compared case-insensitively after trimming; choice questions
//! compare the stored option verbatim.

use crate::domain::entity::quiz::{AnswerSheet, QuestionKind, QuizQuestion};

/// Outcome for a single question
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionResult {
    pub question_id: String,
    pub correct: bool,
    pub points_earned: i32,
    pub points_possible: i32,
}

/// Full grading report for one attempt
#[derive(Debug, Clone)]
pub struct GradeReport {
    pub earned: i32,
    pub total: i32,
    pub percentage: f64,
    pub passed: bool,
    pub results: Vec<QuestionResult>,
}

fn answer_matches(question: &QuizQuestion, submitted: &str) -> bool {
    match question.kind {
        QuestionKind::ShortAnswer => {
            submitted.trim().eq_ignore_ascii_case(question.correct_answer.trim())
        }
        QuestionKind::MultipleChoice | QuestionKind::TrueFalse => {
            submitted == question.correct_answer
        }
    }
}

/// Grade an answer sheet against the question list.
///
/// An empty quiz grades to 0 percent. Unanswered questions count as
/// incorrect.
pub fn grade(questions: &[QuizQuestion], answers: &AnswerSheet, passing_score: i32) -> GradeReport {
    let mut earned = 0;
    let mut total = 0;
    let mut results = Vec::with_capacity(questions.len());

    for question in questions {
        total += question.points;

        let correct = answers
            .get(&question.id)
            .map(|submitted| answer_matches(question, submitted))
            .unwrap_or(false);

        if correct {
            earned += question.points;
        }
        results.push(QuestionResult {
            question_id: question.id.clone(),
            correct,
            points_earned: if correct { question.points } else { 0 },
            points_possible: question.points,
        });
    }

    let percentage = if total <= 0 {
        0.0
    } else {
        f64::from(earned) / f64::from(total) * 100.0
    };

    GradeReport {
        earned,
        total,
        percentage,
        passed: percentage >= f64::from(passing_score),
        results,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, kind: QuestionKind, correct: &str, points: i32) -> QuizQuestion {
        QuizQuestion {
            id: id.to_string(),
            prompt: format!("Question {id}"),
            kind,
            options: vec![],
            correct_answer: correct.to_string(),
            points,
        }
    }

    fn answers(pairs: &[(&str, &str)]) -> AnswerSheet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn full_marks_passes() {
        let questions = vec![
            question("q1", QuestionKind::MultipleChoice, "B-tree", 2),
            question("q2", QuestionKind::TrueFalse, "true", 1),
        ];
        let report = grade(&questions, &answers(&[("q1", "B-tree"), ("q2", "true")]), 70);

        assert_eq!(report.earned, 3);
        assert_eq!(report.total, 3);
        assert_eq!(report.percentage, 100.0);
        assert!(report.passed);
    }

    #[test]
    fn partial_score_below_threshold_fails() {
        let questions = vec![
            question("q1", QuestionKind::MultipleChoice, "TCP", 3),
            question("q2", QuestionKind::MultipleChoice, "UDP", 1),
        ];
        let report = grade(&questions, &answers(&[("q2", "UDP")]), 50);

        assert_eq!(report.earned, 1);
        assert_eq!(report.total, 4);
        assert_eq!(report.percentage, 25.0);
        assert!(!report.passed);
    }

    #[test]
    fn score_equal_to_passing_score_passes() {
        let questions = vec![
            question("q1", QuestionKind::TrueFalse, "false", 1),
            question("q2", QuestionKind::TrueFalse, "true", 1),
        ];
        let report = grade(&questions, &answers(&[("q1", "false"), ("q2", "false")]), 50);

        assert_eq!(report.percentage, 50.0);
        assert!(report.passed);
    }

    #[test]
    fn empty_quiz_grades_to_zero() {
        let report = grade(&[], &AnswerSheet::new(), 0);

        assert_eq!(report.total, 0);
        assert_eq!(report.percentage, 0.0);
        // 0 >= 0 still passes a zero threshold
        assert!(report.passed);
        assert!(report.results.is_empty());
    }

    #[test]
    fn short_answers_ignore_case_and_whitespace() {
        let questions = vec![question("q1", QuestionKind::ShortAnswer, "Mutex", 1)];

        let report = grade(&questions, &answers(&[("q1", "  mutex ")]), 100);
        assert!(report.passed);

        // Choice answers stay strict
        let strict = vec![question("q2", QuestionKind::MultipleChoice, "Mutex", 1)];
        let report = grade(&strict, &answers(&[("q2", "mutex")]), 100);
        assert!(!report.passed);
    }

    #[test]
    fn unanswered_questions_count_as_wrong() {
        let questions = vec![
            question("q1", QuestionKind::TrueFalse, "true", 2),
            question("q2", QuestionKind::TrueFalse, "true", 2),
        ];
        let report = grade(&questions, &answers(&[("q1", "true")]), 60);

        assert_eq!(report.earned, 2);
        assert_eq!(report.results[1].correct, false);
        assert_eq!(report.results[1].points_earned, 0);
        assert!(!report.passed);
    }
}
