//! Assessments.
//!
//! Section quizzes with automatic grading, quiz attempts, assignments
//! and manually graded assignment submissions.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use error::{AssessmentError, AssessmentResult};
