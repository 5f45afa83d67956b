pub mod assignments;
pub mod attempts;
pub mod quizzes;
pub mod submissions;
