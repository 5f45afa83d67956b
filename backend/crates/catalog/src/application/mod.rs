pub mod courses;
pub mod enrollments;
pub mod progress;
pub mod sections;
pub mod taxonomy;
