pub mod entity;
pub mod grading;
pub mod repository;
