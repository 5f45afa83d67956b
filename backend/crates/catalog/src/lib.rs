//! Course catalog.
//!
//! Departments, categories, courses and their sections, enrollments,
//! per-section progress tracking, certificates and course analytics.
//! Section videos live on an external host behind the
//! [`infra::video::VideoHost`] trait.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use error::{CatalogError, CatalogResult};
