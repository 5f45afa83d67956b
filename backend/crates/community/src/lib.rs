//! Community discussions.
//!
//! Discussion threads scoped to a course, a department or the whole
//! campus, with one-level threaded comments and comment voting.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use error::{CommunityError, CommunityResult};
