pub mod comment;
pub mod discussion;
pub mod vote;
