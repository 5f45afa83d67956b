pub mod comments;
pub mod discussions;
pub mod votes;
