pub mod postgres;
pub mod video;
