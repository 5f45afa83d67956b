pub mod assignment;
pub mod quiz;
