pub mod email;
pub mod person_name;
