pub mod category;
pub mod course;
pub mod department;
pub mod enrollment;
pub mod section;
pub mod video;
