pub mod course;
pub mod professor;
