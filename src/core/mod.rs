pub mod campus;
pub mod course_parser;
pub mod department;
pub mod faculty_parser;
pub mod pdf_text;
