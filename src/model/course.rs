use serde::{Deserialize, Serialize};

/// One course entry from the programme PDF.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CourseRecord {
    /// Lowercased `code`.
    pub id: String,
    pub code: String,
    pub title: String,
    pub credits: String,
    pub department: String,
}

impl CourseRecord {
    pub fn new(code: &str, title: &str, credits: &str, department: &str) -> Self {
        CourseRecord {
            id: code.to_lowercase(),
            code: code.to_string(),
            title: title.to_string(),
            credits: credits.to_string(),
            department: department.to_string(),
        }
    }
}
