use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfessorRecord {
    pub name: String,
    pub education: String,
    pub post: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default)]
    pub research_interests: Vec<String>,

    pub website: String,
    pub avatar_url: String,
    pub department: String,
}
