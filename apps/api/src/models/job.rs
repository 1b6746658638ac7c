use serde::{Deserialize, Serialize};

/// A job posting as supplied by the placement office. Read-only input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary_range: String,
    pub location: String,
    pub job_type: String,
}

impl JobPosting {
    /// Title, description and requirements joined, the text every matcher reads.
    pub fn full_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.description);
        for requirement in &self.requirements {
            text.push(' ');
            text.push_str(requirement);
        }
        text
    }
}
