use serde::{Deserialize, Serialize};

/// Canonical student profile produced by the normalizer.
///
/// Every field is populated: absent values in the source record become empty
/// strings or empty lists. Read-only for the rest of the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub location: String,
    pub age: Option<u32>,
    pub education: Vec<Education>,
    /// De-duplicated case-insensitively, first spelling wins.
    pub skills: Vec<String>,
    /// De-duplicated case-insensitively, first spelling wins.
    pub technologies: Vec<String>,
    pub projects: Vec<Project>,
    pub internships: Vec<Internship>,
    pub certifications: Vec<Certification>,
    pub extracurricular: Vec<String>,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub level: String,
    pub institution: String,
    pub score: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Internship {
    pub company: String,
    pub role: String,
    pub description: String,
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
}

impl StudentProfile {
    /// True when the profile has nothing beyond mandatory fields to rank.
    pub fn has_no_ranked_content(&self) -> bool {
        self.projects.is_empty() && self.internships.is_empty() && self.certifications.is_empty()
    }
}
