//! Structured resume: the same selected content as the text resume, as JSON
//! sections for callers that render their own layout.

use serde::{Deserialize, Serialize};

use crate::models::profile::{Certification, Education, Internship, Project};
use crate::resume::composer::GenerationRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub location: String,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredResume {
    pub personal_info: PersonalInfo,
    pub education: Vec<Education>,
    /// Ranked, most relevant first.
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub internships: Vec<Internship>,
    pub certifications: Vec<Certification>,
    pub extracurricular: Vec<String>,
    pub languages: Vec<String>,
}

impl From<&GenerationRequest> for StructuredResume {
    fn from(request: &GenerationRequest) -> Self {
        let h = &request.header;
        let summary = match request.job.title.trim() {
            "" => "Motivated candidate seeking a technical role".to_string(),
            title => format!("Motivated candidate seeking a {title} position"),
        };
        Self {
            personal_info: PersonalInfo {
                name: h.name.clone(),
                email: h.email.clone(),
                phone: h.phone.clone(),
                linkedin: h.linkedin.clone(),
                github: h.github.clone(),
                location: h.location.clone(),
                summary,
            },
            education: request.education.clone(),
            skills: request.skills.clone(),
            projects: request.projects.clone(),
            internships: request.internships.clone(),
            certifications: request.certifications.clone(),
            extracurricular: request.extracurricular.clone(),
            languages: request.languages.clone(),
        }
    }
}
