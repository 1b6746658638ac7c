//! Target-skill extraction from a job posting.
//!
//! A fixed set of technology families is matched case-insensitively over the
//! title, description and requirements. The result feeds the drafting brief so
//! the model knows which terms the posting actually names.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::job::JobPosting;

/// Upper bound on extracted target skills.
pub const MAX_TARGET_SKILLS: usize = 15;

/// Technology families, searched in this order.
/// `C++` and `C#` end in punctuation, so they carry no trailing word boundary.
const SKILL_FAMILIES: &[&str] = &[
    r"\b(?:Python|JavaScript|Java|Ruby|PHP|Go|Rust|Swift|Kotlin)\b|\bC\+\+|\bC#",
    r"\b(?:React|Angular|Vue|Django|Flask|Spring|Express|Laravel)\b",
    r"\b(?:SQL|MySQL|PostgreSQL|MongoDB|Redis|Elasticsearch)\b",
    r"\b(?:AWS|Azure|GCP|Docker|Kubernetes|Jenkins|Git)\b",
    r"\b(?:Machine Learning|AI|Data Science|Analytics|Statistics)\b",
    r"\b(?:Agile|Scrum|DevOps|CI/CD|Testing|QA)\b",
];

static FAMILY_REGEXES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SKILL_FAMILIES
        .iter()
        .map(|pattern| Regex::new(&format!("(?i){pattern}")).expect("Invalid skill family regex"))
        .collect()
});

/// Extracts up to [`MAX_TARGET_SKILLS`] technology terms named by the job.
///
/// Terms are returned as spelled in the posting, de-duplicated case-insensitively
/// in family order, then position order within each family.
pub fn extract_target_skills(job: &JobPosting) -> Vec<String> {
    let text = job.full_text();
    let mut seen = HashSet::new();
    let mut skills = Vec::new();

    for regex in FAMILY_REGEXES.iter() {
        for found in regex.find_iter(&text) {
            if seen.insert(found.as_str().to_lowercase()) {
                skills.push(found.as_str().to_string());
                if skills.len() == MAX_TARGET_SKILLS {
                    return skills;
                }
            }
        }
    }
    skills
}
