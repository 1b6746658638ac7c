//! Profile normalization: loosely-shaped profile and job records into typed models.
//!
//! Records arrive as arbitrary JSON. They are read through a private schema in
//! which every field is optional and scalars may be strings or numbers; nothing
//! untyped leaves this module.

use std::collections::HashSet;

use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::models::profile::{Certification, Education, Internship, Project, StudentProfile};

// ────────────────────────────────────────────────────────────────────────────
// Loose scalar / list shapes
// ────────────────────────────────────────────────────────────────────────────

/// A scalar that may have been stored as a string, number or bool. Nulls, arrays
/// and objects read as empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Loose {
    Str(String),
    Number(Number),
    Bool(bool),
    Other(IgnoredAny),
}

impl Loose {
    fn into_string(self) -> String {
        match self {
            Loose::Str(s) => s.trim().to_string(),
            // Number keeps its JSON spelling: 9.0 stays "9.0"
            Loose::Number(n) => n.to_string(),
            Loose::Bool(b) => b.to_string(),
            Loose::Other(_) => String::new(),
        }
    }
}

/// A list that may have been stored as an array or a comma-separated string.
/// Any other shape reads as empty.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum LooseList {
    Items(Vec<Loose>),
    Csv(String),
    Other(IgnoredAny),
}

impl LooseList {
    fn into_vec(self) -> Vec<String> {
        let items: Vec<String> = match self {
            LooseList::Items(items) => items.into_iter().map(Loose::into_string).collect(),
            LooseList::Csv(csv) => csv.split(',').map(|s| s.trim().to_string()).collect(),
            LooseList::Other(_) => Vec::new(),
        };
        items.into_iter().filter(|s| !s.is_empty()).collect()
    }
}

fn text(value: Option<Loose>) -> String {
    value.map(Loose::into_string).unwrap_or_default()
}

fn list(value: Option<LooseList>) -> Vec<String> {
    value.map(LooseList::into_vec).unwrap_or_default()
}

/// Reads an array of records, skipping entries that are not objects. Any other
/// shape reads as an empty list.
fn records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().filter_map(from_object).collect()),
        _ => Ok(Vec::new()),
    }
}

/// Reads a nested record; anything but an object reads as absent.
fn record<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(from_object(Value::deserialize(deserializer)?))
}

fn from_object<T: DeserializeOwned>(value: Value) -> Option<T> {
    if value.is_object() {
        serde_json::from_value(value).ok()
    } else {
        None
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Raw record schema
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProfile {
    name: Option<Loose>,
    email: Option<Loose>,
    phone: Option<Loose>,
    linkedin: Option<Loose>,
    github: Option<Loose>,
    location: Option<Loose>,
    age: Option<Loose>,
    /// A list of entries or the legacy single object; see `expand_education`.
    education: Value,
    skills: Option<LooseList>,
    technologies: Option<LooseList>,
    #[serde(deserialize_with = "records")]
    projects: Vec<RawProject>,
    #[serde(alias = "experience", deserialize_with = "records")]
    internships: Vec<RawInternship>,
    #[serde(deserialize_with = "records")]
    certifications: Vec<RawCertification>,
    extracurricular: Option<LooseList>,
    languages: Option<LooseList>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEducationEntry {
    #[serde(alias = "degree")]
    level: Option<Loose>,
    #[serde(alias = "university", alias = "school")]
    institution: Option<Loose>,
    #[serde(alias = "gpa", alias = "cgpa", alias = "percentage")]
    score: Option<Loose>,
    #[serde(alias = "graduation_year")]
    year: Option<Loose>,
}

/// The single-object education record: a current degree plus school grades.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLegacyEducation {
    current_degree: Option<Loose>,
    major: Option<Loose>,
    university: Option<Loose>,
    graduation_year: Option<Loose>,
    cgpa: Option<Loose>,
    #[serde(deserialize_with = "record")]
    grade_12: Option<RawGrade>,
    #[serde(deserialize_with = "record")]
    grade_10: Option<RawGrade>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawGrade {
    school: Option<Loose>,
    year: Option<Loose>,
    percentage: Option<Loose>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawProject {
    #[serde(alias = "name")]
    title: Option<Loose>,
    description: Option<Loose>,
    technologies: Option<LooseList>,
    #[serde(alias = "year")]
    duration: Option<Loose>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawInternship {
    company: Option<Loose>,
    #[serde(alias = "title")]
    role: Option<Loose>,
    description: Option<Loose>,
    duration: Option<Loose>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCertification {
    name: Option<Loose>,
    issuer: Option<Loose>,
    #[serde(alias = "year")]
    date: Option<Loose>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawJob {
    id: Option<Loose>,
    title: Option<Loose>,
    #[serde(alias = "company_name")]
    company: Option<Loose>,
    description: Option<Loose>,
    requirements: Option<LooseList>,
    salary_range: Option<Loose>,
    location: Option<Loose>,
    job_type: Option<Loose>,
}

// ────────────────────────────────────────────────────────────────────────────
// Public entry points
// ────────────────────────────────────────────────────────────────────────────

/// Normalizes a raw profile record into a fully-populated `StudentProfile`.
///
/// Fails only when the record is not an object or carries neither a name nor an
/// email. A missing name falls back to the local part of the email.
pub fn normalize_profile(record: &Value) -> Result<StudentProfile, AppError> {
    let object = record
        .as_object()
        .ok_or_else(|| AppError::Validation("profile record must be a JSON object".to_string()))?;

    // Records read straight from the users table nest the profile under
    // `profile_data`, with the login email beside it.
    let (body, outer_email) = match object.get("profile_data") {
        Some(inner) if inner.is_object() => (inner, object.get("email")),
        _ => (record, None),
    };

    let raw: RawProfile = serde_json::from_value(body.clone())
        .map_err(|e| AppError::Validation(format!("malformed profile record: {e}")))?;

    let mut email = text(raw.email);
    if email.is_empty() {
        if let Some(Value::String(outer)) = outer_email {
            email = outer.trim().to_string();
        }
    }
    let mut name = text(raw.name);
    if name.is_empty() && email.is_empty() {
        return Err(AppError::Validation(
            "profile must include at least a name or an email".to_string(),
        ));
    }
    if name.is_empty() {
        name = email.split('@').next().unwrap_or_default().to_string();
    }

    Ok(StudentProfile {
        name,
        email,
        phone: text(raw.phone),
        linkedin: text(raw.linkedin),
        github: text(raw.github),
        location: text(raw.location),
        age: raw.age.and_then(|a| a.into_string().parse().ok()),
        education: expand_education(raw.education),
        skills: dedup_case_insensitive(list(raw.skills)),
        technologies: dedup_case_insensitive(list(raw.technologies)),
        projects: raw
            .projects
            .into_iter()
            .map(|p| Project {
                title: text(p.title),
                description: text(p.description),
                technologies: list(p.technologies),
                duration: text(p.duration),
            })
            .filter(|p| !(p.title.is_empty() && p.description.is_empty()))
            .collect(),
        internships: raw
            .internships
            .into_iter()
            .map(|i| Internship {
                company: text(i.company),
                role: text(i.role),
                description: text(i.description),
                duration: text(i.duration),
            })
            .filter(|i| !(i.company.is_empty() && i.role.is_empty()))
            .collect(),
        certifications: raw
            .certifications
            .into_iter()
            .map(|c| Certification {
                name: text(c.name),
                issuer: text(c.issuer),
                date: text(c.date),
            })
            .filter(|c| !c.name.is_empty())
            .collect(),
        extracurricular: list(raw.extracurricular),
        languages: list(raw.languages),
    })
}

/// Normalizes a raw job record. Missing fields default to empty.
pub fn normalize_job(record: &Value) -> Result<JobPosting, AppError> {
    if !record.is_object() {
        return Err(AppError::Validation(
            "job record must be a JSON object".to_string(),
        ));
    }
    let raw: RawJob = serde_json::from_value(record.clone())
        .map_err(|e| AppError::Validation(format!("malformed job record: {e}")))?;

    Ok(JobPosting {
        id: text(raw.id),
        title: text(raw.title),
        company: text(raw.company),
        description: text(raw.description),
        requirements: list(raw.requirements),
        salary_range: text(raw.salary_range),
        location: text(raw.location),
        job_type: text(raw.job_type),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// A list of entries maps one to one. The legacy object expands to the degree
/// plus the 12th and 10th grade rows. Anything else is no education.
fn expand_education(raw: Value) -> Vec<Education> {
    match raw {
        Value::Array(entries) => entries
            .into_iter()
            .filter_map(from_object::<RawEducationEntry>)
            .map(|e| Education {
                level: text(e.level),
                institution: text(e.institution),
                score: text(e.score),
                year: text(e.year),
            })
            .filter(|e| !(e.level.is_empty() && e.institution.is_empty()))
            .collect(),
        value @ Value::Object(_) => {
            let Some(legacy) = from_object::<RawLegacyEducation>(value) else {
                return Vec::new();
            };
            let mut rows = Vec::new();
            let degree = text(legacy.current_degree);
            let major = text(legacy.major);
            let level = match (degree.is_empty(), major.is_empty()) {
                (false, false) if !degree.contains(&major) => format!("{degree} in {major}"),
                (false, _) => degree,
                (true, _) => major,
            };
            let institution = text(legacy.university);
            if !(level.is_empty() && institution.is_empty()) {
                rows.push(Education {
                    level,
                    institution,
                    score: text(legacy.cgpa),
                    year: text(legacy.graduation_year),
                });
            }
            for (label, grade) in [("12th Grade", legacy.grade_12), ("10th Grade", legacy.grade_10)] {
                if let Some(grade) = grade {
                    let institution = text(grade.school);
                    if institution.is_empty() {
                        continue;
                    }
                    rows.push(Education {
                        level: label.to_string(),
                        institution,
                        score: text(grade.percentage),
                        year: text(grade.year),
                    });
                }
            }
            rows
        }
        _ => Vec::new(),
    }
}

fn dedup_case_insensitive(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.to_lowercase()))
        .collect()
}
