//! Resume Composer: bundles mandatory fields, ranked content and a job brief into
//! a `GenerationRequest`. Pure transformation, no I/O.

use serde::Serialize;

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, PLAIN_TEXT_INSTRUCTION};
use crate::models::job::JobPosting;
use crate::models::profile::{Certification, Education, Internship, Project, StudentProfile};
use crate::resume::keywords::extract_target_skills;
use crate::resume::matcher::MatchedContent;
use crate::resume::prompts::{
    COMPRESSION_INSTRUCTION, DRAFT_PROMPT_TEMPLATE, NONE_SELECTED, NOT_PROVIDED,
};

/// Characters of job description carried into the brief.
pub const DESCRIPTION_EXCERPT_CHARS: usize = 800;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Header,
    Education,
    Skills,
    Projects,
    Internships,
    Certifications,
}

impl Section {
    /// Heading line used in plain-text output. The header block has none.
    pub fn heading(&self) -> Option<&'static str> {
        match self {
            Section::Header => None,
            Section::Education => Some("EDUCATION"),
            Section::Skills => Some("TECHNICAL SKILLS"),
            Section::Projects => Some("PROJECTS"),
            Section::Internships => Some("INTERNSHIPS"),
            Section::Certifications => Some("CERTIFICATIONS"),
        }
    }
}

/// Layout contract every draft must honour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattingContract {
    pub max_chars: usize,
    pub section_order: Vec<Section>,
}

impl FormattingContract {
    pub fn one_page(max_chars: usize) -> Self {
        Self {
            max_chars,
            section_order: vec![
                Section::Header,
                Section::Education,
                Section::Skills,
                Section::Projects,
                Section::Internships,
                Section::Certifications,
            ],
        }
    }
}

/// Name and contact block. Never truncated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactHeader {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub linkedin: String,
    pub github: String,
    pub location: String,
}

/// What the drafter needs to know about the job.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobBrief {
    pub title: String,
    pub company: String,
    pub location: String,
    pub job_type: String,
    pub requirements: Vec<String>,
    pub description_excerpt: String,
    pub target_skills: Vec<String>,
}

/// Everything needed to draft one resume, by either path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    pub header: ContactHeader,
    pub education: Vec<Education>,
    /// Ranked, most relevant first.
    pub skills: Vec<String>,
    pub projects: Vec<Project>,
    pub internships: Vec<Internship>,
    pub certifications: Vec<Certification>,
    pub extracurricular: Vec<String>,
    pub languages: Vec<String>,
    pub job: JobBrief,
    pub contract: FormattingContract,
}

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

pub fn compose(
    profile: &StudentProfile,
    matched: &MatchedContent,
    job: &JobPosting,
    contract: &FormattingContract,
) -> GenerationRequest {
    GenerationRequest {
        header: ContactHeader {
            name: profile.name.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            linkedin: profile.linkedin.clone(),
            github: profile.github.clone(),
            location: profile.location.clone(),
        },
        education: profile.education.clone(),
        skills: matched.skills.iter().map(|s| s.item.clone()).collect(),
        projects: matched.projects.iter().map(|p| p.item.clone()).collect(),
        internships: matched.internships.iter().map(|i| i.item.clone()).collect(),
        certifications: matched.certifications.iter().map(|c| c.item.clone()).collect(),
        extracurricular: profile.extracurricular.clone(),
        languages: profile.languages.clone(),
        job: JobBrief {
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type.clone(),
            requirements: job.requirements.clone(),
            description_excerpt: excerpt(&job.description, DESCRIPTION_EXCERPT_CHARS),
            target_skills: extract_target_skills(job),
        },
        contract: contract.clone(),
    }
}

/// Cuts `text` to at most `max_chars` characters, marking the cut with `...`.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", text[..cut].trim_end()),
        None => text.to_string(),
    }
}

/// Values that must appear verbatim in any resume built from a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MandatoryValues<'a> {
    /// Name, email, phone and each institution. A section holding one is never
    /// dropped.
    pub anchors: Vec<&'a str>,
    /// Level, score and year of each education entry.
    pub details: Vec<&'a str>,
}

impl<'a> MandatoryValues<'a> {
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.anchors.iter().chain(&self.details).copied()
    }

    /// First value that `text` does not contain verbatim.
    pub fn missing_from(&self, text: &str) -> Option<&'a str> {
        self.iter().find(|value| !text.contains(*value))
    }
}

impl GenerationRequest {
    pub fn mandatory_values(&self) -> MandatoryValues<'_> {
        let mut anchors = vec![
            self.header.name.as_str(),
            self.header.email.as_str(),
            self.header.phone.as_str(),
        ];
        anchors.extend(self.education.iter().map(|e| e.institution.as_str()));
        let details = self
            .education
            .iter()
            .flat_map(|e| [e.level.as_str(), e.score.as_str(), e.year.as_str()]);

        let present = |v: &&str| !v.trim().is_empty();
        MandatoryValues {
            anchors: anchors.into_iter().filter(present).collect(),
            details: details.filter(present).collect(),
        }
    }

    /// Renders the drafting prompt.
    pub fn prompt(&self) -> String {
        let contact = [&self.header.email, &self.header.phone]
            .into_iter()
            .filter(|v| !v.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" | ");
        let section_order = self
            .contract
            .section_order
            .iter()
            .filter_map(Section::heading)
            .collect::<Vec<_>>()
            .join(", ");

        DRAFT_PROMPT_TEMPLATE
            .replace("{job_title}", &self.job.title)
            .replace("{company}", or_not_provided(&self.job.company))
            .replace("{job_type}", or_not_provided(&self.job.job_type))
            .replace("{job_location}", or_not_provided(&self.job.location))
            .replace("{requirements}", &bullets(self.job.requirements.iter().cloned()))
            .replace("{target_skills}", &comma_list(&self.job.target_skills))
            .replace("{description_excerpt}", or_not_provided(&self.job.description_excerpt))
            .replace("{name}", &self.header.name)
            .replace("{contact}", or_not_provided(&contact))
            .replace("{linkedin}", or_not_provided(&self.header.linkedin))
            .replace("{github}", or_not_provided(&self.header.github))
            .replace("{location}", or_not_provided(&self.header.location))
            .replace(
                "{education}",
                &bullets(self.education.iter().map(|e| {
                    join_present(&[&e.level, &e.institution, &e.score, &e.year], " | ")
                })),
            )
            .replace("{skills}", &comma_list(&self.skills))
            .replace(
                "{projects}",
                &bullets(self.projects.iter().map(|p| {
                    let mut line = p.title.clone();
                    if !p.description.is_empty() {
                        line.push_str(": ");
                        line.push_str(&p.description);
                    }
                    if !p.technologies.is_empty() {
                        line.push_str(&format!(" [{}]", p.technologies.join(", ")));
                    }
                    line
                })),
            )
            .replace(
                "{internships}",
                &bullets(self.internships.iter().map(|i| {
                    let mut line = format!("{} at {}", i.role, i.company);
                    if !i.duration.is_empty() {
                        line.push_str(&format!(" ({})", i.duration));
                    }
                    if !i.description.is_empty() {
                        line.push_str(": ");
                        line.push_str(&i.description);
                    }
                    line
                })),
            )
            .replace(
                "{certifications}",
                &bullets(
                    self.certifications
                        .iter()
                        .map(|c| join_present(&[&c.name, &c.issuer, &c.date], " - ")),
                ),
            )
            .replace("{extracurricular}", &comma_list(&self.extracurricular))
            .replace("{languages}", &comma_list(&self.languages))
            .replace("{section_order}", &section_order)
            .replace("{max_chars}", &self.contract.max_chars.to_string())
            .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
            .replace("{plain_text_instruction}", PLAIN_TEXT_INSTRUCTION)
    }

    /// Renders the drafting prompt with an explicit character budget, for the
    /// one regeneration attempt after an over-long draft.
    pub fn prompt_with_budget(&self, budget: usize) -> String {
        let mut prompt = self.prompt();
        prompt.push_str(&COMPRESSION_INSTRUCTION.replace("{budget}", &budget.to_string()));
        prompt
    }
}

fn or_not_provided(value: &str) -> &str {
    if value.trim().is_empty() {
        NOT_PROVIDED
    } else {
        value
    }
}

fn bullets(lines: impl Iterator<Item = String>) -> String {
    let rendered: Vec<String> = lines.map(|l| format!("• {l}")).collect();
    if rendered.is_empty() {
        NONE_SELECTED.to_string()
    } else {
        rendered.join("\n")
    }
}

fn comma_list(items: &[String]) -> String {
    if items.is_empty() {
        NONE_SELECTED.to_string()
    } else {
        items.join(", ")
    }
}

pub(crate) fn join_present(parts: &[&String], separator: &str) -> String {
    parts
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| p.as_str())
        .collect::<Vec<_>>()
        .join(separator)
}
