//! Deterministic plain-text resume used whenever the drafting capability is
//! absent or fails. No I/O and no randomness: the same request always renders the
//! same text.

use crate::resume::composer::{join_present, GenerationRequest, Section};
use crate::resume::tokens::tokenize;

const LANGUAGE_TOKENS: &[&str] = &[
    "c", "c#", "c++", "dart", "go", "golang", "java", "javascript", "kotlin", "php", "python",
    "r", "ruby", "rust", "scala", "swift", "typescript",
];

const CLOUD_TOKENS: &[&str] = &[
    "ansible", "aws", "azure", "cd", "ci", "devops", "docker", "gcp", "helm", "jenkins",
    "kubernetes", "linux", "terraform",
];

/// Renders the fallback resume. Never fails.
pub fn render_fallback(request: &GenerationRequest) -> String {
    let mut sections: Vec<String> = vec![header(request)];

    for section in &request.contract.section_order {
        let body = match section {
            Section::Header => continue,
            Section::Education => Some(education(request)),
            Section::Skills => skills(&request.skills),
            Section::Projects => projects(request),
            Section::Internships => internships(request),
            Section::Certifications => certifications(request),
        };
        if let (Some(heading), Some(body)) = (section.heading(), body) {
            if body.is_empty() {
                sections.push(heading.to_string());
            } else {
                sections.push(format!("{heading}\n{body}"));
            }
        }
    }

    if !request.extracurricular.is_empty() {
        sections.push(format!(
            "EXTRACURRICULAR ACTIVITIES\n{}",
            request.extracurricular.join(" | ")
        ));
    }
    if !request.languages.is_empty() {
        sections.push(format!("LANGUAGES\n{}", request.languages.join(", ")));
    }

    sections.join("\n\n")
}

fn header(request: &GenerationRequest) -> String {
    let h = &request.header;
    let contact: Vec<String> = [
        ("Email", &h.email),
        ("Phone", &h.phone),
        ("LinkedIn", &h.linkedin),
        ("GitHub", &h.github),
        ("Location", &h.location),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(label, value)| format!("{label}: {value}"))
    .collect();

    if contact.is_empty() {
        h.name.clone()
    } else {
        format!("{}\n{}", h.name, contact.join(" | "))
    }
}

fn education(request: &GenerationRequest) -> String {
    request
        .education
        .iter()
        .map(|e| join_present(&[&e.level, &e.institution, &e.score, &e.year], " | "))
        .collect::<Vec<_>>()
        .join("\n")
}

fn skills(skills: &[String]) -> Option<String> {
    if skills.is_empty() {
        return None;
    }
    let mut languages = Vec::new();
    let mut cloud = Vec::new();
    let mut tools = Vec::new();
    for skill in skills {
        let tokens = tokenize(skill);
        let has = |set: &[&str]| tokens.iter().any(|t| set.contains(&t.as_str()));
        if has(LANGUAGE_TOKENS) {
            languages.push(skill.as_str());
        } else if has(CLOUD_TOKENS) {
            cloud.push(skill.as_str());
        } else {
            tools.push(skill.as_str());
        }
    }

    let lines: Vec<String> = [
        ("Programming Languages", languages),
        ("Cloud & DevOps", cloud),
        ("Tools & Frameworks", tools),
    ]
    .into_iter()
    .filter(|(_, group)| !group.is_empty())
    .map(|(label, group)| format!("{label}: {}", group.join(", ")))
    .collect();
    Some(lines.join("\n"))
}

fn projects(request: &GenerationRequest) -> Option<String> {
    if request.projects.is_empty() {
        return None;
    }
    let blocks: Vec<String> = request
        .projects
        .iter()
        .map(|p| {
            let mut lines = vec![with_parenthetical(&p.title, &p.duration)];
            if !p.description.is_empty() {
                lines.push(format!("• {}", p.description));
            }
            if !p.technologies.is_empty() {
                lines.push(format!("• Technologies: {}", p.technologies.join(", ")));
            }
            lines.join("\n")
        })
        .collect();
    Some(blocks.join("\n\n"))
}

fn internships(request: &GenerationRequest) -> Option<String> {
    if request.internships.is_empty() {
        return None;
    }
    let blocks: Vec<String> = request
        .internships
        .iter()
        .map(|i| {
            let title = join_present(&[&i.role, &i.company], " - ");
            let mut lines = vec![with_parenthetical(&title, &i.duration)];
            if !i.description.is_empty() {
                lines.push(format!("• {}", i.description));
            }
            lines.join("\n")
        })
        .collect();
    Some(blocks.join("\n\n"))
}

fn certifications(request: &GenerationRequest) -> Option<String> {
    if request.certifications.is_empty() {
        return None;
    }
    let lines: Vec<String> = request
        .certifications
        .iter()
        .map(|c| {
            let name = join_present(&[&c.name, &c.issuer], " - ");
            format!("• {}", with_parenthetical(&name, &c.date))
        })
        .collect();
    Some(lines.join("\n"))
}

fn with_parenthetical(text: &str, extra: &str) -> String {
    if extra.trim().is_empty() {
        text.to_string()
    } else {
        format!("{text} ({extra})")
    }
}
