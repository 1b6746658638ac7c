//! Output Assembler: enforces the one-page length heuristic.
//!
//! Text is split into blocks at uppercase heading lines. The block before the
//! first heading (name and contact), the EDUCATION block and any block holding a
//! mandatory anchor are protected. Truncation drops whole unprotected blocks from
//! the end and never edits inside a block.

use tracing::info;

use crate::models::resume::{GenerationMethod, ResumeDraft};
use crate::resume::composer::MandatoryValues;

const PROTECTED_HEADING: &str = "EDUCATION";
const MAX_HEADING_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputAssembler {
    max_chars: usize,
}

/// A heading and the lines under it. The header block has no heading.
#[derive(Debug)]
struct Block<'a> {
    heading: Option<&'a str>,
    lines: Vec<&'a str>,
}

impl Block<'_> {
    fn is_protected(&self, mandatory: &MandatoryValues<'_>) -> bool {
        let heading = match self.heading {
            None => return true,
            Some(heading) => heading,
        };
        normalize_heading(heading).starts_with(PROTECTED_HEADING)
            || std::iter::once(heading)
                .chain(self.lines.iter().copied())
                .any(|line| mandatory.anchors.iter().any(|anchor| line.contains(anchor)))
    }
}

impl OutputAssembler {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn fits(&self, text: &str) -> bool {
        text.trim().chars().count() <= self.max_chars
    }

    /// Wraps `text` into a `ResumeDraft`, truncating at section boundaries when it
    /// is over the page.
    pub fn assemble(
        &self,
        text: &str,
        method: GenerationMethod,
        mandatory: &MandatoryValues<'_>,
    ) -> ResumeDraft {
        let text = text.trim();
        if self.fits(text) {
            return ResumeDraft::new(text.to_string(), method);
        }
        let truncated = self.truncate(text, mandatory);
        info!(
            method = %method,
            before = text.chars().count(),
            after = truncated.chars().count(),
            max_chars = self.max_chars,
            "Truncated resume at section boundary"
        );
        ResumeDraft::new(truncated, method)
    }

    /// Drops the last unprotected section until the text fits or only protected
    /// sections remain.
    pub fn truncate(&self, text: &str, mandatory: &MandatoryValues<'_>) -> String {
        let mut blocks = split_blocks(text.trim(), mandatory);
        loop {
            let rendered = render(&blocks);
            if self.fits(&rendered) {
                return rendered;
            }
            match blocks.iter().rposition(|b| !b.is_protected(mandatory)) {
                Some(last) => {
                    blocks.remove(last);
                }
                None => return rendered,
            }
        }
    }
}

fn split_blocks<'a>(text: &'a str, mandatory: &MandatoryValues<'_>) -> Vec<Block<'a>> {
    let mut blocks = vec![Block {
        heading: None,
        lines: Vec::new(),
    }];
    for (index, line) in text.lines().enumerate() {
        if index > 0 && is_heading(line) && !holds_mandatory(line, mandatory) {
            blocks.push(Block {
                heading: Some(line),
                lines: Vec::new(),
            });
        } else if let Some(current) = blocks.last_mut() {
            current.lines.push(line);
        }
    }
    blocks
}

fn render(blocks: &[Block<'_>]) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for block in blocks {
        if let Some(heading) = block.heading {
            lines.push(heading);
        }
        lines.extend(&block.lines);
    }
    lines.join("\n").trim().to_string()
}

/// An uppercase line of at least three letters, optionally ending in `:`.
fn is_heading(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.chars().count() >= MAX_HEADING_CHARS {
        return false;
    }
    let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 3
        && letters.iter().all(|c| c.is_uppercase())
        && line
            .trim_end_matches(':')
            .chars()
            .all(|c| c.is_alphabetic() || c == ' ' || c == '&' || c == '/' || c == '-')
}

/// Content lines such as `NIT TRICHY` or a bare `BTECH` education row look like
/// headings; they are never split on.
fn holds_mandatory(line: &str, mandatory: &MandatoryValues<'_>) -> bool {
    let line = line.trim();
    mandatory.anchors.iter().any(|anchor| line.contains(anchor))
        || mandatory.details.iter().any(|detail| line == detail.trim())
}

fn normalize_heading(heading: &str) -> String {
    heading.trim().trim_end_matches(':').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Asha Rao\n\
        Email: asha@example.edu | Phone: +91 98450 12345\n\
        \n\
        EDUCATION\n\
        B.Tech CSE | NIT Trichy | 8.7 | 2025\n\
        \n\
        TECHNICAL SKILLS\n\
        Cloud & DevOps: AWS, Docker\n\
        \n\
        PROJECTS\n\
        Cluster Autoscaler (2024)\n\
        • Scaling on Kubernetes\n\
        \n\
        CERTIFICATIONS\n\
        • AWS Cloud Practitioner - Amazon (2024)";

    fn asha() -> MandatoryValues<'static> {
        MandatoryValues {
            anchors: vec!["Asha Rao", "asha@example.edu", "+91 98450 12345", "NIT Trichy"],
            details: vec!["B.Tech CSE", "8.7", "2025"],
        }
    }

    #[test]
    fn test_within_budget_is_verbatim() {
        let draft = OutputAssembler::new(3500).assemble(RESUME, GenerationMethod::AiGenerated, &asha());
        assert_eq!(draft.resume_text, RESUME);
        assert_eq!(draft.length_chars, RESUME.chars().count());
        assert_eq!(draft.generation_method, GenerationMethod::AiGenerated);
    }

    #[test]
    fn test_drops_trailing_sections_first() {
        let without_certs = RESUME
            .split("\n\nCERTIFICATIONS")
            .next()
            .unwrap()
            .to_string();
        let budget = without_certs.chars().count();
        let draft = OutputAssembler::new(budget).assemble(RESUME, GenerationMethod::TemplateFallback, &asha());
        assert_eq!(draft.resume_text, without_certs);
        assert!(draft.length_chars <= budget);
    }

    #[test]
    fn test_header_and_education_survive_tiny_budget() {
        let draft = OutputAssembler::new(10).assemble(RESUME, GenerationMethod::TemplateFallback, &asha());
        assert_eq!(
            draft.resume_text,
            "Asha Rao\nEmail: asha@example.edu | Phone: +91 98450 12345\n\nEDUCATION\nB.Tech CSE | NIT Trichy | 8.7 | 2025"
        );
    }

    #[test]
    fn test_education_protected_even_when_last() {
        let text = "Asha Rao\nasha@example.edu\nPROJECTS\nA long project line\nEDUCATION\nNIT Trichy";
        let truncated = OutputAssembler::new(20).truncate(text, &asha());
        assert_eq!(truncated, "Asha Rao\nasha@example.edu\nEDUCATION\nNIT Trichy");
    }

    #[test]
    fn test_uppercase_name_on_first_line_stays_header() {
        let text = "ASHA RAO\nasha@example.edu\nSKILLS:\nRust, Go";
        let truncated = OutputAssembler::new(5).truncate(text, &MandatoryValues::default());
        assert_eq!(truncated, "ASHA RAO\nasha@example.edu");
    }

    #[test]
    fn test_blocks_holding_anchors_survive_under_any_heading() {
        let text = "Asha Rao\n\
            CONTACT\n\
            asha@example.edu | +91 98450 12345\n\
            ACADEMIC QUALIFICATIONS\n\
            B.Tech CSE, NIT Trichy, 8.7, 2025\n\
            PROJECTS\n\
            • Built autoscaling on Kubernetes";
        let truncated = OutputAssembler::new(60).truncate(text, &asha());
        assert_eq!(
            truncated,
            "Asha Rao\nCONTACT\nasha@example.edu | +91 98450 12345\n\
             ACADEMIC QUALIFICATIONS\nB.Tech CSE, NIT Trichy, 8.7, 2025"
        );
        assert_eq!(asha().missing_from(&truncated), None);
    }

    #[test]
    fn test_uppercase_education_rows_are_not_headings() {
        let mandatory = MandatoryValues {
            anchors: vec!["Asha Rao", "NIT TRICHY"],
            details: vec!["BTECH"],
        };
        let text = "Asha Rao\nEmail: asha@example.edu\n\nEDUCATION\nBTECH\nNIT TRICHY\n\nPROJECTS\n• A long project line";
        let truncated = OutputAssembler::new(20).truncate(text, &mandatory);
        assert_eq!(
            truncated,
            "Asha Rao\nEmail: asha@example.edu\n\nEDUCATION\nBTECH\nNIT TRICHY"
        );
    }

    #[test]
    fn test_heading_detection() {
        assert!(is_heading("PROJECTS"));
        assert!(is_heading("EXPERIENCE/INTERNSHIPS:"));
        assert!(is_heading("CLOUD & DEVOPS"));
        assert!(!is_heading("AWS, GCP"));
        assert!(!is_heading("• AWS"));
        assert!(!is_heading("Projects"));
        assert!(!is_heading("CI"));
    }
}
