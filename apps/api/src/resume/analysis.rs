//! Resume analysis: ATS-friendliness and keyword coverage of a finished resume
//! against the job it targets.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::job::JobPosting;
use crate::resume::tokens::is_stop_word;

const SECTION_WORDS: &[&str] = &["experience", "education", "skills", "summary", "objective"];
const SECTION_WEIGHT: f64 = 0.15;
const FORMAT_WEIGHT: f64 = 0.1;
const SPECIAL_CHAR_TOLERANCE: usize = 10;
const MISSING_KEYWORDS_SUGGESTED: usize = 5;

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[a-z]{4,}\b").expect("Invalid word regex"));
static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\d{4}\b").expect("Invalid year regex"));
static SPECIAL_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s\-.@()]").expect("Invalid special character regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAnalysis {
    pub ats_score: f64,
    pub keyword_match_score: f64,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub suggestions: Vec<String>,
    pub overall_quality: Quality,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    Excellent,
    Good,
    Fair,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl Quality {
    fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Quality::Excellent
        } else if score >= 0.6 {
            Quality::Good
        } else if score >= 0.4 {
            Quality::Fair
        } else {
            Quality::NeedsImprovement
        }
    }
}

pub fn analyze_resume(resume_text: &str, job: &JobPosting) -> ResumeAnalysis {
    let job_keywords = extract_keywords(&job.full_text());
    let resume_keywords = extract_keywords(resume_text);

    let matched_keywords: Vec<String> = job_keywords.intersection(&resume_keywords).cloned().collect();
    let missing_keywords: Vec<String> = job_keywords.difference(&resume_keywords).cloned().collect();

    let keyword_match_score = if job_keywords.is_empty() {
        0.0
    } else {
        matched_keywords.len() as f64 / job_keywords.len() as f64
    };
    let ats_score = ats_score(resume_text);
    let suggestions = suggestions(keyword_match_score, ats_score, &missing_keywords);

    ResumeAnalysis {
        ats_score,
        keyword_match_score,
        matched_keywords,
        missing_keywords,
        suggestions,
        overall_quality: Quality::from_score((keyword_match_score + ats_score) / 2.0),
    }
}

/// Unique lowercase words of four or more letters, stop-words removed.
fn extract_keywords(text: &str) -> BTreeSet<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|w| !is_stop_word(w))
        .map(str::to_string)
        .collect()
}

fn ats_score(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let mut score = SECTION_WORDS
        .iter()
        .filter(|section| lower.contains(*section))
        .count() as f64
        * SECTION_WEIGHT;

    if text.contains('•') || text.contains('-') || text.contains('*') {
        score += FORMAT_WEIGHT;
    }
    if text.contains('@') {
        score += FORMAT_WEIGHT;
    }
    if YEAR.is_match(text) {
        score += FORMAT_WEIGHT;
    }
    if SPECIAL_CHAR.find_iter(text).count() > SPECIAL_CHAR_TOLERANCE {
        score -= FORMAT_WEIGHT;
    }
    score.clamp(0.0, 1.0)
}

fn suggestions(keyword_score: f64, ats_score: f64, missing_keywords: &[String]) -> Vec<String> {
    let mut suggestions = Vec::new();
    if keyword_score < 0.5 {
        suggestions.push("Include more relevant keywords from the job description".to_string());
    }
    if ats_score < 0.6 {
        suggestions.push(
            "Improve ATS-friendliness by using standard section headers and bullet points".to_string(),
        );
    }
    if !missing_keywords.is_empty() {
        let top: Vec<&str> = missing_keywords
            .iter()
            .take(MISSING_KEYWORDS_SUGGESTED)
            .map(String::as_str)
            .collect();
        suggestions.push(format!(
            "Consider adding these relevant keywords: {}",
            top.join(", ")
        ));
    }
    if keyword_score < 0.3 {
        suggestions.push(
            "Tailor your experience descriptions to better match the job requirements".to_string(),
        );
    }
    if ats_score < 0.4 {
        suggestions.push(
            "Use a simpler format with clear section headers and avoid special characters".to_string(),
        );
    }
    suggestions
}
