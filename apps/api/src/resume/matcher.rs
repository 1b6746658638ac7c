//! Relevance Matcher: scores every profile item against a job posting and keeps a
//! bounded, ranked subset per category.
//!
//! Scores are in [0, 1]. Requirement hits outweigh incidental overlap with the
//! title or description. Ranking is a stable descending sort, so equal scores keep
//! the order the student listed them in.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::job::JobPosting;
use crate::models::profile::{Certification, Internship, Project, StudentProfile};
use crate::resume::policy::{ResumePolicy, ScoringWeights};
use crate::resume::tokens::{contains_phrase, keywords, tokenize};

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A profile item annotated with its relevance score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scored<T> {
    pub item: T,
    pub score: f64,
    /// Position of the item in the profile, used for tie-breaking.
    pub source_index: usize,
}

/// Category whose selection stayed below its minimum because the profile had too
/// few entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub category: String,
    pub required: usize,
    pub available: usize,
}

/// Ranked, bounded subsets of the profile. Lives for one pipeline invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedContent {
    pub skills: Vec<Scored<String>>,
    pub projects: Vec<Scored<Project>>,
    pub internships: Vec<Scored<Internship>>,
    pub certifications: Vec<Scored<Certification>>,
    pub shortfalls: Vec<Shortfall>,
}

impl MatchedContent {
    pub fn skill_names(&self) -> Vec<&str> {
        self.skills.iter().map(|s| s.item.as_str()).collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Job corpus
// ────────────────────────────────────────────────────────────────────────────

/// Pre-tokenised view of a job posting, built once per match.
struct JobCorpus {
    /// Each requirement as a token sequence, for phrase matching.
    requirement_phrases: Vec<Vec<String>>,
    /// Title plus description as one token sequence.
    context_tokens: Vec<String>,
    requirement_keywords: BTreeSet<String>,
    /// Title/description keywords not already among the requirement keywords.
    context_keywords: BTreeSet<String>,
}

impl JobCorpus {
    fn new(job: &JobPosting) -> Self {
        let context_text = format!("{} {}", job.title, job.description);
        let requirement_keywords: BTreeSet<String> =
            job.requirements.iter().flat_map(|r| keywords(r)).collect();
        let context_keywords = keywords(&context_text)
            .into_iter()
            .filter(|k| !requirement_keywords.contains(k))
            .collect();

        Self {
            requirement_phrases: job.requirements.iter().map(|r| tokenize(r)).collect(),
            context_tokens: tokenize(&context_text),
            requirement_keywords,
            context_keywords,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Matcher
// ────────────────────────────────────────────────────────────────────────────

/// Scores and selects profile content under an immutable policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceMatcher {
    policy: ResumePolicy,
}

impl RelevanceMatcher {
    pub fn new(policy: ResumePolicy) -> Self {
        Self { policy }
    }

    /// Scores every item in every category, ranks, and applies the selection bounds.
    pub fn match_content(&self, profile: &StudentProfile, job: &JobPosting) -> MatchedContent {
        let corpus = JobCorpus::new(job);
        let weights = &self.policy.weights;
        let bounds = &self.policy.bounds;
        let mut shortfalls = Vec::new();

        let skills = merged_skills(profile);
        let skills = select(
            "skills",
            rank(skills, |s| skill_score(s, &corpus, weights)),
            bounds.min_languages,
            bounds.max_languages,
            &mut shortfalls,
        );

        let projects = select(
            "projects",
            rank(profile.projects.clone(), |p| {
                let mut text = format!("{} {}", p.title, p.description);
                for tech in &p.technologies {
                    text.push(' ');
                    text.push_str(tech);
                }
                item_score(&keywords(&text), &corpus, weights)
            }),
            bounds.min_projects,
            bounds.max_projects,
            &mut shortfalls,
        );

        let internships = select(
            "internships",
            rank(profile.internships.clone(), |i| {
                let text = format!("{} {} {}", i.company, i.role, i.description);
                item_score(&keywords(&text), &corpus, weights)
            }),
            bounds.min_internships,
            bounds.max_internships,
            &mut shortfalls,
        );

        let certifications = select(
            "certifications",
            rank(profile.certifications.clone(), |c| {
                let text = format!("{} {}", c.name, c.issuer);
                item_score(&keywords(&text), &corpus, weights)
            }),
            bounds.min_certifications,
            bounds.max_certifications,
            &mut shortfalls,
        );

        debug!(
            skills = skills.len(),
            projects = projects.len(),
            internships = internships.len(),
            certifications = certifications.len(),
            shortfalls = shortfalls.len(),
            "Matched profile content"
        );

        MatchedContent {
            skills,
            projects,
            internships,
            certifications,
            shortfalls,
        }
    }
}

/// Skills then technologies, de-duplicated case-insensitively.
fn merged_skills(profile: &StudentProfile) -> Vec<String> {
    let mut seen = HashSet::new();
    profile
        .skills
        .iter()
        .chain(profile.technologies.iter())
        .filter(|s| seen.insert(s.to_lowercase()))
        .cloned()
        .collect()
}

/// Phrase score or keyword score, whichever is higher.
fn skill_score(skill: &str, corpus: &JobCorpus, weights: &ScoringWeights) -> f64 {
    let phrase = tokenize(skill);
    let phrase_score = if corpus
        .requirement_phrases
        .iter()
        .any(|requirement| contains_phrase(requirement, &phrase))
    {
        weights.requirement_phrase
    } else if contains_phrase(&corpus.context_tokens, &phrase) {
        weights.context_phrase
    } else {
        0.0
    };
    phrase_score
        .max(item_score(&keywords(skill), corpus, weights))
        .clamp(0.0, 1.0)
}

/// Saturating keyword coverage against requirements and context.
fn item_score(item_keywords: &BTreeSet<String>, corpus: &JobCorpus, weights: &ScoringWeights) -> f64 {
    if item_keywords.is_empty() {
        return 0.0;
    }
    let saturation = weights.keyword_saturation.max(1);
    let coverage = |job_keywords: &BTreeSet<String>| -> f64 {
        if job_keywords.is_empty() {
            return 0.0;
        }
        let hits = item_keywords.intersection(job_keywords).count();
        let target = job_keywords.len().min(saturation);
        (hits as f64 / target as f64).min(1.0)
    };
    let score = weights.requirement_keyword * coverage(&corpus.requirement_keywords)
        + weights.context_keyword * coverage(&corpus.context_keywords);
    score.min(1.0)
}

/// Scores every item and sorts descending. `sort_by` is stable, so ties keep
/// profile order.
fn rank<T>(items: Vec<T>, score: impl Fn(&T) -> f64) -> Vec<Scored<T>> {
    let mut ranked: Vec<Scored<T>> = items
        .into_iter()
        .enumerate()
        .map(|(source_index, item)| Scored {
            score: score(&item),
            item,
            source_index,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Takes ranked items while under `max`, admitting zero-score items only to reach `min`.
fn select<T>(
    category: &str,
    ranked: Vec<Scored<T>>,
    min: usize,
    max: usize,
    shortfalls: &mut Vec<Shortfall>,
) -> Vec<Scored<T>> {
    let available = ranked.len();
    let mut selected = Vec::with_capacity(max.min(available));
    for candidate in ranked {
        if selected.len() >= max {
            break;
        }
        if candidate.score > 0.0 || selected.len() < min {
            selected.push(candidate);
        }
    }
    if selected.len() < min {
        shortfalls.push(Shortfall {
            category: category.to_string(),
            required: min,
            available,
        });
    }
    selected
}
