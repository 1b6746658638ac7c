//! Resume policy: the immutable bounds and scoring weights handed to the matcher.
//!
//! Built once at startup from `Config`; handlers may derive a per-call copy with
//! different bounds via `ResumePolicy::with_bounds`.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Per-category selection bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionBounds {
    pub min_projects: usize,
    pub max_projects: usize,
    pub min_internships: usize,
    pub max_internships: usize,
    /// Floor for skills/technologies: the top entries kept whenever any exist.
    pub min_languages: usize,
    /// Cap for skills/technologies combined.
    pub max_languages: usize,
    pub min_certifications: usize,
    pub max_certifications: usize,
}

impl Default for SelectionBounds {
    fn default() -> Self {
        Self {
            min_projects: 1,
            max_projects: 3,
            min_internships: 0,
            max_internships: 2,
            min_languages: 2,
            max_languages: 4,
            min_certifications: 0,
            max_certifications: 3,
        }
    }
}

impl SelectionBounds {
    pub fn validate(&self) -> Result<(), AppError> {
        let pairs = [
            ("projects", self.min_projects, self.max_projects),
            ("internships", self.min_internships, self.max_internships),
            ("languages", self.min_languages, self.max_languages),
            ("certifications", self.min_certifications, self.max_certifications),
        ];
        for (category, min, max) in pairs {
            if min > max {
                return Err(AppError::Validation(format!(
                    "min_{category} ({min}) exceeds max_{category} ({max})"
                )));
            }
        }
        if self.max_languages < 2 {
            return Err(AppError::Validation(
                "max_languages must be at least 2".to_string(),
            ));
        }
        Ok(())
    }
}

/// Relative weights for the relevance score.
/// Requirement hits always outweigh incidental title/description overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Skill phrase found verbatim inside a requirement.
    pub requirement_phrase: f64,
    /// Skill phrase found in the title or description only.
    pub context_phrase: f64,
    /// Share of the score carried by requirement keyword coverage.
    pub requirement_keyword: f64,
    /// Share of the score carried by title/description keyword coverage.
    pub context_keyword: f64,
    /// Keyword hits needed for full coverage of a category.
    pub keyword_saturation: usize,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            requirement_phrase: 1.0,
            context_phrase: 0.6,
            requirement_keyword: 0.7,
            context_keyword: 0.3,
            keyword_saturation: 8,
        }
    }
}

/// What to do when a profile has no projects, internships or certifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyContentPolicy {
    /// Generate with mandatory sections only and report the shortfall.
    #[default]
    Allow,
    /// Refuse with a validation error before any generation attempt.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumePolicy {
    pub bounds: SelectionBounds,
    pub weights: ScoringWeights,
    pub empty_content: EmptyContentPolicy,
}

impl ResumePolicy {
    pub fn with_bounds(self, bounds: SelectionBounds) -> Result<Self, AppError> {
        bounds.validate()?;
        Ok(Self { bounds, ..self })
    }
}
