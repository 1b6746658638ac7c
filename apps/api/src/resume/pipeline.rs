//! Resume tailoring pipeline.
//!
//! Flow: normalize → match → compose → draft → assemble → analyze.
//! Stateless between calls; each invocation owns its profile and job copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::models::profile::StudentProfile;
use crate::models::resume::{GenerationMethod, ResumeDraft};
use crate::resume::analysis::{analyze_resume, ResumeAnalysis};
use crate::resume::assembler::OutputAssembler;
use crate::resume::composer::{compose, FormattingContract};
use crate::resume::drafter::{Draft, DraftGenerator};
use crate::resume::matcher::{MatchedContent, RelevanceMatcher, Shortfall};
use crate::resume::normalizer::{normalize_job, normalize_profile};
use crate::resume::policy::{EmptyContentPolicy, ResumePolicy, SelectionBounds};
use crate::resume::structured::StructuredResume;
use crate::resume::template::render_fallback;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// What made it onto the page, in ranked order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionSummary {
    pub skills: Vec<String>,
    pub projects: Vec<String>,
    pub internships: Vec<String>,
    pub certifications: Vec<String>,
    pub shortfalls: Vec<Shortfall>,
}

impl From<&MatchedContent> for SelectionSummary {
    fn from(matched: &MatchedContent) -> Self {
        Self {
            skills: matched.skill_names().into_iter().map(str::to_string).collect(),
            projects: matched.projects.iter().map(|p| p.item.title.clone()).collect(),
            internships: matched
                .internships
                .iter()
                .map(|i| format!("{} - {}", i.item.role, i.item.company))
                .collect(),
            certifications: matched
                .certifications
                .iter()
                .map(|c| c.item.name.clone())
                .collect(),
            shortfalls: matched.shortfalls.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredResume {
    #[serde(flatten)]
    pub draft: ResumeDraft,
    pub selection: SelectionSummary,
    pub analysis: ResumeAnalysis,
    /// The selected content as JSON sections.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<StructuredResume>,
    pub generated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ResumePipeline {
    policy: ResumePolicy,
    matcher: RelevanceMatcher,
    generator: DraftGenerator,
    assembler: OutputAssembler,
}

impl ResumePipeline {
    pub fn new(policy: ResumePolicy, generator: DraftGenerator, max_chars: usize) -> Self {
        Self {
            policy,
            matcher: RelevanceMatcher::new(policy),
            generator,
            assembler: OutputAssembler::new(max_chars),
        }
    }

    pub fn policy(&self) -> &ResumePolicy {
        &self.policy
    }

    pub fn generator(&self) -> &DraftGenerator {
        &self.generator
    }

    /// A copy of this pipeline with different selection bounds.
    pub fn with_bounds(&self, bounds: SelectionBounds) -> Result<Self, AppError> {
        let policy = self.policy.with_bounds(bounds)?;
        Ok(Self {
            policy,
            matcher: RelevanceMatcher::new(policy),
            generator: self.generator.clone(),
            assembler: self.assembler,
        })
    }

    /// Normalizes both raw records, then tailors.
    pub async fn run(&self, profile_record: &Value, job_record: &Value) -> Result<TailoredResume, AppError> {
        let profile = normalize_profile(profile_record)?;
        let job = normalize_job(job_record)?;
        self.tailor(&profile, &job).await
    }

    /// Ranks and selects content without drafting.
    pub fn preview(&self, profile: &StudentProfile, job: &JobPosting) -> Result<MatchedContent, AppError> {
        self.check_content(profile)?;
        Ok(self.matcher.match_content(profile, job))
    }

    pub async fn tailor(&self, profile: &StudentProfile, job: &JobPosting) -> Result<TailoredResume, AppError> {
        let matched = self.preview(profile, job)?;
        let contract = FormattingContract::one_page(self.assembler.max_chars());
        let request = compose(profile, &matched, job, &contract);
        let mandatory = request.mandatory_values();

        let draft = match self.generator.generate(&request).await {
            Draft::Generated(text) if !self.assembler.fits(&text) => {
                let budget = self.assembler.max_chars();
                let text = self
                    .generator
                    .regenerate_within(&request, budget)
                    .await
                    .unwrap_or(text);
                self.assembler
                    .assemble(&text, GenerationMethod::AiGenerated, &mandatory)
            }
            draft => self.assembler.assemble(draft.text(), draft.method(), &mandatory),
        };

        // An AI draft must still carry every mandatory value after truncation
        let draft = match mandatory.missing_from(&draft.resume_text) {
            Some(missing) if draft.generation_method == GenerationMethod::AiGenerated => {
                warn!(missing, "Truncated draft lost a mandatory value, using template fallback");
                self.assembler.assemble(
                    &render_fallback(&request),
                    GenerationMethod::TemplateFallback,
                    &mandatory,
                )
            }
            _ => draft,
        };

        info!(
            job_id = %job.id,
            method = %draft.generation_method,
            length_chars = draft.length_chars,
            shortfalls = matched.shortfalls.len(),
            "Tailored resume"
        );

        Ok(TailoredResume {
            analysis: analyze_resume(&draft.resume_text, job),
            selection: SelectionSummary::from(&matched),
            structured: Some(StructuredResume::from(&request)),
            draft,
            generated_at: Utc::now(),
        })
    }

    fn check_content(&self, profile: &StudentProfile) -> Result<(), AppError> {
        if self.policy.empty_content == EmptyContentPolicy::Reject && profile.has_no_ranked_content() {
            return Err(AppError::Validation(
                "profile has no projects, internships or certifications to build a resume from"
                    .to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::resume::test_fixtures::{
        job_record, profile_record, FailingCapability, FixedCapability, HangingCapability,
        SequentialCapability,
    };

    fn pipeline(generator: DraftGenerator) -> ResumePipeline {
        ResumePipeline::new(ResumePolicy::default(), generator, 3500)
    }

    fn with_capability(capability: Arc<dyn crate::resume::drafter::DraftCapability>) -> ResumePipeline {
        pipeline(DraftGenerator::new(Some(capability), Duration::from_secs(30)))
    }

    const MANDATORY: [&str; 7] = [
        "Asha Rao",
        "asha@example.edu",
        "+91 98450 12345",
        "NIT Trichy",
        "B.Tech CSE",
        "8.7",
        "2025",
    ];

    fn ai_text(padding: usize) -> String {
        format!(
            "Asha Rao\nasha@example.edu | +91 98450 12345\n\nEDUCATION\nB.Tech CSE, NIT Trichy, 8.7, 2025\n\nPROJECTS\n{}",
            "• Built autoscaling on Kubernetes\n".repeat(padding)
        )
    }

    #[tokio::test]
    async fn test_template_path_preserves_mandatory_fields() {
        let result = pipeline(DraftGenerator::template_only())
            .run(&profile_record(), &job_record())
            .await
            .unwrap();
        assert_eq!(result.draft.generation_method, GenerationMethod::TemplateFallback);
        for value in MANDATORY {
            assert!(result.draft.resume_text.contains(value), "missing {value}");
        }
        assert_eq!(result.selection.skills[..2], ["AWS", "Docker"]);
        assert_eq!(result.selection.projects, vec!["Cluster Autoscaler"]);
    }

    #[tokio::test]
    async fn test_ai_path_preserves_mandatory_fields() {
        let result = with_capability(Arc::new(FixedCapability::new(&ai_text(2))))
            .run(&profile_record(), &job_record())
            .await
            .unwrap();
        assert_eq!(result.draft.generation_method, GenerationMethod::AiGenerated);
        for value in MANDATORY {
            assert!(result.draft.resume_text.contains(value), "missing {value}");
        }
    }

    #[tokio::test]
    async fn test_failure_is_not_surfaced() {
        let result = with_capability(Arc::new(FailingCapability))
            .run(&profile_record(), &job_record())
            .await
            .unwrap();
        assert_eq!(result.draft.generation_method, GenerationMethod::TemplateFallback);
        assert!(!result.draft.resume_text.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_yields_template_with_name() {
        let generator = DraftGenerator::new(Some(Arc::new(HangingCapability)), Duration::from_secs(30));
        let result = pipeline(generator)
            .run(&profile_record(), &job_record())
            .await
            .unwrap();
        assert_eq!(result.draft.generation_method, GenerationMethod::TemplateFallback);
        assert!(result.draft.resume_text.contains("Asha Rao"));
    }

    #[tokio::test]
    async fn test_over_long_draft_regenerated_once() {
        let long = ai_text(200);
        let short = ai_text(3);
        let capability = Arc::new(SequentialCapability::new(vec![long, short.clone()]));
        let result = with_capability(capability.clone())
            .run(&profile_record(), &job_record())
            .await
            .unwrap();
        assert_eq!(result.draft.generation_method, GenerationMethod::AiGenerated);
        assert_eq!(result.draft.resume_text, short.trim());
        let prompts = capability.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[1].contains("LENGTH CORRECTION"));
    }

    #[tokio::test]
    async fn test_still_too_long_is_truncated_as_ai() {
        let capability = Arc::new(SequentialCapability::new(vec![ai_text(200), ai_text(200)]));
        let result = with_capability(capability)
            .run(&profile_record(), &job_record())
            .await
            .unwrap();
        assert_eq!(result.draft.generation_method, GenerationMethod::AiGenerated);
        assert!(result.draft.resume_text.ends_with("B.Tech CSE, NIT Trichy, 8.7, 2025"));
    }

    #[tokio::test]
    async fn test_missing_name_and_email_rejected_before_generation() {
        let capability = Arc::new(SequentialCapability::new(vec![]));
        let err = with_capability(capability.clone())
            .run(&json!({"phone": "123"}), &job_record())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(capability.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_empty_content_policy() {
        let bare = json!({"name": "Asha Rao", "email": "asha@example.edu"});

        let allowed = pipeline(DraftGenerator::template_only())
            .run(&bare, &job_record())
            .await
            .unwrap();
        assert!(allowed.draft.resume_text.contains("EDUCATION"));
        assert!(allowed
            .selection
            .shortfalls
            .iter()
            .any(|s| s.category == "projects"));

        let strict = ResumePolicy {
            empty_content: EmptyContentPolicy::Reject,
            ..Default::default()
        };
        let err = ResumePipeline::new(strict, DraftGenerator::template_only(), 3500)
            .run(&bare, &job_record())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_with_bounds_overrides_per_call() {
        let base = pipeline(DraftGenerator::template_only());
        let narrowed = base
            .with_bounds(SelectionBounds {
                max_languages: 2,
                ..Default::default()
            })
            .unwrap();
        let result = narrowed.run(&profile_record(), &job_record()).await.unwrap();
        assert_eq!(result.selection.skills, vec!["AWS", "Docker"]);
        assert_eq!(base.policy().bounds.max_languages, 4);

        let invalid = base.with_bounds(SelectionBounds {
            min_projects: 5,
            ..Default::default()
        });
        assert!(invalid.is_err());
    }

    #[tokio::test]
    async fn test_template_over_budget_truncated_keeping_header() {
        let result = ResumePipeline::new(ResumePolicy::default(), DraftGenerator::template_only(), 120)
            .run(&profile_record(), &job_record())
            .await
            .unwrap();
        let text = &result.draft.resume_text;
        assert!(text.starts_with("Asha Rao\nEmail: asha@example.edu | Phone: +91 98450 12345"));
        assert!(text.contains("EDUCATION\nB.Tech CSE | NIT Trichy | 8.7 | 2025"));
        assert!(!text.contains("PROJECTS"));
    }

    #[tokio::test]
    async fn test_ai_sections_holding_mandatory_values_survive_truncation() {
        let text = "Asha Rao\nCONTACT\nasha@example.edu | +91 98450 12345\n\
                    ACADEMIC QUALIFICATIONS\nB.Tech CSE, NIT Trichy, CGPA 8.7, 2025\n\
                    PROJECTS\n• Built autoscaling on Kubernetes";
        let generator = DraftGenerator::new(
            Some(Arc::new(FixedCapability::new(text))),
            Duration::from_secs(30),
        );
        let result = ResumePipeline::new(ResumePolicy::default(), generator, 60)
            .run(&profile_record(), &job_record())
            .await
            .unwrap();
        assert_eq!(result.draft.generation_method, GenerationMethod::AiGenerated);
        for value in MANDATORY {
            assert!(result.draft.resume_text.contains(value), "missing {value}");
        }
        assert!(!result.draft.resume_text.contains("PROJECTS"));
    }

    #[tokio::test]
    async fn test_ai_draft_losing_a_detail_to_truncation_falls_back() {
        let text = "Asha Rao\nasha@example.edu | +91 98450 12345\n\
                    EDUCATION\nB.Tech CSE, NIT Trichy\n\
                    ACADEMIC RECORD\nCGPA 8.7, class of 2025\n\
                    PROJECTS\n• Built autoscaling on Kubernetes";
        let generator = DraftGenerator::new(
            Some(Arc::new(FixedCapability::new(text))),
            Duration::from_secs(30),
        );
        let result = ResumePipeline::new(ResumePolicy::default(), generator, 60)
            .run(&profile_record(), &job_record())
            .await
            .unwrap();
        assert_eq!(result.draft.generation_method, GenerationMethod::TemplateFallback);
        for value in MANDATORY {
            assert!(result.draft.resume_text.contains(value), "missing {value}");
        }
    }

    #[tokio::test]
    async fn test_template_keeps_uppercase_institution() {
        let mut record = profile_record();
        record["education"] = json!([{"institution": "NIT TRICHY"}]);
        let result = ResumePipeline::new(ResumePolicy::default(), DraftGenerator::template_only(), 90)
            .run(&record, &job_record())
            .await
            .unwrap();
        assert!(result.draft.resume_text.ends_with("EDUCATION\nNIT TRICHY"));
    }
}
