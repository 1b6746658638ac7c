//! Axum route handlers for the Resume API.

use std::borrow::Cow;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::profile::StudentProfile;
use crate::resume::analysis::{analyze_resume, ResumeAnalysis};
use crate::resume::keywords::extract_target_skills;
use crate::resume::matcher::MatchedContent;
use crate::resume::normalizer::{normalize_job, normalize_profile};
use crate::resume::pipeline::{ResumePipeline, TailoredResume};
use crate::resume::policy::SelectionBounds;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Raw records as stored by the placement portal, plus optional bounds.
#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub profile: Value,
    pub job: Value,
    pub bounds: Option<SelectionBounds>,
    /// Also return the resume as JSON sections.
    #[serde(default)]
    pub include_structured: bool,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub profile: StudentProfile,
    pub job_id: String,
    pub target_skills: Vec<String>,
    pub matched: MatchedContent,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job: Value,
}

/// The shared pipeline, or a per-request copy when bounds are overridden.
fn pipeline_for<'a>(
    state: &'a AppState,
    bounds: Option<SelectionBounds>,
) -> Result<Cow<'a, ResumePipeline>, AppError> {
    match bounds {
        Some(bounds) => Ok(Cow::Owned(state.pipeline.with_bounds(bounds)?)),
        None => Ok(Cow::Borrowed(state.pipeline.as_ref())),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/generate
///
/// Full pipeline: normalize → match → compose → draft → assemble → analyze.
/// `include_structured` adds the JSON-section form of the same resume.
/// A drafting failure is never an error here; it shows up as
/// `generation_method = "template_fallback"`.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailoredResume>, AppError> {
    let pipeline = pipeline_for(&state, request.bounds)?;
    let mut resume = pipeline.run(&request.profile, &request.job).await?;
    if !request.include_structured {
        resume.structured = None;
    }
    Ok(Json(resume))
}

/// POST /api/v1/resumes/match
///
/// Ranking preview: what would be selected, with scores, without drafting.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let pipeline = pipeline_for(&state, request.bounds)?;
    let profile = normalize_profile(&request.profile)?;
    let job = normalize_job(&request.job)?;
    let matched = pipeline.preview(&profile, &job)?;

    Ok(Json(MatchResponse {
        target_skills: extract_target_skills(&job),
        job_id: job.id,
        profile,
        matched,
    }))
}

/// POST /api/v1/resumes/analyze
///
/// Scores an existing resume text against a job.
pub async fn handle_analyze(Json(request): Json<AnalyzeRequest>) -> Result<Json<ResumeAnalysis>, AppError> {
    if request.resume_text.trim().is_empty() {
        return Err(AppError::Validation("resume_text cannot be empty".to_string()));
    }
    let job = normalize_job(&request.job)?;
    if job.full_text().trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "job has no title, description or requirements to analyze against".to_string(),
        ));
    }
    Ok(Json(analyze_resume(&request.resume_text, &job)))
}
