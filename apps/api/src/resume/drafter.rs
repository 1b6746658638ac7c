//! Draft Generator: produces resume text from a `GenerationRequest`.
//!
//! Primary path: an external drafting capability called under a timeout.
//! Fallback path: the deterministic template. The outcome is a two-variant
//! `Draft`; only `GenerationError` (timeout, unavailable) switches paths.

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use tracing::{debug, warn};

use crate::errors::GenerationError;
use crate::llm_client::LlmClient;
use crate::models::resume::GenerationMethod;
use crate::resume::composer::GenerationRequest;
use crate::resume::prompts::DRAFT_SYSTEM;
use crate::resume::template::render_fallback;

// ────────────────────────────────────────────────────────────────────────────
// Capability seam
// ────────────────────────────────────────────────────────────────────────────

/// "Given a brief, return prose." Implemented by the LLM client and by test mocks.
#[async_trait]
pub trait DraftCapability: Send + Sync {
    async fn draft(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Short label for logs and the health endpoint.
    fn name(&self) -> &str;
}

#[async_trait]
impl DraftCapability for LlmClient {
    async fn draft(&self, prompt: &str) -> Result<String, GenerationError> {
        self.call_text(prompt, DRAFT_SYSTEM)
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))
    }

    fn name(&self) -> &str {
        crate::llm_client::MODEL
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Draft outcome
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Draft {
    Generated(String),
    Fallback(String),
}

impl Draft {
    pub fn text(&self) -> &str {
        match self {
            Draft::Generated(text) | Draft::Fallback(text) => text,
        }
    }

    pub fn method(&self) -> GenerationMethod {
        match self {
            Draft::Generated(_) => GenerationMethod::AiGenerated,
            Draft::Fallback(_) => GenerationMethod::TemplateFallback,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DraftGenerator {
    capability: Option<Arc<dyn DraftCapability>>,
    timeout: Duration,
}

impl DraftGenerator {
    pub fn new(capability: Option<Arc<dyn DraftCapability>>, timeout: Duration) -> Self {
        Self {
            capability,
            timeout,
        }
    }

    /// A generator with no capability: every draft is a template fallback.
    pub fn template_only() -> Self {
        Self::new(None, Duration::ZERO)
    }

    /// Name of the configured capability, if any.
    pub fn capability_name(&self) -> Option<&str> {
        self.capability.as_deref().map(|c| c.name())
    }

    /// Drafts a resume. Never fails: any timeout or unavailability of the
    /// capability yields the template instead.
    pub async fn generate(&self, request: &GenerationRequest) -> Draft {
        match self.try_generate(&request.prompt(), request).await {
            Ok(text) => Draft::Generated(text),
            Err(GenerationError::Timeout(after)) => {
                warn!(
                    timeout_secs = after.as_secs_f32(),
                    "Draft call timed out, using template fallback"
                );
                Draft::Fallback(render_fallback(request))
            }
            Err(GenerationError::Unavailable(reason)) => {
                warn!(%reason, "Drafting unavailable, using template fallback");
                Draft::Fallback(render_fallback(request))
            }
        }
    }

    /// One compression attempt targeting `budget` characters. `None` on any
    /// failure or when the result still does not fit.
    pub async fn regenerate_within(&self, request: &GenerationRequest, budget: usize) -> Option<String> {
        match self
            .try_generate(&request.prompt_with_budget(budget), request)
            .await
        {
            Ok(text) if text.chars().count() <= budget => Some(text),
            Ok(text) => {
                debug!(
                    length_chars = text.chars().count(),
                    budget, "Regenerated draft still over budget"
                );
                None
            }
            Err(e) => {
                warn!(error = %e, "Regeneration failed");
                None
            }
        }
    }

    async fn try_generate(
        &self,
        prompt: &str,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        let capability = self
            .capability
            .as_ref()
            .ok_or_else(|| GenerationError::Unavailable("no drafting credential configured".to_string()))?;

        let raw = tokio::time::timeout(self.timeout, capability.draft(prompt))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;

        let text = clean_draft(&raw);
        if text.is_empty() {
            return Err(GenerationError::Unavailable(
                "drafting capability returned no text".to_string(),
            ));
        }
        if let Some(missing) = request.mandatory_values().missing_from(&text) {
            return Err(GenerationError::Unavailable(format!(
                "draft omitted mandatory value '{missing}'"
            )));
        }
        Ok(text)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cleaning
// ────────────────────────────────────────────────────────────────────────────

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid bold regex"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*([^*\n]+)\*").expect("Invalid italic regex"));
static HEADING_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s*").expect("Invalid heading regex"));
static FENCE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^```.*$").expect("Invalid fence regex"));
static BLANK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("Invalid blank line regex"));

/// Strips markdown emphasis, heading markers and fences; trims every line and
/// collapses runs of blank lines.
pub fn clean_draft(raw: &str) -> String {
    let text = BOLD.replace_all(raw, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    let text = HEADING_MARK.replace_all(&text, "");
    let text = FENCE_LINE.replace_all(&text, "");
    let trimmed = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    BLANK_RUN.replace_all(&trimmed, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::test_fixtures::{
        sample_request, FailingCapability, FixedCapability, HangingCapability,
    };

    fn generator(capability: impl DraftCapability + 'static) -> DraftGenerator {
        DraftGenerator::new(Some(Arc::new(capability)), Duration::from_secs(30))
    }

    #[tokio::test]
    async fn test_no_capability_uses_template() {
        let request = sample_request();
        let draft = DraftGenerator::template_only().generate(&request).await;
        assert_eq!(draft.method(), GenerationMethod::TemplateFallback);
        assert_eq!(draft.text(), render_fallback(&request));
    }

    #[tokio::test]
    async fn test_generated_text_is_cleaned() {
        let request = sample_request();
        let raw = format!(
            "**{}**\n{} | {}\n\n\n\n## EDUCATION\n  *B.Tech CSE*, {}, 8.7, 2025  ",
            request.header.name,
            request.header.email,
            request.header.phone,
            request.education[0].institution
        );
        let draft = generator(FixedCapability::new(&raw)).generate(&request).await;
        assert_eq!(
            draft,
            Draft::Generated(
                "Asha Rao\nasha@example.edu | +91 98450 12345\n\nEDUCATION\nB.Tech CSE, NIT Trichy, 8.7, 2025"
                    .to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_failure_falls_back() {
        let request = sample_request();
        let draft = generator(FailingCapability).generate(&request).await;
        assert_eq!(draft, Draft::Fallback(render_fallback(&request)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back_with_name() {
        let request = sample_request();
        let generator = DraftGenerator::new(
            Some(Arc::new(HangingCapability)),
            Duration::from_secs(5),
        );
        let draft = generator.generate(&request).await;
        assert_eq!(draft.method(), GenerationMethod::TemplateFallback);
        assert!(draft.text().contains("Asha Rao"));
    }

    #[tokio::test]
    async fn test_draft_missing_email_falls_back() {
        let request = sample_request();
        let draft = generator(FixedCapability::new(
            "Asha Rao\nEDUCATION\nB.Tech CSE, NIT Trichy, 8.7, 2025",
        ))
        .generate(&request)
        .await;
        assert_eq!(draft.method(), GenerationMethod::TemplateFallback);
    }

    #[tokio::test]
    async fn test_draft_paraphrasing_education_falls_back() {
        let request = sample_request();
        let draft = generator(FixedCapability::new(
            "Asha Rao\nasha@example.edu | +91 98450 12345\nEDUCATION\nBachelor's at NIT Trichy, 2025",
        ))
        .generate(&request)
        .await;
        assert_eq!(draft, Draft::Fallback(render_fallback(&request)));
    }

    #[tokio::test]
    async fn test_regenerate_within_respects_budget() {
        let request = sample_request();
        let short = "Asha Rao\nasha@example.edu | +91 98450 12345\nEDUCATION\nB.Tech CSE, NIT Trichy, 8.7, 2025"
            .to_string();
        let gen = generator(FixedCapability::new(&short));
        assert_eq!(gen.regenerate_within(&request, 500).await, Some(short.clone()));
        assert_eq!(gen.regenerate_within(&request, 10).await, None);
        assert_eq!(
            DraftGenerator::template_only()
                .regenerate_within(&request, 500)
                .await,
            None
        );
    }

    #[test]
    fn test_clean_draft_strips_markdown() {
        let cleaned = clean_draft("```text\n# Asha\n*Intern* at **CloudCo**\n```");
        assert_eq!(cleaned, "Asha\nIntern at CloudCo");
    }

    #[test]
    fn test_clean_draft_keeps_bullets() {
        assert_eq!(clean_draft("• Built X\n- Shipped Y"), "• Built X\n- Shipped Y");
    }
}
