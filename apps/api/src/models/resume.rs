use std::fmt;

use serde::{Deserialize, Serialize};

/// How the resume text was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMethod {
    AiGenerated,
    TemplateFallback,
}

impl fmt::Display for GenerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationMethod::AiGenerated => f.write_str("ai_generated"),
            GenerationMethod::TemplateFallback => f.write_str("template_fallback"),
        }
    }
}

/// Final pipeline output. Ownership passes to the caller, who persists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDraft {
    pub resume_text: String,
    pub generation_method: GenerationMethod,
    pub length_chars: usize,
}

impl ResumeDraft {
    pub fn new(resume_text: String, generation_method: GenerationMethod) -> Self {
        let length_chars = resume_text.chars().count();
        Self {
            resume_text,
            generation_method,
            length_chars,
        }
    }
}
