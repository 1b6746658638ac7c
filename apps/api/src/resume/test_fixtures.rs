//! Shared fixtures for resume tests: raw records and scripted drafting capabilities.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::errors::GenerationError;
use crate::resume::composer::{compose, FormattingContract, GenerationRequest};
use crate::resume::drafter::DraftCapability;
use crate::resume::matcher::RelevanceMatcher;
use crate::resume::normalizer::{normalize_job, normalize_profile};

pub fn profile_record() -> Value {
    json!({
        "name": "Asha Rao",
        "email": "asha@example.edu",
        "phone": "+91 98450 12345",
        "github": "github.com/asharao",
        "education": [
            {"degree": "B.Tech CSE", "university": "NIT Trichy", "cgpa": 8.7, "graduation_year": 2025}
        ],
        "skills": ["Python", "AWS", "React", "Docker"],
        "projects": [
            {"title": "Recipe App", "description": "Mobile app for recipes", "technologies": ["Flutter"]},
            {"title": "Cluster Autoscaler", "description": "Scaling on Kubernetes", "technologies": ["Docker", "AWS"], "year": 2024}
        ],
        "internships": [
            {"company": "CloudCo", "role": "DevOps Intern", "description": "Maintained AWS infrastructure with Docker", "duration": "3 months"}
        ],
        "certifications": [
            {"name": "AWS Cloud Practitioner", "issuer": "Amazon", "date": "2024"}
        ],
        "languages": ["English", "Tamil"]
    })
}

pub fn job_record() -> Value {
    json!({
        "id": 42,
        "title": "Cloud Engineer",
        "company": "Nimbus Labs",
        "description": "Build deployment pipelines and monitor services.",
        "requirements": ["AWS", "Docker", "Kubernetes"],
        "location": "Bengaluru",
        "job_type": "full-time"
    })
}

/// Request built from the fixture records through the real normalizer, matcher
/// and composer.
pub fn sample_request() -> GenerationRequest {
    let profile = normalize_profile(&profile_record()).unwrap();
    let job = normalize_job(&job_record()).unwrap();
    let matched = RelevanceMatcher::default().match_content(&profile, &job);
    compose(&profile, &matched, &job, &FormattingContract::one_page(3500))
}

/// Always returns the same text.
pub struct FixedCapability {
    text: String,
}

impl FixedCapability {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

#[async_trait]
impl DraftCapability for FixedCapability {
    async fn draft(&self, _prompt: &str) -> Result<String, GenerationError> {
        Ok(self.text.clone())
    }

    fn name(&self) -> &str {
        "fixed_mock"
    }
}

/// Always unavailable.
pub struct FailingCapability;

#[async_trait]
impl DraftCapability for FailingCapability {
    async fn draft(&self, _prompt: &str) -> Result<String, GenerationError> {
        Err(GenerationError::Unavailable("mock outage".to_string()))
    }

    fn name(&self) -> &str {
        "failing_mock"
    }
}

/// Never completes.
pub struct HangingCapability;

#[async_trait]
impl DraftCapability for HangingCapability {
    async fn draft(&self, _prompt: &str) -> Result<String, GenerationError> {
        std::future::pending().await
    }

    fn name(&self) -> &str {
        "hanging_mock"
    }
}

/// Returns scripted responses in order and records every prompt it receives.
/// Panics if called more times than there are responses.
pub struct SequentialCapability {
    responses: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
}

impl SequentialCapability {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl DraftCapability for SequentialCapability {
    async fn draft(&self, prompt: &str) -> Result<String, GenerationError> {
        let mut prompts = self.prompts.lock().unwrap();
        let responses = self.responses.lock().unwrap();
        let call = prompts.len();
        if call >= responses.len() {
            panic!(
                "SequentialCapability: no more responses (call #{call}, have {})",
                responses.len()
            );
        }
        prompts.push(prompt.to_string());
        Ok(responses[call].clone())
    }

    fn name(&self) -> &str {
        "sequential_mock"
    }
}
