// Resume tailoring: one profile, one job posting, one page of resume text.
// Stages run strictly forward and hold no state between requests.
// All model calls go through llm_client via the DraftCapability trait.

pub mod analysis;
pub mod assembler;
pub mod composer;
pub mod drafter;
pub mod handlers;
pub mod keywords;
pub mod matcher;
pub mod normalizer;
pub mod pipeline;
pub mod policy;
pub mod prompts;
pub mod structured;
pub mod template;
pub mod tokens;

#[cfg(test)]
pub mod test_fixtures;
