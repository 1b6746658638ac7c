// Shared prompt fragments.
// Each feature that calls the model keeps its own prompts.rs alongside it and
// splices these in with `str::replace`.

/// Keeps the model to the facts it was given.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every line you write must be traceable to the student information above. \
    Do NOT invent employers, projects, grades, dates or metrics. \
    If the information does not support a claim, omit it entirely.";

/// Output must be pasteable into a document as-is.
pub const PLAIN_TEXT_INSTRUCTION: &str = "\
    Return the resume as plain text only. \
    Do NOT use markdown (no **, no #, no code fences), tables or columns. \
    Do NOT include any commentary before or after the resume.";
