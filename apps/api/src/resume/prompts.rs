// Prompt constants for resume drafting.
// Placeholders are filled with `str::replace` by the composer, including the
// shared fragments from llm_client::prompts.

/// System prompt for every drafting call.
pub const DRAFT_SYSTEM: &str = "You are an expert resume writer specializing in ATS-friendly, \
    one-page resumes for students and new graduates applying to technical roles. \
    Focus on quantified achievements and the keywords the job posting uses.";

/// Drafting prompt. Replace every `{placeholder}` before sending.
pub const DRAFT_PROMPT_TEMPLATE: &str = r#"Create a professional, ATS-friendly, one-page resume for the following job application.

JOB DETAILS:
Position: {job_title}
Company: {company}
Job Type: {job_type}
Location: {job_location}

KEY REQUIREMENTS:
{requirements}

TARGET SKILLS NAMED IN THE POSTING:
{target_skills}

JOB DESCRIPTION EXCERPT:
{description_excerpt}

STUDENT INFORMATION:
Name: {name}
Contact: {contact}
LinkedIn: {linkedin}
GitHub: {github}
Location: {location}

EDUCATION:
{education}

TOP RELEVANT SKILLS (prioritize these):
{skills}

MOST RELEVANT PROJECTS:
{projects}

RELEVANT INTERNSHIPS:
{internships}

RELEVANT CERTIFICATIONS:
{certifications}

EXTRACURRICULAR ACTIVITIES:
{extracurricular}

LANGUAGES:
{languages}

RESUME REQUIREMENTS:
1. MUST fit on one printed page: at most {max_chars} characters in total
2. Include ALL contact and education information exactly as given above
3. Emphasize the skills and experiences most relevant to the key requirements
4. Use strong action verbs and quantified achievements where the source supports them
5. Use the job's keywords naturally

{grounding_instruction}

FORMATTING GUIDELINES:
- Name on the first line, contact information on one line below it
- Section headers in UPPERCASE, in this order: {section_order}
- Bullet points start with "• "

{plain_text_instruction}"#;

/// Appended to the drafting prompt when a previous draft ran over the page.
/// Replace `{budget}` before sending.
pub const COMPRESSION_INSTRUCTION: &str = r#"

LENGTH CORRECTION:
A previous draft was too long for one page. This draft MUST be at most {budget} characters.
Shorten bullet points and drop the least relevant projects, internships or certifications first.
Never shorten or omit the name, contact line or EDUCATION section."#;

/// Placeholder for list sections with nothing selected.
pub const NONE_SELECTED: &str = "None";

/// Placeholder for optional contact fields left blank.
pub const NOT_PROVIDED: &str = "Not provided";
