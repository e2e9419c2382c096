//! The instructional prompt for resume-field extraction.
//!
//! Centralising the template here serves two purposes:
//!
//! 1. **Single source of truth** — tightening an instruction (e.g. what
//!    counts as tech stack) requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the template directly without
//!    calling a real model, making prompt regressions easy to catch.
//!
//! Callers can override the template via
//! [`crate::config::ExtractionConfig::prompt_template`]; the constant here is
//! used only when no override is provided. Overrides must contain the
//! [`RESUME_TEXT_PLACEHOLDER`] marker, which [`build_prompt`] replaces with
//! the resume plaintext.

/// Placeholder substituted with the resume text by [`build_prompt`].
pub const RESUME_TEXT_PLACEHOLDER: &str = "{resume_text}";

/// Default extraction prompt.
///
/// The template enumerates the exact five target fields, insists that
/// `tech_stack` aggregates skills mentioned anywhere in the document, and
/// forbids prose or markdown fencing around the reply.
pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"You are an expert resume parser. Extract the following information from this resume text:

1. Full Name: The complete name of the individual
2. Phone Number: Any contact phone number(s)
3. Email Address: The email address used for professional contact
4. Location: City, state, country or full address

5. Tech Stack: IMPORTANT - Comprehensively extract ALL technical skills, programming languages,
   frameworks, libraries, tools, platforms, and technologies mentioned ANYWHERE in the resume.
   Include skills from ALL sections including skills sections, project descriptions, work experience,
   education, certifications, etc. Be thorough and don't miss any technology mentions.
   Include:
   - Programming languages (Python, Java, JavaScript, etc.)
   - Frameworks (React, Django, Spring, etc.)
   - Databases (MySQL, MongoDB, PostgreSQL, etc.)
   - Cloud platforms (AWS, Azure, GCP, etc.)
   - Tools (Git, Docker, Kubernetes, etc.)
   - Any other technical skills or technologies

IMPORTANT: Your response must be ONLY a valid JSON object with these exact keys:
{
  "full_name": "Extracted full name",
  "phone_number": "Extracted phone number",
  "email": "Extracted email",
  "location": "Extracted location",
  "tech_stack": ["Skill 1", "Skill 2", "Skill 3", ...]
}

For tech_stack, include ALL technical skills found anywhere in the resume.
Do not include any explanation, markdown formatting, or commentary outside of the JSON object.

Resume text:
{resume_text}"#;

/// Substitute the resume text into a prompt template.
pub fn build_prompt(template: &str, resume_text: &str) -> String {
    template.replace(RESUME_TEXT_PLACEHOLDER, resume_text)
}
