// Prompt templates for resume tailoring and general resume generation.
// Shared fragments live in llm_client::prompts.

use crate::llm_client::prompts::{
    fill_slots, CAREER_COACH_PERSONA, JSON_ONLY_REMINDER, RESUME_SCHEMA_DESCRIPTION,
};

/// System prompt for job-targeted tailoring. Replace `{persona}`, `{schema}`
/// and `{reminder}` before sending.
const TAILOR_SYSTEM_TEMPLATE: &str = "\
{persona} Your task is to tailor a resume for a specific job description. \
The output MUST be a JSON object with the following keys. \
This is crucial for filling a resume template:
{schema}
{reminder}";

/// System prompt for a general resume with no target job.
const GENERAL_SYSTEM_TEMPLATE: &str = "\
{persona} Your task is to generate a general resume based on the provided data. \
The output MUST be a JSON object with the following keys:
{schema}
{reminder}";

/// User message for tailoring. `{label}` is `Resume` or `Resume Data`.
const TAILOR_USER_TEMPLATE: &str = "\
{label}:
{resume_text}

Job description:
{job_text}

Please tailor the resume to match the job. {reminder}";

const GENERAL_USER_TEMPLATE: &str = "\
Please generate a general resume from this information:
{resume_text}

{reminder}";

pub fn tailor_system_prompt() -> String {
    fill_system(TAILOR_SYSTEM_TEMPLATE)
}

pub fn general_system_prompt() -> String {
    fill_system(GENERAL_SYSTEM_TEMPLATE)
}

pub fn tailor_user_prompt(label: &str, resume_text: &str, job_text: &str) -> String {
    fill_slots(
        TAILOR_USER_TEMPLATE,
        &[
            ("label", label),
            ("resume_text", resume_text),
            ("job_text", job_text),
            ("reminder", JSON_ONLY_REMINDER),
        ],
    )
}

pub fn general_user_prompt(resume_text: &str) -> String {
    fill_slots(
        GENERAL_USER_TEMPLATE,
        &[("resume_text", resume_text), ("reminder", JSON_ONLY_REMINDER)],
    )
}

fn fill_system(template: &str) -> String {
    fill_slots(
        template,
        &[
            ("persona", CAREER_COACH_PERSONA),
            ("schema", RESUME_SCHEMA_DESCRIPTION),
            ("reminder", JSON_ONLY_REMINDER),
        ],
    )
}
