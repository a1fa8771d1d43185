// Prompt templates for resume feedback.

use crate::llm_client::prompts::{fill_slots, CAREER_COACH_PERSONA, JSON_ONLY_REMINDER};

/// Worked example of the expected report, embedded in the system prompt.
const FEEDBACK_EXAMPLE: &str = r#"{
  "overall_score": { "score": 77, "justification": "Overall, the resume is well-written and aligns with the job description, but it could be improved by adding more quantifiable achievements." },
  "impact_score": { "score": 77, "justification": "The resume uses strong action verbs, but lacks quantifiable metrics to show impact." },
  "brevity_score": { "score": 75, "justification": "The resume is a good length, but some bullet points could be more concise." },
  "style_score": { "score": 79, "justification": "The resume's style is generally good, but there are some inconsistencies in formatting." },
  "feedback": {
    "impact": {
      "Quantifying Impact": { "score": 5, "justification": "The resume lacks specific numbers or metrics to quantify achievements." },
      "Action Verb Use": { "score": 10, "justification": "The resume consistently uses strong, active voice verbs." },
      "Accomplishments": { "score": 10, "justification": "The resume clearly highlights key accomplishments." },
      "Repetition": { "score": 6, "justification": "There is some repetition of skills and responsibilities across different roles." }
    },
    "brevity": {
      "Length": { "score": 7, "justification": "The resume is an appropriate length, fitting on one page." },
      "Filler Words": { "score": 10, "justification": "The resume avoids unnecessary filler words and phrases." },
      "Total Bullet Points": { "score": 7, "justification": "The number of bullet points per role is slightly high, which can make it hard to read." },
      "Bullet Points Length": { "score": 8, "justification": "Most bullet points are concise, but a few are a bit long." }
    },
    "style": {
      "Sections": { "score": 10, "justification": "The resume is well-organized with clear sections." },
      "Personal Pronouns": { "score": 7, "justification": "The resume mostly avoids personal pronouns, but they are used in a few places." },
      "Buzzwords & Cliches": { "score": 7, "justification": "A few buzzwords are present, which could be replaced with more specific language." },
      "Active Voice": { "score": 10, "justification": "The resume is written almost entirely in the active voice." },
      "Consistency": { "score": 0, "justification": "There are some inconsistencies in the formatting of dates and titles." },
      "Date Order": { "score": 10, "justification": "Dates are in a consistent reverse-chronological order." }
    },
    "other": {
      "Spell Check": { "score": 10, "justification": "No spelling or grammatical errors were found." },
      "Target My CV": { "score": 10, "justification": "The resume is well-tailored to the specific job description." },
      "Rate CV Review": { "score": 10, "justification": "The overall quality of the resume is excellent for this job application." }
    }
  }
}"#;

const FEEDBACK_SYSTEM_TEMPLATE: &str = "\
{persona} Your task is to provide feedback on a resume based on a job description. \
The feedback MUST be a JSON object with the following keys and structure. \
Score each criterion on a scale of 0 to 10.
{example}
The 'feedback' key should contain a nested JSON object with scores and justifications for each sub-criterion. \
The 'overall_score', 'impact_score', 'brevity_score', and 'style_score' should be derived from the sub-scores \
with overall justifications. {reminder}";

const FEEDBACK_USER_TEMPLATE: &str = "\
Resume:
{resume_text}

Job Description:
{job_text}

Provide feedback as a JSON object with the specified structure. {reminder}";

pub fn feedback_system_prompt() -> String {
    fill_slots(
        FEEDBACK_SYSTEM_TEMPLATE,
        &[
            ("persona", CAREER_COACH_PERSONA),
            ("example", FEEDBACK_EXAMPLE),
            ("reminder", JSON_ONLY_REMINDER),
        ],
    )
}

pub fn feedback_user_prompt(resume_text: &str, job_text: &str) -> String {
    fill_slots(
        FEEDBACK_USER_TEMPLATE,
        &[
            ("resume_text", resume_text),
            ("job_text", job_text),
            ("reminder", JSON_ONLY_REMINDER),
        ],
    )
}
