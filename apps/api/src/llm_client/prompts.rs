// Shared prompt fragments.
// Each feature that calls the model keeps its own prompts.rs alongside it;
// this file holds the pieces they have in common.

/// Persona shared by every system prompt.
pub const CAREER_COACH_PERSONA: &str = "You are a professional career coach.";

/// Reminder appended to every user message and system prompt.
pub const JSON_ONLY_REMINDER: &str = "The output MUST be valid JSON.";

/// Output contract for documents rendered through the resume template.
pub const RESUME_SCHEMA_DESCRIPTION: &str = "\
- 'name': The person's full name.
- 'contact_info': A single string with email, phone, and address separated by a pipe (|).
- 'summary': A concise professional summary.
- 'experience': An array of job objects. Each object MUST have 'title', 'company', 'dates', and 'details' (an array of strings for bullet points).
- 'education': An array of education objects. Each object MUST have 'degree', 'university', and 'dates'.
- 'skills': A single string of comma-separated skills.
- 'languages': A single string of comma-separated languages.";

/// Fills `{key}` slots in a single pass. Inserted values are never scanned
/// again, so user text that happens to contain `{job_text}` stays literal.
/// Braces that do not name a slot are kept as they are.
pub fn fill_slots(template: &str, values: &[(&str, &str)]) -> String {
    let extra: usize = values.iter().map(|(_, value)| value.len()).sum();
    let mut out = String::with_capacity(template.len() + extra);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let slot = values
            .iter()
            .find(|(key, _)| tail.starts_with(key) && tail[key.len()..].starts_with('}'));
        match slot {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
