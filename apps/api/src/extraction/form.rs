//! Structured resume form submitted as JSON to `/submit_data`.
//!
//! The mobile client has shipped a few shapes of this payload (single objects
//! instead of arrays, comma-joined strings instead of lists, `from_date`
//! instead of `from`), so every field is optional and lenient.

use std::fmt;

use serde::{Deserialize, Deserializer};

use super::{ExtractionError, ResumeDraft, ResumeSource};
use crate::jobs::JobIdInput;

const MISSING: &str = "N/A";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResumeForm {
    pub personal_info: PersonalInfo,
    #[serde(alias = "objectives")]
    pub objective: Objective,
    #[serde(deserialize_with = "one_or_many")]
    pub experience: Vec<ExperienceEntry>,
    #[serde(deserialize_with = "one_or_many")]
    pub education: Vec<EducationEntry>,
    #[serde(deserialize_with = "list_or_csv")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "list_or_csv")]
    pub languages: Vec<String>,
    pub job_id: Option<JobIdInput>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "phone")]
    pub contact_no: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Objective {
    pub industry: Option<String>,
    pub level_of_work: Option<String>,
    pub company_scale: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub job_title: Option<String>,
    pub company: Option<String>,
    #[serde(alias = "from_date")]
    pub from: Option<String>,
    #[serde(alias = "to_date")]
    pub to: Option<String>,
    pub is_current_job: bool,
    pub responsibilities: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: Option<String>,
    pub university: Option<String>,
    #[serde(alias = "from_date")]
    pub from: Option<String>,
    #[serde(alias = "to_date")]
    pub to: Option<String>,
    pub background: Option<String>,
}

impl ResumeForm {
    /// Composes the labelled text block sent to the model.
    pub fn to_draft(&self) -> Result<ResumeDraft, ExtractionError> {
        if self.is_blank() {
            return Err(ExtractionError::Empty);
        }
        ResumeDraft::new(self.compose_text(), ResumeSource::FormData)
    }

    fn is_blank(&self) -> bool {
        let p = &self.personal_info;
        let o = &self.objective;
        [&p.name, &p.email, &p.contact_no, &p.address, &o.industry, &o.level_of_work, &o.company_scale]
            .iter()
            .all(|v| is_missing(v))
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.skills.is_empty()
            && self.languages.is_empty()
    }

    fn compose_text(&self) -> String {
        FormText(self).to_string()
    }
}

/// The labelled text block sent to the model for a form submission.
struct FormText<'a>(&'a ResumeForm);

impl fmt::Display for FormText<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let form = self.0;
        let p = &form.personal_info;
        let o = &form.objective;

        writeln!(f, "Personal Information:")?;
        writeln!(f, "Name: {}", or_missing(&p.name))?;
        writeln!(f, "Email: {}", or_missing(&p.email))?;
        writeln!(f, "Contact No: {}", or_missing(&p.contact_no))?;
        if !is_missing(&p.address) {
            writeln!(f, "Address: {}", or_missing(&p.address))?;
        }

        writeln!(f, "\nObjective:")?;
        writeln!(f, "Industry: {}", or_missing(&o.industry))?;
        writeln!(f, "Level of Work: {}", or_missing(&o.level_of_work))?;
        writeln!(f, "Company Scale: {}", or_missing(&o.company_scale))?;

        writeln!(f, "\nExperience:")?;
        for exp in &form.experience {
            let to = if exp.is_current_job && is_missing(&exp.to) {
                "Present"
            } else {
                or_missing(&exp.to)
            };
            write!(f, "- ")?;
            if !is_missing(&exp.job_title) {
                write!(f, "Title: {}, ", or_missing(&exp.job_title))?;
            }
            writeln!(
                f,
                "Company: {}, From: {}, To: {}",
                or_missing(&exp.company),
                or_missing(&exp.from),
                to
            )?;
            writeln!(f, "  Responsibilities: {}", or_missing(&exp.responsibilities))?;
        }

        writeln!(f, "\nEducation:")?;
        for edu in &form.education {
            write!(
                f,
                "- {} at {}",
                or_missing(&edu.degree),
                or_missing(&edu.university)
            )?;
            if !is_missing(&edu.from) || !is_missing(&edu.to) {
                write!(f, " ({} - {})", or_missing(&edu.from), or_missing(&edu.to))?;
            }
            writeln!(f)?;
            if !is_missing(&edu.background) {
                writeln!(f, "  Background: {}", or_missing(&edu.background))?;
            }
        }

        writeln!(f, "\nSkills:")?;
        for skill in &form.skills {
            writeln!(f, "- {skill}")?;
        }

        writeln!(f, "\nLanguages:")?;
        for language in &form.languages {
            writeln!(f, "- {language}")?;
        }

        Ok(())
    }
}

fn is_missing(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn or_missing(value: &Option<String>) -> &str {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => MISSING,
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
        Null(()),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(items) => items,
        OneOrMany::One(item) => vec![item],
        OneOrMany::Null(()) => Vec::new(),
    })
}

fn list_or_csv<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrCsv {
        List(Vec<String>),
        Csv(String),
        Null(()),
    }

    let items = match ListOrCsv::deserialize(deserializer)? {
        ListOrCsv::List(items) => items,
        ListOrCsv::Csv(joined) => joined.split(',').map(str::to_string).collect(),
        ListOrCsv::Null(()) => Vec::new(),
    };
    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compose_text_uses_labelled_sections() {
        let form: ResumeForm = serde_json::from_value(json!({
            "personal_info": {"name": "Ada Lovelace", "email": "ada@example.com", "contact_no": "0400 000 000"},
            "objective": {"industry": "IT", "level_of_work": "Senior", "company_scale": "Startup"},
            "experience": [{"company": "Analytical Engines", "from": "1842", "to": "1843", "responsibilities": "Wrote the first program"}],
            "education": [{"degree": "Mathematics", "university": "Home tutoring"}],
            "skills": ["Mathematics", "Poetry"],
            "languages": ["English", "French"],
            "job_id": 3
        }))
        .unwrap();

        let draft = form.to_draft().unwrap();
        assert_eq!(draft.source, ResumeSource::FormData);
        let text = draft.text;
        assert!(text.starts_with("Personal Information:\nName: Ada Lovelace\n"));
        assert!(text.contains("Industry: IT\nLevel of Work: Senior\nCompany Scale: Startup"));
        assert!(text.contains(
            "- Company: Analytical Engines, From: 1842, To: 1843\n  Responsibilities: Wrote the first program"
        ));
        assert!(text.contains("- Mathematics at Home tutoring\n"));
        assert!(text.contains("Skills:\n- Mathematics\n- Poetry\n"));
        assert!(text.contains("Languages:\n- English\n- French\n"));
    }

    #[test]
    fn test_mobile_client_shape_is_accepted() {
        let form: ResumeForm = serde_json::from_value(json!({
            "personal_info": {"name": "Lin", "email": "", "phone": "123", "address": ""},
            "objectives": {"industry": "Retail"},
            "experience": {"job_title": "", "company": "Shop", "from_date": "2020", "to_date": "", "responsibilities": "Sales", "is_current_job": true},
            "education": {"university": "UTS", "degree": "BBus", "from_date": "2016", "to_date": "2019", "background": ""},
            "skills": "Sales, Customer service, ",
            "languages": "English"
        }))
        .unwrap();

        assert_eq!(form.personal_info.contact_no.as_deref(), Some("123"));
        assert_eq!(form.experience.len(), 1);
        assert_eq!(form.skills, vec!["Sales", "Customer service"]);

        let text = form.to_draft().unwrap().text;
        assert!(text.contains("Email: N/A"));
        assert!(text.contains("Industry: Retail\nLevel of Work: N/A"));
        assert!(text.contains("- Company: Shop, From: 2020, To: Present"));
        assert!(text.contains("- BBus at UTS (2016 - 2019)"));
        assert!(!text.contains("Address:"));
    }

    #[test]
    fn test_empty_form_is_rejected() {
        let form: ResumeForm = serde_json::from_value(json!({"job_id": "2"})).unwrap();
        assert!(matches!(form.to_draft(), Err(ExtractionError::Empty)));
    }

    #[test]
    fn test_null_collections_are_empty() {
        let form: ResumeForm =
            serde_json::from_value(json!({"experience": null, "skills": null})).unwrap();
        assert!(form.experience.is_empty());
        assert!(form.skills.is_empty());
    }
}
