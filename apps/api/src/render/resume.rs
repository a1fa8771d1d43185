use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RenderError;

/// The structured resume the model must return. Every key is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailoredResume {
    pub name: String,
    /// Email, phone and address separated by `|`.
    pub contact_info: String,
    pub summary: String,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    /// Comma-joined.
    pub skills: String,
    /// Comma-joined.
    pub languages: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub title: String,
    pub company: String,
    pub dates: String,
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub degree: String,
    pub university: String,
    pub dates: String,
}

impl TailoredResume {
    /// Validates a decoded model response against the template contract.
    pub fn from_value(value: &Value) -> Result<Self, RenderError> {
        TailoredResume::deserialize(value).map_err(|e| RenderError::InvalidContext(e.to_string()))
    }

    /// Value for a scalar template placeholder.
    pub fn scalar(&self, name: &str) -> Option<&str> {
        match name {
            "name" => Some(&self.name),
            "contact_info" => Some(&self.contact_info),
            "summary" => Some(&self.summary),
            "skills" => Some(&self.skills),
            "languages" => Some(&self.languages),
            _ => None,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::sample_resume_json;
    use super::*;

    #[test]
    fn test_conformant_object_decodes() {
        let resume = TailoredResume::from_value(&sample_resume_json()).unwrap();
        assert_eq!(resume.name, "Jane Doe");
        assert_eq!(resume.experience.len(), 2);
        assert_eq!(resume.experience[0].details.len(), 2);
        assert_eq!(resume.scalar("skills"), Some("Rust, Tokio, PostgreSQL"));
        assert_eq!(resume.scalar("experience"), None);
    }

    #[test]
    fn test_missing_key_is_invalid_context() {
        let mut value = sample_resume_json();
        value.as_object_mut().unwrap().remove("summary");
        match TailoredResume::from_value(&value) {
            Err(RenderError::InvalidContext(msg)) => assert!(msg.contains("summary")),
            other => panic!("expected InvalidContext, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape_is_invalid_context() {
        let mut value = sample_resume_json();
        value["skills"] = serde_json::json!(["Rust", "Tokio"]);
        assert!(matches!(
            TailoredResume::from_value(&value),
            Err(RenderError::InvalidContext(_))
        ));

        let mut value = sample_resume_json();
        value["experience"][0]
            .as_object_mut()
            .unwrap()
            .remove("details");
        assert!(matches!(
            TailoredResume::from_value(&value),
            Err(RenderError::InvalidContext(_))
        ));
    }
}
