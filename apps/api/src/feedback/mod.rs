//! Resume feedback: scores and justifications produced by the model for a
//! resume against one job posting. Returned to the caller as-is, never stored.

pub mod handlers;
pub mod prompts;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::extraction::ResumeDraft;
use crate::llm_client::{Completion, CompletionService};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreItem {
    pub score: f64,
    pub justification: String,
}

/// Per-criterion scores, grouped. Criterion names are chosen by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackGroups {
    pub impact: BTreeMap<String, ScoreItem>,
    pub brevity: BTreeMap<String, ScoreItem>,
    pub style: BTreeMap<String, ScoreItem>,
    pub other: BTreeMap<String, ScoreItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackReport {
    pub overall_score: ScoreItem,
    pub impact_score: ScoreItem,
    pub brevity_score: ScoreItem,
    pub style_score: ScoreItem,
    pub feedback: FeedbackGroups,
}

/// Asks the model to score `draft` against `job_text`.
pub async fn request_feedback(
    llm: &dyn CompletionService,
    draft: &ResumeDraft,
    job_text: &str,
) -> Result<FeedbackReport, AppError> {
    let system = prompts::feedback_system_prompt();
    let user = prompts::feedback_user_prompt(&draft.text, job_text);

    info!("Requesting resume feedback from {}", llm.model());
    let report: FeedbackReport = llm
        .call_json(Completion {
            system: &system,
            user: &user,
        })
        .await?;

    info!(
        "Feedback received: overall score {}",
        report.overall_score.score
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::prompts::testing::sample_feedback_reply;
    use super::*;
    use crate::extraction::ResumeSource;
    use crate::llm_client::testing::StubCompletion;

    fn draft() -> ResumeDraft {
        ResumeDraft::new("Jane Doe resume".to_string(), ResumeSource::Upload).unwrap()
    }

    #[tokio::test]
    async fn test_example_reply_decodes() {
        let stub = StubCompletion::replying(sample_feedback_reply());
        let report = request_feedback(&stub, &draft(), "job").await.unwrap();

        assert_eq!(report.overall_score.score, 77.0);
        assert_eq!(report.feedback.impact.len(), 4);
        assert_eq!(report.feedback.style["Consistency"].score, 0.0);
        assert_eq!(report.feedback.other.len(), 3);

        let (system, user) = &stub.calls()[0];
        assert!(system.contains("Score each criterion on a scale of 0 to 10."));
        assert!(user.starts_with("Resume:\nJane Doe resume\n\nJob Description:\njob\n\n"));
        assert!(user.ends_with("The output MUST be valid JSON."));
    }

    #[test]
    fn test_resume_text_with_slot_names_stays_literal() {
        let user = prompts::feedback_user_prompt("My {job_text} notes", "Rust role");
        assert!(user.starts_with("Resume:\nMy {job_text} notes\n\nJob Description:\nRust role\n\n"));
    }

    #[tokio::test]
    async fn test_missing_group_defaults_to_empty() {
        let reply = r#"{
            "overall_score": {"score": 6.5, "justification": "ok"},
            "impact_score": {"score": 6, "justification": "ok"},
            "brevity_score": {"score": 7, "justification": "ok"},
            "style_score": {"score": 7, "justification": "ok"},
            "feedback": {"impact": {"Repetition": {"score": 4, "justification": "some"}}}
        }"#;
        let stub = StubCompletion::replying(reply);
        let report = request_feedback(&stub, &draft(), "job").await.unwrap();
        assert_eq!(report.overall_score.score, 6.5);
        assert!(report.feedback.other.is_empty());
    }

    #[tokio::test]
    async fn test_report_missing_scores_is_malformed() {
        let stub = StubCompletion::replying(r#"{"feedback": {}}"#);
        let result = request_feedback(&stub, &draft(), "job").await;
        assert!(matches!(result, Err(AppError::MalformedModelOutput(_))));
    }
}
