//! Tailoring pipeline shared by `/upload`, `/submit_data` and `/generate_resume`.
//!
//! draft text → prompt → model → JSON object → rendered document → download.
//! With a job description the result is a tailored resume, without one a
//! general resume.

pub mod handlers;
pub mod prompts;

use axum::response::Response;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{ResumeDraft, ResumeSource};
use crate::library::download_response;
use crate::llm_client::Completion;
use crate::render::{DocumentKind, OutputFormat};
use crate::state::AppState;

/// `?format=docx|pdf` on the generating endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct FormatQuery {
    pub format: Option<String>,
}

impl FormatQuery {
    /// The requested format, or `default` when none was given.
    pub fn resolve(&self, default: OutputFormat) -> Result<OutputFormat, AppError> {
        match self.format.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => raw.parse().map_err(AppError::Validation),
        }
    }
}

/// System and user messages for one pipeline run.
#[derive(Debug, Clone)]
pub struct ComposedPrompt {
    pub kind: DocumentKind,
    pub system: String,
    pub user: String,
}

/// Builds the prompt for `draft`, targeted at `job_text` when given.
pub fn compose_prompt(draft: &ResumeDraft, job_text: Option<&str>) -> ComposedPrompt {
    match job_text {
        Some(job) => ComposedPrompt {
            kind: DocumentKind::Tailored,
            system: prompts::tailor_system_prompt(),
            user: prompts::tailor_user_prompt(draft_label(draft.source), &draft.text, job),
        },
        None => ComposedPrompt {
            kind: DocumentKind::General,
            system: prompts::general_system_prompt(),
            user: prompts::general_user_prompt(&draft.text),
        },
    }
}

fn draft_label(source: ResumeSource) -> &'static str {
    match source {
        ResumeSource::FormData => "Resume Data",
        ResumeSource::Upload | ResumeSource::RawJson => "Resume",
    }
}

/// Runs the model on `draft` and returns the rendered document as a download.
pub async fn run_pipeline(
    state: &AppState,
    draft: &ResumeDraft,
    job_text: Option<&str>,
    format: OutputFormat,
) -> Result<Response, AppError> {
    let prompt = compose_prompt(draft, job_text);
    info!(
        "Requesting {:?} resume from {} ({} chars of {:?} input)",
        prompt.kind,
        state.llm.model(),
        draft.text.len(),
        draft.source
    );

    let context: Value = state
        .llm
        .call_json(Completion {
            system: &prompt.system,
            user: &prompt.user,
        })
        .await?;

    let document = state.renderer.render(&context, prompt.kind, format).await?;
    info!("Generated {}", document.file_name);

    let data = tokio::fs::read(&document.path)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;
    download_response(data, document.format, &document.download_name)
}
