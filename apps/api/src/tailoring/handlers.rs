//! Axum route handlers for the document-producing endpoints.

use axum::{
    async_trait,
    extract::{FromRequest, Request, State},
    http::header::CONTENT_TYPE,
    response::Response,
};
use bytes::Bytes;
use serde_json::Value;

use super::{run_pipeline, FormatQuery};
use crate::errors::AppError;
use crate::extractors::{AppJson, AppQuery};
use crate::extraction::form::ResumeForm;
use crate::extraction::upload::UploadForm;
use crate::extraction::{extract_json, extract_upload, ExtractionError};
use crate::jobs::{parse_job_id, require_job};
use crate::state::AppState;

/// POST /upload
///
/// Multipart `resume` file plus either `job_id` (looked up in the job
/// listings) or a free-text `job_description`.
pub async fn handle_upload(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FormatQuery>,
    mut form: UploadForm,
) -> Result<Response, AppError> {
    let format = query.resolve(state.config.default_output_format)?;

    let missing = || AppError::Validation("Missing job_id or resume file.".to_string());
    let job_id = form.field("job_id").map(parse_job_id).transpose()?;
    let job_description = form.field("job_description").map(str::to_string);
    if job_id.is_none() && job_description.is_none() {
        return Err(missing());
    }
    let file = form.resume.take().ok_or_else(missing)?;

    let job_text = match job_id {
        Some(id) => require_job(&state.config.job_listings_path, id)
            .await?
            .to_prompt_text(),
        None => job_description.unwrap_or_default(),
    };

    let draft = extract_upload(file).await?;
    run_pipeline(&state, &draft, Some(&job_text), format).await
}

/// POST /submit_data
///
/// Structured resume form as JSON, tailored to the posting named by `job_id`.
pub async fn handle_submit_data(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FormatQuery>,
    AppJson(form): AppJson<ResumeForm>,
) -> Result<Response, AppError> {
    let format = query.resolve(state.config.default_output_format)?;
    let job_id = form
        .job_id
        .as_ref()
        .ok_or_else(|| AppError::Validation("Missing job_id in JSON data.".to_string()))?
        .resolve()?;

    let job = require_job(&state.config.job_listings_path, job_id).await?;
    let draft = form.to_draft()?;
    run_pipeline(&state, &draft, Some(&job.to_prompt_text()), format).await
}

/// POST /generate_resume
///
/// General resume from either an uploaded file or any JSON body.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FormatQuery>,
    input: GeneralInput,
) -> Result<Response, AppError> {
    let format = query.resolve(state.config.default_output_format)?;

    let draft = match input {
        GeneralInput::Upload(mut form) => {
            let file = form.resume.take().ok_or(ExtractionError::Empty)?;
            extract_upload(file).await?
        }
        GeneralInput::Json(body) => extract_json(&body)?,
    };

    run_pipeline(&state, &draft, None, format).await
}

/// Body of `/generate_resume`: multipart when the content type says so,
/// JSON otherwise.
#[derive(Debug)]
pub enum GeneralInput {
    Upload(UploadForm),
    Json(Value),
}

#[async_trait]
impl<S> FromRequest<S> for GeneralInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            return Ok(GeneralInput::Upload(
                UploadForm::from_request(req, state).await?,
            ));
        }

        let body = Bytes::from_request(req, state).await?;
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(GeneralInput::Json(Value::Null));
        }
        let value = serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("Invalid JSON body: {e}")))?;
        Ok(GeneralInput::Json(value))
    }
}
