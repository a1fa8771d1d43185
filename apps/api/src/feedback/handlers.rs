use axum::{extract::State, Json};
use serde::Serialize;

use super::{request_feedback, FeedbackReport};
use crate::errors::AppError;
use crate::extraction::extract_upload;
use crate::extraction::upload::UploadForm;
use crate::jobs::{parse_job_id, require_job};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub feedback: FeedbackReport,
}

/// POST /get_feedback
///
/// Multipart `resume` file plus `job_id`. The job is looked up before the
/// resume is read, so an unknown id never reaches the model.
pub async fn handle_get_feedback(
    State(state): State<AppState>,
    mut form: UploadForm,
) -> Result<Json<FeedbackResponse>, AppError> {
    let missing = || AppError::Validation("Missing job_id or resume file.".to_string());
    let raw_job_id = form.field("job_id").ok_or_else(missing)?;
    let job_id = parse_job_id(raw_job_id)?;
    let file = form.resume.take().ok_or_else(missing)?;

    let job = require_job(&state.config.job_listings_path, job_id).await?;
    let draft = extract_upload(file).await?;

    let feedback = request_feedback(state.llm.as_ref(), &draft, &job.to_prompt_text()).await?;
    Ok(Json(FeedbackResponse { feedback }))
}
