use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use serde::Serialize;

use super::{download_response, list_documents, open_document};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ListResumesResponse {
    pub available_resumes: Vec<String>,
}

/// GET /list_resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
) -> Result<Json<ListResumesResponse>, AppError> {
    let available_resumes = list_documents(state.renderer.output_dir()).await?;
    Ok(Json(ListResumesResponse { available_resumes }))
}

/// GET /resumes/:file_name
///
/// Serves a previously generated document under its stored name.
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let document = open_document(state.renderer.output_dir(), &file_name).await?;
    download_response(document.data, document.format, &document.file_name)
}
