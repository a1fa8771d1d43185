//! Static job listing store.
//!
//! The listing file is a JSON array of postings keyed by integer `id`. It is
//! read-only at runtime and re-read on every lookup, so edits to the file are
//! picked up without a restart.

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::AppError;

/// A single job posting. Fields other than `id` and `description` are kept
/// as-is so the whole posting can be forwarded to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl JobPosting {
    /// The posting serialized as JSON, as embedded in prompts.
    pub fn to_prompt_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.description.clone().unwrap_or_default())
    }
}

/// `job_id` as it arrives in JSON bodies: a number or a numeric string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum JobIdInput {
    Number(i64),
    Text(String),
}

impl JobIdInput {
    pub fn resolve(&self) -> Result<i64, AppError> {
        match self {
            JobIdInput::Number(id) => Ok(*id),
            JobIdInput::Text(raw) => parse_job_id(raw),
        }
    }
}

/// Parses a job id received as text (form field or JSON string).
pub fn parse_job_id(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| AppError::Validation(format!("Invalid job_id '{}'.", raw.trim())))
}

/// Looks up a posting by id, reading the listing file for this call only.
pub async fn find_job(listings_path: &Path, job_id: i64) -> Result<Option<JobPosting>, AppError> {
    let raw = tokio::fs::read(listings_path)
        .await
        .with_context(|| format!("Error loading job listings from '{}'", listings_path.display()))?;

    let listings: Vec<Value> = serde_json::from_slice(&raw)
        .with_context(|| format!("Error loading job listings from '{}'", listings_path.display()))?;

    let Some(entry) = listings
        .into_iter()
        .find(|job| job.get("id").and_then(Value::as_i64) == Some(job_id))
    else {
        debug!("Job {job_id} not present in listings");
        return Ok(None);
    };

    let posting = serde_json::from_value(entry)
        .with_context(|| format!("Job {job_id} in listings is malformed"))?;
    Ok(Some(posting))
}

/// Like `find_job`, but an unknown id is a 404.
pub async fn require_job(listings_path: &Path, job_id: i64) -> Result<JobPosting, AppError> {
    find_job(listings_path, job_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Job not found.".to_string()))
}
