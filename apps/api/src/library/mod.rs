//! Document library: the rendered files sitting in the output directory.

pub mod handlers;

use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use tracing::debug;

use crate::errors::AppError;
use crate::render::OutputFormat;

const MAX_FILE_NAME_LENGTH: usize = 255;

/// Names of the documents in `dir`, sorted.
///
/// Only regular, non-hidden `.docx` and `.pdf` files are listed. A directory
/// that does not exist yet lists as empty.
pub async fn list_documents(dir: &Path) -> Result<Vec<String>, AppError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("Output directory {} does not exist yet", dir.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Error listing '{}'", dir.display()))
                .into())
        }
    };

    let mut names = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Error listing '{}'", dir.display()))?
    {
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.starts_with('.') || OutputFormat::from_path(Path::new(&name)).is_none() {
            continue;
        }
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file {
            names.push(name);
        }
    }

    names.sort();
    Ok(names)
}

/// A stored document read into memory.
#[derive(Debug)]
pub struct StoredDocument {
    pub file_name: String,
    pub format: OutputFormat,
    pub data: Vec<u8>,
}

/// Reads one document from `dir` by bare file name.
pub async fn open_document(dir: &Path, file_name: &str) -> Result<StoredDocument, AppError> {
    let path = resolve(dir, file_name)?;
    let format = OutputFormat::from_path(&path)
        .ok_or_else(|| AppError::NotFound(format!("Document '{file_name}' not found.")))?;

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("Document '{file_name}' not found.")))
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Error reading '{}'", path.display()))
                .into())
        }
    };

    Ok(StoredDocument {
        file_name: file_name.to_string(),
        format,
        data,
    })
}

/// Joins `file_name` onto `dir`, rejecting anything but a single plain component.
fn resolve(dir: &Path, file_name: &str) -> Result<PathBuf, AppError> {
    let invalid = || AppError::Validation(format!("Invalid document name '{file_name}'."));

    if file_name.is_empty()
        || file_name.len() > MAX_FILE_NAME_LENGTH
        || file_name.starts_with('.')
        || file_name.contains('\\')
    {
        return Err(invalid());
    }

    let mut components = Path::new(file_name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(dir.join(file_name)),
        _ => Err(invalid()),
    }
}

/// `200` response that makes the client save `data` as `download_name`.
pub fn download_response(
    data: Vec<u8>,
    format: OutputFormat,
    download_name: &str,
) -> Result<Response, AppError> {
    let content_disposition = format!("attachment; filename=\"{download_name}\"");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, format.content_type())
        .header(header::CONTENT_DISPOSITION, content_disposition)
        .body(Body::from(data))
        .context("Failed to build download response")
        .map_err(AppError::Internal)
}
