//! Extractor: turns an uploaded resume file or a JSON submission into plain text.
//!
//! The result is a request-scoped `ResumeDraft` that is discarded once the
//! prompt has been assembled.

pub mod docx;
pub mod form;
pub mod pdf;
pub mod upload;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("No resume text extracted or provided.")]
    Empty,

    #[error("Unsupported resume format '{0}'. Upload a PDF or DOCX file.")]
    UnsupportedFormat(String),

    #[error("Error processing PDF file: {0}")]
    UnreadablePdf(String),

    #[error("Error processing DOCX file: {0}")]
    UnreadableDocx(String),

    #[error("Extraction worker failed: {0}")]
    Worker(String),
}

/// Where the draft text came from. Drives how the prompt labels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeSource {
    /// Text pulled out of an uploaded file.
    Upload,
    /// Labelled text block composed from the structured form.
    FormData,
    /// Free-form JSON body passed through as text.
    RawJson,
}

/// Plain resume text plus its origin.
#[derive(Debug, Clone)]
pub struct ResumeDraft {
    pub text: String,
    pub source: ResumeSource,
}

impl ResumeDraft {
    pub fn new(text: String, source: ResumeSource) -> Result<Self, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(Self { text, source })
    }
}

/// Document formats accepted as resume uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Pdf,
    Docx,
}

impl UploadKind {
    /// Decides the format from the file name, falling back to the declared content type.
    pub fn detect(file_name: &str, content_type: Option<&str>) -> Result<Self, ExtractionError> {
        let lower = file_name.to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            return Ok(UploadKind::Pdf);
        }
        if lower.ends_with(".docx") {
            return Ok(UploadKind::Docx);
        }
        match content_type {
            Some("application/pdf") => Ok(UploadKind::Pdf),
            Some("application/vnd.openxmlformats-officedocument.wordprocessingml.document") => {
                Ok(UploadKind::Docx)
            }
            _ => Err(ExtractionError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

/// A file part received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Extracts the text of an uploaded resume on the blocking pool.
pub async fn extract_upload(file: UploadedFile) -> Result<ResumeDraft, ExtractionError> {
    let kind = UploadKind::detect(&file.file_name, file.content_type.as_deref())?;
    debug!(
        "Extracting {:?} resume '{}' ({} bytes)",
        kind,
        file.file_name,
        file.data.len()
    );

    let text = tokio::task::spawn_blocking(move || match kind {
        UploadKind::Pdf => pdf::extract_pdf_text(&file.data),
        UploadKind::Docx => docx::extract_docx_text(&file.data),
    })
    .await
    .map_err(|e| ExtractionError::Worker(e.to_string()))??;

    ResumeDraft::new(text, ResumeSource::Upload)
}

/// Uses a free-form JSON body as resume text.
pub fn extract_json(body: &serde_json::Value) -> Result<ResumeDraft, ExtractionError> {
    let is_empty = match body {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::String(s) => s.trim().is_empty(),
        _ => false,
    };
    if is_empty {
        return Err(ExtractionError::Empty);
    }
    ResumeDraft::new(body.to_string(), ResumeSource::RawJson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_by_extension_is_case_insensitive() {
        assert_eq!(UploadKind::detect("CV.PDF", None).unwrap(), UploadKind::Pdf);
        assert_eq!(
            UploadKind::detect("resume.Docx", None).unwrap(),
            UploadKind::Docx
        );
    }

    #[test]
    fn test_detect_falls_back_to_content_type() {
        assert_eq!(
            UploadKind::detect("upload", Some("application/pdf")).unwrap(),
            UploadKind::Pdf
        );
        assert!(matches!(
            UploadKind::detect("resume.txt", Some("text/plain")),
            Err(ExtractionError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_blank_draft_is_rejected() {
        assert!(matches!(
            ResumeDraft::new("  \n ".to_string(), ResumeSource::Upload),
            Err(ExtractionError::Empty)
        ));
    }

    #[test]
    fn test_extract_json_rejects_empty_bodies() {
        assert!(matches!(extract_json(&json!({})), Err(ExtractionError::Empty)));
        assert!(matches!(extract_json(&json!(null)), Err(ExtractionError::Empty)));
    }

    #[test]
    fn test_extract_json_serializes_body() {
        let draft = extract_json(&json!({"personal_info": {"name": "Ada"}})).unwrap();
        assert_eq!(draft.source, ResumeSource::RawJson);
        assert_eq!(draft.text, r#"{"personal_info":{"name":"Ada"}}"#);
    }

    #[tokio::test]
    async fn test_extract_upload_rejects_unknown_format() {
        let file = UploadedFile {
            file_name: "resume.odt".to_string(),
            content_type: None,
            data: Bytes::from_static(b"whatever"),
        };
        assert!(matches!(
            extract_upload(file).await,
            Err(ExtractionError::UnsupportedFormat(_))
        ));
    }

    #[tokio::test]
    async fn test_extract_upload_reads_docx() {
        let package = crate::ooxml::testing::docx_with_body(
            "<w:p><w:r><w:t>Grace Hopper</w:t></w:r></w:p>",
        );
        let file = UploadedFile {
            file_name: "resume.docx".to_string(),
            content_type: None,
            data: Bytes::from(package),
        };
        let draft = extract_upload(file).await.unwrap();
        assert_eq!(draft.text, "Grace Hopper");
        assert_eq!(draft.source, ResumeSource::Upload);
    }
}
