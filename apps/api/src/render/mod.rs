//! Renderer: fills the fixed DOCX template from a `TailoredResume` and
//! optionally converts the result to PDF.
//!
//! Output files are written to the configured output directory, where the
//! document library lists them. Nothing is cleaned up automatically apart from
//! the intermediate DOCX of a PDF conversion.

pub mod convert;
pub mod resume;
pub mod template;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ooxml::OoxmlError;
use convert::PdfConverter;
use resume::TailoredResume;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template file '{}' not found", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("resume data does not match the template contract: {0}")]
    InvalidContext(String),

    #[error("template references unknown placeholder '{0}'")]
    UnknownPlaceholder(String),

    #[error("template is malformed: {0}")]
    Template(String),

    #[error("template package is unreadable: {0}")]
    Package(#[from] OoxmlError),

    #[error("{0}")]
    Conversion(String),

    #[error("I/O error while writing document: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Docx,
    Pdf,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Docx => "docx",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            OutputFormat::Pdf => "application/pdf",
        }
    }

    /// Format of a stored document, judged by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(|e| e.parse().ok())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docx" => Ok(OutputFormat::Docx),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(format!("unsupported output format '{other}' (expected docx or pdf)")),
        }
    }
}

/// Which pipeline produced a document. Drives file and download names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Tailored,
    General,
}

impl DocumentKind {
    pub fn stem(self) -> &'static str {
        match self {
            DocumentKind::Tailored => "tailored_resume",
            DocumentKind::General => "general_resume",
        }
    }
}

/// A rendered file in the output directory.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub path: PathBuf,
    pub file_name: String,
    /// Name offered to the client in `Content-Disposition`.
    pub download_name: String,
    pub format: OutputFormat,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    template_path: PathBuf,
    output_dir: PathBuf,
    converter: PdfConverter,
}

impl Renderer {
    pub fn new(template_path: PathBuf, output_dir: PathBuf, converter: PdfConverter) -> Self {
        Self {
            template_path,
            output_dir,
            converter,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Validates `context`, fills the template and writes the document.
    pub async fn render(
        &self,
        context: &Value,
        kind: DocumentKind,
        format: OutputFormat,
    ) -> Result<GeneratedDocument, RenderError> {
        let resume = TailoredResume::from_value(context)?;

        let template_bytes = match tokio::fs::read(&self.template_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::TemplateNotFound(self.template_path.clone()))
            }
            Err(e) => return Err(e.into()),
        };

        let docx = tokio::task::spawn_blocking(move || template::fill_template(&template_bytes, &resume))
            .await
            .map_err(|e| RenderError::Template(format!("render worker failed: {e}")))??;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let file_name = unique_file_name(kind.stem(), OutputFormat::Docx);
        let docx_path = self.output_dir.join(&file_name);
        tokio::fs::write(&docx_path, &docx).await?;
        info!("Rendered {}", docx_path.display());

        let path = match format {
            OutputFormat::Docx => docx_path,
            OutputFormat::Pdf => {
                let converted = self.converter.convert(&docx_path, &self.output_dir).await;
                if let Err(e) = tokio::fs::remove_file(&docx_path).await {
                    warn!("Could not remove intermediate {}: {e}", docx_path.display());
                }
                converted?
            }
        };

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        Ok(GeneratedDocument {
            path,
            file_name,
            download_name: format!("{}.{}", kind.stem(), format.extension()),
            format,
        })
    }
}

/// `<stem>_<YYYYmmdd_HHMMSS>_<8 hex>.<ext>`
fn unique_file_name(stem: &str, format: OutputFormat) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!(
        "{stem}_{}_{}.{}",
        Utc::now().format("%Y%m%d_%H%M%S"),
        &id[..8],
        format.extension()
    )
}


#[cfg(test)]
mod tests {
    use super::resume::testing::sample_resume_json;
    use super::testing::write_template;
    use super::*;
    use crate::extraction::docx::extract_docx_text;

    fn renderer(dir: &Path, template: PathBuf) -> Renderer {
        Renderer::new(
            template,
            dir.join("generated"),
            PdfConverter::new("definitely-not-an-office-suite"),
        )
    }

    #[tokio::test]
    async fn test_conformant_object_produces_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer(dir.path(), write_template(dir.path()));

        let doc = renderer
            .render(&sample_resume_json(), DocumentKind::Tailored, OutputFormat::Docx)
            .await
            .unwrap();

        assert!(doc.path.starts_with(dir.path().join("generated")));
        assert!(doc.file_name.starts_with("tailored_resume_"));
        assert!(doc.file_name.ends_with(".docx"));
        assert_eq!(doc.download_name, "tailored_resume.docx");
        assert!(std::fs::metadata(&doc.path).unwrap().len() > 0);
    }

    #[tokio::test]
    async fn test_rendered_values_survive_extraction_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer(dir.path(), write_template(dir.path()));

        let doc = renderer
            .render(&sample_resume_json(), DocumentKind::General, OutputFormat::Docx)
            .await
            .unwrap();
        let text = extract_docx_text(&std::fs::read(&doc.path).unwrap()).unwrap();

        for expected in [
            "Jane Doe",
            "jane@example.com | 0400 000 000 | Sydney NSW",
            "Backend engineer focused on reliable Rust services.",
            "Senior Engineer | Acme & Co | 2021 - Present",
            "Cut p99 latency by 40%",
            "BSc Computer Science",
            "Skills: Rust, Tokio, PostgreSQL",
            "Languages: English, Spanish",
        ] {
            assert!(text.contains(expected), "missing {expected:?} in {text:?}");
        }
        assert!(!text.contains("{{"));
    }

    #[tokio::test]
    async fn test_missing_field_is_render_error_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer(dir.path(), write_template(dir.path()));
        let mut context = sample_resume_json();
        context.as_object_mut().unwrap().remove("education");

        let result = renderer
            .render(&context, DocumentKind::Tailored, OutputFormat::Docx)
            .await;

        assert!(matches!(result, Err(RenderError::InvalidContext(_))));
        assert!(!dir.path().join("generated").exists());
    }

    #[tokio::test]
    async fn test_missing_template_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer(dir.path(), dir.path().join("absent.docx"));

        let result = renderer
            .render(&sample_resume_json(), DocumentKind::Tailored, OutputFormat::Docx)
            .await;

        assert!(matches!(result, Err(RenderError::TemplateNotFound(_))));
    }

    #[tokio::test]
    async fn test_failed_pdf_conversion_removes_intermediate_docx() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer(dir.path(), write_template(dir.path()));

        let result = renderer
            .render(&sample_resume_json(), DocumentKind::Tailored, OutputFormat::Pdf)
            .await;

        assert!(matches!(result, Err(RenderError::Conversion(_))));
        let remaining: Vec<_> = std::fs::read_dir(dir.path().join("generated"))
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert!(remaining.is_empty());
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("PDF".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!(" docx ".parse::<OutputFormat>().unwrap(), OutputFormat::Docx);
        assert!("odt".parse::<OutputFormat>().is_err());
        assert_eq!(
            OutputFormat::from_path(Path::new("x/general_resume_1.pdf")),
            Some(OutputFormat::Pdf)
        );
        assert_eq!(OutputFormat::from_path(Path::new("notes.txt")), None);
    }

    #[test]
    fn test_unique_file_names_differ() {
        let a = unique_file_name("general_resume", OutputFormat::Docx);
        let b = unique_file_name("general_resume", OutputFormat::Docx);
        assert_ne!(a, b);
        assert!(a.starts_with("general_resume_") && a.ends_with(".docx"));
    }
}
