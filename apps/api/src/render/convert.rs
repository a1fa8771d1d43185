//! DOCX → PDF conversion through an external office suite.
//!
//! The converter is invoked as
//! `<program> --headless --convert-to pdf --outdir <scratch> <source.docx>`,
//! which is LibreOffice's command line. Output lands in a hidden scratch
//! directory inside the output dir and is moved into place only once complete.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{error, info};

use super::RenderError;

#[derive(Debug, Clone)]
pub struct PdfConverter {
    program: String,
}

impl PdfConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Converts `source` and returns the path of the PDF placed next to it in `output_dir`.
    pub async fn convert(&self, source: &Path, output_dir: &Path) -> Result<PathBuf, RenderError> {
        let stem = source
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| RenderError::Conversion(format!("invalid source path {source:?}")))?
            .to_string();

        let scratch = tempfile::Builder::new()
            .prefix(".convert-")
            .tempdir_in(output_dir)?;

        info!("Converting {} to PDF with '{}'", source.display(), self.program);

        let output = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(scratch.path())
            .arg(source)
            .output()
            .await
            .map_err(|e| RenderError::Conversion(format!("failed to run '{}': {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("PDF conversion failed: {}", stderr);
            return Err(RenderError::Conversion(format!(
                "'{}' exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let produced = scratch.path().join(format!("{stem}.pdf"));
        if !tokio::fs::try_exists(&produced).await.unwrap_or(false) {
            return Err(RenderError::Conversion(format!(
                "'{}' did not produce {stem}.pdf",
                self.program
            )));
        }

        let target = output_dir.join(format!("{stem}.pdf"));
        tokio::fs::rename(&produced, &target).await?;
        Ok(target)
    }
}
