//! DOCX package plumbing for the renderer.
//!
//! A `.docx` file is a zip package of XML parts. The renderer copies the
//! template package entry by entry and rewrites the parts that carry text;
//! everything else is copied byte for byte.

use std::io::{Cursor, Read, Write};

use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum OoxmlError {
    #[error("not a valid DOCX package: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error while copying DOCX package: {0}")]
    Io(#[from] std::io::Error),
}

/// Copies a package entry by entry, letting `transform` rewrite XML parts.
///
/// `transform` receives the part name and its text, and returns `Some(new_text)`
/// to replace it or `None` to copy it unchanged.
pub fn rewrite_package<F, E>(package: &[u8], mut transform: F) -> Result<Vec<u8>, E>
where
    F: FnMut(&str, &str) -> Result<Option<String>, E>,
    E: From<OoxmlError>,
{
    let mut archive = ZipArchive::new(Cursor::new(package)).map_err(OoxmlError::from)?;
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for index in 0..archive.len() {
        let mut file = archive.by_index(index).map_err(OoxmlError::from)?;
        let name = file.name().to_string();
        let method = match file.compression() {
            CompressionMethod::Stored => CompressionMethod::Stored,
            _ => CompressionMethod::Deflated,
        };
        let options = FileOptions::default().compression_method(method);

        if file.is_dir() {
            writer
                .add_directory(name, options)
                .map_err(OoxmlError::from)?;
            continue;
        }

        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data).map_err(OoxmlError::from)?;

        let replaced = if name.ends_with(".xml") {
            match std::str::from_utf8(&data) {
                Ok(text) => transform(&name, text)?,
                Err(_) => None,
            }
        } else {
            None
        };

        writer
            .start_file(name, options)
            .map_err(OoxmlError::from)?;
        let bytes = replaced.as_ref().map_or(data.as_slice(), |text| text.as_bytes());
        writer.write_all(bytes).map_err(OoxmlError::from)?;
    }

    let cursor = writer.finish().map_err(OoxmlError::from)?;
    Ok(cursor.into_inner())
}
