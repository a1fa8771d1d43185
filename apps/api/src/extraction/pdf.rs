//! PDF text extraction.
//!
//! Pages are read one at a time with lopdf so that a single broken page does
//! not sink the whole upload. When no page yields text through that pass, the
//! whole document is handed to pdf-extract, which copes with more font
//! encodings but is all-or-nothing.

use std::panic::{catch_unwind, AssertUnwindSafe};

use lopdf::Document;
use tracing::{debug, warn};

use super::ExtractionError;

/// Extracts the text of every text-bearing page, space-joined in page order.
///
/// Fails with `ExtractionError::Empty` when no page yields text.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let document =
        Document::load_mem(bytes).map_err(|e| ExtractionError::UnreadablePdf(e.to_string()))?;

    let page_texts: Vec<String> = document
        .get_pages()
        .keys()
        .filter_map(|&page_number| match document.extract_text(&[page_number]) {
            Ok(text) => {
                let text = normalize_whitespace(&text);
                (!text.is_empty()).then_some(text)
            }
            Err(e) => {
                debug!("Skipping PDF page {page_number}: {e}");
                None
            }
        })
        .collect();

    if !page_texts.is_empty() {
        return Ok(page_texts.join(" "));
    }

    let fallback = whole_document_text(bytes);
    if fallback.is_empty() {
        return Err(ExtractionError::Empty);
    }
    Ok(fallback)
}

/// Whole-document pass through pdf-extract. Any failure, including a panic
/// inside the parser, yields an empty string.
fn whole_document_text(bytes: &[u8]) -> String {
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => normalize_whitespace(&text),
        Ok(Err(e)) => {
            debug!("pdf-extract found no text: {e}");
            String::new()
        }
        Err(_) => {
            warn!("pdf-extract panicked while reading an upload");
            String::new()
        }
    }
}

/// Collapses runs of whitespace inside lines and drops blank lines.
fn normalize_whitespace(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
pub mod testing {
    //! Builds small PDFs with one text run per page.

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};

    use super::*;

    /// One page per entry; `None` produces a page with no text operators.
    pub fn pdf_with_pages(pages: &[Option<&str>]) -> Vec<u8> {
        let contents: Vec<Vec<Operation>> = pages
            .iter()
            .map(|page| match page {
                Some(text) => text_operations(text),
                None => vec![],
            })
            .collect();
        pdf_with_contents(&contents)
    }

    /// `BT /F1 12 Tf 72 720 Td (text) Tj ET`
    pub fn text_operations(text: &str) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ]
    }

    /// One page per entry, each with the given content stream operations.
    pub fn pdf_with_contents(pages: &[Vec<Operation>]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for operations in pages {
            let content = Content {
                operations: operations.clone(),
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }
}

#[cfg(test)]
mod tests {
    use lopdf::content::Operation;
    use lopdf::Object;

    use super::testing::{pdf_with_contents, pdf_with_pages, text_operations};
    use super::*;

    #[test]
    fn test_text_bearing_page_yields_non_empty_text() {
        let pdf = pdf_with_pages(&[Some("Jane Doe Software Engineer")]);
        let text = extract_pdf_text(&pdf).unwrap();
        assert!(text.contains("Jane Doe"));
    }

    #[test]
    fn test_blank_pages_are_skipped() {
        let pdf = pdf_with_pages(&[None, Some("Rust"), None, Some("Tokio")]);
        let text = extract_pdf_text(&pdf).unwrap();
        assert!(text.contains("Rust"));
        assert!(text.contains("Tokio"));
        assert!(text.find("Rust").unwrap() < text.find("Tokio").unwrap());
    }

    #[test]
    fn test_page_that_fails_extraction_is_skipped() {
        // A `Tf` without operands makes lopdf reject the whole page.
        let broken = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![]),
            Operation::new("Tj", vec![Object::string_literal("lost")]),
            Operation::new("ET", vec![]),
        ];
        let pdf = pdf_with_contents(&[
            text_operations("Jane Doe"),
            broken,
            text_operations("Staff Engineer"),
        ]);
        let document = Document::load_mem(&pdf).unwrap();
        assert!(document.extract_text(&[2]).is_err());

        let text = extract_pdf_text(&pdf).unwrap();
        assert_eq!(text, "Jane Doe Staff Engineer");
    }

    #[test]
    fn test_pdf_without_text_is_empty_error() {
        let pdf = pdf_with_pages(&[None, None]);
        assert!(matches!(extract_pdf_text(&pdf), Err(ExtractionError::Empty)));
    }

    #[test]
    fn test_garbage_bytes_are_unreadable() {
        assert!(matches!(
            extract_pdf_text(b"definitely not a pdf"),
            Err(ExtractionError::UnreadablePdf(_))
        ));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a   b \n\n   \n c\t d  "), "a b\nc d");
    }
}
