//! DOCX text extraction.

use docx_rs::{
    DocumentChild, Paragraph, ParagraphChild, RunChild, TableCellContent, TableChild,
    TableRowChild,
};

use super::ExtractionError;

/// Returns the paragraph texts of the document body, one per line, in
/// reading order. Table cells are read row by row. Empty paragraphs are
/// dropped.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let docx =
        docx_rs::read_docx(bytes).map_err(|e| ExtractionError::UnreadableDocx(e.to_string()))?;

    let mut lines = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(paragraph) => lines.push(paragraph_text(paragraph)),
            DocumentChild::Table(table) => {
                for row in &table.rows {
                    let TableChild::TableRow(row) = row;
                    for cell in &row.cells {
                        let TableRowChild::TableCell(cell) = cell;
                        for content in &cell.children {
                            if let TableCellContent::Paragraph(paragraph) = content {
                                lines.push(paragraph_text(paragraph));
                            }
                        }
                    }
                }
            }
            _ => {}
        }
    }

    let text = lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() {
        return Err(ExtractionError::Empty);
    }
    Ok(text)
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children(&paragraph.children, &mut text);
    text
}

fn push_children(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push(' '),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children(&link.children, text),
            _ => {}
        }
    }
}
