//! Placeholder substitution inside a DOCX template.
//!
//! Supported placeholders, written as `{{ name }}` anywhere in the document
//! body, headers or footers:
//! - scalars: `name`, `contact_info`, `summary`, `skills`, `languages`;
//! - blocks: `experience`, `education`. A block placeholder must be the only
//!   text of its paragraph and expands into one paragraph group per entry,
//!   styled like the placeholder paragraph.
//!
//! Parts are streamed through `quick-xml`. Each `<w:p>` is buffered until it
//! closes; paragraphs nested in text boxes are rendered on their own first.
//! Word often splits a placeholder across several runs, so values are written
//! into the `<w:t>` where the placeholder starts and the rest of the
//! placeholder is cut from the runs it spans. Tabs, breaks, drawings and run
//! formatting stay where they are.

use std::fmt::Display;
use std::ops::Range;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::ooxml;

use super::resume::TailoredResume;
use super::RenderError;

const BULLET: &str = "\u{2022} ";

const PARAGRAPH: &[u8] = b"w:p";
const PARAGRAPH_PROPS: &[u8] = b"w:pPr";
const RUN: &[u8] = b"w:r";
const RUN_PROPS: &[u8] = b"w:rPr";
const TEXT: &[u8] = b"w:t";

type Events = Vec<Event<'static>>;

/// Fills every placeholder of the template package with values from `resume`.
pub fn fill_template(template: &[u8], resume: &TailoredResume) -> Result<Vec<u8>, RenderError> {
    ooxml::rewrite_package(template, |part, xml| {
        if !is_text_part(part) || !xml.contains("{{") {
            return Ok(None);
        }
        render_part(xml, resume).map(Some)
    })
}

fn is_text_part(part: &str) -> bool {
    part == ooxml::DOCUMENT_PART
        || (part.starts_with("word/header") && part.ends_with(".xml"))
        || (part.starts_with("word/footer") && part.ends_with(".xml"))
}

/// Renders one XML part.
pub fn render_part(xml: &str, resume: &TailoredResume) -> Result<String, RenderError> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    // Paragraphs still being read, innermost last.
    let mut open: Vec<Events> = Vec::new();

    loop {
        let event = reader.read_event().map_err(malformed)?.into_owned();
        if matches!(event, Event::Eof) {
            break;
        }

        if is_start(&event, PARAGRAPH) {
            open.push(vec![event]);
        } else if is_end(&event, PARAGRAPH) {
            let Some(mut paragraph) = open.pop() else {
                return Err(RenderError::Template("unbalanced </w:p>".to_string()));
            };
            paragraph.push(event);
            let rendered = render_paragraph(paragraph, resume)?;
            emit(&mut open, &mut writer, rendered)?;
        } else {
            emit(&mut open, &mut writer, vec![event])?;
        }
    }

    if !open.is_empty() {
        return Err(RenderError::Template("unclosed <w:p>".to_string()));
    }
    String::from_utf8(writer.into_inner()).map_err(malformed)
}

/// Appends to the enclosing paragraph, or writes out at the top level.
fn emit(
    open: &mut [Events],
    writer: &mut Writer<Vec<u8>>,
    events: Events,
) -> Result<(), RenderError> {
    match open.last_mut() {
        Some(parent) => parent.extend(events),
        None => {
            for event in events {
                writer.write_event(event).map_err(malformed)?;
            }
        }
    }
    Ok(())
}

fn malformed(e: impl Display) -> RenderError {
    RenderError::Template(format!("invalid XML: {e}"))
}

/// A `<w:t>` belonging to the paragraph itself: the indices of its start
/// and end tags, and its unescaped text.
#[derive(Debug)]
struct TextNode {
    start: usize,
    end: usize,
    text: String,
}

/// A scalar placeholder's byte range in the paragraph text and its value.
struct Placeholder<'r> {
    range: Range<usize>,
    value: &'r str,
}

fn render_paragraph(mut events: Events, resume: &TailoredResume) -> Result<Events, RenderError> {
    let nodes = text_nodes(&events)?;
    let text: String = nodes.iter().map(|node| node.text.as_str()).collect();
    if !text.contains("{{") {
        return Ok(events);
    }

    if let Some(block) = block_name(&text) {
        return Ok(render_block(block, &events, resume));
    }

    let placeholders = find_placeholders(&text, resume)?;
    let rewritten = split_values(&text, &nodes, &placeholders);

    // Back to front, so earlier indices stay valid.
    for (node, new_text) in nodes.iter().zip(rewritten).rev() {
        if new_text == node.text {
            continue;
        }
        let start = preserved_text_start(&events[node.start]);
        events.splice(
            node.start..=node.end,
            [
                Event::Start(start),
                Event::Text(BytesText::new(&new_text).into_owned()),
                Event::End(BytesEnd::new("w:t")),
            ],
        );
    }

    Ok(events)
}

/// The paragraph's own text nodes, skipping those of nested paragraphs.
fn text_nodes(events: &[Event<'static>]) -> Result<Vec<TextNode>, RenderError> {
    let mut nodes = Vec::new();
    let mut depth = 0usize;
    let mut current: Option<TextNode> = None;

    for (index, event) in events.iter().enumerate() {
        if is_start(event, PARAGRAPH) {
            depth += 1;
        } else if is_end(event, PARAGRAPH) {
            depth = depth.saturating_sub(1);
        } else if depth == 1 && is_start(event, TEXT) {
            current = Some(TextNode {
                start: index,
                end: index,
                text: String::new(),
            });
        } else if is_end(event, TEXT) {
            if let Some(mut node) = current.take() {
                node.end = index;
                nodes.push(node);
            }
        } else if let (Event::Text(text), Some(node)) = (event, current.as_mut()) {
            node.text.push_str(&text.unescape().map_err(malformed)?);
        }
    }

    Ok(nodes)
}

fn find_placeholders<'r>(
    text: &str,
    resume: &'r TailoredResume,
) -> Result<Vec<Placeholder<'r>>, RenderError> {
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(open) = text[cursor..].find("{{") {
        let start = cursor + open;
        let close = text[start + 2..].find("}}").ok_or_else(|| {
            RenderError::Template(format!("unclosed placeholder in \"{}\"", text.trim()))
        })?;
        let name = text[start + 2..start + 2 + close].trim();

        let value = match resume.scalar(name) {
            Some(value) => value,
            None if matches!(name, "experience" | "education") => {
                return Err(RenderError::Template(format!(
                    "'{{{{ {name} }}}}' must be the only text in its paragraph"
                )))
            }
            None => return Err(RenderError::UnknownPlaceholder(name.to_string())),
        };

        let end = start + 2 + close + 2;
        found.push(Placeholder {
            range: start..end,
            value,
        });
        cursor = end;
    }

    Ok(found)
}

/// New text for each node. A value goes into the node where its placeholder
/// starts; the placeholder's remainder is removed from the nodes after it.
fn split_values(text: &str, nodes: &[TextNode], placeholders: &[Placeholder<'_>]) -> Vec<String> {
    let mut offset = 0;
    nodes
        .iter()
        .map(|node| {
            let span = offset..offset + node.text.len();
            offset = span.end;

            let mut out = String::with_capacity(node.text.len());
            let mut cursor = span.start;
            for placeholder in placeholders
                .iter()
                .filter(|p| p.range.start < span.end && p.range.end > span.start)
            {
                if placeholder.range.start >= span.start {
                    out.push_str(&text[cursor..placeholder.range.start]);
                    out.push_str(placeholder.value);
                }
                cursor = placeholder.range.end.min(span.end);
            }
            out.push_str(&text[cursor..span.end]);
            out
        })
        .collect()
}

/// The node's start tag with `xml:space="preserve"`, so values keep their
/// leading and trailing spaces.
fn preserved_text_start(original: &Event<'static>) -> BytesStart<'static> {
    let mut start = match original {
        Event::Start(start) => start.clone(),
        _ => BytesStart::new("w:t"),
    };
    let preserves = start
        .attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"xml:space");
    if !preserves {
        start.push_attribute(("xml:space", "preserve"));
    }
    start
}

/// The block name when the paragraph consists of a single block placeholder.
fn block_name(text: &str) -> Option<&'static str> {
    let inner = text.trim().strip_prefix("{{")?.strip_suffix("}}")?.trim();
    match inner {
        "experience" => Some("experience"),
        "education" => Some("education"),
        _ => None,
    }
}

fn render_block(block: &str, paragraph: &[Event<'static>], resume: &TailoredResume) -> Events {
    let ppr = child_element(paragraph, 0, PARAGRAPH_PROPS).unwrap_or_default();
    let rpr = first_run(paragraph)
        .and_then(|run| child_element(paragraph, run, RUN_PROPS))
        .unwrap_or_default();
    let heading = bold(rpr);
    let mut out = Vec::new();

    match block {
        "experience" => {
            for job in &resume.experience {
                let title = join_present(&[&job.title, &job.company, &job.dates], " | ");
                push_paragraph(&mut out, ppr, &heading, &title);
                for detail in job.details.iter().filter(|d| !d.trim().is_empty()) {
                    push_paragraph(&mut out, ppr, rpr, &format!("{BULLET}{}", detail.trim()));
                }
            }
        }
        "education" => {
            for edu in &resume.education {
                push_paragraph(&mut out, ppr, &heading, edu.degree.trim());
                let line = join_present(&[&edu.university, &edu.dates], " | ");
                if !line.is_empty() {
                    push_paragraph(&mut out, ppr, rpr, &line);
                }
            }
        }
        _ => {}
    }

    out
}

/// A single-run paragraph carrying the given properties.
fn push_paragraph(out: &mut Events, ppr: &[Event<'static>], rpr: &[Event<'static>], text: &str) {
    let mut t = BytesStart::new("w:t");
    t.push_attribute(("xml:space", "preserve"));

    out.push(Event::Start(BytesStart::new("w:p")));
    out.extend_from_slice(ppr);
    out.push(Event::Start(BytesStart::new("w:r")));
    out.extend_from_slice(rpr);
    out.push(Event::Start(t));
    out.push(Event::Text(BytesText::new(text).into_owned()));
    out.push(Event::End(BytesEnd::new("w:t")));
    out.push(Event::End(BytesEnd::new("w:r")));
    out.push(Event::End(BytesEnd::new("w:p")));
}

fn join_present(parts: &[&String], separator: &str) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Run properties with bold switched on. `<w:b/>` goes after `<w:rStyle>`
/// and `<w:rFonts>`, which must come first in `<w:rPr>`.
fn bold(rpr: &[Event<'static>]) -> Events {
    let bold = Event::Empty(BytesStart::new("w:b"));
    let rpr_start = || Event::Start(BytesStart::new("w:rPr"));
    let rpr_end = || Event::End(BytesEnd::new("w:rPr"));

    if rpr.iter().any(|e| is_start(e, b"w:b") || is_empty(e, b"w:b")) {
        return rpr.to_vec();
    }
    if rpr.len() < 2 {
        return vec![rpr_start(), bold, rpr_end()];
    }

    let leading = [b"w:rStyle".as_slice(), b"w:rFonts".as_slice()];
    let mut at = 1;
    for (index, event) in rpr.iter().enumerate() {
        if leading
            .iter()
            .any(|tag| is_empty(event, tag) || is_end(event, tag))
        {
            at = index + 1;
        }
    }

    let mut out = rpr.to_vec();
    out.insert(at, bold);
    out
}

/// Index of the paragraph's first own `<w:r>`.
fn first_run(paragraph: &[Event<'static>]) -> Option<usize> {
    let mut depth = 0usize;
    for (index, event) in paragraph.iter().enumerate() {
        if is_start(event, PARAGRAPH) {
            depth += 1;
        } else if is_end(event, PARAGRAPH) {
            depth = depth.saturating_sub(1);
        } else if depth == 1 && is_start(event, RUN) {
            return Some(index);
        }
    }
    None
}

/// The first child of the element starting at `parent`, when it is `tag`.
/// `<w:pPr>` and `<w:rPr>` are always first in their parents.
fn child_element<'e>(
    events: &'e [Event<'static>],
    parent: usize,
    tag: &[u8],
) -> Option<&'e [Event<'static>]> {
    let index = events
        .iter()
        .enumerate()
        .skip(parent + 1)
        .find(|(_, e)| !matches!(e, Event::Text(t) if t.iter().all(u8::is_ascii_whitespace)))
        .map(|(index, _)| index)?;

    let event = &events[index];
    if is_empty(event, tag) {
        return Some(&events[index..=index]);
    }
    if !is_start(event, tag) {
        return None;
    }

    let mut nesting = 0usize;
    for (offset, event) in events[index..].iter().enumerate() {
        if is_start(event, tag) {
            nesting += 1;
        } else if is_end(event, tag) {
            nesting -= 1;
            if nesting == 0 {
                return Some(&events[index..=index + offset]);
            }
        }
    }
    None
}

fn is_start(event: &Event<'_>, tag: &[u8]) -> bool {
    matches!(event, Event::Start(e) if e.name().as_ref() == tag)
}

fn is_end(event: &Event<'_>, tag: &[u8]) -> bool {
    matches!(event, Event::End(e) if e.name().as_ref() == tag)
}

fn is_empty(event: &Event<'_>, tag: &[u8]) -> bool {
    matches!(event, Event::Empty(e) if e.name().as_ref() == tag)
}
