/*!
 * Parsing of pack content into a `Document`.
 *
 * Line breaks are flattened before parsing so that every text value fits on a
 * single line of a translation request.
 */

use std::fmt::Display;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::DocumentError;

use super::model::{Document, DocumentNode};

/// Replacement for every line break in the raw content
pub const LINE_BREAK_SUBSTITUTE: &str = "  ";

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Replace every line break (`\r\n` or `\n`) with [`LINE_BREAK_SUBSTITUTE`]
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", LINE_BREAK_SUBSTITUTE)
        .replace('\n', LINE_BREAK_SUBSTITUTE)
}

/// Parse content into a document tree.
///
/// Text and CDATA sections become the `text` of the enclosing node or the
/// `tail` of its last child. Markup before the root element, including a byte
/// order mark, is kept verbatim in the prolog; comments and processing
/// instructions inside the root are not part of the tree and are dropped.
pub fn parse(content: &str) -> Result<Document, DocumentError> {
    // The reader skips a byte order mark; it is kept as the start of the prolog
    let (bom, content) = match content.strip_prefix(BYTE_ORDER_MARK) {
        Some(rest) => (Some(BYTE_ORDER_MARK), rest),
        None => (None, content),
    };

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    let mut document = Document::default();
    if let Some(bom) = bom {
        document.prolog.push(bom);
    }
    let mut stack: Vec<DocumentNode> = Vec::new();
    let mut root: Option<DocumentNode> = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| parse_error(&reader, e))?;

        match event {
            Event::Start(start) => {
                let node = start_node(&start).map_err(|e| parse_error(&reader, e))?;
                stack.push(node);
            }
            Event::Empty(start) => {
                let node = start_node(&start).map_err(|e| parse_error(&reader, e))?;
                close_node(node, &mut stack, &mut root).map_err(|e| parse_error(&reader, e))?;
            }
            Event::End(_) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| parse_error(&reader, "unexpected closing tag"))?;
                close_node(node, &mut stack, &mut root).map_err(|e| parse_error(&reader, e))?;
            }
            Event::Text(text) => {
                let value = text.unescape().map_err(|e| parse_error(&reader, e))?;
                push_text(&mut document, &mut stack, root.is_some(), &value)
                    .map_err(|e| parse_error(&reader, e))?;
            }
            Event::CData(cdata) => {
                let raw = cdata.into_inner();
                let value = std::str::from_utf8(&raw).map_err(|e| parse_error(&reader, e))?;
                push_text(&mut document, &mut stack, root.is_some(), value)
                    .map_err(|e| parse_error(&reader, e))?;
            }
            Event::Decl(decl) if outside_root(&stack, &root) => {
                push_prolog(&mut document, &reader, "<?", &decl, "?>")?;
            }
            Event::DocType(doctype) if outside_root(&stack, &root) => {
                push_prolog(&mut document, &reader, "<!DOCTYPE ", &doctype, ">")?;
            }
            Event::Comment(comment) if outside_root(&stack, &root) => {
                push_prolog(&mut document, &reader, "<!--", &comment, "-->")?;
            }
            Event::PI(pi) if outside_root(&stack, &root) => {
                push_prolog(&mut document, &reader, "<?", &pi, "?>")?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(parse_error(&reader, format!("element <{}> is not closed", open.tag)));
    }

    document.root = root.ok_or_else(|| parse_error(&reader, "document has no root element"))?;
    Ok(document)
}

fn parse_error(reader: &Reader<&[u8]>, message: impl Display) -> DocumentError {
    DocumentError::Parse {
        position: reader.buffer_position() as u64,
        message: message.to_string(),
    }
}

/// True before the root element has been opened
fn outside_root(stack: &[DocumentNode], root: &Option<DocumentNode>) -> bool {
    stack.is_empty() && root.is_none()
}

fn start_node(start: &BytesStart<'_>) -> Result<DocumentNode, String> {
    let tag = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| e.to_string())?
        .to_string();
    let mut node = DocumentNode::new(tag);

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let name = std::str::from_utf8(attribute.key.as_ref())
            .map_err(|e| e.to_string())?
            .to_string();
        let value = attribute.unescape_value().map_err(|e| e.to_string())?;
        node.attributes.insert(name, value.into_owned());
    }

    Ok(node)
}

fn close_node(
    node: DocumentNode,
    stack: &mut [DocumentNode],
    root: &mut Option<DocumentNode>,
) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }

    if root.is_some() {
        return Err(format!("second root element <{}>", node.tag));
    }
    *root = Some(node);
    Ok(())
}

fn push_text(
    document: &mut Document,
    stack: &mut [DocumentNode],
    root_closed: bool,
    value: &str,
) -> Result<(), String> {
    if value.is_empty() {
        return Ok(());
    }

    match stack.last_mut() {
        Some(current) => {
            let slot = match current.children.last_mut() {
                Some(last_child) => &mut last_child.tail,
                None => &mut current.text,
            };
            slot.get_or_insert_with(String::new).push_str(value);
            Ok(())
        }
        None if !value.trim().is_empty() => Err("text outside the root element".to_string()),
        None if root_closed => {
            document.epilogue.push_str(value);
            Ok(())
        }
        None => {
            document.prolog.push_str(value);
            Ok(())
        }
    }
}

fn push_prolog(
    document: &mut Document,
    reader: &Reader<&[u8]>,
    open: &str,
    raw: &[u8],
    close: &str,
) -> Result<(), DocumentError> {
    let raw = std::str::from_utf8(raw).map_err(|e| parse_error(reader, e))?;
    document.prolog.push_str(open);
    document.prolog.push_str(raw);
    document.prolog.push_str(close);
    Ok(())
}
