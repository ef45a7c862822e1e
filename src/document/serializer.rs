/*!
 * Rendering of a `Document` back to text.
 *
 * Purely structural: tags, attributes in stored order, text, tails and
 * nesting are emitted as they are in the tree.
 */

use std::borrow::Cow;

use quick_xml::escape::{escape, partial_escape};
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use crate::errors::DocumentError;

use super::model::{Document, DocumentNode};

/// Render a document to its textual form.
///
/// Elements without text and children are written self-closing.
pub fn serialize(document: &Document) -> Result<String, DocumentError> {
    let mut writer = Writer::new(Vec::new());
    writer.get_mut().extend_from_slice(document.prolog.as_bytes());
    write_node(&mut writer, &document.root)?;

    let mut output = String::from_utf8(writer.into_inner())
        .map_err(|e| DocumentError::Serialize(e.to_string()))?;
    output.push_str(&document.epilogue);
    Ok(output)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &DocumentNode) -> Result<(), DocumentError> {
    let mut start = BytesStart::new(node.tag.as_str());
    for (name, value) in node.attributes.iter() {
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Owned(escape_attribute_value(value).into_bytes()),
        });
    }

    if node.text.is_none() && node.children.is_empty() {
        write_event(writer, Event::Empty(start))?;
    } else {
        write_event(writer, Event::Start(start))?;
        if let Some(text) = &node.text {
            write_event(writer, text_event(text))?;
        }
        for child in &node.children {
            write_node(writer, child)?;
        }
        write_event(writer, Event::End(BytesEnd::new(node.tag.as_str())))?;
    }

    if let Some(tail) = &node.tail {
        write_event(writer, text_event(tail))?;
    }

    Ok(())
}

/// Text with only markup characters escaped; quotes stay as written.
///
/// A carriage return is written as a character reference, otherwise the
/// next reader would turn it into a line feed.
fn text_event(text: &str) -> Event<'_> {
    let escaped = partial_escape(text);
    if escaped.contains('\r') {
        Event::Text(BytesText::from_escaped(escaped.replace('\r', "&#13;")))
    } else {
        Event::Text(BytesText::from_escaped(escaped))
    }
}

/// Attribute value with markup characters and whitespace controls escaped.
///
/// Readers normalize literal tabs and line breaks in attribute values to
/// spaces, so they only survive as character references.
fn escape_attribute_value(value: &str) -> String {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped.into_owned();
    }

    let mut result = String::with_capacity(escaped.len() + 8);
    for ch in escaped.chars() {
        match ch {
            '\n' => result.push_str("&#10;"),
            '\r' => result.push_str("&#13;"),
            '\t' => result.push_str("&#9;"),
            _ => result.push(ch),
        }
    }
    result
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), DocumentError> {
    writer
        .write_event(event)
        .map_err(|e| DocumentError::Serialize(e.to_string()))
}
