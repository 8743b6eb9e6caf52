//! Parsing XML text into [`Element`] trees with roxmltree.

use std::io::Read;

use roxmltree::{Document, Node};

use crate::error::Result;
use crate::tree::{Attribute, Element};

/// Parses the document element of `xml`.
///
/// Whitespace-only text between child elements is dropped. Namespace
/// declarations are not kept as attributes; each element carries its
/// resolved namespace instead.
pub fn from_xml_str(xml: &str) -> Result<Element> {
    let document = Document::parse(xml)?;
    Ok(convert(document.root_element()))
}

pub fn from_xml_slice(bytes: &[u8]) -> Result<Element> {
    let xml = std::str::from_utf8(bytes).map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, e)
    })?;
    from_xml_str(xml)
}

pub fn from_xml_reader<R: Read>(mut reader: R) -> Result<Element> {
    let mut xml = String::new();
    reader.read_to_string(&mut xml)?;
    from_xml_str(&xml)
}

fn convert(node: Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let mut element = Element::new(tag.name(), tag.namespace());

    element.attributes = node
        .attributes()
        .map(|attribute| {
            Attribute::new(attribute.name(), attribute.value())
                .with_namespace(attribute.namespace())
        })
        .collect();

    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            element.children.push(convert(child));
        } else if child.is_text() {
            text.push_str(child.text().unwrap_or_default());
        }
    }

    if element.children.is_empty() {
        if !text.is_empty() {
            element.text = Some(text);
        }
    } else if !text.trim().is_empty() {
        element.text = Some(text);
    }

    element
}
