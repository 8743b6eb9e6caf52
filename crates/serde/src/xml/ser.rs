//! Printing [`Element`] trees as XML text with quick-xml.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::Result;
use crate::options::SerializerOptions;
use crate::tree::Element;

/// Prints `element` as an XML string.
pub fn to_xml_string(element: &Element, options: &SerializerOptions) -> Result<String> {
    let bytes = to_xml_vec(element, options)?;
    Ok(String::from_utf8(bytes)?)
}

/// Prints `element` as UTF-8 bytes.
pub fn to_xml_vec(element: &Element, options: &SerializerOptions) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    to_xml_writer(&mut buffer, element, options)?;
    Ok(buffer)
}

/// Prints `element` to `writer`.
///
/// An element without a namespace inherits its parent's, so `xmlns` is only
/// written where the namespace changes.
pub fn to_xml_writer<W: Write>(
    writer: W,
    element: &Element,
    options: &SerializerOptions,
) -> Result<()> {
    let mut writer = if options.format_xml {
        Writer::new_with_indent(writer, b' ', options.indent)
    } else {
        Writer::new(writer)
    };

    if !options.omit_declaration {
        writer.write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some(options.encoding.as_str()),
            None,
        )))?;
    }

    write_element(&mut writer, element, None)
}

fn write_element<W: Write>(
    writer: &mut Writer<W>,
    element: &Element,
    inherited: Option<&str>,
) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());

    let namespace = element.namespace.as_deref().or(inherited);
    if namespace != inherited
        && let Some(namespace) = namespace
    {
        start.push_attribute(("xmlns", namespace));
    }

    for (index, attribute) in element.attributes.iter().enumerate() {
        match attribute.namespace.as_deref() {
            Some(attr_ns) => {
                let prefix = format!("a{}", index);
                start.push_attribute((format!("xmlns:{}", prefix).as_str(), attr_ns));
                start.push_attribute((
                    format!("{}:{}", prefix, attribute.name).as_str(),
                    attribute.value.as_str(),
                ));
            }
            None => start.push_attribute((attribute.name.as_str(), attribute.value.as_str())),
        }
    }

    let text = element.text.as_deref().filter(|text| !text.is_empty());
    if element.children.is_empty() && text.is_none() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(text) = text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for child in &element.children {
        write_element(writer, child, namespace)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name.as_str())))?;

    Ok(())
}
