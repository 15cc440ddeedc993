//! Markup reader built on `quick-xml` events.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{Element, Node, SvgDocument, SvgError, SvgResult};

/// Parses markup into a document, keeping only the root element.
pub(super) fn parse_document(markup: &str) -> SvgResult<SvgDocument> {
    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|e| SvgError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        match event {
            Event::Start(ref e) => {
                stack.push(element_from_start(e, &reader)?);
            }
            Event::Empty(ref e) => {
                let element = element_from_start(e, &reader)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(ref e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let element = stack.pop().ok_or_else(|| SvgError::MismatchedTag {
                    expected: String::new(),
                    found: name.clone(),
                })?;
                if element.name != name {
                    return Err(SvgError::MismatchedTag {
                        expected: element.name,
                        found: name,
                    });
                }
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(ref e) => {
                // Text outside the root element is whitespace between prolog items
                if let Some(parent) = stack.last_mut() {
                    let text = e.unescape().map_err(|err| SvgError::Xml {
                        position: reader.buffer_position() as u64,
                        message: err.to_string(),
                    })?;
                    parent.children.push(Node::Text(text.into_owned()));
                }
            }
            Event::CData(ref e) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::CData(String::from_utf8_lossy(e).into_owned()));
                }
            }
            Event::Comment(ref e) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Comment(String::from_utf8_lossy(e).into_owned()));
                }
            }
            Event::Eof => break,
            // Declaration, doctype and processing instructions are not kept
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(SvgError::Unclosed(open.name));
    }

    root.map(SvgDocument::new).ok_or(SvgError::MissingRoot)
}

fn element_from_start(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> SvgResult<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| SvgError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| SvgError::Xml {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;
        element.attributes.push((key, value.into_owned()));
    }

    Ok(element)
}

/// Adds a finished element to its parent, or makes it the root.
fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> SvgResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }

    if root.is_some() {
        return Err(SvgError::TrailingContent(element.name));
    }
    *root = Some(element);
    Ok(())
}
