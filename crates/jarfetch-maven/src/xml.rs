//! Minimal XML element tree for POM queries.
//!
//! Builds an owned tree from quick-xml events and exposes the three lookups
//! the POM reader needs: child by tag name, attribute by name, text content.
//! Tag and attribute names are compared by local name, so a default
//! `xmlns="http://maven.apache.org/POM/4.0.0"` or prefixed elements match
//! their bare names.

use crate::error::{MavenError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First direct child named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children named `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Trimmed text directly inside this element.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Text of the child named `name`, if present and non-empty.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(Self::text).filter(|t| !t.is_empty())
    }
}

fn xml_error(e: impl std::fmt::Display) -> MavenError {
    MavenError::pom_parse(e.to_string())
}

fn start_element(e: &BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).to_string();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(xml_error)?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).to_string();
        let raw = String::from_utf8_lossy(&attr.value).to_string();
        let value = quick_xml::escape::unescape(&raw)
            .map(|c| c.into_owned())
            .unwrap_or(raw);
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

/// Parses `content` and returns its root element.
///
/// # Errors
///
/// Returns [`MavenError::PomParse`] for malformed XML, mismatched tags, or a
/// document without a root element.
pub fn parse_document(content: &str) -> Result<Element> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(ref e) => {
                stack.push(start_element(e)?);
            }
            Event::Empty(ref e) => {
                let element = start_element(e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = root.or(Some(element)),
                }
            }
            Event::Text(ref e) => {
                if let Some(current) = stack.last_mut() {
                    let text = match e.decode() {
                        Ok(cow) => quick_xml::escape::unescape(&cow)
                            .map(|c| c.into_owned())
                            .unwrap_or_else(|_| cow.into_owned()),
                        Err(_) => String::from_utf8_lossy(e.as_ref()).to_string(),
                    };
                    current.text.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Event::GeneralRef(ref e) => {
                if let Some(current) = stack.last_mut() {
                    if let Ok(Some(ch)) = e.resolve_char_ref() {
                        current.text.push(ch);
                    } else {
                        let name = e.decode().map(|c| c.into_owned()).unwrap_or_default();
                        if let Some(resolved) = quick_xml::escape::resolve_predefined_entity(&name)
                        {
                            current.text.push_str(resolved);
                        }
                    }
                }
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(MavenError::pom_parse("unexpected closing tag"));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = root.or(Some(element)),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(MavenError::pom_parse(format!(
            "unexpected end of document inside <{}>",
            open.name
        )));
    }
    root.ok_or_else(|| MavenError::pom_parse("document has no root element"))
}
