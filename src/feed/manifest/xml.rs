//! Minimal typed XML tree used for manifest extraction

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::feed::error::ManifestError;

/// A node of the parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

/// An element with its attributes and children, names without namespace prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Parses a well-formed document and returns its root element
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let mut reader = Reader::from_str(text);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| parse_error(&reader, e.to_string()))?;

            match event {
                Event::Start(start) => {
                    if root.is_some() {
                        return Err(parse_error(&reader, "multiple root elements"));
                    }
                    stack.push(Self::from_start(&start)?);
                }
                Event::Empty(start) => {
                    if root.is_some() {
                        return Err(parse_error(&reader, "multiple root elements"));
                    }
                    let element = Self::from_start(&start)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::Element(element)),
                        None => root = Some(element),
                    }
                }
                Event::End(_) => {
                    let Some(element) = stack.pop() else {
                        return Err(parse_error(&reader, "unexpected closing tag"));
                    };
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(XmlNode::Element(element)),
                        None => root = Some(element),
                    }
                }
                Event::Text(text) => {
                    let value = text
                        .unescape()
                        .map_err(|e| parse_error(&reader, e.to_string()))?;
                    push_text(&reader, &mut stack, &value)?;
                }
                Event::CData(data) => {
                    let value = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    push_text(&reader, &mut stack, &value)?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(parse_error(&reader, "unclosed element at end of document"));
        }

        root.ok_or_else(|| ManifestError::Parse("document has no root element".to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, ManifestError> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();

        let attributes = start
            .attributes()
            .map(|attribute| {
                let attribute = attribute.map_err(|e| ManifestError::Parse(e.to_string()))?;
                let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
                let value = attribute
                    .unescape_value()
                    .map_err(|e| ManifestError::Parse(e.to_string()))?
                    .into_owned();
                Ok((key, value))
            })
            .collect::<Result<Vec<_>, ManifestError>>()?;

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    /// Child elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|child| match child {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// First child element with the given name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|element| element.name == name)
    }

    /// All child elements with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |element| element.name == name)
    }

    /// Concatenated direct text content, whitespace kept as written
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|child| match child {
                XmlNode::Text(text) => Some(text.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

fn push_text(
    reader: &Reader<&[u8]>,
    stack: &mut [XmlElement],
    value: &str,
) -> Result<(), ManifestError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Text(value.to_string())),
        None if value.trim().is_empty() => {}
        None => return Err(parse_error(reader, "text outside of root element")),
    }
    Ok(())
}

fn parse_error(reader: &Reader<&[u8]>, message: impl std::fmt::Display) -> ManifestError {
    ManifestError::Parse(format!(
        "{} (at byte {})",
        message,
        reader.buffer_position()
    ))
}
