//! Core types for location-tracked XML element trees.

use tcs_error_reporting::SourceLocation;

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    /// The root element of the document.
    pub root: XmlElement,

    /// Span of the entire document.
    pub location: SourceLocation,
}

/// An XML element.
///
/// Locations are byte spans into the text the element was parsed from.
/// Elements built in memory carry default (empty) locations.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// The tag name, including any namespace prefix.
    pub name: String,

    /// Span of the tag name in the start tag.
    pub name_location: SourceLocation,

    pub attributes: Vec<XmlAttribute>,

    pub children: XmlChildren,

    /// Span of the whole element, from `<` to the end of the closing tag.
    pub location: SourceLocation,
}

/// An XML attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    pub name: String,

    /// The attribute value (after unescaping XML entities).
    pub value: String,

    /// Span of `name="value"` in the start tag.
    pub location: SourceLocation,
}

/// Children of an XML element.
///
/// Adjacent text and CDATA sections are merged into one text run, and
/// whitespace-only runs next to child elements are dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChildren {
    /// Element contains only child elements.
    Elements(Vec<XmlElement>),

    /// Element contains only text content.
    Text {
        /// The text content (after unescaping XML entities).
        content: String,
        location: SourceLocation,
    },

    /// Element contains text interleaved with child elements.
    Mixed(Vec<XmlChild>),

    /// Element is empty (no content).
    Empty,
}

/// A single child in mixed content.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlChild {
    Element(XmlElement),
    Text {
        content: String,
        location: SourceLocation,
    },
}

impl XmlElement {
    /// Create an empty element with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            name_location: SourceLocation::default(),
            attributes: Vec::new(),
            children: XmlChildren::Empty,
            location: SourceLocation::default(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(XmlAttribute {
            name: name.into(),
            value: value.into(),
            location: SourceLocation::default(),
        });
        self
    }

    /// Builder-style text content setter. Empty text leaves the element empty.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let content = text.into();
        self.children = if content.is_empty() {
            XmlChildren::Empty
        } else {
            XmlChildren::Text {
                content,
                location: SourceLocation::default(),
            }
        };
        self
    }

    /// Append a child element, converting text-only content to mixed content.
    pub fn push_element(&mut self, child: XmlElement) {
        let children = std::mem::replace(&mut self.children, XmlChildren::Empty);
        self.children = match children {
            XmlChildren::Empty => XmlChildren::Elements(vec![child]),
            XmlChildren::Elements(mut elements) => {
                elements.push(child);
                XmlChildren::Elements(elements)
            }
            XmlChildren::Text { content, location } => XmlChildren::Mixed(vec![
                XmlChild::Text { content, location },
                XmlChild::Element(child),
            ]),
            XmlChildren::Mixed(mut mixed) => {
                mixed.push(XmlChild::Element(child));
                XmlChildren::Mixed(mixed)
            }
        };
    }

    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn get_attribute_full(&self, name: &str) -> Option<&XmlAttribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Iterate over child elements only, skipping text.
    pub fn elements(&self) -> Box<dyn Iterator<Item = &XmlElement> + '_> {
        match &self.children {
            XmlChildren::Elements(elements) => Box::new(elements.iter()),
            XmlChildren::Mixed(children) => Box::new(children.iter().filter_map(|c| match c {
                XmlChild::Element(e) => Some(e),
                XmlChild::Text { .. } => None,
            })),
            XmlChildren::Text { .. } | XmlChildren::Empty => Box::new(std::iter::empty()),
        }
    }

    pub fn has_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    /// The text content when the element holds nothing but text.
    pub fn text(&self) -> Option<&str> {
        match &self.children {
            XmlChildren::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.children, XmlChildren::Empty)
    }
}
