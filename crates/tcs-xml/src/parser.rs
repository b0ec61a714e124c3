//! XML parser that builds location-tracked element trees.

use crate::{Error, Result, XmlAttribute, XmlChild, XmlChildren, XmlDocument, XmlElement};
use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use tcs_error_reporting::SourceLocation;

/// Parse XML from a string.
///
/// ```rust
/// use tcs_xml::parse;
///
/// let doc = parse("<config><group name=\"hal\"/></config>").unwrap();
/// assert_eq!(doc.root.name, "config");
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed.
pub fn parse(content: &str) -> Result<XmlDocument> {
    XmlParser::new(content, None).parse()
}

/// Parse XML read from `path`. Locations in the result and in errors name the file.
pub fn parse_file(content: &str, path: &str) -> Result<XmlDocument> {
    XmlParser::new(content, Some(path.to_string())).parse()
}

struct XmlParser<'a> {
    source: &'a str,
    reader: Reader<&'a [u8]>,
    file: Option<String>,

    /// Stack of elements being built.
    stack: Vec<BuildNode>,
}

/// An element whose end tag has not been seen yet.
struct BuildNode {
    name: String,
    name_location: SourceLocation,
    attributes: Vec<XmlAttribute>,

    /// Byte offset of the `<` of the start tag.
    start_offset: usize,

    children: Vec<XmlChild>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str, file: Option<String>) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        // End tag names are checked here so the error carries a location.
        reader.config_mut().check_end_names = false;

        Self {
            source,
            reader,
            file,
            stack: Vec::new(),
        }
    }

    fn parse(&mut self) -> Result<XmlDocument> {
        let mut root: Option<XmlElement> = None;

        loop {
            let event_start = self.reader.buffer_position() as usize;

            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    self.handle_start(e, event_start)?;
                }
                Ok(Event::End(e)) => {
                    let element = self.handle_end(e)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Empty(e)) => {
                    let element = self.handle_empty(e, event_start)?;
                    self.attach(element, &mut root)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(e, event_start)?;
                }
                Ok(Event::CData(e)) => {
                    self.handle_cdata(e, event_start);
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => {
                    let position = self.reader.error_position() as usize;
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        location: Some(self.make_location(position, position + 1)),
                    });
                }
            }
        }

        if let Some(node) = self.stack.last() {
            return Err(Error::UnexpectedEof {
                expected: format!("closing tag </{}>", node.name),
                location: Some(node.name_location.clone()),
            });
        }

        let root = root.ok_or_else(|| Error::EmptyDocument {
            file: self.file.clone(),
        })?;

        Ok(XmlDocument {
            root,
            location: self.make_location(0, self.source.len()),
        })
    }

    /// Hand a finished element to its parent, or make it the document root.
    fn attach(&mut self, element: XmlElement, root: &mut Option<XmlElement>) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.children.push(XmlChild::Element(element));
                Ok(())
            }
            None if root.is_some() => Err(Error::MultipleRoots {
                location: Some(element.location),
            }),
            None => {
                *root = Some(element);
                Ok(())
            }
        }
    }

    fn handle_start(&mut self, e: BytesStart<'_>, event_start: usize) -> Result<()> {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let name_location = self.name_location(&e, event_start);
        let attributes = self.parse_attributes(&e, event_start)?;

        self.stack.push(BuildNode {
            name,
            name_location,
            attributes,
            start_offset: event_start,
            children: Vec::new(),
        });

        Ok(())
    }

    fn handle_end(&mut self, e: BytesEnd<'_>) -> Result<XmlElement> {
        let end_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let end_offset = self.reader.buffer_position() as usize;

        let node = self.stack.pop().ok_or_else(|| Error::InvalidStructure {
            message: format!("Unexpected closing tag </{}>", end_name),
            location: None,
        })?;

        if node.name != end_name {
            return Err(Error::MismatchedEndTag {
                expected: node.name,
                found: end_name,
                location: Some(node.name_location),
            });
        }

        Ok(XmlElement {
            name: node.name,
            name_location: node.name_location,
            attributes: node.attributes,
            children: finalize_children(node.children),
            location: self.make_location(node.start_offset, end_offset),
        })
    }

    fn handle_empty(&mut self, e: BytesStart<'_>, event_start: usize) -> Result<XmlElement> {
        let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let name_location = self.name_location(&e, event_start);
        let attributes = self.parse_attributes(&e, event_start)?;
        let end_offset = self.reader.buffer_position() as usize;

        Ok(XmlElement {
            name,
            name_location,
            attributes,
            children: XmlChildren::Empty,
            location: self.make_location(event_start, end_offset),
        })
    }

    fn handle_text(&mut self, e: BytesText<'_>, event_start: usize) -> Result<()> {
        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid text content: {}", err),
            location: Some(self.make_location(event_start, event_start + 1)),
        })?;
        let end_offset = self.reader.buffer_position() as usize;
        self.push_text(text.into_owned(), event_start, end_offset);
        Ok(())
    }

    fn handle_cdata(&mut self, e: BytesCData<'_>, event_start: usize) {
        let text = String::from_utf8_lossy(e.as_ref()).to_string();
        let end_offset = self.reader.buffer_position() as usize;
        self.push_text(text, event_start, end_offset);
    }

    /// Record a text run on the open element, merging with a preceding run.
    /// Text outside the root element is ignored.
    fn push_text(&mut self, text: String, start: usize, end: usize) {
        let location = self.make_location(start, end);
        let Some(node) = self.stack.last_mut() else {
            return;
        };

        if let Some(XmlChild::Text {
            content,
            location: previous,
        }) = node.children.last_mut()
        {
            content.push_str(&text);
            previous.end = location.end;
            return;
        }

        node.children.push(XmlChild::Text {
            content: text,
            location,
        });
    }

    fn name_location(&self, e: &BytesStart<'_>, event_start: usize) -> SourceLocation {
        let name_start = event_start + 1;
        self.make_location(name_start, name_start + e.name().as_ref().len())
    }

    fn parse_attributes(&self, e: &BytesStart<'_>, tag_start: usize) -> Result<Vec<XmlAttribute>> {
        let tag_str = String::from_utf8_lossy(e.as_ref());
        let name_len = e.name().as_ref().len();
        // Tag content begins after '<'
        let content_start = tag_start + 1;

        let mut attributes = Vec::new();
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|err| Error::XmlSyntax {
                message: format!("Attribute error: {}", err),
                location: Some(self.make_location(tag_start, tag_start + 1 + tag_str.len())),
            })?;

            let name = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr.unescape_value().map_err(|err| Error::XmlSyntax {
                message: format!("Invalid attribute value: {}", err),
                location: Some(self.make_location(tag_start, tag_start + 1)),
            })?;

            let location = match attribute_span(&tag_str, name_len, &name) {
                Some((start, end)) => self.make_location(content_start + start, content_start + end),
                None => self.make_location(tag_start, tag_start + 1),
            };

            attributes.push(XmlAttribute {
                name,
                value: value.into_owned(),
                location,
            });
        }

        Ok(attributes)
    }

    fn make_location(&self, start: usize, end: usize) -> SourceLocation {
        SourceLocation::new(self.file.clone(), start, end)
    }
}

/// Find the span of `name="value"` inside a start tag's content (the text
/// between `<` and `>`), searching after the element name.
fn attribute_span(tag: &str, search_start: usize, name: &str) -> Option<(usize, usize)> {
    let area = tag.get(search_start..)?;

    for (rel, _) in area.match_indices(name) {
        let preceded_by_space = area[..rel]
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        if !preceded_by_space {
            continue;
        }

        let after = &area[rel + name.len()..];
        let trimmed = after.trim_start();
        let Some(rest) = trimmed.strip_prefix('=') else {
            continue;
        };
        let value_part = rest.trim_start();
        let value_offset = rel + name.len() + (after.len() - value_part.len());

        let value_len = match value_part.chars().next() {
            Some(quote @ ('"' | '\'')) => value_part[1..].find(quote).map_or(1, |p| p + 2),
            _ => value_part
                .find(|c: char| c.is_whitespace() || c == '/')
                .unwrap_or(value_part.len()),
        };

        let start = search_start + rel;
        return Some((start, search_start + value_offset + value_len));
    }

    None
}

fn finalize_children(mut children: Vec<XmlChild>) -> XmlChildren {
    let has_elements = children.iter().any(|c| matches!(c, XmlChild::Element(_)));
    if has_elements {
        children.retain(|c| match c {
            XmlChild::Text { content, .. } => !content.trim().is_empty(),
            XmlChild::Element(_) => true,
        });
    }

    if children.is_empty() {
        return XmlChildren::Empty;
    }

    if children.iter().all(|c| matches!(c, XmlChild::Element(_))) {
        let elements = children
            .into_iter()
            .filter_map(|c| match c {
                XmlChild::Element(e) => Some(e),
                XmlChild::Text { .. } => None,
            })
            .collect();
        return XmlChildren::Elements(elements);
    }

    if children.len() == 1 {
        if let Some(XmlChild::Text { content, location }) = children.pop() {
            return XmlChildren::Text { content, location };
        }
        return XmlChildren::Empty;
    }

    XmlChildren::Mixed(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_element() {
        let doc = parse("<config/>").unwrap();
        assert_eq!(doc.root.name, "config");
        assert!(doc.root.is_empty());
    }

    #[test]
    fn test_formatted_document_has_only_elements() {
        let doc = parse(
            r#"<?xml version="1.0" encoding="utf-8"?>
<!-- base hardware description -->
<config>
    <group name="modules">
        <string key="crm1">crm.xml</string>
        <!-- <string key="crm2">crm2.xml</string> -->
    </group>
    <group name="hal"/>
</config>
"#,
        )
        .unwrap();

        assert!(matches!(doc.root.children, XmlChildren::Elements(ref e) if e.len() == 2));
        let modules = doc.root.elements().next().unwrap();
        let entries: Vec<_> = modules.elements().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].get_attribute("key"), Some("crm1"));
        assert_eq!(entries[0].text(), Some("crm.xml"));
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let doc = parse("<string key=\"a\">  spaced value \n</string>").unwrap();
        assert_eq!(doc.root.text(), Some("  spaced value \n"));

        let doc = parse("<string key=\"a\">   </string>").unwrap();
        assert_eq!(doc.root.text(), Some("   "));
    }

    #[test]
    fn test_entities_and_cdata_merge_into_one_run() {
        let doc = parse("<string key=\"a\">a &amp; b<![CDATA[ <c> ]]></string>").unwrap();
        assert_eq!(doc.root.text(), Some("a & b <c> "));
    }

    #[test]
    fn test_comment_inside_text_is_dropped() {
        let doc = parse("<int key=\"a\">1<!-- note -->2</int>").unwrap();
        assert_eq!(doc.root.text(), Some("12"));
    }

    #[test]
    fn test_mixed_content() {
        let doc = parse("<group name=\"g\">stray<int key=\"a\">1</int></group>").unwrap();
        assert!(matches!(doc.root.children, XmlChildren::Mixed(_)));
        assert_eq!(doc.root.elements().count(), 1);
        assert_eq!(doc.root.text(), None);
    }

    #[test]
    fn test_element_locations() {
        let content = "<config><group name=\"hal\"/></config>";
        let doc = parse(content).unwrap();
        assert_eq!(doc.root.location.start, 0);
        assert_eq!(doc.root.location.end, content.len());
        assert_eq!(doc.root.name_location.start, 1);
        assert_eq!(doc.root.name_location.end, 7);

        let group = doc.root.elements().next().unwrap();
        assert_eq!(&content[group.location.start..group.location.end], "<group name=\"hal\"/>");
    }

    #[test]
    fn test_attribute_location() {
        //          0         1         2
        //          0123456789012345678901234567
        let xml = r#"<list name="tlvs" overlay='overwrite'/>"#;
        let doc = parse(xml).unwrap();

        let name = doc.root.get_attribute_full("name").unwrap();
        assert_eq!(&xml[name.location.start..name.location.end], r#"name="tlvs""#);

        let overlay = doc.root.get_attribute_full("overlay").unwrap();
        assert_eq!(overlay.value, "overwrite");
        assert_eq!(
            &xml[overlay.location.start..overlay.location.end],
            "overlay='overwrite'"
        );
    }

    #[test]
    fn test_attribute_span_skips_longer_names() {
        let tag = r#"int monkey="1" key="2""#;
        let (start, end) = attribute_span(tag, 3, "key").unwrap();
        assert_eq!(&tag[start..end], r#"key="2""#);
    }

    #[test]
    fn test_parse_file_names_locations() {
        let doc = parse_file("<group name=\"crm1\"/>", "hw/crm/crm.xml").unwrap();
        assert_eq!(doc.root.location.file.as_deref(), Some("hw/crm/crm.xml"));

        let err = parse_file("", "hw/crm/crm.xml").unwrap_err();
        assert_eq!(
            err,
            Error::EmptyDocument {
                file: Some("hw/crm/crm.xml".into())
            }
        );
    }

    #[test]
    fn test_empty_document_error() {
        assert!(matches!(parse(""), Err(Error::EmptyDocument { .. })));
        assert!(matches!(
            parse("<?xml version=\"1.0\"?>\n<!-- nothing -->\n"),
            Err(Error::EmptyDocument { .. })
        ));
    }

    #[test]
    fn test_mismatched_tags_error() {
        let err = parse("<config><group name=\"a\"></list></config>").unwrap_err();
        match err {
            Error::MismatchedEndTag {
                expected,
                found,
                location,
            } => {
                assert_eq!(expected, "group");
                assert_eq!(found, "list");
                assert_eq!(location.map(|l| l.start), Some(9));
            }
            other => panic!("expected MismatchedEndTag, got {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_element() {
        let err = parse("<config><group name=\"a\">").unwrap_err();
        assert!(matches!(err, Error::UnexpectedEof { ref expected, .. } if expected == "closing tag </group>"));
        assert_eq!(err.to_diagnostic().code.as_deref(), Some("T-1-2"));
    }

    #[test]
    fn test_multiple_roots() {
        let err = parse("<config/><config/>").unwrap_err();
        assert!(matches!(err, Error::MultipleRoots { .. }));
        assert_eq!(err.to_diagnostic().code.as_deref(), Some("T-1-6"));
    }

    #[test]
    fn test_syntax_error() {
        let err = parse("<config attr=unquoted/>").unwrap_err();
        assert!(matches!(err, Error::XmlSyntax { .. }));
        assert_eq!(err.to_diagnostic().title, "XML Syntax Error");
    }
}
