//! Serialize element trees back to XML text.

use crate::{Error, Result, XmlChild, XmlChildren, XmlElement};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

/// Write `element` as indented XML (four spaces per level).
///
/// Text content is escaped but otherwise written verbatim, so parsing the
/// output yields the same names, attributes and text.
///
/// ```rust
/// use tcs_xml::{parse, to_string, XmlElement};
///
/// let mut group = XmlElement::new("group").with_attribute("name", "hal");
/// group.push_element(XmlElement::new("int").with_attribute("key", "retries").with_text("3"));
///
/// let text = to_string(&group).unwrap();
/// let reparsed = parse(&text).unwrap();
/// assert_eq!(reparsed.root.get_attribute("name"), Some("hal"));
/// assert_eq!(reparsed.root.elements().next().unwrap().text(), Some("3"));
/// ```
pub fn to_string(element: &XmlElement) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 4);
    write_element(&mut writer, element)?;

    let mut out = String::from_utf8(writer.into_inner()).map_err(|e| Error::Write {
        message: e.to_string(),
    })?;
    out.push('\n');
    Ok(out)
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for attr in &element.attributes {
        start.push_attribute((attr.name.as_str(), attr.value.as_str()));
    }

    if element.is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    match &element.children {
        XmlChildren::Elements(children) => {
            for child in children {
                write_element(writer, child)?;
            }
        }
        XmlChildren::Text { content, .. } => {
            write_event(writer, Event::Text(BytesText::new(content)))?;
        }
        XmlChildren::Mixed(children) => {
            for child in children {
                match child {
                    XmlChild::Element(e) => write_element(writer, e)?,
                    XmlChild::Text { content, .. } => {
                        write_event(writer, Event::Text(BytesText::new(content)))?
                    }
                }
            }
        }
        XmlChildren::Empty => {}
    }
    write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(|e| Error::Write {
        message: e.to_string(),
    })
}
