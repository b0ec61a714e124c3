//! Validated, typed view of a configuration document.
//!
//! A [`Document`] lives only as long as it takes to merge it into a
//! [`ConfigTree`](crate::ConfigTree). Validation happens once, here, so the
//! merge engine can dispatch on closed enums without re-checking tags.
//!
//! Grammar:
//!
//! ```text
//! <config>                          root of base documents and their overlays
//! <group name="...">                named container, any children
//! <list name="..." overlay="...">   anonymous scalars of one kind
//! <string|int|bool key="...">       keyed leaf (inside config/group)
//! ```

use crate::error::BuildError;
use crate::types::{OverlayMode, ScalarKind};
use tcs_error_reporting::SourceLocation;
use tcs_xml::{XmlChildren, XmlElement};

/// A scalar leaf. `key` is `None` for list items.
#[derive(Debug, Clone, PartialEq)]
pub struct DocScalar {
    pub kind: ScalarKind,
    pub key: Option<String>,
    pub content: String,
    pub location: SourceLocation,
}

/// A node of a parsed configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocNode {
    Config {
        children: Vec<DocNode>,
        location: SourceLocation,
    },
    Group {
        name: String,
        children: Vec<DocNode>,
        location: SourceLocation,
    },
    List {
        name: String,
        mode: OverlayMode,
        items: Vec<DocScalar>,
        location: SourceLocation,
    },
    Scalar(DocScalar),
}

impl DocNode {
    /// Children of a `config` or `group`; empty for lists and scalars.
    pub fn children(&self) -> &[DocNode] {
        match self {
            DocNode::Config { children, .. } | DocNode::Group { children, .. } => children,
            DocNode::List { .. } | DocNode::Scalar(_) => &[],
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            DocNode::Config { .. } => "config",
            DocNode::Group { .. } => "group",
            DocNode::List { .. } => "list",
            DocNode::Scalar(scalar) => scalar.kind.tag(),
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            DocNode::Config { location, .. }
            | DocNode::Group { location, .. }
            | DocNode::List { location, .. } => location,
            DocNode::Scalar(scalar) => &scalar.location,
        }
    }

    pub fn group_name(&self) -> Option<&str> {
        match self {
            DocNode::Group { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// A parsed and validated configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Path the document was read from, for messages.
    pub path: String,
    pub root: DocNode,
}

impl Document {
    /// Parse and validate `text`, read from `path`.
    pub fn parse(text: &str, path: &str) -> Result<Self, BuildError> {
        let xml = tcs_xml::parse_file(text, path).map_err(|source| BuildError::Parse {
            path: path.to_string(),
            source,
        })?;
        let root = convert(&xml.root, Parent::Root)?;
        Ok(Document {
            path: path.to_string(),
            root,
        })
    }

    /// Fail unless the root element has the `expected` tag.
    pub fn expect_root(&self, expected: &'static str) -> Result<(), BuildError> {
        if self.root.tag() == expected {
            return Ok(());
        }
        Err(BuildError::UnexpectedRoot {
            path: self.path.clone(),
            expected,
            found: self.root.tag().to_string(),
            location: Some(self.root.location().clone()),
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Parent {
    Root,
    Container,
}

fn convert(element: &XmlElement, parent: Parent) -> Result<DocNode, BuildError> {
    match element.name.as_str() {
        "config" => {
            if parent != Parent::Root {
                return Err(BuildError::malformed(
                    "<config> may only appear as the document root",
                    &element.location,
                ));
            }
            Ok(DocNode::Config {
                children: convert_children(element)?,
                location: element.location.clone(),
            })
        }
        "group" => Ok(DocNode::Group {
            name: required_attribute(element, "name")?,
            children: convert_children(element)?,
            location: element.location.clone(),
        }),
        "list" => convert_list(element),
        tag => match ScalarKind::from_tag(tag) {
            Some(kind) => Ok(DocNode::Scalar(DocScalar {
                kind,
                key: Some(required_attribute(element, "key")?),
                content: scalar_content(element)?,
                location: element.location.clone(),
            })),
            None => Err(BuildError::malformed(
                format!("unknown element <{}>", tag),
                &element.location,
            )),
        },
    }
}

fn convert_children(element: &XmlElement) -> Result<Vec<DocNode>, BuildError> {
    element
        .elements()
        .map(|child| convert(child, Parent::Container))
        .collect()
}

fn convert_list(element: &XmlElement) -> Result<DocNode, BuildError> {
    let name = required_attribute(element, "name")?;
    let mode = OverlayMode::from_attribute(element.get_attribute("overlay"));

    let mut items: Vec<DocScalar> = Vec::new();
    for child in element.elements() {
        let Some(kind) = ScalarKind::from_tag(&child.name) else {
            return Err(BuildError::malformed(
                format!("list `{}` may only hold scalars, found <{}>", name, child.name),
                &child.location,
            ));
        };
        if let Some(first) = items.first() {
            if first.kind != kind {
                return Err(BuildError::malformed(
                    format!(
                        "list `{}` mixes <{}> and <{}> items",
                        name, first.kind, kind
                    ),
                    &child.location,
                ));
            }
        }
        if child.get_attribute("key").is_some() {
            tracing::debug!(list = %name, "ignoring key attribute on list item");
        }
        items.push(DocScalar {
            kind,
            key: None,
            content: scalar_content(child)?,
            location: child.location.clone(),
        });
    }

    Ok(DocNode::List {
        name,
        mode,
        items,
        location: element.location.clone(),
    })
}

fn required_attribute(element: &XmlElement, attribute: &str) -> Result<String, BuildError> {
    element
        .get_attribute(attribute)
        .map(str::to_string)
        .ok_or_else(|| {
            BuildError::malformed(
                format!("<{}> requires a `{}` attribute", element.name, attribute),
                &element.location,
            )
        })
}

/// The element's text, verbatim. Empty elements hold `""`.
fn scalar_content(element: &XmlElement) -> Result<String, BuildError> {
    match &element.children {
        XmlChildren::Empty => Ok(String::new()),
        XmlChildren::Text { content, .. } => Ok(content.clone()),
        XmlChildren::Elements(_) | XmlChildren::Mixed(_) => Err(BuildError::malformed(
            format!("<{}> may not contain elements", element.name),
            &element.location,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Document, BuildError> {
        Document::parse(text, "test.xml")
    }

    #[test]
    fn test_parse_config_document() {
        let doc = parse(
            r#"<config>
    <group name="modules">
        <string key="crm1">crm1.xml</string>
    </group>
    <list name="tlvs" overlay="overwrite">
        <int>1</int>
        <int>0x2</int>
    </list>
    <bool key="enabled"/>
</config>"#,
        )
        .unwrap();

        doc.expect_root("config").unwrap();
        let children = doc.root.children();
        assert_eq!(children.len(), 3);
        assert_eq!(children[0].group_name(), Some("modules"));

        match &children[1] {
            DocNode::List { name, mode, items, .. } => {
                assert_eq!(name, "tlvs");
                assert_eq!(*mode, OverlayMode::Overwrite);
                let contents: Vec<_> = items.iter().map(|i| i.content.as_str()).collect();
                assert_eq!(contents, ["1", "0x2"]);
                assert!(items.iter().all(|i| i.key.is_none() && i.kind == ScalarKind::Int));
            }
            other => panic!("expected list, got {other:?}"),
        }

        match &children[2] {
            DocNode::Scalar(scalar) => {
                assert_eq!(scalar.kind, ScalarKind::Bool);
                assert_eq!(scalar.key.as_deref(), Some("enabled"));
                assert_eq!(scalar.content, "");
            }
            other => panic!("expected scalar, got {other:?}"),
        }
    }

    #[test]
    fn test_group_text_is_ignored() {
        let doc = parse(r#"<group name="g">note<int key="a">1</int></group>"#).unwrap();
        assert_eq!(doc.root.children().len(), 1);
    }

    #[test]
    fn test_unexpected_root() {
        let doc = parse(r#"<group name="crm1"/>"#).unwrap();
        let err = doc.expect_root("config").unwrap_err();
        assert!(matches!(
            err,
            BuildError::UnexpectedRoot { expected: "config", ref found, .. } if found == "group"
        ));
    }

    #[test]
    fn test_malformed_documents() {
        let cases = [
            r#"<config><group/></config>"#,
            r#"<config><list/></config>"#,
            r#"<config><int>1</int></config>"#,
            r#"<config><float key="f">1.0</float></config>"#,
            r#"<config><group name="g"><config/></group></config>"#,
            r#"<config><list name="l"><group name="g"/></list></config>"#,
            r#"<config><list name="l"><int>1</int><string>a</string></list></config>"#,
            r#"<config><string key="s">a<int key="b">1</int></string></config>"#,
        ];

        for case in cases {
            let err = parse(case).unwrap_err();
            assert!(
                matches!(err, BuildError::Malformed { location: Some(_), .. }),
                "{case}: {err:?}"
            );
        }
    }

    #[test]
    fn test_malformed_location_points_at_element() {
        let text = r#"<config><group name="a"><list/></group></config>"#;
        let err = parse(text).unwrap_err();
        let loc = err.location().unwrap();
        assert_eq!(&text[loc.start..loc.end], "<list/>");
        assert_eq!(loc.file.as_deref(), Some("test.xml"));
    }

    #[test]
    fn test_parse_failure_is_reported_with_path() {
        let err = parse("<config>").unwrap_err();
        assert!(matches!(err, BuildError::Parse { ref path, .. } if path == "test.xml"));
    }

    #[test]
    fn test_list_item_key_is_dropped() {
        let doc = parse(r#"<list name="l"><string key="x">a</string></list>"#).unwrap();
        match doc.root {
            DocNode::List { items, .. } => assert_eq!(items[0].key, None),
            other => panic!("expected list, got {other:?}"),
        }
    }
}
