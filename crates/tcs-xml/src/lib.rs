//! Location-tracked XML parsing for TCS configuration documents.
//!
//! This crate wraps [`quick-xml`] to produce a small element tree where every
//! element and attribute remembers the byte span it came from. Comments,
//! processing instructions and whitespace between elements are dropped, so
//! [`XmlElement::elements`] walks exactly the element children a configuration
//! document declares.
//!
//! # Example
//!
//! ```rust
//! use tcs_xml::parse;
//!
//! let doc = parse(r#"<config>
//!   <!-- radio settings -->
//!   <group name="hal">
//!     <int key="ping_timeout">30</int>
//!   </group>
//! </config>"#).unwrap();
//!
//! assert_eq!(doc.root.name, "config");
//!
//! let groups: Vec<_> = doc.root.elements().collect();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].get_attribute("name"), Some("hal"));
//!
//! let scalar = groups[0].elements().next().unwrap();
//! assert_eq!(scalar.text(), Some("30"));
//! ```
//!
//! Trees can be written back out with [`to_string`]; re-parsing the output
//! yields the same elements, attributes and text.

pub mod error;
pub mod parser;
pub mod types;
pub mod writer;

pub use error::{Error, Result};
pub use parser::{parse, parse_file};
pub use tcs_error_reporting::SourceLocation;
pub use types::{XmlAttribute, XmlChild, XmlChildren, XmlDocument, XmlElement};
pub use writer::to_string;
