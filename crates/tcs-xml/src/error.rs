//! Error types for XML parsing with source locations.

use tcs_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, SourceLocation};
use thiserror::Error;

/// Result type alias for tcs-xml operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing or writing XML.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// XML syntax error from quick-xml.
    #[error("XML syntax error: {message}")]
    XmlSyntax {
        message: String,
        location: Option<SourceLocation>,
    },

    /// Unexpected end of input.
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        /// What was expected when EOF was encountered.
        expected: String,
        location: Option<SourceLocation>,
    },

    #[error("mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag {
        expected: String,
        found: String,
        location: Option<SourceLocation>,
    },

    #[error("invalid XML structure: {message}")]
    InvalidStructure {
        message: String,
        location: Option<SourceLocation>,
    },

    /// Empty document (no root element).
    #[error("empty XML document: no root element found")]
    EmptyDocument { file: Option<String> },

    #[error("invalid XML: multiple root elements")]
    MultipleRoots { location: Option<SourceLocation> },

    /// Serializing an element tree failed.
    #[error("failed to write XML: {message}")]
    Write { message: String },
}

impl Error {
    /// Source location of the error, when one is known.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Error::XmlSyntax { location, .. }
            | Error::UnexpectedEof { location, .. }
            | Error::MismatchedEndTag { location, .. }
            | Error::InvalidStructure { location, .. }
            | Error::MultipleRoots { location } => location.as_ref(),
            Error::EmptyDocument { .. } | Error::Write { .. } => None,
        }
    }

    /// Convert this error to a DiagnosticMessage with the appropriate T-1-* error code.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        match self {
            Error::XmlSyntax { message, location } => {
                DiagnosticMessageBuilder::error("XML Syntax Error")
                    .with_code("T-1-1")
                    .problem(message.clone())
                    .with_location_opt(location.clone())
                    .build()
            }

            Error::UnexpectedEof { expected, location } => {
                DiagnosticMessageBuilder::error("Unexpected End of XML Input")
                    .with_code("T-1-2")
                    .problem(format!(
                        "The XML document ended unexpectedly; expected {}",
                        expected
                    ))
                    .with_location_opt(location.clone())
                    .build()
            }

            Error::MismatchedEndTag {
                expected,
                found,
                location,
            } => DiagnosticMessageBuilder::error("Mismatched XML End Tag")
                .with_code("T-1-3")
                .problem(format!(
                    "End tag </{}> does not match start tag <{}>",
                    found, expected
                ))
                .add_detail(format!("Expected: </{}>", expected))
                .add_detail(format!("Found: </{}>", found))
                .add_hint("Check that all opening tags have matching closing tags?")
                .with_location_opt(location.clone())
                .build(),

            Error::InvalidStructure { message, location } => {
                DiagnosticMessageBuilder::error("Invalid XML Structure")
                    .with_code("T-1-4")
                    .problem(message.clone())
                    .with_location_opt(location.clone())
                    .build()
            }

            Error::EmptyDocument { file } => {
                let mut builder = DiagnosticMessageBuilder::error("Empty XML Document")
                    .with_code("T-1-5")
                    .problem("The XML document contains no root element")
                    .add_hint("Add a `config` or `group` root element to the document?");
                if let Some(file) = file {
                    builder = builder.add_info(format!("In file `{}`", file));
                }
                builder.build()
            }

            Error::MultipleRoots { location } => {
                DiagnosticMessageBuilder::error("Multiple XML Root Elements")
                    .with_code("T-1-6")
                    .problem("The XML document contains multiple root elements")
                    .add_detail("XML documents must have exactly one root element")
                    .add_hint("Wrap the elements in a single `config` or `group` element?")
                    .with_location_opt(location.clone())
                    .build()
            }

            Error::Write { message } => DiagnosticMessageBuilder::error("Internal Error")
                .with_code("T-0-1")
                .problem(format!("Writing XML failed: {}", message))
                .build(),
        }
    }
}
