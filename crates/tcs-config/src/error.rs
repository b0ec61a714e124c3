//! Build and lookup errors.
//!
//! [`BuildError`] is fatal: the tree being built is discarded. [`LookupError`]
//! is recoverable: the context stays usable and the caller may try another
//! path or key.

use crate::types::ScalarKind;
use tcs_error_reporting::{DiagnosticMessage, DiagnosticMessageBuilder, SourceLocation};
use thiserror::Error;

/// A fatal error raised while building a configuration tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("cannot read `{path}`: {message}")]
    Unreadable { path: String, message: String },

    #[error("cannot parse `{path}`: {source}")]
    Parse {
        path: String,
        #[source]
        source: tcs_xml::Error,
    },

    #[error("`{path}` has root <{found}>, expected <{expected}>")]
    UnexpectedRoot {
        path: String,
        expected: &'static str,
        found: String,
        location: Option<SourceLocation>,
    },

    #[error("malformed configuration element: {message}")]
    Malformed {
        message: String,
        location: Option<SourceLocation>,
    },

    #[error("no `modules` group at tree root while loading `{group}`")]
    ModuleCatalogMissing { group: String },

    #[error("module `{group}` is not listed in the `modules` group")]
    ModuleNotInCatalog { group: String },

    #[error("list `{list}` is empty but would be appended to an existing list")]
    EmptyAppendList {
        list: String,
        location: Option<SourceLocation>,
    },

    #[error("list `{list}` holds <{existing}> items, overlay adds <{overlay}> items")]
    ListKindMismatch {
        list: String,
        existing: ScalarKind,
        overlay: ScalarKind,
        location: Option<SourceLocation>,
    },

    #[error("platform not detected: no base document name configured")]
    PlatformNotDetected,
}

impl BuildError {
    pub(crate) fn unreadable(path: &std::path::Path, err: &std::io::Error) -> Self {
        BuildError::Unreadable {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>, location: &SourceLocation) -> Self {
        BuildError::Malformed {
            message: message.into(),
            location: Some(location.clone()),
        }
    }

    /// Source location of the offending element, when one is known.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            BuildError::Parse { source, .. } => source.location(),
            BuildError::UnexpectedRoot { location, .. }
            | BuildError::Malformed { location, .. }
            | BuildError::EmptyAppendList { location, .. }
            | BuildError::ListKindMismatch { location, .. } => location.as_ref(),
            BuildError::Unreadable { .. }
            | BuildError::ModuleCatalogMissing { .. }
            | BuildError::ModuleNotInCatalog { .. }
            | BuildError::PlatformNotDetected => None,
        }
    }

    /// Convert this error to a DiagnosticMessage with the appropriate T-2-* error code.
    pub fn to_diagnostic(&self) -> DiagnosticMessage {
        let location = self.location().cloned();
        match self {
            BuildError::Unreadable { path, message } => {
                DiagnosticMessageBuilder::error("Configuration Document Unreadable")
                    .with_code("T-2-1")
                    .problem(format!("Can't read `{}`", path))
                    .add_detail(message.clone())
                    .build()
            }

            BuildError::Parse { path, source } => {
                let inner = source.to_diagnostic();
                let mut builder = DiagnosticMessageBuilder::error("Configuration Document Not Parsed")
                    .with_code("T-2-2")
                    .problem(format!("`{}` is not well-formed XML", path))
                    .add_detail(source.to_string())
                    .with_location_opt(location);
                if let Some(code) = inner.code {
                    builder = builder.add_note(format!("XML error {}: {}", code, inner.title));
                }
                builder.build()
            }

            BuildError::UnexpectedRoot {
                path,
                expected,
                found,
                ..
            } => DiagnosticMessageBuilder::error("Unexpected Root Element")
                .with_code("T-2-3")
                .problem(format!("The root of `{}` must be <{}>", path, expected))
                .add_detail(format!("Found <{}>", found))
                .with_location_opt(location)
                .build(),

            BuildError::Malformed { message, .. } => {
                DiagnosticMessageBuilder::error("Malformed Configuration Element")
                    .with_code("T-2-4")
                    .problem(message.clone())
                    .with_location_opt(location)
                    .build()
            }

            BuildError::ModuleCatalogMissing { group } => {
                DiagnosticMessageBuilder::error("Module Catalog Missing")
                    .with_code("T-2-5")
                    .problem(format!(
                        "Module `{}` can't be loaded without a `modules` group at the tree root",
                        group
                    ))
                    .add_hint("Declare a `<group name=\"modules\">` in the base document?")
                    .build()
            }

            BuildError::ModuleNotInCatalog { group } => {
                DiagnosticMessageBuilder::error("Module Not In Catalog")
                    .with_code("T-2-6")
                    .problem(format!("Group `modules` has no <string> entry for `{}`", group))
                    .add_hint(format!(
                        "Add `<string key=\"{}\">file.xml</string>` to the modules group?",
                        group
                    ))
                    .build()
            }

            BuildError::EmptyAppendList { list, .. } => {
                DiagnosticMessageBuilder::error("Empty Append-Mode List")
                    .with_code("T-2-7")
                    .problem(format!("List `{}` has no items to append", list))
                    .add_hint("Use `overlay=\"overwrite\"` to clear the list?")
                    .with_location_opt(location)
                    .build()
            }

            BuildError::ListKindMismatch {
                list,
                existing,
                overlay,
                ..
            } => DiagnosticMessageBuilder::error("List Item Kind Mismatch")
                .with_code("T-2-8")
                .problem(format!(
                    "List `{}` holds <{}> items and can't take <{}> items",
                    list, existing, overlay
                ))
                .with_location_opt(location)
                .build(),

            BuildError::PlatformNotDetected => {
                DiagnosticMessageBuilder::error("Platform Not Detected")
                    .with_code("T-2-9")
                    .problem("No base document name is configured for this platform")
                    .add_info("Checked `persist.tcs.hw_filename`, `ro.telephony.tcs.hw_name` and the sysfs config name")
                    .add_hint("Pass `--base <name>` explicitly?")
                    .build()
            }
        }
    }
}

/// A recoverable lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("relative path `{path}` used but no default group is configured")]
    NoDefaultGroup { path: String },

    #[error("invalid group path `{path}`")]
    InvalidPath { path: String },

    #[error("group `{segment}` not found while resolving `{path}`")]
    GroupNotFound { path: String, segment: String },

    #[error("group `{path}` has no elements")]
    EmptyGroup { path: String },

    #[error("group `{segment}` matches {count} siblings while resolving `{path}`")]
    AmbiguousGroup {
        path: String,
        segment: String,
        count: usize,
    },

    #[error("no group selected")]
    NoGroupSelected,

    #[error("no array group selected")]
    NoArraySelected,

    #[error("array group `{path}` has no element after index {index}")]
    ArrayExhausted { path: String, index: usize },

    #[error("key `{key}` not found in group `{path}`")]
    KeyNotFound { key: String, path: String },

    #[error("key `{key}` in group `{path}`: `{value}` is not a bool")]
    InvalidBool {
        key: String,
        path: String,
        value: String,
    },

    #[error("key `{key}` in group `{path}`: `{value}` is not an int ({reason})")]
    InvalidInt {
        key: String,
        path: String,
        value: String,
        reason: String,
    },
}
