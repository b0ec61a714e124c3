//! Diagnostic messages for TCS.
//!
//! Every fatal condition raised while building a configuration tree is turned
//! into a [`DiagnosticMessage`]: a title, an error code from the catalog, a
//! problem statement, bulleted details and hints, and optionally the source
//! location of the offending element.
//!
//! ```
//! use tcs_error_reporting::{DiagnosticMessageBuilder, SourceLocation};
//!
//! let msg = DiagnosticMessageBuilder::error("Empty Append-Mode List")
//!     .with_code("T-2-7")
//!     .problem("List `tlvs` has no items")
//!     .with_location(SourceLocation::new(Some("overlay/streamline/a.xml".into()), 10, 42))
//!     .build();
//!
//! assert_eq!(msg.code.as_deref(), Some("T-2-7"));
//! assert!(msg.to_text(None).contains("List `tlvs` has no items"));
//! ```

pub mod builder;
pub mod catalog;
pub mod diagnostic;
pub mod location;

pub use builder::DiagnosticMessageBuilder;
pub use catalog::{ERROR_CATALOG, ErrorCodeInfo, get_error_info};
pub use diagnostic::{DetailItem, DetailKind, DiagnosticKind, DiagnosticMessage, MessageContent};
pub use location::SourceLocation;
