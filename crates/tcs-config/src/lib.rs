//! Layered telephony configuration for TCS.
//!
//! A configuration tree is built from one base document per hardware
//! platform, then refined by overlay documents shipped by the software
//! build. Modules (a modem, a HAL) live in their own documents and are
//! pulled into the tree on demand. Lookups select a group by dotted path and
//! read typed values from it.
//!
//! # Key Features
//!
//! - **Overlay merging**: groups merge by name, scalars are replaced by tag and key,
//!   lists append unless marked `overlay="overwrite"`
//! - **On-demand modules**: `add_group` loads a module and its overlays,
//!   leaving the tree untouched when anything fails
//! - **Located errors**: build errors carry the span they came from and
//!   render as catalogued diagnostics
//! - **Pluggable inputs**: documents come from a [`DocumentSource`] and
//!   platform settings from a [`PropertySource`]
//!
//! # Layout
//!
//! ```text
//! <hw_root>/config/<prefix><base_name>.xml    base document, root <config>
//! <hw_root>/<family>/<file>                   module documents, root <group>
//! <overlay_root>/config/*                     overlays of the base document
//! <overlay_root>/<family>/*                   overlays of a module
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use tcs_config::{EnvProperties, Platform, TcsContext};
//!
//! let settings = Platform::discover(&EnvProperties)?.into_settings();
//! let mut ctx = TcsContext::init(settings, Some("crm1"))?;
//!
//! ctx.select_group(".hal")?;
//! if ctx.get_bool("enabled")? {
//!     println!("{:?}", ctx.get_string_array("bands"));
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod context;
mod cursor;
mod document;
mod error;
mod loader;
mod merge;
mod platform;
mod print;
mod source;
mod tree;
mod types;
mod value;

pub use context::TcsContext;

pub use cursor::{ArrayCursor, Cursor, GroupPath};

pub use document::{DocNode, DocScalar, Document};

pub use error::{BuildError, LookupError};

pub use loader::{MODULES_GROUP, build_tree, load_group, module_family};

pub use merge::merge;

pub use platform::{
    CATALOG_FOLDER,
    DEFAULT_HW_FOLDER,
    EnvProperties,
    MapProperties,
    PROP_BUILD_TYPE,
    PROP_HW_FOLDER,
    PROP_HW_NAME,
    PROP_OVERLAY_FOLDER,
    PROP_PERSIST_HW_NAME,
    PROP_PERSIST_SW_FOLDER,
    PROP_SW_FOLDER,
    Platform,
    PropertySource,
    SYSFS_CONFIG_NAME,
};

pub use print::{render, render_lines};

pub use source::{DocumentSource, FsSource, MemorySource};

pub use tree::{ConfigTree, Node, NodeId, NodeKind};

pub use types::{CONFIG_DIR, ContextOptions, GroupMatch, OverlayMode, ScalarKind, Settings};

pub use value::{IntError, parse_bool, parse_int};

// Re-export for convenience
pub use tcs_error_reporting::{DiagnosticMessage, SourceLocation};
