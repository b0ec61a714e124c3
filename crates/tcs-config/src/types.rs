//! Core type definitions shared by the loader, merge engine and resolver.

use std::fmt;
use std::path::PathBuf;

/// Value kind of a scalar leaf, named after its XML tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Int,
    String,
}

impl ScalarKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "bool" => Some(ScalarKind::Bool),
            "int" => Some(ScalarKind::Int),
            "string" => Some(ScalarKind::String),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::String => "string",
        }
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// How an overlay list combines with an existing list of the same name.
///
/// Only meaningful while merging; merged lists carry no mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayMode {
    /// Items are appended after the existing ones. The overlay list must
    /// not be empty.
    #[default]
    Append,

    /// Existing items are dropped and replaced by the overlay's items,
    /// possibly none (`overlay="overwrite"`).
    Overwrite,
}

impl OverlayMode {
    /// Interpret the `overlay` attribute. Anything but `overwrite` appends.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            Some("overwrite") => OverlayMode::Overwrite,
            _ => OverlayMode::Append,
        }
    }
}

/// How a path segment picks among sibling groups sharing its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupMatch {
    /// The first sibling in document order wins.
    #[default]
    First,

    /// More than one matching sibling is an `AmbiguousGroup` error.
    Unique,
}

/// Resolver policy for a context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContextOptions {
    pub group_match: GroupMatch,
}

/// Where the documents of a configuration live.
///
/// ```text
/// <hw_root>/config/<base_prefix><base_name>.xml   base document
/// <hw_root>/<family>/<file>                       module documents
/// <overlay_root>/config/*                         base overlays
/// <overlay_root>/<family>/*                       module overlays
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub hw_root: PathBuf,
    pub overlay_root: Option<PathBuf>,
    pub base_name: String,
    pub base_prefix: String,
}

/// Directory holding the base document and its overlays.
pub const CONFIG_DIR: &str = "config";

impl Settings {
    pub fn new(hw_root: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            hw_root: hw_root.into(),
            overlay_root: None,
            base_name: base_name.into(),
            base_prefix: String::new(),
        }
    }

    pub fn with_overlay_root(mut self, overlay_root: impl Into<PathBuf>) -> Self {
        self.overlay_root = Some(overlay_root.into());
        self
    }

    pub fn with_base_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.base_prefix = prefix.into();
        self
    }

    pub fn base_document_path(&self) -> PathBuf {
        self.hw_root
            .join(CONFIG_DIR)
            .join(format!("{}{}.xml", self.base_prefix, self.base_name))
    }

    pub fn module_document_path(&self, family: &str, file: &str) -> PathBuf {
        self.hw_root.join(family).join(file)
    }

    /// Overlay directory for `family`, if an overlay root is configured.
    pub fn overlay_dir(&self, family: &str) -> Option<PathBuf> {
        self.overlay_root.as_deref().map(|root| root.join(family))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_kind_tags() {
        for kind in [ScalarKind::Bool, ScalarKind::Int, ScalarKind::String] {
            assert_eq!(ScalarKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(ScalarKind::from_tag("float"), None);
        assert_eq!(ScalarKind::Int.to_string(), "int");
    }

    #[test]
    fn test_overlay_mode_attribute() {
        assert_eq!(OverlayMode::from_attribute(None), OverlayMode::Append);
        assert_eq!(OverlayMode::from_attribute(Some("append")), OverlayMode::Append);
        assert_eq!(OverlayMode::from_attribute(Some("replace")), OverlayMode::Append);
        assert_eq!(
            OverlayMode::from_attribute(Some("overwrite")),
            OverlayMode::Overwrite
        );
    }

    #[test]
    fn test_document_paths() {
        let settings = Settings::new("/hw", "streamline1")
            .with_base_prefix("TCS2_")
            .with_overlay_root("/sw");

        assert_eq!(
            settings.base_document_path(),
            PathBuf::from("/hw/config/TCS2_streamline1.xml")
        );
        assert_eq!(
            settings.module_document_path("crm", "crm1.xml"),
            PathBuf::from("/hw/crm/crm1.xml")
        );
        assert_eq!(settings.overlay_dir("crm"), Some(PathBuf::from("/sw/crm")));
        assert_eq!(Settings::new("/hw", "x").overlay_dir("crm"), None);
    }
}
