//! The lookup context: a built tree plus the cursor lookups run against.

use crate::cursor::{ArrayCursor, Cursor, GroupPath, resolve};
use crate::error::{BuildError, LookupError};
use crate::loader::{build_tree, load_group};
use crate::print::{render, render_lines};
use crate::source::{DocumentSource, FsSource};
use crate::tree::{ConfigTree, NodeId};
use crate::types::{ContextOptions, ScalarKind, Settings};
use crate::value::{parse_bool, parse_int};

/// A configuration tree with a lookup cursor.
///
/// Selection methods move the cursor; typed getters read the children of
/// the selected group.
///
/// ```no_run
/// use tcs_config::{Settings, TcsContext};
///
/// let settings = Settings::new("/system/vendor/etc/telephony/tcs", "streamline1");
/// let mut ctx = TcsContext::init(settings, Some("crm1"))?;
///
/// ctx.select_group(".hal")?;
/// let timeout = ctx.get_int("ping_timeout")?;
/// let bands = ctx.get_string_array("bands");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct TcsContext {
    tree: ConfigTree,
    settings: Settings,
    source: Box<dyn DocumentSource + Send>,
    options: ContextOptions,
    default_group: Option<NodeId>,
    cursor: Option<Cursor>,
}

impl std::fmt::Debug for TcsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcsContext")
            .field("settings", &self.settings)
            .field("options", &self.options)
            .field("nodes", &self.tree.allocated())
            .field("default_group", &self.default_group)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl TcsContext {
    /// Build a context from documents on the filesystem.
    ///
    /// When `default_group` is given that module is loaded, relative paths
    /// resolve from it, and the cursor starts on it.
    pub fn init(settings: Settings, default_group: Option<&str>) -> Result<Self, BuildError> {
        Self::init_with(FsSource, settings, default_group, ContextOptions::default())
    }

    /// Build a context reading documents from `source`.
    pub fn init_with(
        source: impl DocumentSource + Send + 'static,
        settings: Settings,
        default_group: Option<&str>,
        options: ContextOptions,
    ) -> Result<Self, BuildError> {
        let tree = build_tree(&source, &settings)?;
        let mut ctx = Self {
            tree,
            settings,
            source: Box::new(source),
            options,
            default_group: None,
            cursor: None,
        };

        if let Some(name) = default_group {
            let group = ctx.add_group(name, false)?;
            ctx.default_group = Some(group);
            ctx.cursor = Some(Cursor::group(group, name));
        }

        tracing::debug!(nodes = ctx.tree.allocated(), "configuration context ready");
        Ok(ctx)
    }

    pub fn tree(&self) -> &ConfigTree {
        &self.tree
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load module `name` into the tree. When `announce` is set the merged
    /// group is printed.
    ///
    /// On failure the tree is left as it was.
    pub fn add_group(&mut self, name: &str, announce: bool) -> Result<NodeId, BuildError> {
        let mut staged = self.tree.clone();
        let group = load_group(&mut staged, self.source.as_ref(), &self.settings, name)?;
        self.tree = staged;

        if announce {
            self.log_lines(group);
        }
        Ok(group)
    }

    /// Log the whole tree at `info` level, one event per line.
    pub fn print(&self) {
        self.log_lines(self.tree.root());
    }

    /// The whole tree as text.
    pub fn dump(&self) -> String {
        render(&self.tree, self.tree.root())
    }

    /// The whole tree as a `<config>` document.
    pub fn to_xml(&self) -> tcs_xml::Result<String> {
        tcs_xml::to_string(&self.tree.to_xml_element(self.tree.root()))
    }

    fn log_lines(&self, id: NodeId) {
        for line in render_lines(&self.tree, id) {
            tracing::info!("{}", line);
        }
    }

    /// Path that selected the current group, if any.
    pub fn current_path(&self) -> Option<&str> {
        self.cursor.as_ref().map(|c| c.path.as_str())
    }

    /// The currently selected group.
    pub fn current_group(&self) -> Option<NodeId> {
        self.cursor.as_ref().map(|c| c.group)
    }

    /// Select the group at `path` as the lookup scope.
    ///
    /// On failure no group is selected.
    pub fn select_group(&mut self, path: &str) -> Result<(), LookupError> {
        self.cursor = None;

        let parsed = GroupPath::parse(path)?;
        let start = self.path_start(&parsed, path)?;
        let group = resolve(&self.tree, start, &parsed.segments, path, self.options.group_match)?;

        if self.tree.children(group).is_empty() {
            tracing::debug!(group = path, "group is empty");
            return Err(LookupError::EmptyGroup {
                path: path.to_string(),
            });
        }

        self.cursor = Some(Cursor::group(group, path));
        Ok(())
    }

    /// Select the first of the sibling groups named by the last segment of
    /// `path`, returning how many there are.
    pub fn select_group_array(&mut self, path: &str) -> Result<usize, LookupError> {
        self.cursor = None;

        let parsed = GroupPath::parse(path)?;
        let start = self.path_start(&parsed, path)?;
        let Some((last, prefix)) = parsed.segments.split_last() else {
            return Err(LookupError::InvalidPath {
                path: path.to_string(),
            });
        };

        let parent = resolve(&self.tree, start, prefix, path, self.options.group_match)?;
        let members: Vec<NodeId> = self.tree.groups_named(parent, last).collect();
        let Some(&first) = members.first() else {
            return Err(LookupError::GroupNotFound {
                path: path.to_string(),
                segment: last.to_string(),
            });
        };

        let count = members.len();
        self.cursor = Some(Cursor {
            group: first,
            path: path.to_string(),
            array: Some(ArrayCursor { members, index: 0 }),
        });
        Ok(count)
    }

    /// Move to the next group of the selected array, returning its index.
    ///
    /// Past the last group the cursor stays where it is.
    pub fn next_group_array(&mut self) -> Result<usize, LookupError> {
        self.cursor
            .as_mut()
            .ok_or(LookupError::NoArraySelected)?
            .advance()
    }

    fn path_start(&self, parsed: &GroupPath<'_>, path: &str) -> Result<NodeId, LookupError> {
        if !parsed.relative {
            return Ok(self.tree.root());
        }
        self.default_group.ok_or_else(|| LookupError::NoDefaultGroup {
            path: path.to_string(),
        })
    }

    pub fn get_bool(&self, key: &str) -> Result<bool, LookupError> {
        let (cursor, content) = self.scalar(key, ScalarKind::Bool)?;
        parse_bool(content).ok_or_else(|| {
            tracing::error!(key, group = %cursor.path, value = content, "invalid bool value");
            LookupError::InvalidBool {
                key: key.to_string(),
                path: cursor.path.clone(),
                value: content.to_string(),
            }
        })
    }

    pub fn get_int(&self, key: &str) -> Result<i64, LookupError> {
        let (cursor, content) = self.scalar(key, ScalarKind::Int)?;
        parse_int(content).map_err(|reason| {
            tracing::error!(key, group = %cursor.path, value = content, %reason, "invalid int value");
            LookupError::InvalidInt {
                key: key.to_string(),
                path: cursor.path.clone(),
                value: content.to_string(),
                reason: reason.to_string(),
            }
        })
    }

    /// Content of the `<string>` keyed `key`, verbatim.
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.scalar(key, ScalarKind::String)
            .ok()
            .map(|(_, content)| content.to_string())
    }

    /// Contents of the items of list `name`, in order. Empty when the list
    /// is missing or empty.
    pub fn get_string_array(&self, name: &str) -> Vec<String> {
        let Some(cursor) = self.cursor.as_ref() else {
            return Vec::new();
        };
        let Some(list) = self.tree.find_list(cursor.group, name) else {
            tracing::debug!(list = name, group = %cursor.path, "list not found");
            return Vec::new();
        };

        let items: Vec<String> = self
            .tree
            .children(list)
            .iter()
            .filter_map(|&id| self.tree.node(id).scalar())
            .map(|(_, content)| content.to_string())
            .collect();
        if items.is_empty() {
            tracing::debug!(list = name, group = %cursor.path, "list is empty");
        }
        items
    }

    /// The selected cursor and the content of scalar `key` of `kind` under it.
    fn scalar(&self, key: &str, kind: ScalarKind) -> Result<(&Cursor, &str), LookupError> {
        let cursor = self.cursor.as_ref().ok_or(LookupError::NoGroupSelected)?;

        let content = self
            .tree
            .find_scalar_of(cursor.group, kind, key)
            .and_then(|id| self.tree.node(id).scalar())
            .map(|(_, content)| content);

        content.map(|c| (cursor, c)).ok_or_else(|| LookupError::KeyNotFound {
            key: key.to_string(),
            path: cursor.path.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use crate::types::GroupMatch;

    const BASE: &str = r#"<config>
    <group name="modules">
        <string key="crm1">crm.xml</string>
        <string key="broken1">broken.xml</string>
    </group>
    <group name="common">
        <int key="test">0x20</int>
        <bool key="flag">true</bool>
        <string key="label">  padded </string>
        <int key="bad_int">1abc</int>
        <bool key="bad_bool">abc</bool>
        <list name="names"><string>a</string><string>b</string></list>
        <list name="none" overlay="overwrite"/>
        <group name="empty"/>
    </group>
    <group name="sim"><int key="slot">0</int></group>
    <group name="sim"/>
    <group name="sim"><int key="slot">2</int></group>
</config>"#;

    fn source() -> MemorySource {
        MemorySource::new()
            .with_file("/hw/config/board.xml", BASE)
            .with_file(
                "/hw/crm/crm.xml",
                r#"<group name="crm1"><group name="hal"><int key="ping">5</int></group></group>"#,
            )
            .with_file("/hw/broken/broken.xml", "<group name=\"broken1\">")
    }

    fn context(default_group: Option<&str>) -> TcsContext {
        TcsContext::init_with(
            source(),
            Settings::new("/hw", "board"),
            default_group,
            ContextOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_typed_getters() {
        let mut ctx = context(None);
        ctx.select_group("common").unwrap();

        assert_eq!(ctx.get_int("test"), Ok(32));
        assert_eq!(ctx.get_bool("flag"), Ok(true));
        assert_eq!(ctx.get_string("label").as_deref(), Some("  padded "));
        assert_eq!(ctx.get_string_array("names"), ["a", "b"]);
        assert!(ctx.get_string_array("none").is_empty());
        assert!(ctx.get_string_array("missing").is_empty());
    }

    #[test]
    fn test_getter_errors() {
        let mut ctx = context(None);
        ctx.select_group("common").unwrap();

        assert!(matches!(ctx.get_int("bad_int"), Err(LookupError::InvalidInt { ref value, .. }) if value == "1abc"));
        assert!(matches!(ctx.get_bool("bad_bool"), Err(LookupError::InvalidBool { .. })));
        // Kind is part of the lookup.
        assert_eq!(
            ctx.get_bool("test"),
            Err(LookupError::KeyNotFound {
                key: "test".into(),
                path: "common".into()
            })
        );
        assert_eq!(ctx.get_string("test"), None);
    }

    #[test]
    fn test_getters_without_selection() {
        let ctx = context(None);
        assert_eq!(ctx.get_bool("flag"), Err(LookupError::NoGroupSelected));
        assert_eq!(ctx.get_int("test"), Err(LookupError::NoGroupSelected));
        assert_eq!(ctx.get_string("label"), None);
        assert!(ctx.get_string_array("names").is_empty());
    }

    #[test]
    fn test_failed_selection_clears_cursor() {
        let mut ctx = context(None);
        ctx.select_group("common").unwrap();
        assert!(ctx.select_group("common.missing").is_err());
        assert_eq!(ctx.current_path(), None);
        assert_eq!(ctx.get_int("test"), Err(LookupError::NoGroupSelected));
    }

    #[test]
    fn test_empty_group_is_distinct_from_missing() {
        let mut ctx = context(None);
        assert_eq!(
            ctx.select_group("common.empty"),
            Err(LookupError::EmptyGroup {
                path: "common.empty".into()
            })
        );
        assert!(matches!(
            ctx.select_group("common.nothing"),
            Err(LookupError::GroupNotFound { .. })
        ));
    }

    #[test]
    fn test_relative_paths() {
        let mut ctx = context(None);
        assert_eq!(
            ctx.select_group(".hal"),
            Err(LookupError::NoDefaultGroup { path: ".hal".into() })
        );

        let mut ctx = context(Some("crm1"));
        assert_eq!(ctx.current_path(), Some("crm1"));
        ctx.select_group(".hal").unwrap();
        assert_eq!(ctx.get_int("ping"), Ok(5));
        ctx.select_group("crm1.hal").unwrap();
        assert_eq!(ctx.get_int("ping"), Ok(5));
    }

    #[test]
    fn test_group_array_walk() {
        let mut ctx = context(None);
        assert_eq!(ctx.next_group_array(), Err(LookupError::NoArraySelected));

        assert_eq!(ctx.select_group_array("sim"), Ok(3));
        assert_eq!(ctx.get_int("slot"), Ok(0));

        assert_eq!(ctx.next_group_array(), Ok(1));
        assert!(matches!(ctx.get_int("slot"), Err(LookupError::KeyNotFound { .. })));

        assert_eq!(ctx.next_group_array(), Ok(2));
        assert_eq!(ctx.get_int("slot"), Ok(2));

        assert!(matches!(
            ctx.next_group_array(),
            Err(LookupError::ArrayExhausted { index: 2, .. })
        ));
        assert_eq!(ctx.get_int("slot"), Ok(2));

        // A plain selection ends the walk.
        ctx.select_group("common").unwrap();
        assert_eq!(ctx.next_group_array(), Err(LookupError::NoArraySelected));
    }

    #[test]
    fn test_group_array_not_found() {
        let mut ctx = context(None);
        assert!(matches!(
            ctx.select_group_array("common.sim"),
            Err(LookupError::GroupNotFound { ref segment, .. }) if segment == "sim"
        ));
    }

    #[test]
    fn test_unique_group_match() {
        let mut ctx = TcsContext::init_with(
            source(),
            Settings::new("/hw", "board"),
            None,
            ContextOptions {
                group_match: GroupMatch::Unique,
            },
        )
        .unwrap();
        assert!(matches!(
            ctx.select_group("sim"),
            Err(LookupError::AmbiguousGroup { count: 3, .. })
        ));
        assert_eq!(ctx.select_group_array("sim"), Ok(3));
    }

    #[test]
    fn test_failed_add_group_leaves_tree_untouched() {
        let mut ctx = context(None);
        let before = ctx.tree().clone();

        assert!(matches!(ctx.add_group("broken1", false), Err(BuildError::Parse { .. })));
        assert_eq!(ctx.tree(), &before);

        assert!(ctx.add_group("crm1", true).is_ok());
        assert_ne!(ctx.tree(), &before);
    }

    #[test]
    fn test_init_with_unknown_default_group_fails() {
        let err = TcsContext::init_with(
            source(),
            Settings::new("/hw", "board"),
            Some("hal1"),
            ContextOptions::default(),
        )
        .unwrap_err();
        assert_eq!(err, BuildError::ModuleNotInCatalog { group: "hal1".into() });
    }

    #[test]
    fn test_xml_round_trip() {
        let mut ctx = context(Some("crm1"));
        ctx.add_group("crm1", false).unwrap();
        let xml = ctx.to_xml().unwrap();

        let reparsed = crate::document::Document::parse(&xml, "dump.xml").unwrap();
        let tree = ConfigTree::from_document(&reparsed.root);
        assert_eq!(render(&tree, tree.root()), ctx.dump());
        assert_eq!(tree.to_xml_element(tree.root()), ctx.tree().to_xml_element(ctx.tree().root()));
    }
}
