//! Building the tree: the base document, its overlays, and on-demand modules.

use crate::document::Document;
use crate::error::BuildError;
use crate::merge::merge;
use crate::source::DocumentSource;
use crate::tree::{ConfigTree, NodeId};
use crate::types::{CONFIG_DIR, ScalarKind, Settings};
use std::path::Path;

/// Name of the root-level group mapping module names to document files.
pub const MODULES_GROUP: &str = "modules";

/// Build the tree from the base document and the overlays in
/// `<overlay_root>/config`.
///
/// Overlays whose root is not `<config>` are logged and skipped; overlays
/// that fail to parse abort the build.
pub fn build_tree(source: &dyn DocumentSource, settings: &Settings) -> Result<ConfigTree, BuildError> {
    let base = read_document(source, &settings.base_document_path())?;
    base.expect_root("config")?;
    let mut tree = ConfigTree::from_document(&base.root);

    if let Some(dir) = settings.overlay_dir(CONFIG_DIR) {
        let root = tree.root();
        for overlay in overlay_documents(source, &dir)? {
            if overlay.expect_root("config").is_err() {
                tracing::error!(
                    file = %overlay.path,
                    root = overlay.root.tag(),
                    "configuration overlay root is not <config>, skipping"
                );
                continue;
            }
            tracing::debug!(file = %overlay.path, "merging configuration overlay");
            merge(&mut tree, &overlay.root, root)?;
        }
    }

    Ok(tree)
}

/// Load the module `group_name` under the tree root and apply its overlays.
///
/// The module document is named by the `<string key="group_name">` entry of
/// the root-level `modules` group and lives in `<hw_root>/<family>/`, where
/// the family is `group_name` without trailing digits. Overlays are the
/// documents of `<overlay_root>/<family>/` whose root is a group named
/// `group_name`.
///
/// Returns the appended group. Loading the same module twice appends it twice.
pub fn load_group(
    tree: &mut ConfigTree,
    source: &dyn DocumentSource,
    settings: &Settings,
    group_name: &str,
) -> Result<NodeId, BuildError> {
    let file = module_file(tree, group_name)?;
    let family = module_family(group_name);
    let root = tree.root();

    if tree.find_group(root, group_name).is_some() {
        tracing::warn!(group = group_name, "module already loaded, appending a second copy");
    }

    let module = read_document(source, &settings.module_document_path(family, &file))?;
    module.expect_root("group")?;
    if module.root.group_name() != Some(group_name) {
        tracing::debug!(
            group = group_name,
            document_group = ?module.root.group_name(),
            "module document names a different group"
        );
    }
    let group = tree.append_copy(root, &module.root);

    if let Some(dir) = settings.overlay_dir(family) {
        for overlay in overlay_documents(source, &dir)? {
            if overlay.root.group_name() != Some(group_name) {
                continue;
            }
            tracing::debug!(file = %overlay.path, group = group_name, "merging module overlay");
            merge(tree, &overlay.root, group)?;
        }
    }

    Ok(group)
}

/// Module family: `group_name` with trailing decimal digits removed.
///
/// ```
/// use tcs_config::module_family;
///
/// assert_eq!(module_family("crm1"), "crm");
/// assert_eq!(module_family("streamline12"), "streamline");
/// assert_eq!(module_family("hal"), "hal");
/// ```
pub fn module_family(group_name: &str) -> &str {
    group_name.trim_end_matches(|c: char| c.is_ascii_digit())
}

fn module_file(tree: &ConfigTree, group_name: &str) -> Result<String, BuildError> {
    let modules = tree
        .find_group(tree.root(), MODULES_GROUP)
        .ok_or_else(|| BuildError::ModuleCatalogMissing {
            group: group_name.to_string(),
        })?;

    tree.find_scalar_of(modules, ScalarKind::String, group_name)
        .and_then(|id| tree.node(id).scalar())
        .map(|(_, file)| file.to_string())
        .ok_or_else(|| BuildError::ModuleNotInCatalog {
            group: group_name.to_string(),
        })
}

fn read_document(source: &dyn DocumentSource, path: &Path) -> Result<Document, BuildError> {
    tracing::debug!(path = %path.display(), "loading document");
    let text = source
        .read(path)
        .map_err(|err| BuildError::unreadable(path, &err))?;
    Document::parse(&text, &path.display().to_string())
}

/// Every visible document in `dir`, parsed, in file name order.
fn overlay_documents(source: &dyn DocumentSource, dir: &Path) -> Result<Vec<Document>, BuildError> {
    let names = source
        .list(dir)
        .map_err(|err| BuildError::unreadable(dir, &err))?;

    names
        .iter()
        .filter(|name| !name.starts_with('.'))
        .map(|name| read_document(source, &dir.join(name)))
        .collect()
}
