//! Overlay merge engine.
//!
//! Reconciles an overlay document subtree with a node of the tree:
//!
//! - **group**: merged recursively into the first group of the same name,
//!   or copied whole when there is none.
//! - **list**: copied whole when new. An existing list is cleared first
//!   in `overwrite` mode; in the default append mode the overlay items go
//!   after the existing ones and the overlay list must not be empty.
//! - **scalar**: replaces the content of the scalar with the same tag and
//!   key, or is appended when there is none. A key may be shared by
//!   scalars of different tags.
//!
//! Every error is fatal to the build.

use crate::document::{DocNode, DocScalar};
use crate::error::BuildError;
use crate::tree::{ConfigTree, NodeId};
use crate::types::OverlayMode;
use tcs_error_reporting::SourceLocation;

/// Merge every child of `overlay` (a `config` or `group` document node)
/// into the children of `destination`, in overlay order.
pub fn merge(tree: &mut ConfigTree, overlay: &DocNode, destination: NodeId) -> Result<(), BuildError> {
    for child in overlay.children() {
        merge_node(tree, child, destination)?;
    }
    Ok(())
}

fn merge_node(tree: &mut ConfigTree, node: &DocNode, parent: NodeId) -> Result<(), BuildError> {
    match node {
        DocNode::Group { name, .. } => match tree.find_group(parent, name) {
            Some(existing) => merge(tree, node, existing),
            None => {
                tracing::debug!(group = %name, "overlay adds group");
                tree.append_copy(parent, node);
                Ok(())
            }
        },
        DocNode::List {
            name,
            mode,
            items,
            location,
        } => match tree.find_list(parent, name) {
            Some(existing) => merge_list(tree, existing, name, *mode, items, location),
            None => {
                tracing::debug!(list = %name, "overlay adds list");
                tree.append_copy(parent, node);
                Ok(())
            }
        },
        DocNode::Scalar(scalar) => {
            merge_scalar(tree, scalar, parent);
            Ok(())
        }
        DocNode::Config { location, .. } => Err(BuildError::malformed(
            "<config> may only appear as the document root",
            location,
        )),
    }
}

fn merge_list(
    tree: &mut ConfigTree,
    existing: NodeId,
    name: &str,
    mode: OverlayMode,
    items: &[DocScalar],
    location: &SourceLocation,
) -> Result<(), BuildError> {
    match mode {
        OverlayMode::Overwrite => {
            tracing::debug!(list = %name, items = items.len(), "overwriting list");
            tree.clear_children(existing);
        }
        OverlayMode::Append => {
            let Some(first) = items.first() else {
                return Err(BuildError::EmptyAppendList {
                    list: name.to_string(),
                    location: Some(location.clone()),
                });
            };

            let existing_kind = tree
                .children(existing)
                .first()
                .and_then(|&item| tree.node(item).scalar())
                .map(|(kind, _)| kind);
            if let Some(existing_kind) = existing_kind {
                if existing_kind != first.kind {
                    return Err(BuildError::ListKindMismatch {
                        list: name.to_string(),
                        existing: existing_kind,
                        overlay: first.kind,
                        location: Some(first.location.clone()),
                    });
                }
            }
            tracing::debug!(list = %name, items = items.len(), "appending to list");
        }
    }

    for item in items {
        tree.append_scalar(existing, item);
    }
    Ok(())
}

fn merge_scalar(tree: &mut ConfigTree, scalar: &DocScalar, parent: NodeId) {
    let existing = scalar
        .key
        .as_deref()
        .and_then(|key| tree.find_scalar_of(parent, scalar.kind, key));

    match existing {
        Some(existing) => tree.set_scalar_content(existing, &scalar.content),
        None => {
            tree.append_scalar(parent, scalar);
        }
    }
}
