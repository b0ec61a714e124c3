//! Path resolution and the lookup cursor.
//!
//! Paths are dot-separated group names: `hal.radio` starts at the tree
//! root, `.radio` at the default group.

use crate::error::LookupError;
use crate::tree::{ConfigTree, NodeId};
use crate::types::GroupMatch;

/// A parsed group path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupPath<'a> {
    pub relative: bool,
    pub segments: Vec<&'a str>,
}

impl<'a> GroupPath<'a> {
    /// Parse `path := ['.'] segment ('.' segment)*`.
    pub fn parse(path: &'a str) -> Result<Self, LookupError> {
        let (relative, rest) = match path.strip_prefix('.') {
            Some(rest) => (true, rest),
            None => (false, path),
        };

        let segments: Vec<&str> = rest.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(LookupError::InvalidPath {
                path: path.to_string(),
            });
        }

        Ok(Self { relative, segments })
    }
}

/// Where lookups currently happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    /// Group whose children are the lookup scope.
    pub group: NodeId,
    /// Path that selected the group, for messages.
    pub path: String,
    pub array: Option<ArrayCursor>,
}

/// Position within a set of same-named sibling groups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayCursor {
    pub members: Vec<NodeId>,
    pub index: usize,
}

impl Cursor {
    pub fn group(group: NodeId, path: impl Into<String>) -> Self {
        Self {
            group,
            path: path.into(),
            array: None,
        }
    }

    /// Advance to the next array member. At the end the cursor stays on
    /// the last member.
    pub fn advance(&mut self) -> Result<usize, LookupError> {
        let Some(array) = self.array.as_mut() else {
            return Err(LookupError::NoArraySelected);
        };

        let next = array.index + 1;
        let Some(&member) = array.members.get(next) else {
            return Err(LookupError::ArrayExhausted {
                path: self.path.clone(),
                index: array.index,
            });
        };

        array.index = next;
        self.group = member;
        Ok(next)
    }
}

/// Walk `segments` down from `start`, matching child groups by name.
pub fn resolve(
    tree: &ConfigTree,
    start: NodeId,
    segments: &[&str],
    path: &str,
    group_match: GroupMatch,
) -> Result<NodeId, LookupError> {
    let mut current = start;
    for segment in segments {
        current = match_segment(tree, current, segment, path, group_match)?;
    }
    Ok(current)
}

fn match_segment(
    tree: &ConfigTree,
    parent: NodeId,
    segment: &str,
    path: &str,
    group_match: GroupMatch,
) -> Result<NodeId, LookupError> {
    let mut matches = tree.groups_named(parent, segment);
    let Some(first) = matches.next() else {
        return Err(LookupError::GroupNotFound {
            path: path.to_string(),
            segment: segment.to_string(),
        });
    };

    if group_match == GroupMatch::Unique {
        let others = matches.count();
        if others > 0 {
            return Err(LookupError::AmbiguousGroup {
                path: path.to_string(),
                segment: segment.to_string(),
                count: others + 1,
            });
        }
    }

    Ok(first)
}
