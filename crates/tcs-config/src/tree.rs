//! Arena-backed configuration tree.
//!
//! Nodes live in a single `Vec` and refer to their children by [`NodeId`].
//! Ids stay valid for the lifetime of the tree; overwriting a list detaches
//! its old items but never reuses their slots.

use crate::document::{DocNode, DocScalar};
use crate::types::ScalarKind;
use tcs_xml::XmlElement;

/// Index of a node in a [`ConfigTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The tree root. There is exactly one.
    Config,
    Group {
        name: String,
    },
    List {
        name: String,
    },
    Scalar {
        kind: ScalarKind,
        /// `None` for list items.
        key: Option<String>,
        /// Raw text, interpreted by the typed accessors.
        content: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
}

impl Node {
    pub fn group_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Group { name } => Some(name),
            _ => None,
        }
    }

    pub fn list_name(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::List { name } => Some(name),
            _ => None,
        }
    }

    /// Kind and content of a scalar node.
    pub fn scalar(&self) -> Option<(ScalarKind, &str)> {
        match &self.kind {
            NodeKind::Scalar { kind, content, .. } => Some((*kind, content)),
            _ => None,
        }
    }

    pub fn scalar_key(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar { key, .. } => key.as_deref(),
            _ => None,
        }
    }
}

/// The merged configuration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigTree {
    nodes: Vec<Node>,
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigTree {
    /// A tree holding only the `Config` root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Config,
                children: Vec::new(),
            }],
        }
    }

    /// Build a tree from a `config` document root. The children of any
    /// other root kind are copied under a fresh `Config` root.
    pub fn from_document(root: &DocNode) -> Self {
        let mut tree = Self::new();
        let root_id = tree.root();
        for child in root.children() {
            tree.append_copy(root_id, child);
        }
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes ever allocated, the root and detached ones included.
    pub fn allocated(&self) -> usize {
        self.nodes.len()
    }

    /// True when the root has no children.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Allocate a node and append it to `parent`'s children.
    pub fn push_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Detach every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        self.nodes[id.0].children.clear();
    }

    /// Replace the content of a scalar node. No-op on other kinds.
    pub fn set_scalar_content(&mut self, id: NodeId, new_content: &str) {
        if let NodeKind::Scalar { content, .. } = &mut self.nodes[id.0].kind {
            new_content.clone_into(content);
        }
    }

    /// Copy a document subtree under `parent`, returning the new node.
    pub fn append_copy(&mut self, parent: NodeId, node: &DocNode) -> NodeId {
        match node {
            DocNode::Config { children, .. } => {
                // A nested config only occurs at a document root; splice its children.
                for child in children {
                    self.append_copy(parent, child);
                }
                parent
            }
            DocNode::Group { name, children, .. } => {
                let id = self.push_child(parent, NodeKind::Group { name: name.clone() });
                for child in children {
                    self.append_copy(id, child);
                }
                id
            }
            DocNode::List { name, items, .. } => {
                let id = self.push_child(parent, NodeKind::List { name: name.clone() });
                for item in items {
                    self.append_scalar(id, item);
                }
                id
            }
            DocNode::Scalar(scalar) => self.append_scalar(parent, scalar),
        }
    }

    pub fn append_scalar(&mut self, parent: NodeId, scalar: &DocScalar) -> NodeId {
        self.push_child(
            parent,
            NodeKind::Scalar {
                kind: scalar.kind,
                key: scalar.key.clone(),
                content: scalar.content.clone(),
            },
        )
    }

    /// Direct child groups of `parent` named `name`, in document order.
    pub fn groups_named<'a>(
        &'a self,
        parent: NodeId,
        name: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.children(parent)
            .iter()
            .copied()
            .filter(move |&id| self.node(id).group_name() == Some(name))
    }

    pub fn find_group(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.groups_named(parent, name).next()
    }

    pub fn find_list(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&id| self.node(id).list_name() == Some(name))
    }

    /// The `kind` scalar keyed `key` among `parent`'s direct children.
    /// Scalars of different kinds may share a key.
    pub fn find_scalar_of(&self, parent: NodeId, kind: ScalarKind, key: &str) -> Option<NodeId> {
        self.children(parent).iter().copied().find(|&id| {
            let node = self.node(id);
            node.scalar_key() == Some(key) && node.scalar().map(|(k, _)| k) == Some(kind)
        })
    }

    /// Serialize the subtree at `id` using the document grammar.
    pub fn to_xml_element(&self, id: NodeId) -> XmlElement {
        let node = self.node(id);
        let mut element = match &node.kind {
            NodeKind::Config => XmlElement::new("config"),
            NodeKind::Group { name } => XmlElement::new("group").with_attribute("name", name),
            NodeKind::List { name } => XmlElement::new("list").with_attribute("name", name),
            NodeKind::Scalar { kind, key, content } => {
                let element = XmlElement::new(kind.tag());
                let element = match key {
                    Some(key) => element.with_attribute("key", key),
                    None => element,
                };
                return element.with_text(content.as_str());
            }
        };
        for &child in &node.children {
            element.push_element(self.to_xml_element(child));
        }
        element
    }
}
