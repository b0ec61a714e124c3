//! Human-readable rendering of a tree.

use crate::tree::{ConfigTree, NodeId, NodeKind};

const INDENT: usize = 4;

/// Render the subtree at `id`, one line per node.
///
/// The root itself has no line; its children start at column zero.
pub fn render_lines(tree: &ConfigTree, id: NodeId) -> Vec<String> {
    let mut lines = Vec::new();
    match tree.node(id).kind {
        NodeKind::Config => {
            for &child in tree.children(id) {
                render_node(tree, child, 0, &mut lines);
            }
        }
        _ => render_node(tree, id, 0, &mut lines),
    }
    lines
}

/// [`render_lines`] joined into one string, each line newline-terminated.
pub fn render(tree: &ConfigTree, id: NodeId) -> String {
    render_lines(tree, id)
        .into_iter()
        .map(|line| line + "\n")
        .collect()
}

fn render_node(tree: &ConfigTree, id: NodeId, level: usize, lines: &mut Vec<String>) {
    let pad = "";
    let node = tree.node(id);
    match &node.kind {
        NodeKind::Config => {
            for &child in &node.children {
                render_node(tree, child, level, lines);
            }
        }
        NodeKind::Group { name } => {
            lines.push(format!("{pad:level$}====== Group: {name} ======"));
            for &child in &node.children {
                render_node(tree, child, level + INDENT, lines);
            }
        }
        NodeKind::List { name } => {
            lines.push(format!("{pad:level$}====== List: {name} ======"));
            for &child in &node.children {
                render_node(tree, child, level + INDENT, lines);
            }
        }
        NodeKind::Scalar { kind, key, content } => {
            let tag = kind.tag();
            let key = key.as_deref().unwrap_or("");
            lines.push(format!("{pad:level$}<{tag:<6}> {{{key:<35}}} ({content})"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn test_render_tree() {
        let doc = Document::parse(
            r#"<config>
    <group name="hal">
        <int key="ping_timeout">30</int>
        <list name="bands"><string>B1</string><string>B3</string></list>
        <group name="radio"><bool key="enabled">true</bool></group>
    </group>
    <string key="name">board</string>
</config>"#,
            "t.xml",
        )
        .unwrap();
        let tree = ConfigTree::from_document(&doc.root);

        insta::assert_snapshot!(render(&tree, tree.root()), @r"
        ====== Group: hal ======
            <int   > {ping_timeout                       } (30)
            ====== List: bands ======
                <string> {                                   } (B1)
                <string> {                                   } (B3)
            ====== Group: radio ======
                <bool  > {enabled                            } (true)
        <string> {name                               } (board)
        ");
    }

    #[test]
    fn test_render_subtree_starts_at_column_zero() {
        let doc = Document::parse(r#"<config><group name="a"><group name="b"/></group></config>"#, "t.xml")
            .unwrap();
        let tree = ConfigTree::from_document(&doc.root);
        let a = tree.find_group(tree.root(), "a").unwrap();
        let b = tree.find_group(a, "b").unwrap();
        assert_eq!(render_lines(&tree, b), ["====== Group: b ======"]);
    }

    #[test]
    fn test_render_empty_tree() {
        let tree = ConfigTree::new();
        assert_eq!(render(&tree, tree.root()), "");
    }
}
