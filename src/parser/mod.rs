//! Source parsing into the declaration tree.

pub mod python;

pub use python::{parse_module, parse_type};

use tree_sitter::Node;

/// Get text for a tree-sitter node
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Get the line number for a tree-sitter node (1-indexed)
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// First `ERROR` or `MISSING` node in document order, if the tree has any.
pub fn first_error(node: Node) -> Option<Node> {
    if !node.has_error() {
        return None;
    }
    if node.is_error() || node.is_missing() {
        return Some(node);
    }

    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .find_map(first_error)
        .or(Some(node))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_node_text_and_line() {
        let source = "x = 1\ndef f(): ...\n";
        let tree = parse(source);
        let root = tree.root_node();
        assert_eq!(node_text(&root, source), source);

        let func = root.named_child(1).unwrap();
        assert_eq!(func.kind(), "function_definition");
        assert_eq!(node_line(&func), 2);
    }

    #[test]
    fn test_first_error_on_clean_tree() {
        let tree = parse("def f(x: int) -> str: ...\n");
        assert!(first_error(tree.root_node()).is_none());
    }

    #[test]
    fn test_first_error_finds_broken_node() {
        let tree = parse("def f(:\n");
        let error = first_error(tree.root_node()).unwrap();
        assert!(error.is_error() || error.is_missing() || error.has_error());
    }
}
