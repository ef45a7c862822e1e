use super::model::DocumentNode;

/// Flatten a tree into its nodes in document order.
///
/// Depth-first pre-order: a node comes before its children, children keep
/// their order. The index of a node in the result is its `NodeId`.
pub fn collect_nodes(root: Option<&DocumentNode>) -> Vec<&DocumentNode> {
    let mut result = Vec::new();
    if let Some(root) = root {
        result.reserve(root.subtree_len());
        walk(root, &mut result);
    }
    result
}

fn walk<'a>(node: &'a DocumentNode, result: &mut Vec<&'a DocumentNode>) {
    result.push(node);
    for child in &node.children {
        walk(child, result);
    }
}
