//! Post-order traversal of a statement

use eql_ast::{NodeId, ParseTree};

/// Nodes of the subtree under `root`, children before parents
///
/// Siblings keep declaration order and `root` comes last. Uses an explicit
/// stack rather than recursion.
pub fn post_order(tree: &ParseTree, root: NodeId) -> Vec<NodeId> {
    let mut order = Vec::new();
    let mut stack = vec![(root, false)];
    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            order.push(id);
            continue;
        }
        stack.push((id, true));
        stack.extend(tree.children(id).into_iter().rev().map(|child| (child, false)));
    }
    order
}
