//! Dependency tree nodes and traversal.

use termtree::Tree;

use crate::domain::coordinate::Coordinate;

/// A coordinate together with the dependencies printed beneath it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyNode {
    pub coordinate: Coordinate,
    /// Nesting level in the report, 1 for top-level dependencies
    pub level: usize,
    /// Children in the order they appear in the report
    pub children: Vec<DependencyNode>,
}

impl DependencyNode {
    pub fn new(coordinate: Coordinate, level: usize) -> Self {
        Self {
            coordinate,
            level,
            children: Vec::new(),
        }
    }

    pub fn add_child(&mut self, child: DependencyNode) {
        self.children.push(child);
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including self.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(DependencyNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Depth-first pre-order traversal: every node precedes its children,
    /// siblings are visited in report order.
    pub fn iter(&self) -> PreOrderIter<'_> {
        PreOrderIter { stack: vec![self] }
    }
}

pub struct PreOrderIter<'a> {
    stack: Vec<&'a DependencyNode>,
}

impl<'a> PreOrderIter<'a> {
    /// Pre-order traversal over a whole forest, roots in order.
    pub fn forest(roots: &'a [DependencyNode]) -> Self {
        Self {
            stack: roots.iter().rev().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a DependencyNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Conversion into a printable `termtree` structure.
pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for DependencyNode {
    fn to_tree_string(&self) -> Tree<String> {
        let leaves: Vec<_> = self.children.iter().map(|c| c.to_tree_string()).collect();
        Tree::new(self.coordinate.to_string()).with_leaves(leaves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(artifact: &str, level: usize) -> DependencyNode {
        let raw = format!("g:{}:jar:1.0:compile", artifact);
        DependencyNode::new(Coordinate::parse(&raw).unwrap(), level)
    }

    // root
    // ├── child1
    // │   └── grandchild1
    // └── child2
    fn sample() -> DependencyNode {
        let mut child1 = node("child1", 2);
        child1.add_child(node("grandchild1", 3));
        let mut root = node("root", 1);
        root.add_child(child1);
        root.add_child(node("child2", 2));
        root
    }

    fn names<'a>(it: impl Iterator<Item = &'a DependencyNode>) -> Vec<String> {
        it.map(|n| n.coordinate.artifact_id.clone()).collect()
    }

    #[test]
    fn given_tree_when_iter_then_visits_parent_before_children_in_order() {
        let root = sample();
        assert_eq!(
            names(root.iter()),
            vec!["root", "child1", "grandchild1", "child2"]
        );
    }

    #[test]
    fn given_forest_when_iter_then_roots_keep_order() {
        let forest = vec![sample(), node("other", 1)];
        assert_eq!(
            names(PreOrderIter::forest(&forest)),
            vec!["root", "child1", "grandchild1", "child2", "other"]
        );
    }

    #[test]
    fn given_tree_when_measured_then_reports_depth_and_size() {
        let root = sample();
        assert_eq!(root.depth(), 3);
        assert_eq!(root.node_count(), 4);
        assert!(!root.is_leaf());
        assert!(root.children[1].is_leaf());
    }

    #[test]
    fn given_tree_when_converted_then_renders_all_coordinates() {
        let rendered = sample().to_tree_string().to_string();
        assert!(rendered.starts_with("g:root:jar:1.0:compile"));
        assert!(rendered.contains("g:grandchild1:jar:1.0:compile"));
        assert_eq!(rendered.lines().count(), 4);
    }
}
