//! In-memory arena over one property's location tree.
//!
//! The `property_nodes` table is a self-referencing adjacency list. All
//! structural decisions (cycle prevention on move, descendant collection on
//! delete, sibling ordering) are made here against a snapshot of the
//! property's rows loaded inside the enclosing transaction, and only then
//! written back as plain UPDATE/DELETE statements. Nodes are indexed by id and
//! edges are id references, never object pointers.
//!
//! Sibling order is `(sort_order, id)` ascending everywhere.

use crate::types::NodeId;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Structural violations detected when validating a reparent request.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The referenced node is not part of this property's forest
    #[error("node {0} is not part of this property")]
    UnknownNode(NodeId),

    /// The new parent is the node itself or one of its descendants
    #[error("moving node {0} under the requested parent would create a cycle")]
    Cycle(NodeId),
}

/// Minimal structural view of one node: enough to answer ancestry and
/// ordering questions without dragging the full row around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeEdge {
    pub id: NodeId,
    pub parent_id: Option<NodeId>,
    pub sort_order: i32,
}

/// Arena of one property's nodes, indexed by id.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: HashMap<NodeId, NodeEdge>,
}

impl NodeArena {
    pub fn from_edges(edges: impl IntoIterator<Item = NodeEdge>) -> Self {
        Self {
            nodes: edges.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `node` appears on the ancestor chain of `candidate`.
    ///
    /// Walks `parent_id` links upward from `candidate`. The visited set makes
    /// the walk terminate even on corrupted data that already contains a
    /// cycle.
    pub fn is_ancestor(&self, node: NodeId, candidate: NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut cursor = self.nodes.get(&candidate).and_then(|e| e.parent_id);
        while let Some(current) = cursor {
            if current == node {
                return true;
            }
            if !visited.insert(current) {
                return false;
            }
            cursor = self.nodes.get(&current).and_then(|e| e.parent_id);
        }
        false
    }

    /// Validate a reparent of `node` under `new_parent` (None = make it a root).
    ///
    /// Rejects unknown ids, self-parenting, and any parent that lies inside
    /// the subtree rooted at `node`.
    pub fn validate_move(&self, node: NodeId, new_parent: Option<NodeId>) -> Result<(), TreeError> {
        if !self.contains(node) {
            return Err(TreeError::UnknownNode(node));
        }
        let Some(parent) = new_parent else {
            return Ok(());
        };
        if !self.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        if parent == node || self.is_ancestor(node, parent) {
            return Err(TreeError::Cycle(node));
        }
        Ok(())
    }

    /// Collect `root` and every descendant, the exact row set a cascading
    /// delete must remove.
    pub fn subtree(&self, root: NodeId) -> Vec<NodeId> {
        let mut children_of: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for edge in self.nodes.values() {
            if let Some(parent) = edge.parent_id {
                children_of.entry(parent).or_default().push(edge.id);
            }
        }

        let mut collected = Vec::new();
        let mut queue = vec![root];
        let mut seen = HashSet::new();
        while let Some(id) = queue.pop() {
            if !seen.insert(id) {
                continue;
            }
            collected.push(id);
            if let Some(children) = children_of.get(&id) {
                queue.extend(children.iter().copied());
            }
        }
        collected
    }

    /// Next sort order among the siblings under `parent` (None = roots).
    pub fn next_sort_order(&self, parent: Option<NodeId>) -> i32 {
        self.nodes
            .values()
            .filter(|e| e.parent_id == parent)
            .map(|e| e.sort_order)
            .max()
            .map(|max| max.saturating_add(1))
            .unwrap_or(0)
    }
}

/// Assemble flat rows into a forest of `(row, children)` trees.
///
/// `rows` may arrive in any order; output roots and every child list are
/// sorted `(sort_order, id)` ascending. Rows whose parent is missing from the
/// input are treated as roots rather than dropped.
pub fn build_forest<T, F>(rows: Vec<T>, edge_of: F) -> Vec<Tree<T>>
where
    F: Fn(&T) -> NodeEdge,
{
    let ids: HashSet<NodeId> = rows.iter().map(|r| edge_of(r).id).collect();

    let mut roots: Vec<(NodeEdge, Tree<T>)> = Vec::new();
    let mut children_of: HashMap<NodeId, Vec<(NodeEdge, Tree<T>)>> = HashMap::new();

    for row in rows {
        let edge = edge_of(&row);
        let tree = Tree {
            value: row,
            children: Vec::new(),
        };
        match edge.parent_id.filter(|p| ids.contains(p)) {
            Some(parent) => children_of.entry(parent).or_default().push((edge, tree)),
            None => roots.push((edge, tree)),
        }
    }

    fn attach<T>(entries: &mut Vec<(NodeEdge, Tree<T>)>, children_of: &mut HashMap<NodeId, Vec<(NodeEdge, Tree<T>)>>) -> Vec<Tree<T>> {
        entries.sort_by_key(|(edge, _)| (edge.sort_order, edge.id));
        entries
            .drain(..)
            .map(|(edge, mut tree)| {
                if let Some(mut grandchildren) = children_of.remove(&edge.id) {
                    tree.children = attach(&mut grandchildren, children_of);
                }
                tree
            })
            .collect()
    }

    attach(&mut roots, &mut children_of)
}

/// One assembled node with its ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree<T> {
    pub value: T,
    pub children: Vec<Tree<T>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn edge(id: NodeId, parent_id: Option<NodeId>, sort_order: i32) -> NodeEdge {
        NodeEdge { id, parent_id, sort_order }
    }

    fn ids(n: usize) -> Vec<NodeId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    /// building -> floor -> [flat_a, flat_b], plus a second root
    fn sample() -> (Vec<NodeId>, NodeArena) {
        let v = ids(5);
        let arena = NodeArena::from_edges([
            edge(v[0], None, 0),
            edge(v[1], Some(v[0]), 0),
            edge(v[2], Some(v[1]), 0),
            edge(v[3], Some(v[1]), 1),
            edge(v[4], None, 1),
        ]);
        (v, arena)
    }

    #[test]
    fn ancestry_follows_parent_links() {
        let (v, arena) = sample();
        assert!(arena.is_ancestor(v[0], v[2]));
        assert!(arena.is_ancestor(v[1], v[3]));
        assert!(!arena.is_ancestor(v[2], v[0]));
        assert!(!arena.is_ancestor(v[4], v[2]));
    }

    #[test]
    fn move_to_self_is_a_cycle() {
        let (v, arena) = sample();
        assert_eq!(arena.validate_move(v[1], Some(v[1])), Err(TreeError::Cycle(v[1])));
    }

    #[test]
    fn move_under_descendant_is_a_cycle() {
        let (v, arena) = sample();
        assert_eq!(arena.validate_move(v[0], Some(v[2])), Err(TreeError::Cycle(v[0])));
        assert_eq!(arena.validate_move(v[1], Some(v[3])), Err(TreeError::Cycle(v[1])));
    }

    #[test]
    fn valid_moves_are_accepted() {
        let (v, arena) = sample();
        // reparent a leaf under the other root
        assert_eq!(arena.validate_move(v[2], Some(v[4])), Ok(()));
        // promote a subtree to root
        assert_eq!(arena.validate_move(v[1], None), Ok(()));
        // sibling shuffle under the same parent
        assert_eq!(arena.validate_move(v[3], Some(v[1])), Ok(()));
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let (v, arena) = sample();
        let stranger = Uuid::new_v4();
        assert_eq!(arena.validate_move(stranger, None), Err(TreeError::UnknownNode(stranger)));
        assert_eq!(arena.validate_move(v[0], Some(stranger)), Err(TreeError::UnknownNode(stranger)));
    }

    #[test]
    fn subtree_collects_all_descendants() {
        let (v, arena) = sample();
        let mut collected = arena.subtree(v[0]);
        collected.sort();
        let mut expected = vec![v[0], v[1], v[2], v[3]];
        expected.sort();
        assert_eq!(collected, expected);

        assert_eq!(arena.subtree(v[4]), vec![v[4]]);
        assert_eq!(arena.subtree(v[3]), vec![v[3]]);
    }

    #[test]
    fn next_sort_order_appends_after_siblings() {
        let (v, arena) = sample();
        assert_eq!(arena.next_sort_order(None), 2);
        assert_eq!(arena.next_sort_order(Some(v[1])), 2);
        assert_eq!(arena.next_sort_order(Some(v[2])), 0);
    }

    #[test]
    fn forest_orders_siblings_by_sort_order_then_id() {
        let v = ids(4);
        let mut tied = [v[1], v[2]];
        tied.sort();

        // two children tied on sort_order: id breaks the tie
        let rows = vec![
            edge(v[0], None, 0),
            edge(tied[1], Some(v[0]), 5),
            edge(tied[0], Some(v[0]), 5),
            edge(v[3], Some(v[0]), 1),
        ];
        let forest = build_forest(rows, |e| *e);
        assert_eq!(forest.len(), 1);
        let children: Vec<NodeId> = forest[0].children.iter().map(|c| c.value.id).collect();
        assert_eq!(children, vec![v[3], tied[0], tied[1]]);
    }

    #[test]
    fn forest_nests_recursively() {
        let (v, _) = sample();
        let rows = vec![
            edge(v[0], None, 0),
            edge(v[1], Some(v[0]), 0),
            edge(v[2], Some(v[1]), 0),
            edge(v[3], Some(v[1]), 1),
            edge(v[4], None, 1),
        ];
        let forest = build_forest(rows, |e| *e);
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].value.id, v[0]);
        assert_eq!(forest[1].value.id, v[4]);
        assert_eq!(forest[0].children[0].value.id, v[1]);
        let grandchildren: Vec<NodeId> = forest[0].children[0].children.iter().map(|c| c.value.id).collect();
        assert_eq!(grandchildren, vec![v[2], v[3]]);
    }

    #[test]
    fn orphaned_rows_surface_as_roots() {
        let v = ids(2);
        let missing_parent = Uuid::new_v4();
        let rows = vec![edge(v[0], None, 0), edge(v[1], Some(missing_parent), 0)];
        let forest = build_forest(rows, |e| *e);
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn repeated_moves_never_introduce_cycles() {
        // apply a chain of validated moves and re-check ancestry termination
        let v = ids(6);
        let mut edges: HashMap<NodeId, NodeEdge> = [
            edge(v[0], None, 0),
            edge(v[1], Some(v[0]), 0),
            edge(v[2], Some(v[1]), 0),
            edge(v[3], Some(v[2]), 0),
            edge(v[4], Some(v[0]), 1),
            edge(v[5], None, 1),
        ]
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

        let attempts = [
            (v[3], Some(v[5])),
            (v[1], Some(v[3])),
            (v[0], Some(v[2])), // cycle at this point? depends on prior moves
            (v[5], Some(v[4])),
            (v[2], None),
            (v[4], Some(v[2])),
        ];

        for (node, parent) in attempts {
            let arena = NodeArena::from_edges(edges.values().copied().collect::<Vec<_>>());
            if arena.validate_move(node, parent).is_ok() {
                edges.get_mut(&node).unwrap().parent_id = parent;
            }
        }

        // every node's ancestor chain must terminate without revisiting
        let arena = NodeArena::from_edges(edges.values().copied().collect::<Vec<_>>());
        for id in &v {
            assert!(!arena.is_ancestor(*id, *id), "node {id} became its own ancestor");
        }
    }
}
