// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural checks, quality metrics and a read-only node walk.
//!
//! None of this is needed for normal operation. It exists for tests, debugging
//! and tuning.

use alloc::vec::Vec;

use crate::arena::NodeIdx;
use crate::proxy::{ProxyFlags, ProxyId};
use crate::tree::DynamicTree;
use crate::types::{Aabb2D, Scalar};

/// Read-only view of one node, as yielded by [`DynamicTree::walk`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeInfo<T> {
    /// Box of the node. For a branch this is the union of its children.
    pub aabb: Aabb2D<T>,
    /// Distance to the deepest leaf below; 0 for leaves.
    pub height: u32,
    /// Proxy flags for a leaf, union of the children's flags for a branch.
    pub flags: ProxyFlags,
    /// Handle of the proxy if this node is a leaf.
    pub proxy: Option<ProxyId>,
    /// Number of edges between this node and the root.
    pub depth: u32,
}

impl<T> NodeInfo<T> {
    /// True for proxies, false for internal branches.
    pub const fn is_leaf(&self) -> bool {
        self.proxy.is_some()
    }
}

/// Pre-order iterator over every node of the tree, root first.
///
/// Created by [`DynamicTree::walk`].
pub struct Walk<'a, T: Scalar, P> {
    tree: &'a DynamicTree<T, P>,
    stack: Vec<(NodeIdx, u32)>,
}

impl<T: Scalar, P> Iterator for Walk<'_, T, P> {
    type Item = NodeInfo<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, depth) = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.arena[idx];
        let proxy = match node.children {
            Some([child1, child2]) => {
                self.stack.push((child2, depth + 1));
                self.stack.push((child1, depth + 1));
                None
            }
            None => Some(tree.arena.proxy_id(idx)),
        };
        Some(NodeInfo {
            aabb: node.aabb,
            height: node.height,
            flags: node.flags,
            proxy,
            depth,
        })
    }
}

impl<T: Scalar, P> core::fmt::Debug for Walk<'_, T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Walk")
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, P> DynamicTree<T, P> {
    /// Visit every node, root first, children in `child1`, `child2` order.
    pub fn walk(&self) -> Walk<'_, T, P> {
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            stack.push((root, 0));
        }
        Walk { tree: self, stack }
    }

    /// Largest height difference between the two children of any branch.
    ///
    /// 0 for an empty tree or a single leaf. Never more than 1 for a tree built
    /// through the public API.
    pub fn compute_tree_balance(&self) -> u32 {
        let arena = &self.arena;
        let mut worst = 0;
        for idx in self.node_indices() {
            if let Some([child1, child2]) = arena[idx].children {
                worst = worst.max(arena[child1].height.abs_diff(arena[child2].height));
            }
        }
        worst
    }

    /// Sum of the perimeters of every node, leaves included, divided by the perimeter of the root.
    ///
    /// Lower means tighter boxes. A lone leaf scores 1. Returns 0 for an empty tree
    /// and for a degenerate root with zero perimeter.
    pub fn compute_tree_quality(&self) -> f64 {
        let Some(root) = self.root else {
            return 0.0;
        };
        let root_perimeter = T::acc_to_f64(self.arena[root].aabb.perimeter());
        if root_perimeter <= 0.0 {
            return 0.0;
        }
        let total: f64 = self
            .node_indices()
            .map(|idx| T::acc_to_f64(self.arena[idx].aabb.perimeter()))
            .sum();
        total / root_perimeter
    }

    /// Number of leaves reachable from the root.
    ///
    /// Unlike [`len`](Self::len), which is a stored counter, this walks the tree.
    pub fn compute_leaf_count(&self) -> usize {
        self.node_indices()
            .filter(|&idx| self.arena[idx].is_leaf())
            .count()
    }

    /// Check every structural invariant, panicking with a description of the first violation.
    ///
    /// Checked: parent and child links agree, leaves have height 0 and a payload,
    /// branches have no payload and carry the exact union box, union flags and
    /// `1 + max(child heights)`, child heights differ by at most one, and the
    /// reachable node and leaf counts match [`node_count`](Self::node_count) and
    /// [`len`](Self::len).
    ///
    /// Runs in linear time; meant for tests and debugging.
    #[track_caller]
    pub fn validate(&self) {
        let arena = &self.arena;
        let Some(root) = self.root else {
            assert_eq!(self.len(), 0, "empty tree must have no leaves");
            assert_eq!(self.node_count(), 0, "empty tree must have no nodes");
            return;
        };
        assert!(arena[root].parent.is_none(), "root must have no parent");

        let mut nodes = 0;
        let mut leaves = 0;
        for idx in self.node_indices() {
            nodes += 1;
            let node = &arena[idx];
            match node.children {
                None => {
                    leaves += 1;
                    assert_eq!(node.height, 0, "leaf {idx:?} must have height 0");
                    assert!(node.data.is_some(), "leaf {idx:?} must hold a payload");
                    assert!(node.aabb.is_valid(), "leaf {idx:?} has invalid bounds");
                }
                Some([child1, child2]) => {
                    assert!(node.data.is_none(), "branch {idx:?} must not hold a payload");
                    assert_ne!(child1, child2, "branch {idx:?} has the same child twice");
                    let (c1, c2) = (&arena[child1], &arena[child2]);
                    assert_eq!(c1.parent, Some(idx), "child1 of {idx:?} has a wrong parent");
                    assert_eq!(c2.parent, Some(idx), "child2 of {idx:?} has a wrong parent");
                    assert_eq!(
                        node.aabb,
                        c1.aabb.union(&c2.aabb),
                        "branch {idx:?} box is not the union of its children"
                    );
                    assert_eq!(
                        node.flags,
                        c1.flags | c2.flags,
                        "branch {idx:?} flags are not the union of its children"
                    );
                    assert_eq!(
                        node.height,
                        1 + c1.height.max(c2.height),
                        "branch {idx:?} has a stale height"
                    );
                    assert!(
                        c1.height.abs_diff(c2.height) <= 1,
                        "branch {idx:?} is unbalanced: {} vs {}",
                        c1.height,
                        c2.height
                    );
                }
            }
        }
        assert_eq!(nodes, self.node_count(), "unreachable or leaked nodes");
        assert_eq!(leaves, self.len(), "leaf counter out of sync");
    }

    /// Every node reachable from the root, in pre-order.
    fn node_indices(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        let mut stack: Vec<NodeIdx> = self.root.into_iter().collect();
        core::iter::from_fn(move || {
            let idx = stack.pop()?;
            if let Some([child1, child2]) = self.arena[idx].children {
                stack.push(child2);
                stack.push(child1);
            }
            Some(idx)
        })
    }
}
