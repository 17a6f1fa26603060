// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Height balancing: AVL-style rotations applied bottom-up after every structural change.
//!
//! Rotations only fix heights. Box tightness comes from the insertion heuristic.

use crate::arena::NodeIdx;
use crate::trace::trace_log;
use crate::tree::DynamicTree;
use crate::types::Scalar;

impl<T: Scalar, P> DynamicTree<T, P> {
    /// Walk from `start` to the root, rebalancing and refreshing every branch on the way.
    pub(crate) fn update_ancestors(&mut self, start: NodeIdx) {
        let mut next = Some(start);
        while let Some(node) = next {
            let top = self.balance(node);
            next = self.arena[top].parent;
        }
    }

    /// Rebalance the subtree at `node`, assuming both child subtrees are balanced.
    ///
    /// Returns the node now occupying `node`'s old position; its box, flags and
    /// height are up to date.
    pub(crate) fn balance(&mut self, node: NodeIdx) -> NodeIdx {
        let Some([child1, child2]) = self.arena[node].children else {
            return node;
        };
        // Cached heights of `node` itself may be stale here; the children's are not.
        let h1 = self.arena[child1].height;
        let h2 = self.arena[child2].height;
        if h2 > h1 + 1 {
            self.rotate(node, child2, child1)
        } else if h1 > h2 + 1 {
            self.rotate(node, child1, child2)
        } else {
            self.refresh(node);
            node
        }
    }

    /// Lift `pivot` into `node`'s place and push `node` down one level.
    ///
    /// `pivot` keeps its taller child; the shorter one replaces `pivot` under `node`.
    /// When the imbalance was larger than two, `node` may still be lopsided after
    /// that, so it is rebalanced before `pivot` is refreshed.
    fn rotate(&mut self, node: NodeIdx, pivot: NodeIdx, other: NodeIdx) -> NodeIdx {
        let Some([grand1, grand2]) = self.arena[pivot].children else {
            // A pivot at least two levels taller than its sibling is always a branch.
            self.refresh(node);
            return node;
        };
        trace_log!(
            ?node,
            ?pivot,
            node_height = self.arena[node].height,
            pivot_height = self.arena[pivot].height,
            "rotate"
        );

        let parent = self.arena[node].parent;
        self.arena[pivot].parent = parent;
        match parent {
            None => self.root = Some(pivot),
            Some(p) => self.replace_child(p, node, pivot),
        }

        let (keep, lower) = if self.arena[grand1].height > self.arena[grand2].height {
            (grand1, grand2)
        } else {
            (grand2, grand1)
        };
        self.arena[pivot].children = Some([node, keep]);
        self.arena[node].parent = Some(pivot);
        // `node`'s slot that held `pivot` now holds the shorter grandchild; `other` stays.
        self.replace_child(node, pivot, lower);
        debug_assert!(
            self.arena[node].children.is_some_and(|c| c.contains(&other)),
            "the non-pivot child stays under the demoted node"
        );

        self.balance(node);
        self.refresh(pivot);
        pivot
    }

    /// Recompute box, flags and height of a branch from its children.
    pub(crate) fn refresh(&mut self, node: NodeIdx) {
        let Some([child1, child2]) = self.arena[node].children else {
            return;
        };
        let (c1, c2) = (&self.arena[child1], &self.arena[child2]);
        let aabb = c1.aabb.union(&c2.aabb);
        let flags = c1.flags | c2.flags;
        let height = 1 + c1.height.max(c2.height);
        let n = &mut self.arena[node];
        n.aabb = aabb;
        n.flags = flags;
        n.height = height;
    }

    /// Point `parent`'s link to `old` at `new` instead, and re-parent `new`.
    pub(crate) fn replace_child(&mut self, parent: NodeIdx, old: NodeIdx, new: NodeIdx) {
        if let Some(children) = self.arena[parent].children.as_mut() {
            if children[0] == old {
                children[0] = new;
            } else {
                debug_assert_eq!(children[1], old, "replaced node must be a child");
                children[1] = new;
            }
        }
        self.arena[new].parent = Some(parent);
    }
}
