// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enumeration of overlapping leaf pairs (broad phase).
//!
//! The main walk is depth-first and always visits `child1` before `child2`. When it
//! reaches a leaf, it climbs the ancestor chain; at every ancestor entered through its
//! `child1` slot, the `child2` subtree has not been walked yet and is searched for
//! leaves overlapping the current one. Subtrees whose box misses the leaf are skipped
//! whole. A pair is therefore found exactly once: from whichever of its two leaves the
//! main walk reaches first.

use alloc::vec::Vec;

use crate::arena::NodeIdx;
use crate::proxy::ProxyFlags;
use crate::tree::DynamicTree;
use crate::types::Scalar;

/// Lazy iterator over every unordered pair of overlapping proxies.
///
/// Created by [`DynamicTree::enumerate_overlapping_leaves`] and
/// [`DynamicTree::enumerate_overlapping_leaves_masked`].
pub struct OverlappingPairs<'a, T: Scalar, P> {
    tree: &'a DynamicTree<T, P>,
    masks: Option<(ProxyFlags, ProxyFlags)>,
    /// Main depth-first walk.
    stack: Vec<NodeIdx>,
    /// Scratch stack for searching not-yet-walked subtrees.
    search: Vec<NodeIdx>,
    /// Leaf the pending partners belong to.
    current: Option<NodeIdx>,
    partners: Vec<NodeIdx>,
}

impl<'a, T: Scalar, P> OverlappingPairs<'a, T, P> {
    fn new(tree: &'a DynamicTree<T, P>, masks: Option<(ProxyFlags, ProxyFlags)>) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root {
            stack.push(root);
        }
        Self {
            tree,
            masks,
            stack,
            search: Vec::new(),
            current: None,
            partners: Vec::new(),
        }
    }

    /// Whether a node with `candidate` flags can hold a partner for a leaf with `leaf` flags.
    ///
    /// Branch flags are the union of their leaves' flags, so this is exact for leaves and
    /// conservative for branches.
    fn admits(&self, leaf: ProxyFlags, candidate: ProxyFlags) -> bool {
        match self.masks {
            None => true,
            Some((first, second)) => {
                (leaf.satisfies(first) && candidate.satisfies(second))
                    || (leaf.satisfies(second) && candidate.satisfies(first))
            }
        }
    }

    /// Collect the partners of `leaf` from every subtree the main walk has not reached yet.
    fn backtrack(&mut self, leaf: NodeIdx) {
        let tree = self.tree;
        let arena = &tree.arena;
        let reference = arena[leaf].aabb;
        let leaf_flags = arena[leaf].flags;
        self.partners.clear();

        let mut current = leaf;
        let mut parent = arena[leaf].parent;
        while let Some(p) = parent {
            if let Some([child1, child2]) = arena[p].children
                && child1 == current
            {
                self.search.clear();
                self.search.push(child2);
                while let Some(idx) = self.search.pop() {
                    let node = &arena[idx];
                    if !self.admits(leaf_flags, node.flags) || !node.aabb.overlaps(&reference) {
                        continue;
                    }
                    match node.children {
                        Some([a, b]) => {
                            self.search.push(b);
                            self.search.push(a);
                        }
                        None => self.partners.push(idx),
                    }
                }
            }
            current = p;
            parent = arena[p].parent;
        }
    }

    /// Orient a pair: `(first-role, second-role)` when masked, `(leaf, partner)` otherwise.
    fn pair(&self, leaf: NodeIdx, partner: NodeIdx) -> Option<(&'a P, &'a P)> {
        let tree = self.tree;
        let arena = &tree.arena;
        let (a, b) = match self.masks {
            Some((first, second))
                if !(arena[leaf].flags.satisfies(first)
                    && arena[partner].flags.satisfies(second)) =>
            {
                (partner, leaf)
            }
            _ => (leaf, partner),
        };
        Some((arena[a].data.as_ref()?, arena[b].data.as_ref()?))
    }
}

impl<'a, T: Scalar, P> Iterator for OverlappingPairs<'a, T, P> {
    type Item = (&'a P, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        loop {
            if let Some(leaf) = self.current {
                while let Some(partner) = self.partners.pop() {
                    if let Some(pair) = self.pair(leaf, partner) {
                        return Some(pair);
                    }
                }
                self.current = None;
            }

            let idx = self.stack.pop()?;
            let node = &tree.arena[idx];
            if let Some((first, second)) = self.masks
                && !node.flags.satisfies(first)
                && !node.flags.satisfies(second)
            {
                continue;
            }
            match node.children {
                Some([child1, child2]) => {
                    self.stack.push(child2);
                    self.stack.push(child1);
                }
                None => {
                    self.backtrack(idx);
                    self.current = Some(idx);
                }
            }
        }
    }
}

impl<T: Scalar, P> core::fmt::Debug for OverlappingPairs<'_, T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OverlappingPairs")
            .field("masks", &self.masks)
            .field("pending_nodes", &self.stack.len())
            .field("pending_partners", &self.partners.len())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, P> DynamicTree<T, P> {
    /// Every unordered pair of proxies whose boxes overlap, each pair exactly once.
    ///
    /// The order of pairs, and of the two payloads within a pair, is unspecified.
    ///
    /// ```
    /// use understory_dynamic_tree::{Aabb2D, DynamicTree};
    ///
    /// let mut tree: DynamicTree<f64, char> = DynamicTree::new();
    /// tree.insert(Aabb2D::<f64>::from_xywh(0.0, 0.0, 2.0, 2.0), 'a').unwrap();
    /// tree.insert(Aabb2D::<f64>::from_xywh(1.0, 1.0, 2.0, 2.0), 'b').unwrap();
    /// tree.insert(Aabb2D::<f64>::from_xywh(10.0, 10.0, 1.0, 1.0), 'c').unwrap();
    ///
    /// let pairs: Vec<_> = tree.enumerate_overlapping_leaves().collect();
    /// assert_eq!(pairs.len(), 1);
    /// let (x, y) = pairs[0];
    /// assert!(matches!((x, y), ('a', 'b') | ('b', 'a')));
    /// ```
    pub fn enumerate_overlapping_leaves(&self) -> OverlappingPairs<'_, T, P> {
        OverlappingPairs::new(self, None)
    }

    /// Overlapping pairs between two categories of proxies.
    ///
    /// A pair `{x, y}` is reported iff one of them has every bit of `first` and the
    /// other every bit of `second`. It is reported once, as `(first-role, second-role)`.
    /// A proxy carrying both masks pairs with partners of either category; when both
    /// orientations fit, either may be reported.
    pub fn enumerate_overlapping_leaves_masked(
        &self,
        first: ProxyFlags,
        second: ProxyFlags,
    ) -> OverlappingPairs<'_, T, P> {
        OverlappingPairs::new(self, Some((first, second)))
    }
}
