// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first queries with flag-mask and predicate pruning.

use alloc::vec::Vec;

use crate::arena::NodeIdx;
use crate::proxy::{ProxyFlags, ProxyId};
use crate::tree::DynamicTree;
use crate::types::{Aabb2D, Scalar};

/// Lazy iterator over the proxies accepted by a query.
///
/// Created by [`DynamicTree::query`], [`DynamicTree::query_flags`],
/// [`DynamicTree::query_with_flags`], [`DynamicTree::query_rect`] and
/// [`DynamicTree::query_point`].
///
/// A subtree is skipped as soon as its node fails the mask or the predicate, so the
/// predicate sees branch boxes too. Each iterator owns its traversal stack; dropping it
/// early is fine. The visiting order is some depth-first order and is not part of the contract.
pub struct Query<'a, T: Scalar, P, F> {
    tree: &'a DynamicTree<T, P>,
    stack: Vec<NodeIdx>,
    mask: ProxyFlags,
    predicate: F,
}

impl<'a, T: Scalar, P, F> Query<'a, T, P, F>
where
    F: FnMut(&Aabb2D<T>) -> bool,
{
    fn new(tree: &'a DynamicTree<T, P>, mask: ProxyFlags, predicate: F) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = tree.root {
            stack.reserve(64);
            stack.push(root);
        }
        Self {
            tree,
            stack,
            mask,
            predicate,
        }
    }
}

impl<'a, T: Scalar, P, F> Iterator for Query<'a, T, P, F>
where
    F: FnMut(&Aabb2D<T>) -> bool,
{
    type Item = (ProxyId, &'a P);

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.tree;
        let arena = &tree.arena;
        while let Some(idx) = self.stack.pop() {
            let node = &arena[idx];
            if !node.flags.satisfies(self.mask) || !(self.predicate)(&node.aabb) {
                continue;
            }
            match node.children {
                Some([child1, child2]) => {
                    self.stack.push(child1);
                    self.stack.push(child2);
                }
                None => {
                    if let Some(data) = node.data.as_ref() {
                        return Some((arena.proxy_id(idx), data));
                    }
                }
            }
        }
        None
    }
}

impl<T: Scalar, P, F> core::fmt::Debug for Query<'_, T, P, F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Query")
            .field("mask", &self.mask)
            .field("pending", &self.stack.len())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, P> DynamicTree<T, P> {
    /// Proxies whose flags contain every bit of `mask`.
    ///
    /// An empty mask yields every proxy.
    pub fn query_flags(
        &self,
        mask: ProxyFlags,
    ) -> Query<'_, T, P, impl FnMut(&Aabb2D<T>) -> bool> {
        Query::new(self, mask, |_: &Aabb2D<T>| true)
    }

    /// Proxies for which `predicate` accepts their box and every enclosing branch box.
    ///
    /// The predicate must be conservative: if it rejects a branch box, nothing below
    /// is visited.
    ///
    /// ```
    /// use understory_dynamic_tree::{Aabb2D, DynamicTree};
    ///
    /// let mut tree: DynamicTree<f64, &str> = DynamicTree::new();
    /// tree.insert(Aabb2D::<f64>::from_xywh(0.0, 0.0, 2.0, 2.0), "a").unwrap();
    /// tree.insert(Aabb2D::<f64>::from_xywh(10.0, 10.0, 1.0, 1.0), "c").unwrap();
    ///
    /// let region = Aabb2D::<f64>::from_xywh(0.0, 0.0, 3.0, 3.0);
    /// let hits: Vec<_> = tree.query(|b| b.overlaps(&region)).map(|(_, d)| *d).collect();
    /// assert_eq!(hits, ["a"]);
    /// ```
    pub fn query<F>(&self, predicate: F) -> Query<'_, T, P, F>
    where
        F: FnMut(&Aabb2D<T>) -> bool,
    {
        Query::new(self, ProxyFlags::empty(), predicate)
    }

    /// Combination of [`query`](Self::query) and [`query_flags`](Self::query_flags).
    pub fn query_with_flags<F>(&self, predicate: F, mask: ProxyFlags) -> Query<'_, T, P, F>
    where
        F: FnMut(&Aabb2D<T>) -> bool,
    {
        Query::new(self, mask, predicate)
    }

    /// Proxies whose box overlaps `rect` (edges inclusive).
    pub fn query_rect(
        &self,
        rect: Aabb2D<T>,
    ) -> Query<'_, T, P, impl FnMut(&Aabb2D<T>) -> bool> {
        self.query(move |b: &Aabb2D<T>| b.overlaps(&rect))
    }

    /// Proxies whose box contains the point (edges inclusive).
    pub fn query_point(&self, x: T, y: T) -> Query<'_, T, P, impl FnMut(&Aabb2D<T>) -> bool> {
        self.query(move |b: &Aabb2D<T>| b.contains_point(x, y))
    }
}
