// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core tree implementation: structure, insertion, removal and handle lookups.

use crate::arena::{Arena, NodeIdx};
use crate::error::TreeError;
use crate::proxy::{ProxyFlags, ProxyId};
use crate::trace::{debug_log, trace_log};
use crate::types::{Aabb2D, Scalar};

/// A dynamic bounding-volume tree over 2D AABBs.
///
/// Every proxy is a leaf holding a caller payload `P`. Internal branches bound their
/// two children and are created and destroyed by the tree as leaves come and go.
/// The tree stays height-balanced: after every mutating call, the heights of the two
/// children of any branch differ by at most one.
///
/// See the [crate docs](crate) for an overview.
pub struct DynamicTree<T: Scalar, P> {
    pub(crate) arena: Arena<T, P>,
    pub(crate) root: Option<NodeIdx>,
    leaves: usize,
}

impl<T: Scalar, P> Default for DynamicTree<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, P> core::fmt::Debug for DynamicTree<T, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DynamicTree")
            .field("leaves", &self.leaves)
            .field("nodes", &self.arena.live())
            .field("slots", &self.arena.total_slots())
            .field("free_slots", &self.arena.free_slots())
            .field("height", &self.tree_height())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar, P> DynamicTree<T, P> {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            arena: Arena::default(),
            root: None,
            leaves: 0,
        }
    }

    /// Create an empty tree with room for `leaves` proxies (and their branches).
    pub fn with_capacity(leaves: usize) -> Self {
        let mut tree = Self::new();
        tree.reserve(leaves);
        tree
    }

    /// Reserve room for at least `additional` more proxies.
    pub fn reserve(&mut self, additional: usize) {
        // n leaves need n - 1 branches.
        self.arena
            .reserve(additional.saturating_mul(2).saturating_sub(1));
    }

    /// Insert a proxy with empty flags. Returns its stable handle.
    ///
    /// Fails with [`TreeError::InvalidBounds`] if `aabb` is not [valid](Aabb2D::is_valid).
    pub fn insert(&mut self, aabb: Aabb2D<T>, data: P) -> Result<ProxyId, TreeError> {
        self.insert_with_flags(aabb, data, ProxyFlags::empty())
    }

    /// Insert a proxy carrying `flags`. Returns its stable handle.
    ///
    /// Fails with [`TreeError::InvalidBounds`] if `aabb` is not [valid](Aabb2D::is_valid).
    pub fn insert_with_flags(
        &mut self,
        aabb: Aabb2D<T>,
        data: P,
        flags: ProxyFlags,
    ) -> Result<ProxyId, TreeError> {
        check_bounds(&aabb)?;
        let leaf = self.arena.allocate(aabb);
        let node = &mut self.arena[leaf];
        node.data = Some(data);
        node.flags = flags;
        self.insert_leaf(leaf);
        self.leaves += 1;
        let id = self.arena.proxy_id(leaf);
        trace_log!(?id, ?flags, "inserted proxy");
        Ok(id)
    }

    /// Relocate a proxy. The handle stays the same and no slot is allocated.
    pub fn move_proxy(&mut self, id: ProxyId, aabb: Aabb2D<T>) -> Result<(), TreeError> {
        let leaf = self.resolve(id)?;
        check_bounds(&aabb)?;
        self.remove_leaf(leaf);
        self.arena[leaf].aabb = aabb;
        self.insert_leaf(leaf);
        Ok(())
    }

    /// Remove a proxy and hand its payload back. The handle is stale afterwards.
    pub fn remove(&mut self, id: ProxyId) -> Result<P, TreeError> {
        let leaf = self.resolve(id)?;
        self.remove_leaf(leaf);
        self.leaves -= 1;
        trace_log!(?id, "removed proxy");
        self.arena.free(leaf).ok_or(TreeError::InvalidHandle(id))
    }

    /// Remove every proxy. Handles issued before stay stale forever.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
        self.leaves = 0;
    }

    /// Current bounds of a proxy.
    pub fn get_aabb(&self, id: ProxyId) -> Result<Aabb2D<T>, TreeError> {
        self.resolve(id).map(|leaf| self.arena[leaf].aabb)
    }

    /// Flags a proxy was inserted with.
    pub fn get_flags(&self, id: ProxyId) -> Result<ProxyFlags, TreeError> {
        self.resolve(id).map(|leaf| self.arena[leaf].flags)
    }

    /// Payload of a proxy.
    pub fn get_data(&self, id: ProxyId) -> Result<&P, TreeError> {
        let leaf = self.resolve(id)?;
        self.arena[leaf]
            .data
            .as_ref()
            .ok_or(TreeError::InvalidHandle(id))
    }

    /// Mutable payload of a proxy.
    pub fn get_data_mut(&mut self, id: ProxyId) -> Result<&mut P, TreeError> {
        let leaf = self.resolve(id)?;
        self.arena[leaf]
            .data
            .as_mut()
            .ok_or(TreeError::InvalidHandle(id))
    }

    /// Whether `id` refers to a live proxy.
    pub fn contains(&self, id: ProxyId) -> bool {
        self.arena.resolve(id).is_some()
    }

    /// Number of live proxies (leaves).
    pub fn len(&self) -> usize {
        self.leaves
    }

    /// True if the tree holds no proxies.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of allocated nodes, leaves and branches together.
    pub fn node_count(&self) -> usize {
        self.arena.live()
    }

    /// Height of the root: `Some(0)` for a single leaf, `None` for an empty tree.
    pub fn tree_height(&self) -> Option<u32> {
        self.root.map(|r| self.arena[r].height)
    }

    /// Bounds of the whole tree, if any.
    pub fn root_aabb(&self) -> Option<Aabb2D<T>> {
        self.root.map(|r| self.arena[r].aabb)
    }

    fn resolve(&self, id: ProxyId) -> Result<NodeIdx, TreeError> {
        self.arena.resolve(id).ok_or_else(|| {
            debug_log!(?id, "rejected proxy handle");
            TreeError::InvalidHandle(id)
        })
    }

    /// Link a detached leaf into the tree next to the cheapest sibling.
    fn insert_leaf(&mut self, leaf: NodeIdx) {
        let Some(root) = self.root else {
            self.arena[leaf].parent = None;
            self.root = Some(leaf);
            return;
        };

        let leaf_box = self.arena[leaf].aabb;
        let leaf_perimeter = leaf_box.perimeter();
        let mut node = root;
        while let Some([child1, child2]) = self.arena[node].children {
            let combined = leaf_box.union(&self.arena[node].aabb).perimeter();
            // Cost of a new branch holding `node` and the leaf.
            let new_branch = combined + combined;
            // Growth every ancestor pays if the leaf is pushed further down.
            let grown = combined - leaf_perimeter;
            let inherited = grown + grown;

            let cost1 = inherited + self.descend_cost(child1, &leaf_box);
            let cost2 = inherited + self.descend_cost(child2, &leaf_box);

            // Ties descend.
            if new_branch < cost1 && new_branch < cost2 {
                break;
            }
            node = if cost1 < cost2 { child1 } else { child2 };
        }

        let old_parent = self.arena[node].parent;
        let sibling = &self.arena[node];
        let branch_box = sibling.aabb.union(&leaf_box);
        let branch_flags = sibling.flags | self.arena[leaf].flags;
        let branch_height = sibling.height + 1;

        let branch = self.arena.allocate(branch_box);
        {
            let b = &mut self.arena[branch];
            b.parent = old_parent;
            b.children = Some([node, leaf]);
            b.flags = branch_flags;
            b.height = branch_height;
        }
        self.arena[node].parent = Some(branch);
        self.arena[leaf].parent = Some(branch);

        match old_parent {
            None => self.root = Some(branch),
            Some(parent) => self.replace_child(parent, node, branch),
        }
        self.update_ancestors(branch);
    }

    /// Perimeter growth of descending into `child` with `leaf_box`.
    fn descend_cost(&self, child: NodeIdx, leaf_box: &Aabb2D<T>) -> T::Acc {
        let node = &self.arena[child];
        let enlarged = leaf_box.union(&node.aabb).perimeter();
        if node.is_leaf() {
            enlarged
        } else {
            enlarged - node.aabb.perimeter()
        }
    }

    /// Detach a leaf, promoting its sibling into the parent's place. The leaf slot stays allocated.
    fn remove_leaf(&mut self, leaf: NodeIdx) {
        if self.root == Some(leaf) {
            self.root = None;
            return;
        }

        // Only the root has no parent, and every parent is a branch.
        let Some(parent) = self.arena[leaf].parent else {
            return;
        };
        let Some([child1, child2]) = self.arena[parent].children else {
            return;
        };
        let sibling = if child1 == leaf { child2 } else { child1 };
        let grandparent = self.arena[parent].parent;
        self.arena[leaf].parent = None;

        match grandparent {
            None => {
                self.arena[sibling].parent = None;
                self.root = Some(sibling);
                let _ = self.arena.free(parent);
            }
            Some(grandparent) => {
                self.replace_child(grandparent, parent, sibling);
                let _ = self.arena.free(parent);
                self.update_ancestors(grandparent);
            }
        }
    }
}

fn check_bounds<T: Scalar>(aabb: &Aabb2D<T>) -> Result<(), TreeError> {
    if aabb.is_valid() {
        Ok(())
    } else {
        debug_log!(?aabb, "rejected bounds");
        Err(TreeError::InvalidBounds)
    }
}
