// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node storage: a flat vector of slots plus a free list.
//!
//! Topology is expressed with plain slot indices; the arena owns every node.
//! A slot keeps its generation across frees so that stale [`ProxyId`]s can be detected.

use alloc::vec::Vec;

use crate::proxy::{ProxyFlags, ProxyId};
use crate::trace::trace_log;
use crate::types::Aabb2D;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeIdx(usize);

impl NodeIdx {
    pub(crate) const fn new(i: usize) -> Self {
        Self(i)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Node<T, P> {
    pub(crate) aabb: Aabb2D<T>,
    /// Payload of a live leaf. `None` for branches and free slots.
    pub(crate) data: Option<P>,
    pub(crate) parent: Option<NodeIdx>,
    /// `None` for leaves, `[child1, child2]` for branches.
    pub(crate) children: Option<[NodeIdx; 2]>,
    pub(crate) height: u32,
    pub(crate) flags: ProxyFlags,
    generation: u32,
}

impl<T, P> Node<T, P> {
    pub(crate) const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

pub(crate) struct Arena<T, P> {
    nodes: Vec<Node<T, P>>,
    free_list: Vec<NodeIdx>,
    /// Slots taken out of circulation after their generation ran out.
    retired: usize,
}

impl<T, P> Default for Arena<T, P> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            free_list: Vec::new(),
            retired: 0,
        }
    }
}

impl<T: Copy, P> Arena<T, P> {
    /// Take a slot from the free list, or grow by one.
    ///
    /// The returned node has no parent, no children, no payload, height 0 and empty flags.
    /// Slots whose generation is exhausted are retired instead of reused.
    pub(crate) fn allocate(&mut self, aabb: Aabb2D<T>) -> NodeIdx {
        while let Some(idx) = self.free_list.pop() {
            let node = &mut self.nodes[idx.get()];
            if node.generation == u32::MAX {
                // Another bump would wrap and revive ids issued for this slot.
                self.retired += 1;
                trace_log!(slot = idx.get(), "retiring slot");
                continue;
            }
            node.aabb = aabb;
            node.data = None;
            node.parent = None;
            node.children = None;
            node.height = 0;
            node.flags = ProxyFlags::empty();
            node.generation += 1;
            trace_log!(slot = idx.get(), generation = node.generation, "reusing slot");
            return idx;
        }
        debug_assert!(
            u32::try_from(self.nodes.len()).is_ok(),
            "slot index exceeds the u32 range of ProxyId"
        );
        let idx = NodeIdx::new(self.nodes.len());
        self.nodes.push(Node {
            aabb,
            data: None,
            parent: None,
            children: None,
            height: 0,
            flags: ProxyFlags::empty(),
            generation: 1,
        });
        idx
    }
}

impl<T, P> Arena<T, P> {
    /// Release a slot. Drops the payload (if any) and returns the slot to the free list.
    pub(crate) fn free(&mut self, idx: NodeIdx) -> Option<P> {
        let node = &mut self.nodes[idx.get()];
        node.parent = None;
        node.children = None;
        self.free_list.push(idx);
        node.data.take()
    }

    /// Number of allocated slots (leaves and branches).
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - self.free_list.len() - self.retired
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        self.nodes.reserve(additional);
    }

    /// Free every slot while keeping generations, so ids issued before stay stale.
    pub(crate) fn clear(&mut self) {
        self.free_list.clear();
        self.retired = 0;
        for (i, node) in self.nodes.iter_mut().enumerate().rev() {
            node.data = None;
            node.parent = None;
            node.children = None;
            if node.generation == u32::MAX {
                self.retired += 1;
            } else {
                self.free_list.push(NodeIdx::new(i));
            }
        }
    }

    /// Resolve a handle to a live leaf slot.
    pub(crate) fn resolve(&self, id: ProxyId) -> Option<NodeIdx> {
        let node = self.nodes.get(id.idx())?;
        (node.data.is_some() && node.generation == id.generation())
            .then_some(NodeIdx::new(id.idx()))
    }

    /// Build the public handle for a slot.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "`allocate` never hands out a slot past the u32 range."
    )]
    pub(crate) fn proxy_id(&self, idx: NodeIdx) -> ProxyId {
        debug_assert!(
            u32::try_from(idx.get()).is_ok(),
            "slot index exceeds the u32 range of ProxyId"
        );
        ProxyId::new(idx.get() as u32, self.nodes[idx.get()].generation)
    }

    pub(crate) fn free_slots(&self) -> usize {
        self.free_list.len()
    }

    pub(crate) fn total_slots(&self) -> usize {
        self.nodes.len()
    }
}

impl<T, P> core::ops::Index<NodeIdx> for Arena<T, P> {
    type Output = Node<T, P>;

    #[inline]
    fn index(&self, idx: NodeIdx) -> &Self::Output {
        &self.nodes[idx.get()]
    }
}

impl<T, P> core::ops::IndexMut<NodeIdx> for Arena<T, P> {
    #[inline]
    fn index_mut(&mut self, idx: NodeIdx) -> &mut Self::Output {
        &mut self.nodes[idx.get()]
    }
}
