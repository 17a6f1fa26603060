// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public handle and flag types: proxy identifiers and category masks.

/// Identifier for a leaf (proxy) in a [`DynamicTree`](crate::DynamicTree).
///
/// This is a small, copyable handle that stays stable while the proxy lives,
/// including across [`DynamicTree::move_proxy`](crate::DynamicTree::move_proxy).
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - Each time a slot is allocated (for a leaf or for an internal branch), its generation is bumped.
/// - On remove, the slot is freed; any existing `ProxyId` that pointed to that slot is now stale.
/// - Stale ids never alias a different live proxy because the generation must match.
///
/// Use [`DynamicTree::contains`](crate::DynamicTree::contains) to check liveness.
/// `u32` is ample for practical lifetimes; behavior on generation overflow is unspecified.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ProxyId(pub(crate) u32, pub(crate) u32);

impl ProxyId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index of this proxy. Stable for the lifetime of the proxy.
    pub const fn index(self) -> u32 {
        self.0
    }

    /// Generation of the slot when this proxy was created.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

bitflags::bitflags! {
    /// Category bits attached to a proxy.
    ///
    /// A branch carries the union of its children's flags, so a query mask prunes
    /// whole subtrees: a subtree is skipped unless it carries *every* requested bit.
    ///
    /// Two bits are named for the common dynamic/static split used by broad phases;
    /// all other bits are free for callers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ProxyFlags: u32 {
        /// Proxy moves between frames.
        const DYNAMIC = 0b0000_0001;
        /// Proxy is expected to stay put.
        const STATIC  = 0b0000_0010;

        const _ = !0;
    }
}

impl ProxyFlags {
    /// True if every bit of `mask` is set in `self`.
    ///
    /// An empty mask is satisfied by anything.
    #[inline]
    pub const fn satisfies(self, mask: Self) -> bool {
        self.bits() & mask.bits() == mask.bits()
    }
}
