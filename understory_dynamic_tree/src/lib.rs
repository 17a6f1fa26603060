// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_dynamic_tree --heading-base-level=0

//! Understory Dynamic Tree: an incrementally balanced 2D bounding-volume tree.
//!
//! The tree stores axis-aligned boxes ("proxies") with a caller payload and keeps
//! them in a binary hierarchy whose internal branches bound their children. It is
//! built for data that changes every frame, like the broad phase of a physics or
//! hit-testing system:
//!
//! - Insert, move and remove proxies in `O(log n)`. Handles ([`ProxyId`]) stay stable
//!   across moves and go stale on removal; stale handles are rejected, never aliased.
//! - Query with a box predicate, a flag mask, or both. Subtrees that fail are skipped whole.
//! - Enumerate every overlapping pair once, optionally restricted to pairs between two
//!   flag categories (for example dynamic against static).
//!
//! Insertion places each new leaf next to the sibling that grows the total perimeter
//! of the tree the least, and AVL-style rotations keep the tree height-balanced after
//! every change. There is no bulk build and no deferred commit: every call leaves the
//! tree fully consistent.
//!
//! It is generic over the scalar type `T` (`f32`, `f64` and `i64` are provided) and
//! does not depend on any geometry crate. Perimeter costs use widened accumulators
//! (f32→f64, i64→i128).
//!
//! # Example
//!
//! ```rust
//! use understory_dynamic_tree::{Aabb2D, DynamicTree, ProxyFlags};
//!
//! let mut tree: DynamicTree<f64, &str> = DynamicTree::new();
//! let player = tree
//!     .insert_with_flags(Aabb2D::<f64>::from_xywh(0.0, 0.0, 2.0, 2.0), "player", ProxyFlags::DYNAMIC)
//!     .unwrap();
//! let _wall = tree
//!     .insert_with_flags(Aabb2D::<f64>::from_xywh(5.0, 0.0, 1.0, 10.0), "wall", ProxyFlags::STATIC)
//!     .unwrap();
//!
//! // Nothing touches yet.
//! assert_eq!(tree.enumerate_overlapping_leaves().count(), 0);
//!
//! // Move the player into the wall; the handle stays valid.
//! tree.move_proxy(player, Aabb2D::<f64>::from_xywh(4.5, 1.0, 2.0, 2.0)).unwrap();
//! let pairs: Vec<_> = tree
//!     .enumerate_overlapping_leaves_masked(ProxyFlags::DYNAMIC, ProxyFlags::STATIC)
//!     .collect();
//! assert_eq!(pairs, [(&"player", &"wall")]);
//!
//! // Region and point queries yield handles with payloads.
//! let hits: Vec<_> = tree.query_point(5.0, 9.0).map(|(_, name)| *name).collect();
//! assert_eq!(hits, ["wall"]);
//! ```
//!
//! ## Flags
//!
//! Each proxy carries [`ProxyFlags`]; each branch carries the union of its children's
//! flags. A query mask matches a node when the node has *every* bit of the mask, so
//! an empty mask matches everything.
//!
//! ## Errors
//!
//! Fallible operations return [`TreeError`]: a handle that is stale or never referred
//! to a proxy, or bounds that are non-finite or inverted. A failed call leaves the tree
//! unchanged.
//!
//! ## Features
//!
//! - `std` (default): forwarded to optional dependencies. The crate itself is `no_std` + `alloc`.
//! - `libm`: forwarded to Kurbo for `no_std` builds with the `kurbo` feature.
//! - `kurbo`: conversions between `kurbo::Rect` and `Aabb2D<f64>`.
//! - `tracing`: emit `tracing` events for inserts, removals, rotations and rejected calls.
//!
//! ### Float semantics
//!
//! Boxes with NaN or infinite coordinates are rejected at the API boundary, so the tree
//! never holds them. Overlap and containment are inclusive on edges.

#![no_std]

extern crate alloc;

mod arena;
mod balance;
mod diagnostics;
mod error;
mod pairs;
mod proxy;
mod query;
mod trace;
mod tree;
pub mod types;

pub use diagnostics::{NodeInfo, Walk};
pub use error::TreeError;
pub use pairs::OverlappingPairs;
pub use proxy::{ProxyFlags, ProxyId};
pub use query::Query;
pub use tree::DynamicTree;
pub use types::{Aabb2D, Scalar};
