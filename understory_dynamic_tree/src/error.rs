// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by fallible tree operations.

use crate::proxy::ProxyId;

/// Error returned by [`DynamicTree`](crate::DynamicTree) operations.
///
/// A failed operation leaves the tree unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id was never issued, has been removed, or its slot was reused.
    #[error("invalid proxy handle: {0:?}")]
    InvalidHandle(ProxyId),
    /// The box has a NaN or infinite coordinate, or `min > max` on some axis.
    #[error("invalid bounds: coordinates must be finite with min <= max")]
    InvalidBounds,
}
