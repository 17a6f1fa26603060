// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.
//!
//! The tree only needs three things from a box: [`Aabb2D::union`], [`Aabb2D::perimeter`]
//! and [`Aabb2D::overlaps`]. Everything else here is convenience for callers.

use core::cmp::Ordering;
use core::fmt::Debug;

/// Axis-aligned bounding box in 2D.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x (left)
    pub min_x: T,
    /// Minimum y (top)
    pub min_y: T,
    /// Maximum x (right)
    pub max_x: T,
    /// Maximum y (bottom)
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Whether this AABB contains the point. Edges are inclusive.
    pub fn contains_point(&self, x: T, y: T) -> bool {
        le(self.min_x, x) && le(self.min_y, y) && le(x, self.max_x) && le(y, self.max_y)
    }

    /// Whether the two boxes share at least one point.
    ///
    /// Boxes touching along an edge or at a corner overlap; this is the usual
    /// broad-phase convention and keeps zero-sized boxes queryable.
    pub fn overlaps(&self, other: &Self) -> bool {
        le(self.min_x, other.max_x)
            && le(other.min_x, self.max_x)
            && le(self.min_y, other.max_y)
            && le(other.min_y, self.max_y)
    }

    /// The smallest AABB enclosing both boxes.
    pub fn union(&self, other: &Self) -> Self {
        union_aabb(*self, *other)
    }

    /// Return true if the AABB is inverted (no area, not even a point). Assumes no NaN.
    pub fn is_empty(&self) -> bool {
        lt(self.max_x, self.min_x) || lt(self.max_y, self.min_y)
    }
}

impl<T: Scalar> Aabb2D<T> {
    /// Width of the box, clamped at zero.
    pub fn width(&self) -> T {
        T::max_zero(T::sub(self.max_x, self.min_x))
    }

    /// Height of the box, clamped at zero.
    pub fn height(&self) -> T {
        T::max_zero(T::sub(self.max_y, self.min_y))
    }

    /// Perimeter `2 * (width + height)` in the widened accumulator type.
    ///
    /// This is the 2D stand-in for surface area used by the insertion cost.
    #[inline]
    pub fn perimeter(&self) -> T::Acc {
        perimeter(self)
    }

    /// True if every coordinate is finite and `min <= max` on both axes.
    pub fn is_valid(&self) -> bool {
        T::is_finite(self.min_x)
            && T::is_finite(self.min_y)
            && T::is_finite(self.max_x)
            && T::is_finite(self.max_y)
            && le(self.min_x, self.max_x)
            && le(self.min_y, self.max_y)
    }
}

impl Aabb2D<f32> {
    /// Create an AABB from origin and size in f32.
    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

impl Aabb2D<f64> {
    /// Create an AABB from origin and size in f64.
    pub const fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

impl Aabb2D<i64> {
    /// Create an AABB from origin and size in i64.
    pub const fn from_xywh(x: i64, y: i64, w: i64, h: i64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x + w,
            max_y: y + h,
        }
    }
}

#[cfg(feature = "kurbo")]
impl From<kurbo::Rect> for Aabb2D<f64> {
    fn from(r: kurbo::Rect) -> Self {
        Self::new(r.x0, r.y0, r.x1, r.y1)
    }
}

#[cfg(feature = "kurbo")]
impl From<Aabb2D<f64>> for kurbo::Rect {
    fn from(a: Aabb2D<f64>) -> Self {
        Self::new(a.min_x, a.min_y, a.max_x, a.max_y)
    }
}

/// Numeric scalar abstraction for 2D AABBs used by the tree.
///
/// This trait provides the minimal set of operations required for the perimeter
/// cost metric, and an associated widened accumulator type (e.g., f32→f64, i64→i128)
/// so cost comparisons do not lose precision or overflow.
pub trait Scalar: Copy + PartialOrd + Debug {
    /// Widened accumulator type suitable for perimeter/cost computations.
    type Acc: Copy
        + PartialOrd
        + core::ops::Add<Output = Self::Acc>
        + core::ops::Sub<Output = Self::Acc>
        + Debug;

    /// Subtract two scalar values: a - b.
    fn sub(a: Self, b: Self) -> Self;

    /// Max of the scalar value and zero.
    fn max_zero(v: Self) -> Self;

    /// Whether the value is a finite number. Always true for integers.
    fn is_finite(v: Self) -> bool;

    /// Convert a scalar to the accumulator type.
    fn widen(v: Self) -> Self::Acc;

    /// Lossy conversion of an accumulator value to `f64` (for reporting metrics).
    fn acc_to_f64(v: Self::Acc) -> f64;
}

impl Scalar for f32 {
    type Acc = f64;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn is_finite(v: Self) -> bool {
        v.is_finite()
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        f64::from(v)
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        v
    }
}

impl Scalar for f64 {
    type Acc = Self;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a - b
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0.0)
    }

    #[inline]
    fn is_finite(v: Self) -> bool {
        v.is_finite()
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        v
    }

    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        v
    }
}

impl Scalar for i64 {
    type Acc = i128;

    #[inline]
    fn sub(a: Self, b: Self) -> Self {
        a.saturating_sub(b)
    }

    #[inline]
    fn max_zero(v: Self) -> Self {
        v.max(0)
    }

    #[inline]
    fn is_finite(_v: Self) -> bool {
        true
    }

    #[inline]
    fn widen(v: Self) -> Self::Acc {
        i128::from(v)
    }

    #[allow(
        clippy::cast_precision_loss,
        reason = "Metrics are reported as f64; precision loss on huge perimeters is acceptable."
    )]
    #[inline]
    fn acc_to_f64(v: Self::Acc) -> f64 {
        v as f64
    }
}

/// Compute the perimeter of an AABB using the scalar's widened accumulator type.
#[inline]
pub fn perimeter<T: Scalar>(a: &Aabb2D<T>) -> T::Acc {
    let half = T::widen(a.width()) + T::widen(a.height());
    half + half
}

pub(crate) fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => b,
        _ => a,
    }
}

pub(crate) fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    match a.partial_cmp(&b) {
        Some(Ordering::Less) => b,
        _ => a,
    }
}

pub(crate) fn le<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o != Ordering::Greater)
        .unwrap_or(false)
}

pub(crate) fn lt<T: PartialOrd>(a: T, b: T) -> bool {
    a.partial_cmp(&b)
        .map(|o| o == Ordering::Less)
        .unwrap_or(false)
}

pub(crate) fn union_aabb<T: PartialOrd + Copy>(a: Aabb2D<T>, b: Aabb2D<T>) -> Aabb2D<T> {
    Aabb2D {
        min_x: min_t(a.min_x, b.min_x),
        min_y: min_t(a.min_y, b.min_y),
        max_x: max_t(a.max_x, b.max_x),
        max_y: max_t(a.max_y, b.max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perimeter_is_twice_width_plus_height() {
        assert_eq!(Aabb2D::<f64>::from_xywh(0.0, 0.0, 2.0, 3.0).perimeter(), 10.0);
        assert_eq!(Aabb2D::<i64>::from_xywh(-5, -5, 10, 1).perimeter(), 22_i128);
        assert_eq!(Aabb2D::<f32>::from_xywh(1.0, 1.0, 0.0, 0.0).perimeter(), 0.0_f64);
    }

    #[test]
    fn union_encloses_both() {
        let a = Aabb2D::new(0, 0, 2, 2);
        let b = Aabb2D::new(5, -1, 6, 1);
        assert_eq!(a.union(&b), Aabb2D::new(0, -1, 6, 2));
        assert_eq!(b.union(&a), a.union(&b));
    }

    #[test]
    fn overlap_is_inclusive_on_edges() {
        let a = Aabb2D::new(0.0, 0.0, 1.0, 1.0);
        assert!(a.overlaps(&Aabb2D::new(1.0, 0.0, 2.0, 1.0)), "shared edge overlaps");
        assert!(a.overlaps(&Aabb2D::new(1.0, 1.0, 2.0, 2.0)), "shared corner overlaps");
        assert!(!a.overlaps(&Aabb2D::new(1.5, 0.0, 2.0, 1.0)));
        assert!(!a.overlaps(&Aabb2D::new(0.0, -3.0, 1.0, -0.5)));
    }

    #[test]
    fn validity_rejects_nan_infinite_and_inverted() {
        assert!(Aabb2D::new(0.0, 0.0, 1.0, 1.0).is_valid());
        assert!(Aabb2D::new(0.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!Aabb2D::new(f64::NAN, 0.0, 1.0, 1.0).is_valid());
        assert!(!Aabb2D::new(0.0, 0.0, f32::INFINITY, 1.0).is_valid());
        assert!(!Aabb2D::new(2, 0, 1, 1).is_valid());
    }

    /// Grid coordinates in whole cells.
    #[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
    struct Cell(i32);

    impl Scalar for Cell {
        type Acc = i64;

        fn sub(a: Self, b: Self) -> Self {
            Self(a.0.saturating_sub(b.0))
        }

        fn max_zero(v: Self) -> Self {
            Self(v.0.max(0))
        }

        fn is_finite(_v: Self) -> bool {
            true
        }

        fn widen(v: Self) -> Self::Acc {
            i64::from(v.0)
        }

        #[allow(clippy::cast_precision_loss, reason = "Test values are small.")]
        fn acc_to_f64(v: Self::Acc) -> f64 {
            v as f64
        }
    }

    #[test]
    fn custom_scalar_drives_a_tree() {
        let cells = |x0, y0, x1, y1| Aabb2D::new(Cell(x0), Cell(y0), Cell(x1), Cell(y1));
        assert_eq!(cells(0, 0, 2, 3).perimeter(), 10_i64);

        let mut tree: crate::DynamicTree<Cell, u8> = crate::DynamicTree::new();
        tree.insert(cells(0, 0, 1, 1), 1).unwrap();
        tree.insert(cells(3, 0, 4, 1), 2).unwrap();
        tree.validate();
        assert_eq!(tree.root_aabb(), Some(cells(0, 0, 4, 1)));
        assert_eq!(tree.compute_tree_quality(), 18.0 / 10.0);
        assert_eq!(tree.query_point(Cell(3), Cell(1)).count(), 1);
    }

    #[cfg(feature = "kurbo")]
    #[test]
    fn kurbo_rect_round_trip() {
        let r = kurbo::Rect::new(1.0, 2.0, 3.0, 4.0);
        let a: Aabb2D<f64> = r.into();
        assert_eq!(a, Aabb2D::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(kurbo::Rect::from(a), r);
    }
}
