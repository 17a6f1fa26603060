// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Region and point queries.
//!
//! Scatter labels over a canvas, then find what lies under a selection rectangle,
//! under the cursor, and which labels collide with each other.
//!
//! Run:
//! - `cargo run -p understory_demos --example region_query`

use kurbo::{Point, Rect};
use understory_dynamic_tree::{Aabb2D, DynamicTree, TreeError};

fn main() -> Result<(), TreeError> {
    let mut tree: DynamicTree<f64, String> = DynamicTree::with_capacity(64);
    for row in 0..8 {
        for col in 0..8 {
            let origin = Point::new(f64::from(col) * 25.0, f64::from(row) * 20.0);
            // Labels are slightly wider than their column, so neighbours in a row overlap.
            let rect = Rect::from_origin_size(origin, (28.0, 12.0));
            tree.insert(rect.into(), format!("label {row}:{col}"))?;
        }
    }
    tree.validate();

    let selection = Rect::new(40.0, 30.0, 90.0, 70.0);
    let mut selected: Vec<_> = tree
        .query_rect(selection.into())
        .map(|(_, name)| name.as_str())
        .collect();
    selected.sort_unstable();
    println!("selection {selection:?} hits {} labels: {selected:?}", selected.len());

    let cursor = Point::new(52.0, 45.0);
    for (id, name) in tree.query_point(cursor.x, cursor.y) {
        let bounds: Rect = tree.get_aabb(id)?.into();
        println!("under cursor: {name} at {bounds:?}");
    }

    // Any conservative predicate works; here, boxes reaching into the right half.
    let right_half: Aabb2D<f64> = Rect::new(100.0, 0.0, 300.0, 200.0).into();
    let count = tree.query(|b| b.overlaps(&right_half)).count();
    println!("{count} labels reach into the right half");

    let collisions = tree.enumerate_overlapping_leaves().count();
    println!("{collisions} overlapping label pairs");
    Ok(())
}
