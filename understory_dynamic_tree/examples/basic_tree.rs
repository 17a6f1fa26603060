// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory Dynamic Tree: insert, move, query, and enumerate pairs.

use understory_dynamic_tree::{Aabb2D, DynamicTree, ProxyFlags};

fn main() {
    let mut tree: DynamicTree<i64, u32> = DynamicTree::new();
    let k1 = tree
        .insert_with_flags(Aabb2D::new(0, 0, 10, 10), 1, ProxyFlags::DYNAMIC)
        .unwrap();
    let _k2 = tree
        .insert_with_flags(Aabb2D::new(5, 5, 15, 15), 2, ProxyFlags::STATIC)
        .unwrap();
    let pairs: Vec<_> = tree.enumerate_overlapping_leaves().collect();
    println!("pairs before move: {:?}", pairs);

    // Move box 1 away; the handle stays valid.
    tree.move_proxy(k1, Aabb2D::new(20, 0, 30, 10)).unwrap();
    let pairs: Vec<_> = tree.enumerate_overlapping_leaves().collect();
    println!("pairs after move: {:?}", pairs);

    // Query a point
    let hits: Vec<_> = tree.query_point(6, 6).collect();
    println!("hits at (6,6): {:?}", hits);

    // Only dynamic proxies
    let dynamic: Vec<_> = tree.query_flags(ProxyFlags::DYNAMIC).collect();
    println!("dynamic: {:?}", dynamic);
    println!("{:?}", tree);
}
