// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Broad phase basics.
//!
//! Drop a few moving bodies into a static level, step them for a few frames, and
//! report dynamic-versus-static contacts each frame.
//!
//! Run:
//! - `cargo run -p understory_demos --example broad_phase_basics`
//! - `RUST_LOG=trace cargo run -p understory_demos --example broad_phase_basics`
//!   to watch inserts, removals and rotations.

use kurbo::{Rect, Vec2};
use tracing::info;
use tracing_subscriber::EnvFilter;
use understory_dynamic_tree::{DynamicTree, ProxyFlags, ProxyId, TreeError};

struct Body {
    name: &'static str,
    rect: Rect,
    velocity: Vec2,
}

fn main() -> Result<(), TreeError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut tree: DynamicTree<f64, &'static str> = DynamicTree::new();

    // Static level geometry.
    let level = [
        ("floor", Rect::new(0.0, 90.0, 200.0, 100.0)),
        ("left wall", Rect::new(0.0, 0.0, 10.0, 100.0)),
        ("right wall", Rect::new(190.0, 0.0, 200.0, 100.0)),
        ("ledge", Rect::new(80.0, 50.0, 120.0, 55.0)),
    ];
    for (name, rect) in level {
        tree.insert_with_flags(rect.into(), name, ProxyFlags::STATIC)?;
    }

    // Moving bodies.
    let mut bodies = vec![
        Body {
            name: "ball",
            rect: Rect::new(95.0, 20.0, 105.0, 30.0),
            velocity: Vec2::new(0.0, 12.0),
        },
        Body {
            name: "crate",
            rect: Rect::new(30.0, 70.0, 45.0, 85.0),
            velocity: Vec2::new(-6.0, 2.0),
        },
        Body {
            name: "bird",
            rect: Rect::new(150.0, 10.0, 156.0, 14.0),
            velocity: Vec2::new(8.0, 0.0),
        },
    ];
    let mut ids: Vec<ProxyId> = Vec::with_capacity(bodies.len());
    for body in &bodies {
        ids.push(tree.insert_with_flags(body.rect.into(), body.name, ProxyFlags::DYNAMIC)?);
    }

    info!(?tree, "level loaded");
    for frame in 0..4 {
        for (body, id) in bodies.iter_mut().zip(&ids) {
            body.rect = body.rect + body.velocity;
            tree.move_proxy(*id, body.rect.into())?;
        }
        let contacts: Vec<_> = tree
            .enumerate_overlapping_leaves_masked(ProxyFlags::DYNAMIC, ProxyFlags::STATIC)
            .collect();
        info!(frame, ?contacts, "dynamic/static contacts");
    }

    info!(
        height = ?tree.tree_height(),
        balance = tree.compute_tree_balance(),
        quality = tree.compute_tree_quality(),
        "tree shape"
    );

    // The bird flies off screen.
    let bird = tree.remove(ids[2])?;
    info!(bird, stale = ?tree.get_aabb(ids[2]), "removed");
    Ok(())
}
