// Copyright 2026 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tour of the Grove crates on a small disk-usage snapshot.
//!
//! This example shows how to combine:
//! - `grove_tree` for parsing the JSON snapshot and reconciling sizes,
//! - `grove_view` for layout, hit testing and drill-down navigation.
//!
//! Run:
//! - `cargo run -p grove_demos --example treemap_explorer`
//!
//! Set `RUST_LOG=debug` to watch relayout and integrity warnings flow
//! through `tracing`.

use std::error::Error;

use grove_hit::HitTarget;
use grove_layout::LayoutParams;
use grove_tree::{SizeTree, from_json_str, reconcile};
use grove_view::Viewer;
use kurbo::{Point, Rect};
use tracing_subscriber::EnvFilter;

static LIBRARY_JSON: &str = include_str!("../data/library.json");

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Parse and validate; warnings name excluded subtrees without failing.
    let raw = from_json_str(LIBRARY_JSON)?;
    let outcome = SizeTree::build(raw)?;
    for warning in &outcome.warnings {
        println!("construction warning: {warning}");
    }
    let mut tree = outcome.tree;

    // Bottom-up size reconciliation. `Caches` under-declares its children
    // here, so it gets corrected to the child sum and reported.
    for issue in reconcile(&mut tree) {
        println!(
            "integrity: `{}` declared {} KB but children sum to {} KB",
            issue.path, issue.declared_kb, issue.child_sum_kb
        );
    }

    let viewport = Rect::new(0.0, 0.0, 960.0, 640.0);
    // A generous fold threshold so the small fonts collapse into an
    // "other" bucket instead of sliver rectangles.
    let params = LayoutParams {
        min_visible_area: 2500.0,
        ..LayoutParams::default()
    };
    let mut viewer = Viewer::with_params(tree, viewport, params);

    println!("\ntop-level view ({} x {}):", viewport.width(), viewport.height());
    print_records(&viewer);

    // Point query: whatever sits under the cursor, leaf-deep.
    let cursor = Point::new(120.0, 80.0);
    match viewer.hit_test(cursor) {
        Some(HitTarget::Node(id)) => {
            let path = &viewer.tree().node(id).path;
            println!("\nhit at {cursor:?}: `{path}`");
            if let Some(crumbs) = viewer.ancestor_paths(path) {
                println!("breadcrumbs: {}", crumbs.join(" > "));
            }
        }
        Some(HitTarget::Fold { parent }) => {
            let path = &viewer.tree().node(parent).path;
            println!("\nhit at {cursor:?}: folded tail under `{path}`");
        }
        None => println!("\nhit at {cursor:?}: outside the treemap"),
    }

    // Drill into the largest directory, then climb back out.
    viewer.drill_into("Caches")?;
    println!("\nafter drilling into `Caches`:");
    print_records(&viewer);

    viewer.drill_up()?;
    println!("\nback at the top-level view: `{}`", viewer.view_path());

    Ok(())
}

fn print_records(viewer: &Viewer) {
    for record in viewer.records() {
        // Top-level tiles plus any fold buckets deeper down.
        if record.depth != 1 && !record.folded {
            continue;
        }
        let marker = if record.folded { " (folded tail)" } else { "" };
        println!(
            "  {:<42} x={:>7.1} y={:>7.1} w={:>7.1} h={:>7.1}{marker}",
            record.path, record.x, record.y, record.width, record.height
        );
    }
}
