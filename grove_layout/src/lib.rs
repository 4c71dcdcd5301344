// Copyright 2026 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grove Layout: a squarified treemap layout engine.
//!
//! [`layout`] converts a reconciled [`grove_tree::SizeTree`] subtree plus a
//! viewport rectangle into a fresh, immutable [`LayoutResult`]: one
//! screen-space rectangle per laid-out node.
//!
//! - Children are placed with the squarified algorithm of Bruls, Huizing and
//!   van Wijk: sorted by size descending (stable on ties), accumulated into
//!   rows while the row's worst aspect ratio keeps improving, each row laid
//!   along the shorter side of the remaining rectangle.
//! - Children exactly partition their parent's rectangle — no gaps, no
//!   overlaps. The last entry of every row absorbs the floating-point
//!   remainder.
//! - Sub-threshold children are folded into a synthetic "other" bucket per
//!   parent instead of flooding the output with sub-pixel rectangles; the
//!   folding is reported through [`LayoutResult::folds`], never silently
//!   dropped.
//!
//! The pass is pure and total: no I/O, no panics on degenerate geometry, and
//! the tree is never mutated. Re-running it with the same inputs yields
//! bit-identical rectangles, and a caller that re-layouts concurrently can
//! simply discard superseded results (last request wins).
//!
//! ## Example
//!
//! ```rust
//! use grove_layout::{LayoutParams, layout};
//! use grove_tree::{SizeTree, from_json_str, reconcile};
//! use kurbo::Rect;
//!
//! let raw = from_json_str(
//!     r#"[
//!         {"value": 300, "name": "big", "path": "big"},
//!         {"value": 100, "name": "small", "path": "small"}
//!     ]"#,
//! )
//! .unwrap();
//! let mut tree = SizeTree::build(raw).unwrap().tree;
//! reconcile(&mut tree);
//!
//! let result = layout(
//!     &tree,
//!     tree.root(),
//!     Rect::new(0.0, 0.0, 800.0, 600.0),
//!     &LayoutParams::default(),
//! );
//!
//! // The two children split the 480,000 px² viewport 3:1.
//! let big = tree.node_by_path("big").unwrap();
//! let rect = result.rect_of(big).unwrap().rect;
//! assert!((rect.area() - 360_000.0).abs() < 1e-6);
//! ```

mod result;
mod squarify;

pub use result::{Fold, LayoutResult, NodeRect, RectFlags, RectRecord};
pub use squarify::{LayoutParams, layout};
