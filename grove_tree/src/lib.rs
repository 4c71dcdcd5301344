// Copyright 2026 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grove Tree: the validated size-tree model that feeds the treemap layout.
//!
//! This crate turns the scanner's raw JSON tree into an arena-backed
//! [`SizeTree`] that the rest of the Grove workspace consumes:
//!
//! - [`RawNode`] mirrors the wire format byte for byte (`value` in KB,
//!   `name`, `path`, optional `children` and `link`).
//! - [`SizeTree::build`] normalizes and validates the input. Malformed nodes
//!   (empty name, negative size, duplicate path) are excluded together with
//!   their subtree and reported as [`ConstructionWarning`]s; a partially bad
//!   load still succeeds.
//! - [`reconcile`] runs the bottom-up size aggregation, keeping a declared
//!   directory size when it covers the child sum (untracked overhead) and
//!   surfacing an [`IntegrityIssue`] when it does not.
//!
//! After `build` + `reconcile`, every node carries one authoritative weight
//! in `size_kb`, which is the contract the layout engine relies on.
//!
//! ## Example
//!
//! ```rust
//! use grove_tree::{SizeTree, from_json_str, reconcile};
//!
//! let raw = from_json_str(
//!     r#"[{"value": 40, "name": "Accessibility", "path": "Accessibility"}]"#,
//! )
//! .unwrap();
//! let outcome = SizeTree::build(raw).unwrap();
//! assert!(outcome.warnings.is_empty());
//!
//! let mut tree = outcome.tree;
//! let issues = reconcile(&mut tree);
//! assert!(issues.is_empty());
//!
//! let id = tree.node_by_path("Accessibility").unwrap();
//! assert_eq!(tree.node(id).size_kb, 40.0);
//! ```

mod error;
mod input;
mod reconcile;
mod tree;

pub use error::{ConstructionWarning, IntegrityIssue, TreeError};
pub use input::{RawNode, from_json_reader, from_json_str};
pub use reconcile::reconcile;
pub use tree::{BuildOutcome, Node, NodeId, SizeTree};
