// Copyright 2026 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error and report types for tree construction and aggregation.

use thiserror::Error;

/// Fatal errors from decoding or constructing a size tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The input was not valid JSON for the expected node shape.
    #[error("failed to decode input tree: {0}")]
    Decode(#[from] serde_json::Error),
    /// Every input node was excluded during validation.
    #[error("no valid nodes remain after construction")]
    Empty,
}

/// A non-fatal per-node violation collected during [`SizeTree::build`].
///
/// Each warning corresponds to one excluded node; the node's subtree is
/// excluded with it. Construction succeeds as long as at least one valid
/// top-level node remains.
///
/// [`SizeTree::build`]: crate::SizeTree::build
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionWarning {
    /// A node reused a path an earlier node already claimed.
    #[error("duplicate path `{path}`; subtree excluded")]
    DuplicatePath {
        /// The colliding path.
        path: String,
    },
    /// A node had an empty display name.
    #[error("empty name at `{path}`; subtree excluded")]
    EmptyName {
        /// Path of the offending node.
        path: String,
    },
    /// A node declared a negative (or non-finite) size.
    #[error("invalid size {size_kb} at `{path}`; subtree excluded")]
    NegativeSize {
        /// Path of the offending node.
        path: String,
        /// The declared size in KB.
        size_kb: f64,
    },
    /// Nesting exceeded the construction depth cap.
    ///
    /// Owned decoded input cannot form a true cycle, but this guards against
    /// malformed generators that expand a reused subtree without bound.
    #[error("nesting deeper than {limit} at `{path}`; subtree excluded")]
    DepthExceeded {
        /// Path of the node at which the cap was hit.
        path: String,
        /// The configured cap.
        limit: u16,
    },
}

/// A declared directory size smaller than the sum of its children.
///
/// Surfaced by [`reconcile`](crate::reconcile); the node is laid out using
/// the reconciled child sum, and the discrepancy is reported rather than
/// silently overwritten so a scanner bug stays visible to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityIssue {
    /// Path of the inconsistent node.
    pub path: String,
    /// The size the input declared, in KB.
    pub declared_kb: f64,
    /// The computed sum of the node's children, in KB.
    pub child_sum_kb: f64,
}
