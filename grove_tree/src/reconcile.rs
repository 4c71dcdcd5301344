// Copyright 2026 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bottom-up size aggregation.

use crate::error::IntegrityIssue;
use crate::tree::{NodeId, SizeTree};

/// Tolerance for comparing declared sizes against child sums.
const SIZE_EPSILON: f64 = 1e-6;

/// Reconcile every internal node's declared size against its child sum.
///
/// Policy:
///
/// - Leaves are authoritative as given.
/// - `declared >= child_sum`: the declared size is kept. The slack is real —
///   directory metadata the scanner did not attribute to any listed child.
/// - `declared < child_sum`: impossible in valid input, so it is surfaced as
///   an [`IntegrityIssue`] and the node's effective size becomes the child
///   sum. Layout still runs; the discrepancy stays visible to the caller.
/// - The synthetic root always takes the child sum silently; it never had a
///   declared size.
///
/// Runs in one reverse-arena pass: insertion order is preorder, so children
/// are visited before their parents.
pub fn reconcile(tree: &mut SizeTree) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();
    let root = tree.root();
    for idx in (0..tree.len()).rev() {
        let id = NodeId::new(idx);
        if tree.node(id).is_leaf() {
            continue;
        }
        let child_sum: f64 = tree
            .children_of(id)
            .iter()
            .map(|&c| tree.node(c).size_kb)
            .sum();
        let declared = tree.node(id).size_kb;
        if id == root {
            tree.node_mut(id).size_kb = child_sum;
        } else if declared + SIZE_EPSILON < child_sum {
            issues.push(IntegrityIssue {
                path: tree.node(id).path.clone(),
                declared_kb: declared,
                child_sum_kb: child_sum,
            });
            tree.node_mut(id).size_kb = child_sum;
        }
    }
    for issue in &issues {
        tracing::warn!(
            path = %issue.path,
            declared_kb = issue.declared_kb,
            child_sum_kb = issue.child_sum_kb,
            "declared size smaller than child sum; using the sum"
        );
    }
    issues
}
