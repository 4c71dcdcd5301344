// Copyright 2026 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grove Hit: point queries and ancestor lookups over one layout pass.
//!
//! [`HitIndex::build`] snapshots the rectangles of a
//! [`grove_layout::LayoutResult`] into a nested-containment structure:
//!
//! - [`HitIndex::hit_test`] descends from the view root, at each level
//!   testing only the node's direct children. Treemap fan-outs are small and
//!   a child rectangle always lies inside its parent's, so this beats a
//!   general R-tree here.
//! - [`HitIndex::ancestors_of`] returns the chain from the view root down to
//!   a node, the order breadcrumb UIs want.
//!
//! A point exactly on a shared boundary resolves to the later-ordered
//! sibling in layout order, deterministically; a point outside the view
//! root's rectangle is `None`, not an error. Fold buckets hit as
//! [`HitTarget::Fold`] so the host can offer "drill into the folded tail".
//!
//! The index holds no references into the tree or layout; build it once per
//! layout pass and drop it with the pass it describes.

use grove_layout::LayoutResult;
use grove_tree::{NodeId, SizeTree};
use hashbrown::HashMap;
use kurbo::{Point, Rect};
use smallvec::SmallVec;

/// What a successful hit resolved to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// A laid-out node.
    Node(NodeId),
    /// The "other" bucket of folded children under `parent`.
    Fold {
        /// The node whose folded tail was hit.
        parent: NodeId,
    },
}

#[derive(Debug)]
struct Entry {
    rect: Rect,
    parent: Option<NodeId>,
    /// Direct children in layout emission order.
    children: Vec<NodeId>,
    /// Index into `folds` when this node's tail was folded.
    fold: Option<usize>,
}

/// Containment-search index over the rectangles of one layout pass.
#[derive(Debug)]
pub struct HitIndex {
    view_root: NodeId,
    entries: HashMap<NodeId, Entry>,
    folds: Vec<Rect>,
}

impl HitIndex {
    /// Build an index from one layout pass.
    ///
    /// Layout emission order puts parents before children and siblings in
    /// placement order, which is exactly the order tie-breaking relies on.
    pub fn build(tree: &SizeTree, layout: &LayoutResult) -> Self {
        let rects = layout.rects();
        let view_root = rects.first().map_or(tree.root(), |r| r.node);
        let mut entries: HashMap<NodeId, Entry> = HashMap::with_capacity(rects.len());
        for nr in rects {
            let parent = if nr.node == view_root {
                None
            } else {
                tree.parent_of(nr.node)
            };
            entries.insert(
                nr.node,
                Entry {
                    rect: nr.rect,
                    parent,
                    children: Vec::new(),
                    fold: None,
                },
            );
            if let Some(p) = parent
                && let Some(parent_entry) = entries.get_mut(&p)
            {
                parent_entry.children.push(nr.node);
            }
        }
        let mut folds = Vec::with_capacity(layout.folds().len());
        for fold in layout.folds() {
            let idx = folds.len();
            folds.push(fold.rect);
            if let Some(entry) = entries.get_mut(&fold.parent) {
                entry.fold = Some(idx);
            }
        }
        Self {
            view_root,
            entries,
            folds,
        }
    }

    /// The root of the pass this index was built from.
    pub fn view_root(&self) -> NodeId {
        self.view_root
    }

    /// Deepest target containing the point, or `None` outside the view root.
    ///
    /// Boundary ties go to the later-ordered sibling in layout order (the
    /// fold bucket, placed last, outranks every real sibling on its edges).
    pub fn hit_test(&self, point: Point) -> Option<HitTarget> {
        let mut current = self.entries.get(&self.view_root)?;
        if !contains_closed(current.rect, point) {
            return None;
        }
        let mut current_id = self.view_root;
        loop {
            if let Some(fold_idx) = current.fold
                && contains_closed(self.folds[fold_idx], point)
            {
                return Some(HitTarget::Fold { parent: current_id });
            }
            let descend = current
                .children
                .iter()
                .rev()
                .find(|&&child| contains_closed(self.entries[&child].rect, point));
            match descend {
                Some(&child) => {
                    current_id = child;
                    current = &self.entries[&child];
                }
                None => return Some(HitTarget::Node(current_id)),
            }
        }
    }

    /// Chain from the view root down to `id`, both inclusive.
    ///
    /// Returns `None` when `id` was not laid out in this pass.
    pub fn ancestors_of(&self, id: NodeId) -> Option<SmallVec<[NodeId; 8]>> {
        let mut chain: SmallVec<[NodeId; 8]> = SmallVec::new();
        let mut current = self.entries.get(&id)?;
        chain.push(id);
        while let Some(parent) = current.parent {
            chain.push(parent);
            current = self.entries.get(&parent)?;
        }
        chain.reverse();
        Some(chain)
    }

    /// [`Self::ancestors_of`] mapped to paths, skipping the synthetic root's
    /// empty path.
    pub fn ancestor_paths(&self, tree: &SizeTree, id: NodeId) -> Option<Vec<String>> {
        Some(
            self.ancestors_of(id)?
                .into_iter()
                .map(|n| tree.node(n).path.clone())
                .filter(|p| !p.is_empty())
                .collect(),
        )
    }

    /// The rectangle of a laid-out node.
    pub fn rect_of(&self, id: NodeId) -> Option<Rect> {
        self.entries.get(&id).map(|e| e.rect)
    }
}

/// Closed containment on all edges. Combined with the reverse sibling scan
/// this is what makes shared-boundary ties deterministic.
fn contains_closed(rect: Rect, p: Point) -> bool {
    rect.x0 <= p.x && p.x <= rect.x1 && rect.y0 <= p.y && p.y <= rect.y1
}
