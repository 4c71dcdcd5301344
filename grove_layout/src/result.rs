// Copyright 2026 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Output types of one layout pass.

use grove_tree::{NodeId, SizeTree};
use hashbrown::HashMap;
use kurbo::Rect;

bitflags::bitflags! {
    /// Flags on a laid-out rectangle.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RectFlags: u8 {
        /// The node has no children.
        const LEAF = 0b0000_0001;
        /// The rectangle is the root of this layout pass.
        const VIEW_ROOT = 0b0000_0010;
    }
}

/// One node's screen-space rectangle for the duration of one layout pass.
#[derive(Clone, Copy, Debug)]
pub struct NodeRect {
    /// The node this rectangle belongs to.
    pub node: NodeId,
    /// Screen-space geometry, fully contained within the parent's rectangle.
    pub rect: Rect,
    /// Depth below the view root (the view root sits at 0).
    pub depth: u16,
    /// Leaf / view-root flags.
    pub flags: RectFlags,
}

/// A group of sub-threshold siblings folded into one "other" bucket.
///
/// The members received no individual rectangles, but they are reported here
/// so navigation can still reach them by path lookup.
#[derive(Clone, Debug)]
pub struct Fold {
    /// Parent whose child list was folded.
    pub parent: NodeId,
    /// The folded children, in descending size order.
    pub members: Vec<NodeId>,
    /// The bucket's rectangle within the parent.
    pub rect: Rect,
    /// Depth of the bucket (same as the members would have had).
    pub depth: u16,
}

/// One record of the boundary output format: a path plus its geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct RectRecord {
    /// Node path, or `parent-path/label` for a fold bucket.
    pub path: String,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Rectangle width.
    pub width: f64,
    /// Rectangle height.
    pub height: f64,
    /// Depth below the view root.
    pub depth: u16,
    /// Whether this record is a fold bucket rather than a real node.
    pub folded: bool,
}

/// The full set of rectangles produced by one layout pass.
///
/// Created fresh on every pass and never mutated in place; a new pass for a
/// different view root supersedes it wholesale.
#[derive(Clone, Debug, Default)]
pub struct LayoutResult {
    pub(crate) rects: Vec<NodeRect>,
    pub(crate) slots: HashMap<NodeId, usize>,
    pub(crate) folds: Vec<Fold>,
    pub(crate) viewport: Rect,
    pub(crate) fold_label: String,
}

impl LayoutResult {
    /// All rectangles in deterministic emission order (parents before their
    /// children, siblings in layout order).
    pub fn rects(&self) -> &[NodeRect] {
        &self.rects
    }

    /// Index into [`Self::rects`] for a node, if it was laid out.
    pub fn slot_of(&self, id: NodeId) -> Option<usize> {
        self.slots.get(&id).copied()
    }

    /// The rectangle of a node, if it was laid out.
    pub fn rect_of(&self, id: NodeId) -> Option<&NodeRect> {
        self.slot_of(id).map(|slot| &self.rects[slot])
    }

    /// Every fold bucket produced by this pass.
    pub fn folds(&self) -> &[Fold] {
        &self.folds
    }

    /// Whether `id` is a member of any fold bucket in this pass.
    pub fn is_folded(&self, id: NodeId) -> bool {
        self.folds.iter().any(|f| f.members.contains(&id))
    }

    /// The viewport this pass filled.
    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Number of laid-out rectangles (excluding fold buckets).
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Whether the pass produced no rectangles.
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// The boundary output: one `{path, x, y, width, height, depth}` record
    /// per rectangle, followed by the fold bucket records.
    pub fn records<'a>(&'a self, tree: &'a SizeTree) -> impl Iterator<Item = RectRecord> + 'a {
        let nodes = self.rects.iter().map(|r| RectRecord {
            path: tree.node(r.node).path.clone(),
            x: r.rect.x0,
            y: r.rect.y0,
            width: r.rect.width(),
            height: r.rect.height(),
            depth: r.depth,
            folded: false,
        });
        let folds = self.folds.iter().map(|f| {
            let parent = &tree.node(f.parent).path;
            let path = if parent.is_empty() {
                self.fold_label.clone()
            } else {
                format!("{parent}/{}", self.fold_label)
            };
            RectRecord {
                path,
                x: f.rect.x0,
                y: f.rect.y0,
                width: f.rect.width(),
                height: f.rect.height(),
                depth: f.depth,
                folded: true,
            }
        });
        nodes.chain(folds)
    }
}
