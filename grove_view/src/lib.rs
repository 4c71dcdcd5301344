// Copyright 2026 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grove View: drill-down navigation over treemap layout passes.
//!
//! [`Viewer`] owns a reconciled [`grove_tree::SizeTree`] and tracks which
//! subtree fills the viewport. Every navigation step runs a fresh layout
//! pass and rebuilds the hit index, so the visible state is always the
//! output of exactly one pass over the current view root:
//!
//! - [`Viewer::drill_into`] makes a visible interior node the view root;
//! - [`Viewer::drill_up`] returns to the parent view;
//! - [`Viewer::reset`] jumps back to the top-level view;
//! - [`Viewer::set_viewport`] re-lays the current view into a new rectangle.
//!
//! Navigation requests that make no sense in the current state come back as
//! [`InvalidTransition`] and leave the viewer untouched. Because a pass is a
//! pure function of tree, root, viewport and parameters, a stale request
//! can simply be dropped in favor of the newest one; there is nothing to
//! cancel mid-flight.
//!
//! ```
//! use grove_tree::{SizeTree, from_json_str, reconcile};
//! use grove_view::Viewer;
//! use kurbo::Rect;
//!
//! let raw = from_json_str(
//!     r#"[{"value": 868, "name": "Automator", "path": "Automator", "children": [
//!         {"value": 868, "name": "CropImages.action", "path": "Automator/CropImages.action"}
//!     ]}]"#,
//! )?;
//! let mut tree = SizeTree::build(raw)?.tree;
//! reconcile(&mut tree);
//!
//! let mut viewer = Viewer::new(tree, Rect::new(0.0, 0.0, 800.0, 600.0));
//! viewer.drill_into("Automator")?;
//! assert_eq!(viewer.view_path(), "Automator");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use grove_hit::{HitIndex, HitTarget};
use grove_layout::{LayoutParams, LayoutResult, RectRecord, layout};
use grove_tree::{NodeId, SizeTree};
use kurbo::{Point, Rect};

/// A navigation request that cannot be honored in the current state.
///
/// The viewer is unchanged after returning one of these.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTransition {
    /// The requested path names no node in the tree.
    #[error("no node with path `{0}`")]
    UnknownPath(String),
    /// The node exists but is not part of the current view.
    #[error("`{0}` is not visible in the current view")]
    NotVisible(String),
    /// The node is already the view root.
    #[error("`{0}` is already the view root")]
    AlreadyRoot(String),
    /// A leaf has no children to lay out, so it cannot become a view root.
    #[error("`{0}` is a leaf and cannot become the view root")]
    LeafTarget(String),
    /// Drill-up was requested at the top-level view.
    #[error("already at the top-level view")]
    AtRoot,
}

/// Navigation state machine over one [`SizeTree`].
#[derive(Debug)]
pub struct Viewer {
    tree: SizeTree,
    params: LayoutParams,
    viewport: Rect,
    view_root: NodeId,
    layout: LayoutResult,
    index: HitIndex,
}

impl Viewer {
    /// Start at the top-level view with default layout parameters.
    pub fn new(tree: SizeTree, viewport: Rect) -> Self {
        Self::with_params(tree, viewport, LayoutParams::default())
    }

    /// Start at the top-level view.
    pub fn with_params(tree: SizeTree, viewport: Rect, params: LayoutParams) -> Self {
        let view_root = tree.root();
        let layout = layout(&tree, view_root, viewport, &params);
        let index = HitIndex::build(&tree, &layout);
        Self {
            tree,
            params,
            viewport,
            view_root,
            layout,
            index,
        }
    }

    /// The tree being viewed.
    pub fn tree(&self) -> &SizeTree {
        &self.tree
    }

    /// The node currently filling the viewport.
    pub fn view_root(&self) -> NodeId {
        self.view_root
    }

    /// Path of the current view root; empty at the top-level view.
    pub fn view_path(&self) -> &str {
        &self.tree.node(self.view_root).path
    }

    /// The most recent layout pass.
    pub fn layout(&self) -> &LayoutResult {
        &self.layout
    }

    /// Make the node at `path` the view root, returning its id.
    ///
    /// The target must exist, be part of the current view (laid out or
    /// folded), not already be the root, and have children to show.
    pub fn drill_into(&mut self, path: &str) -> Result<NodeId, InvalidTransition> {
        let id = self
            .tree
            .node_by_path(path)
            .ok_or_else(|| InvalidTransition::UnknownPath(path.to_owned()))?;
        if id == self.view_root {
            return Err(InvalidTransition::AlreadyRoot(path.to_owned()));
        }
        if self.layout.slot_of(id).is_none() && !self.layout.is_folded(id) {
            return Err(InvalidTransition::NotVisible(path.to_owned()));
        }
        if self.tree.node(id).is_leaf() {
            return Err(InvalidTransition::LeafTarget(path.to_owned()));
        }
        tracing::debug!(path, "drilling into subtree");
        self.view_root = id;
        self.relayout();
        Ok(id)
    }

    /// Move the view root one level up, returning the new root's id.
    pub fn drill_up(&mut self) -> Result<NodeId, InvalidTransition> {
        let parent = self
            .tree
            .parent_of(self.view_root)
            .ok_or(InvalidTransition::AtRoot)?;
        tracing::debug!(from = self.view_path(), "drilling up");
        self.view_root = parent;
        self.relayout();
        Ok(parent)
    }

    /// Jump back to the top-level view. A no-op when already there.
    pub fn reset(&mut self) {
        if self.view_root != self.tree.root() {
            self.view_root = self.tree.root();
            self.relayout();
        }
    }

    /// Re-lay the current view into a new viewport rectangle.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.relayout();
    }

    /// Deepest target under the point in the current view.
    pub fn hit_test(&self, point: Point) -> Option<HitTarget> {
        self.index.hit_test(point)
    }

    /// Breadcrumb paths from the view root down to the node at `path`.
    pub fn ancestor_paths(&self, path: &str) -> Option<Vec<String>> {
        let id = self.tree.node_by_path(path)?;
        self.index.ancestor_paths(&self.tree, id)
    }

    /// Flat records of the current pass, for serialization or painting.
    pub fn records(&self) -> impl Iterator<Item = RectRecord> + '_ {
        self.layout.records(&self.tree)
    }

    fn relayout(&mut self) {
        self.layout = layout(&self.tree, self.view_root, self.viewport, &self.params);
        self.index = HitIndex::build(&self.tree, &self.layout);
    }
}
