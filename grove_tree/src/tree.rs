// Copyright 2026 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed size tree: construction and queries.

use hashbrown::HashMap;

use crate::error::{ConstructionWarning, TreeError};
use crate::input::RawNode;

/// Construction stops descending past this depth and reports the subtree.
const DEPTH_CAP: u16 = 512;

/// Identifier for a node in a [`SizeTree`].
///
/// Plain arena index: the tree is immutable once built, so no generation is
/// carried. Ids are only meaningful for the tree that produced them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) const fn new(idx: usize) -> Self {
        #[allow(
            clippy::cast_possible_truncation,
            reason = "NodeId uses 32-bit indices by design."
        )]
        Self(idx as u32)
    }

    /// The underlying arena index.
    pub const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// One filesystem entry in a [`SizeTree`].
#[derive(Debug, Clone)]
pub struct Node {
    /// Display label, non-empty for every node except the synthetic root.
    pub name: String,
    /// Unique identifier within the tree; empty for the synthetic root.
    pub path: String,
    /// Authoritative size in KB once [`reconcile`](crate::reconcile) has run.
    pub size_kb: f64,
    /// Optional decorative URI carried through from the input.
    pub link: Option<String>,
    /// Distance from the synthetic root (which sits at depth 0).
    pub depth: u16,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    /// The node's parent, or `None` for the synthetic root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// The node's children in input order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Result of [`SizeTree::build`]: the tree plus every violation collected.
#[derive(Debug)]
pub struct BuildOutcome {
    /// The constructed tree.
    pub tree: SizeTree,
    /// Non-fatal violations, one per excluded node.
    pub warnings: Vec<ConstructionWarning>,
}

/// Normalized, validated in-memory size tree.
///
/// All nodes live in a flat arena with parent/child indices; a path map
/// supports O(1) lookup. Insertion order is preorder, so parents always
/// precede their children in the arena, which the aggregation pass exploits.
#[derive(Debug, Clone)]
pub struct SizeTree {
    nodes: Vec<Node>,
    by_path: HashMap<String, NodeId>,
}

impl SizeTree {
    /// Build a tree from decoded input, collecting violations instead of
    /// failing on the first.
    ///
    /// A node with an empty name, a negative size, or a path an earlier node
    /// already claimed is excluded together with its subtree and reported.
    /// Fails only when nothing valid remains ([`TreeError::Empty`]).
    pub fn build(roots: Vec<RawNode>) -> Result<BuildOutcome, TreeError> {
        let mut tree = Self {
            nodes: Vec::new(),
            by_path: HashMap::new(),
        };
        // Synthetic root above the top-level array. Zero declared size; the
        // aggregation pass replaces it with the child sum.
        tree.nodes.push(Node {
            name: String::new(),
            path: String::new(),
            size_kb: 0.0,
            link: None,
            depth: 0,
            parent: None,
            children: Vec::new(),
        });
        tree.by_path.insert(String::new(), NodeId::new(0));

        let mut warnings = Vec::new();
        let root = NodeId::new(0);
        for raw in roots {
            tree.insert(raw, root, 1, &mut warnings);
        }

        if tree.nodes[0].children.is_empty() {
            return Err(TreeError::Empty);
        }
        for w in &warnings {
            tracing::warn!(warning = %w, "excluded node during tree construction");
        }
        Ok(BuildOutcome { tree, warnings })
    }

    fn insert(
        &mut self,
        raw: RawNode,
        parent: NodeId,
        depth: u16,
        warnings: &mut Vec<ConstructionWarning>,
    ) {
        if raw.name.is_empty() {
            warnings.push(ConstructionWarning::EmptyName { path: raw.path });
            return;
        }
        // Non-finite sizes (NaN, infinities) fall in the same bucket.
        if raw.value < 0.0 || !raw.value.is_finite() {
            warnings.push(ConstructionWarning::NegativeSize {
                path: raw.path,
                size_kb: raw.value,
            });
            return;
        }
        if depth > DEPTH_CAP {
            warnings.push(ConstructionWarning::DepthExceeded {
                path: raw.path,
                limit: DEPTH_CAP,
            });
            return;
        }
        if self.by_path.contains_key(&raw.path) {
            warnings.push(ConstructionWarning::DuplicatePath { path: raw.path });
            return;
        }

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            name: raw.name,
            path: raw.path.clone(),
            size_kb: raw.value,
            link: raw.link,
            depth,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.by_path.insert(raw.path, id);
        self.nodes[parent.idx()].children.push(id);

        for child in raw.children.into_iter().flatten() {
            self.insert(child, id, depth + 1, warnings);
        }
    }

    /// The synthetic root above the top-level input nodes.
    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Access a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` did not come from this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.idx()]
    }

    /// Children of a node in input order.
    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.idx()].children
    }

    /// Parent of a node, or `None` for the synthetic root.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.idx()].parent
    }

    /// Look a node up by its path. The synthetic root answers to `""`.
    pub fn node_by_path(&self, path: &str) -> Option<NodeId> {
        self.by_path.get(path).copied()
    }

    /// Number of nodes, including the synthetic root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the synthetic root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Preorder (parent before children) traversal of all node ids.
    ///
    /// Arena insertion order is preorder, so this is a plain index walk.
    pub fn iter_depth_first(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Ancestor chain of `id`, root first, `id` last. The synthetic root is
    /// included as the first element.
    pub fn ancestors_of(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent_of(current) {
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        chain
    }
}
