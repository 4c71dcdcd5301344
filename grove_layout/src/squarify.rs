// Copyright 2026 the Grove Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The squarified layout pass.

use grove_tree::{NodeId, SizeTree};
use kurbo::Rect;

use crate::result::{Fold, LayoutResult, NodeRect, RectFlags};

/// Tuning knobs for one layout pass.
#[derive(Clone, Debug)]
pub struct LayoutParams {
    /// Children whose allotted area (px²) falls below this are folded into a
    /// synthetic "other" bucket per parent. `0.0` disables folding.
    pub min_visible_area: f64,
    /// Display label used for fold bucket records.
    pub fold_label: String,
    /// Recursion cap below the view root.
    pub max_depth: u16,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            min_visible_area: 1.0,
            fold_label: "other".to_owned(),
            max_depth: 64,
        }
    }
}

/// What a placed entry stands for: a real child or the fold bucket.
enum Entry {
    Node(NodeId),
    Bucket(Vec<NodeId>),
}

/// Lay out the subtree rooted at `root` into `viewport`.
///
/// Pure with respect to its inputs: the tree is only read, and every call
/// produces a fresh [`LayoutResult`]. The view root always receives the
/// whole viewport; descendants exactly partition their parent's rectangle
/// proportionally to their reconciled sizes.
pub fn layout(
    tree: &SizeTree,
    root: NodeId,
    viewport: Rect,
    params: &LayoutParams,
) -> LayoutResult {
    let mut out = LayoutResult {
        viewport,
        fold_label: params.fold_label.clone(),
        ..LayoutResult::default()
    };
    let mut flags = RectFlags::VIEW_ROOT;
    if tree.node(root).is_leaf() {
        flags |= RectFlags::LEAF;
    }
    push_rect(&mut out, root, viewport, 0, flags);
    layout_children(tree, root, viewport, 0, params, &mut out);
    tracing::debug!(
        root = %tree.node(root).path,
        rects = out.rects.len(),
        folds = out.folds.len(),
        "layout pass complete"
    );
    out
}

fn push_rect(out: &mut LayoutResult, node: NodeId, rect: Rect, depth: u16, flags: RectFlags) {
    let slot = out.rects.len();
    out.rects.push(NodeRect {
        node,
        rect,
        depth,
        flags,
    });
    out.slots.insert(node, slot);
}

fn layout_children(
    tree: &SizeTree,
    parent: NodeId,
    rect: Rect,
    depth: u16,
    params: &LayoutParams,
    out: &mut LayoutResult,
) {
    if depth >= params.max_depth || rect.area() <= 0.0 {
        return;
    }
    let children = tree.children_of(parent);
    if children.is_empty() {
        return;
    }

    // Descending size order; stable sort keeps the original child index as
    // the tie-break so equal sizes render deterministically.
    let mut items: Vec<(NodeId, f64)> = children
        .iter()
        .map(|&id| (id, tree.node(id).size_kb))
        .collect();
    items.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut weight_sum: f64 = items.iter().map(|&(_, w)| w).sum();
    if weight_sum <= 0.0 {
        // All-zero subtree: fall back to equal-area division, preserving
        // ordering, instead of dividing by zero.
        for item in &mut items {
            item.1 = 1.0;
        }
        weight_sum = items.len() as f64;
    }

    let total_area = rect.area();
    let mut areas: Vec<f64> = items
        .iter()
        .map(|&(_, w)| total_area * (w / weight_sum))
        .collect();

    // Fold the sub-threshold tail into one bucket. The largest child always
    // stays individually laid out, and a tail of one is not worth a bucket.
    let mut entries: Vec<Entry> = Vec::with_capacity(items.len());
    if params.min_visible_area > 0.0 {
        let first_small = areas
            .iter()
            .position(|&a| a < params.min_visible_area)
            .unwrap_or(areas.len())
            .max(1);
        if areas.len() - first_small >= 2 {
            let bucket_area: f64 = areas[first_small..].iter().sum();
            let members: Vec<NodeId> =
                items[first_small..].iter().map(|&(id, _)| id).collect();
            tracing::debug!(
                parent = %tree.node(parent).path,
                folded = members.len(),
                bucket_area,
                "folding sub-threshold children"
            );
            areas.truncate(first_small);
            items.truncate(first_small);
            entries.extend(items.iter().map(|&(id, _)| Entry::Node(id)));
            entries.push(Entry::Bucket(members));
            areas.push(bucket_area);
        }
    }
    if entries.is_empty() {
        entries.extend(items.iter().map(|&(id, _)| Entry::Node(id)));
    }

    let placed = squarify(&areas, rect);
    debug_assert_eq!(placed.len(), entries.len(), "one rect per entry");

    for (entry, child_rect) in entries.into_iter().zip(placed) {
        match entry {
            Entry::Node(id) => {
                let mut flags = RectFlags::empty();
                if tree.node(id).is_leaf() {
                    flags |= RectFlags::LEAF;
                }
                push_rect(out, id, child_rect, depth + 1, flags);
                layout_children(tree, id, child_rect, depth + 1, params, out);
            }
            Entry::Bucket(members) => {
                out.folds.push(Fold {
                    parent,
                    members,
                    rect: child_rect,
                    depth: depth + 1,
                });
            }
        }
    }
}

/// Squarified row placement following Bruls et al.: keep appending to the
/// current row while the row's worst aspect ratio does not degrade, then
/// fix the row along the shorter side of the remaining rectangle.
///
/// Returns one rectangle per input area, in order. The rectangles exactly
/// partition `bounds`: the last entry of each row and the last row flush to
/// absorb floating-point remainder.
fn squarify(areas: &[f64], bounds: Rect) -> Vec<Rect> {
    let mut out = Vec::with_capacity(areas.len());
    let mut cursor = Cursor {
        x: bounds.x0,
        y: bounds.y0,
        w: bounds.width().max(0.0),
        h: bounds.height().max(0.0),
    };

    let mut idx = 0_usize;
    let mut row_start = 0_usize;
    let mut row_sum = 0.0_f64;
    let mut row_min = f64::INFINITY;
    let mut row_max = 0.0_f64;

    while idx < areas.len() {
        let area = areas[idx];
        let side = cursor.w.min(cursor.h);
        let current = if row_sum > 0.0 {
            worst_aspect(row_min, row_max, row_sum, side)
        } else {
            f64::INFINITY
        };
        let next = worst_aspect(row_min.min(area), row_max.max(area), row_sum + area, side);

        if row_sum <= 0.0 || next <= current {
            row_sum += area;
            row_min = row_min.min(area);
            row_max = row_max.max(area);
            idx += 1;
        } else {
            layout_row(&areas[row_start..idx], row_sum, &mut cursor, false, &mut out);
            row_start = idx;
            row_sum = 0.0;
            row_min = f64::INFINITY;
            row_max = 0.0;
        }
    }
    if row_start < idx {
        layout_row(&areas[row_start..idx], row_sum, &mut cursor, true, &mut out);
    }
    out
}

/// Remaining sub-rectangle being subdivided.
struct Cursor {
    x: f64,
    y: f64,
    w: f64,
    h: f64,
}

/// Worst aspect ratio a row would have, per the squarify paper's `worst`.
/// Degenerate rows (zero sum, zero side, zero minimum) rank unplaceable.
fn worst_aspect(min_area: f64, max_area: f64, sum: f64, side: f64) -> f64 {
    if sum <= 0.0 || side <= 0.0 || min_area <= 0.0 {
        return f64::MAX;
    }
    let sum_sq = sum * sum;
    let side_sq = side * side;
    ((side_sq * max_area) / sum_sq).max(sum_sq / (side_sq * min_area))
}

/// Position one row and shrink the cursor. Always emits exactly one
/// rectangle per row entry, degenerate or not.
fn layout_row(row: &[f64], row_sum: f64, cursor: &mut Cursor, flush: bool, out: &mut Vec<Rect>) {
    // The row runs along the shorter side of the remaining rectangle.
    let horizontal = cursor.w <= cursor.h;
    let (main_len, other_len) = if horizontal {
        (cursor.w, cursor.h)
    } else {
        (cursor.h, cursor.w)
    };

    let mut thickness = if main_len > 0.0 && row_sum > 0.0 {
        row_sum / main_len
    } else {
        0.0
    };
    if flush || thickness > other_len {
        thickness = other_len;
    }

    let mut offset = 0.0_f64;
    for (i, &area) in row.iter().enumerate() {
        let mut length = if thickness > 0.0 { area / thickness } else { 0.0 };
        // The final entry absorbs the floating-point remainder of the row.
        if i == row.len() - 1 {
            length = (main_len - offset).max(0.0);
        }
        let r = if horizontal {
            Rect::new(
                cursor.x + offset,
                cursor.y,
                cursor.x + offset + length,
                cursor.y + thickness,
            )
        } else {
            Rect::new(
                cursor.x,
                cursor.y + offset,
                cursor.x + thickness,
                cursor.y + offset + length,
            )
        };
        out.push(r);
        offset += length;
    }

    if horizontal {
        cursor.y += thickness;
        cursor.h = (cursor.h - thickness).max(0.0);
    } else {
        cursor.x += thickness;
        cursor.w = (cursor.w - thickness).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grove_tree::{SizeTree, from_json_str, reconcile};

    const EPSILON: f64 = 1e-6;

    fn tree(json: &str) -> SizeTree {
        let mut t = SizeTree::build(from_json_str(json).unwrap()).unwrap().tree;
        reconcile(&mut t);
        t
    }

    fn no_fold() -> LayoutParams {
        LayoutParams {
            min_visible_area: 0.0,
            ..LayoutParams::default()
        }
    }

    /// A moderately irregular three-level tree used by the property tests.
    fn sample_tree() -> SizeTree {
        tree(
            r#"[
                {"value": 520, "name": "Library", "path": "Library", "children": [
                    {"value": 200, "name": "Caches", "path": "Library/Caches", "children": [
                        {"value": 120, "name": "com.apple.bird", "path": "Library/Caches/com.apple.bird"},
                        {"value": 50, "name": "Maps", "path": "Library/Caches/Maps"},
                        {"value": 30, "name": "Metadata", "path": "Library/Caches/Metadata"}
                    ]},
                    {"value": 300, "name": "Application Support", "path": "Library/Application Support", "children": [
                        {"value": 180, "name": "MobileSync", "path": "Library/Application Support/MobileSync"},
                        {"value": 120, "name": "Dock", "path": "Library/Application Support/Dock"}
                    ]},
                    {"value": 20, "name": "Fonts", "path": "Library/Fonts"}
                ]},
                {"value": 140, "name": "Applications", "path": "Applications", "children": [
                    {"value": 90, "name": "Notes.app", "path": "Applications/Notes.app"},
                    {"value": 50, "name": "Chess.app", "path": "Applications/Chess.app"}
                ]},
                {"value": 40, "name": "opt", "path": "opt"}
            ]"#,
        )
    }

    fn layout_sample() -> (SizeTree, LayoutResult) {
        let t = sample_tree();
        let result = layout(&t, t.root(), Rect::new(0.0, 0.0, 1024.0, 768.0), &no_fold());
        (t, result)
    }

    #[test]
    fn area_conservation_holds_for_every_internal_node() {
        let (t, result) = layout_sample();
        for nr in result.rects() {
            let children = t.children_of(nr.node);
            if children.is_empty() {
                continue;
            }
            let child_total: f64 = children
                .iter()
                .filter_map(|&c| result.rect_of(c))
                .map(|c| c.rect.area())
                .sum();
            assert!(
                (child_total - nr.rect.area()).abs() < EPSILON,
                "children of {} must cover the parent exactly, got {child_total} vs {}",
                t.node(nr.node).path,
                nr.rect.area()
            );
        }
    }

    #[test]
    fn containment_holds_for_every_rect() {
        let (t, result) = layout_sample();
        for nr in result.rects() {
            let Some(parent) = t.parent_of(nr.node) else {
                continue;
            };
            let Some(parent_rect) = result.rect_of(parent) else {
                continue;
            };
            let p = parent_rect.rect;
            let c = nr.rect;
            assert!(
                c.x0 >= p.x0 - EPSILON
                    && c.y0 >= p.y0 - EPSILON
                    && c.x1 <= p.x1 + EPSILON
                    && c.y1 <= p.y1 + EPSILON,
                "rect of {} escapes its parent",
                t.node(nr.node).path
            );
        }
    }

    #[test]
    fn siblings_never_overlap() {
        let (t, result) = layout_sample();
        for nr in result.rects() {
            let siblings = t.children_of(nr.node);
            for (i, &a) in siblings.iter().enumerate() {
                for &b in &siblings[i + 1..] {
                    let (Some(ra), Some(rb)) = (result.rect_of(a), result.rect_of(b)) else {
                        continue;
                    };
                    let overlap = ra.rect.intersect(rb.rect);
                    let overlap_area = overlap.width().max(0.0) * overlap.height().max(0.0);
                    assert!(
                        overlap_area < EPSILON,
                        "siblings {} and {} overlap by {overlap_area}",
                        t.node(a).path,
                        t.node(b).path
                    );
                }
            }
        }
    }

    #[test]
    fn layout_is_bit_identical_across_reruns() {
        let t = sample_tree();
        let viewport = Rect::new(0.0, 0.0, 1024.0, 768.0);
        let first = layout(&t, t.root(), viewport, &no_fold());
        let second = layout(&t, t.root(), viewport, &no_fold());
        assert_eq!(first.rects().len(), second.rects().len());
        for (a, b) in first.rects().iter().zip(second.rects()) {
            assert_eq!(a.node, b.node);
            assert_eq!(a.rect, b.rect, "reruns must be bit-identical");
        }
    }

    #[test]
    fn growing_one_child_grows_its_rect_and_shrinks_no_sibling_gains() {
        let before = tree(
            r#"[
                {"value": 100, "name": "a", "path": "a"},
                {"value": 200, "name": "b", "path": "b"},
                {"value": 300, "name": "c", "path": "c"}
            ]"#,
        );
        let after = tree(
            r#"[
                {"value": 150, "name": "a", "path": "a"},
                {"value": 200, "name": "b", "path": "b"},
                {"value": 300, "name": "c", "path": "c"}
            ]"#,
        );
        let viewport = Rect::new(0.0, 0.0, 640.0, 480.0);
        let l0 = layout(&before, before.root(), viewport, &no_fold());
        let l1 = layout(&after, after.root(), viewport, &no_fold());

        let area = |l: &LayoutResult, t: &SizeTree, path: &str| {
            l.rect_of(t.node_by_path(path).unwrap()).unwrap().rect.area()
        };
        assert!(
            area(&l1, &after, "a") > area(&l0, &before, "a") + EPSILON,
            "grown child must strictly gain area"
        );
        for sibling in ["b", "c"] {
            assert!(
                area(&l1, &after, sibling) <= area(&l0, &before, sibling) + EPSILON,
                "sibling {sibling} must not gain area"
            );
        }
    }

    #[test]
    fn two_children_split_in_exact_ratio() {
        // 800x600 with children 100 and 300: 480,000 px² split 1:3.
        let t = tree(
            r#"[
                {"value": 100, "name": "small", "path": "small"},
                {"value": 300, "name": "big", "path": "big"}
            ]"#,
        );
        let result = layout(&t, t.root(), Rect::new(0.0, 0.0, 800.0, 600.0), &no_fold());
        let small = result.rect_of(t.node_by_path("small").unwrap()).unwrap();
        let big = result.rect_of(t.node_by_path("big").unwrap()).unwrap();
        assert!((small.rect.area() - 120_000.0).abs() < EPSILON);
        assert!((big.rect.area() - 360_000.0).abs() < EPSILON);
    }

    #[test]
    fn lone_leaf_receives_the_whole_viewport() {
        let t = tree(r#"[{"value": 40, "name": "Accessibility", "path": "Accessibility"}]"#);
        let id = t.node_by_path("Accessibility").unwrap();
        let viewport = Rect::new(0.0, 0.0, 200.0, 100.0);
        // Laid out alone as the view root.
        let result = layout(&t, id, viewport, &no_fold());
        assert_eq!(result.len(), 1);
        let nr = result.rect_of(id).unwrap();
        assert_eq!(nr.rect, viewport);
        assert!(nr.flags.contains(RectFlags::LEAF | RectFlags::VIEW_ROOT));
    }

    #[test]
    fn exact_child_sum_partitions_without_remainder() {
        // Fixture scenario: AddressBook Plug-Ins declares 1904 and its five
        // children sum to exactly 1904, so the partition has no slack.
        let t = tree(
            r#"[
                {"value": 1904, "name": "AddressBook Plug-Ins", "path": "ab", "children": [
                    {"value": 616, "name": "Sync", "path": "ab/Sync"},
                    {"value": 436, "name": "SMS", "path": "ab/SMS"},
                    {"value": 400, "name": "Exchange", "path": "ab/Exchange"},
                    {"value": 288, "name": "Directory", "path": "ab/Directory"},
                    {"value": 164, "name": "LDAP", "path": "ab/LDAP"}
                ]}
            ]"#,
        );
        let result = layout(&t, t.root(), Rect::new(0.0, 0.0, 952.0, 400.0), &no_fold());
        let parent = result.rect_of(t.node_by_path("ab").unwrap()).unwrap();
        let child_total: f64 = t
            .children_of(t.node_by_path("ab").unwrap())
            .iter()
            .map(|&c| result.rect_of(c).unwrap().rect.area())
            .sum();
        assert!(
            (child_total - parent.rect.area()).abs() < EPSILON,
            "children must partition the parent without remainder"
        );
    }

    #[test]
    fn single_child_fills_parent() {
        let t = tree(
            r#"[
                {"value": 10, "name": "dir", "path": "dir", "children": [
                    {"value": 10, "name": "only", "path": "dir/only"}
                ]}
            ]"#,
        );
        let viewport = Rect::new(0.0, 0.0, 300.0, 500.0);
        let result = layout(&t, t.root(), viewport, &no_fold());
        let only = result.rect_of(t.node_by_path("dir/only").unwrap()).unwrap();
        let dir = result.rect_of(t.node_by_path("dir").unwrap()).unwrap();
        assert_eq!(only.rect, dir.rect, "a single child takes the entire parent");
    }

    #[test]
    fn all_zero_children_divide_equally() {
        let t = tree(
            r#"[
                {"value": 0, "name": "a", "path": "a"},
                {"value": 0, "name": "b", "path": "b"},
                {"value": 0, "name": "c", "path": "c"},
                {"value": 0, "name": "d", "path": "d"}
            ]"#,
        );
        let result = layout(&t, t.root(), Rect::new(0.0, 0.0, 400.0, 400.0), &no_fold());
        for path in ["a", "b", "c", "d"] {
            let nr = result.rect_of(t.node_by_path(path).unwrap()).unwrap();
            assert!(
                (nr.rect.area() - 40_000.0).abs() < EPSILON,
                "equal-area fallback must give each zero child a quarter"
            );
        }
    }

    #[test]
    fn sub_threshold_tail_folds_into_reported_bucket() {
        let t = tree(
            r#"[
                {"value": 0, "name": "dust", "path": "dust", "children": [
                    {"value": 995000, "name": "big", "path": "dust/big"},
                    {"value": 2500, "name": "mid", "path": "dust/mid"},
                    {"value": 1500, "name": "midter", "path": "dust/midter"},
                    {"value": 500, "name": "tiny1", "path": "dust/tiny1"},
                    {"value": 300, "name": "tiny2", "path": "dust/tiny2"},
                    {"value": 200, "name": "tiny3", "path": "dust/tiny3"}
                ]}
            ]"#,
        );
        // 1000x1000 viewport: each KB maps to about 1 px², so the three
        // sub-1000 entries fall under a 1000 px² threshold.
        let params = LayoutParams {
            min_visible_area: 1000.0,
            ..LayoutParams::default()
        };
        let result = layout(&t, t.root(), Rect::new(0.0, 0.0, 1000.0, 1000.0), &params);
        assert_eq!(result.folds().len(), 1);
        let fold = &result.folds()[0];
        assert_eq!(fold.members.len(), 3);
        for path in ["dust/tiny1", "dust/tiny2", "dust/tiny3"] {
            let id = t.node_by_path(path).unwrap();
            assert!(result.rect_of(id).is_none(), "{path} must not get its own rect");
            assert!(result.is_folded(id), "{path} must be reported in the fold");
        }
        // Bucket plus kept children still cover the parent exactly.
        let dust = result.rect_of(t.node_by_path("dust").unwrap()).unwrap();
        let kept: f64 = ["dust/big", "dust/mid", "dust/midter"]
            .iter()
            .map(|p| result.rect_of(t.node_by_path(p).unwrap()).unwrap().rect.area())
            .sum();
        assert!((kept + fold.rect.area() - dust.rect.area()).abs() < EPSILON);
    }

    #[test]
    fn records_cover_nodes_and_folds() {
        let t = sample_tree();
        let params = LayoutParams {
            min_visible_area: 50_000.0,
            ..LayoutParams::default()
        };
        let result = layout(&t, t.root(), Rect::new(0.0, 0.0, 640.0, 480.0), &params);
        let records: Vec<_> = result.records(&t).collect();
        assert_eq!(records.len(), result.len() + result.folds().len());
        assert!(records.iter().filter(|r| r.folded).count() == result.folds().len());
        for record in records.iter().filter(|r| r.folded) {
            assert!(record.path.ends_with("/other") || record.path == "other");
        }
    }

    #[test]
    fn zero_area_viewport_terminates_at_the_root() {
        let t = sample_tree();
        let result = layout(&t, t.root(), Rect::new(10.0, 10.0, 10.0, 10.0), &no_fold());
        assert_eq!(result.len(), 1, "zero remaining area stops recursion");
    }
}
