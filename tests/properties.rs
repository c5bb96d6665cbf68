//! Property-based invariant tests for scrolling, layout, and navigation.
//!
//! Random entry trees (mixed row heights, including zero-height rows) and
//! random scroll operation sequences are checked against brute-force
//! reference computations.

use std::time::{Duration, Instant};

use proptest::prelude::*;

use entrylist::ui::{
    DrawList, Entry, EntryId, EntryList, ListSettings, RowContext, ScrollState,
};

/// Plain row of a fixed height that may hide itself.
struct Block {
    height: f32,
    shown: bool,
}

impl Entry for Block {
    fn height(&self) -> f32 {
        self.height
    }

    fn is_shown(&self) -> bool {
        self.shown
    }

    fn render(&self, _row: &RowContext<'_>, _out: &mut DrawList) {}
}

const HEIGHTS: [f32; 4] = [0.0, 10.0, 20.0, 35.0];

type Node = (u16, usize, bool, bool);

/// One node per element: `(parent selector, height index, expanded, shown)`.
fn tree_shape() -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(
        (
            any::<u16>(),
            0..HEIGHTS.len(),
            any::<bool>(),
            prop::bool::weighted(0.8),
        ),
        1..40,
    )
}

/// Build a list from a shape. Node `i` attaches under an earlier node or
/// becomes a root.
fn build(shape: &[Node], viewport: f32, now: Instant) -> (EntryList, Vec<EntryId>) {
    let mut list = EntryList::with_defaults(now);
    let mut ids: Vec<EntryId> = Vec::with_capacity(shape.len());
    for (i, &(sel, h, _, shown)) in shape.iter().enumerate() {
        let entry = Box::new(Block {
            height: HEIGHTS[h],
            shown,
        });
        let pick = sel as usize % (i + 1);
        let id = if pick == i {
            list.insert_root(entry)
        } else {
            list.insert(ids[pick], entry).expect("parent exists")
        };
        ids.push(id);
    }
    for (&id, &(_, _, expanded, _)) in ids.iter().zip(shape) {
        list.set_expanded(id, expanded, false);
    }
    list.resize(300.0, 2000.0, 0.0, viewport, now);
    list.update(now);
    (list, ids)
}

#[derive(Debug, Clone)]
enum ScrollOp {
    SetTarget(f32, bool),
    ScrollBy(f32, bool),
    SetMax(f32),
    Wait(u64),
}

fn scroll_op() -> impl Strategy<Value = ScrollOp> {
    prop_oneof![
        (-500.0f32..1500.0, any::<bool>()).prop_map(|(v, a)| ScrollOp::SetTarget(v, a)),
        (-300.0f32..300.0, any::<bool>()).prop_map(|(v, a)| ScrollOp::ScrollBy(v, a)),
        (0.0f32..1000.0).prop_map(ScrollOp::SetMax),
        (0u64..400).prop_map(ScrollOp::Wait),
    ]
}

proptest! {
    #[test]
    fn scroll_stays_within_elastic_bounds(ops in prop::collection::vec(scroll_op(), 1..40)) {
        let settings = ListSettings::default();
        let t0 = Instant::now();
        let mut now = t0;
        let mut scroll = ScrollState::new(&settings, now);
        scroll.set_max_scroll(500.0, false, now);
        let ext = settings.elastic_allowance + 1e-3;

        for op in ops {
            match op {
                ScrollOp::SetTarget(v, animated) => scroll.set_target(v, animated, now),
                ScrollOp::ScrollBy(d, animated) => scroll.scroll_by(d, animated, now),
                ScrollOp::SetMax(m) => scroll.set_max_scroll(m, false, now),
                ScrollOp::Wait(ms) => now += Duration::from_millis(ms),
            }
            scroll.tick(now);
            let v = scroll.get(now);
            prop_assert!(v >= -ext && v <= scroll.max_scroll() + ext, "offset {} out of bounds", v);
        }

        // Once all animations settle, the offset rests inside the bounds.
        for _ in 0..3 {
            now += Duration::from_secs(1);
            scroll.tick(now);
        }
        let v = scroll.get(now);
        prop_assert!(v >= -1e-3 && v <= scroll.max_scroll() + 1e-3, "settled at {}", v);
    }

    #[test]
    fn layout_matches_brute_force(
        shape in tree_shape(),
        viewport in 20.0f32..300.0,
        offset in 0.0f32..2000.0,
    ) {
        let t0 = Instant::now();
        let (mut list, _) = build(&shape, viewport, t0);
        list.scroll_to_offset(offset, false, t0);
        list.layout(t0);

        let view = list.viewport();
        let tree = list.tree();
        let mut y = view.y - list.scroll_offset();
        let mut expected = Vec::new();
        for (id, _) in tree.walk_visible() {
            let own = tree.own_height(id);
            if own > 0.0 && y < view.bottom() && y + own > view.y {
                expected.push((id, y));
            }
            y += own;
        }

        let actual: Vec<(EntryId, f32)> = list.rows().iter().map(|r| (r.id, r.area.y)).collect();
        prop_assert_eq!(actual.len(), expected.len());
        for ((a_id, a_y), (e_id, e_y)) in actual.iter().zip(&expected) {
            prop_assert_eq!(a_id, e_id);
            prop_assert!((a_y - e_y).abs() < 1e-3);
        }
        prop_assert!((list.content_height() - (y - view.y + list.scroll_offset())).abs() < 1e-2);
    }

    #[test]
    fn stepping_visits_every_target_once_in_order(shape in tree_shape()) {
        let t0 = Instant::now();
        let (mut list, _) = build(&shape, 200.0, t0);
        let expected: Vec<EntryId> = list.flatten(true).iter().map(|t| t.id).collect();

        let mut forward = Vec::new();
        while list.navigate_entries(true, t0) {
            forward.push(list.selection().map(|s| s.entry).expect("selected"));
            prop_assert!(forward.len() <= expected.len());
        }
        prop_assert_eq!(&forward, &expected);

        let mut backward = Vec::new();
        while list.navigate_entries(false, t0) {
            backward.push(list.selection().map(|s| s.entry).expect("selected"));
            prop_assert!(backward.len() <= expected.len());
        }
        // The walk back starts one step before the last target.
        let reversed: Vec<EntryId> = expected.iter().rev().skip(1).copied().collect();
        prop_assert_eq!(backward, reversed);
    }

    #[test]
    fn expand_and_collapse_are_idempotent(shape in tree_shape(), pick in any::<u16>()) {
        let t0 = Instant::now();
        let (mut list, ids) = build(&shape, 200.0, t0);
        let id = ids[pick as usize % ids.len()];
        let before_height = list.content_height();
        let before_rows = list.tree().walk_visible();
        let was_expanded = list.tree().is_expanded(id);

        let first = list.set_expanded(id, true, false);
        let height = list.content_height();
        prop_assert!(!list.set_expanded(id, true, false));
        prop_assert!((list.content_height() - height).abs() < 1e-3);
        prop_assert_eq!(first, list.tree().is_expandable(id) && !was_expanded);

        list.set_expanded(id, false, false);
        let collapsed = list.content_height();
        prop_assert!(!list.set_expanded(id, false, false));
        prop_assert!((list.content_height() - collapsed).abs() < 1e-3);

        // Restoring the original state restores the layout.
        list.set_expanded(id, was_expanded, false);
        prop_assert!((list.content_height() - before_height).abs() < 1e-3);
        prop_assert_eq!(list.tree().walk_visible(), before_rows);
    }
}
