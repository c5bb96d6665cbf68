use std::time::Instant;

use smallvec::SmallVec;

use super::list::EntryList;
use super::{EntryId, Rect};

/// Keyboard selection: an entry, optionally narrowed to one of its
/// sub-targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetRef {
    pub entry: EntryId,
    pub sub: Option<usize>,
}

impl TargetRef {
    pub fn entry(entry: EntryId) -> Self {
        Self { entry, sub: None }
    }
}

/// Flattened view of one navigable entry. Rebuilt on every navigation
/// query, never cached across structural changes.
#[derive(Debug, Clone)]
pub struct NavTarget {
    pub id: EntryId,
    pub parent: Option<EntryId>,
    pub depth: usize,
    /// Screen-space area of the entry's own row. Zero-sized for entries
    /// that are not currently revealed.
    pub area: Rect,
    /// Screen-space areas of the entry's sub-targets, in order.
    pub subs: SmallVec<[Rect; 4]>,
    /// Remembered sub-target, already validated against `subs`.
    pub last_sub: Option<usize>,
}

/// Position of the vertical navigation cursor. `Before` and `After` are
/// the sentinels one step past either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    Before,
    At(usize),
    After,
}

/// Move `cursor` one step over a sequence of `len` targets. Never wraps:
/// stepping past an end yields (and stays on) the matching sentinel.
pub fn step(cursor: Cursor, forward: bool, len: usize) -> Cursor {
    if len == 0 {
        return if forward { Cursor::After } else { Cursor::Before };
    }
    match (cursor, forward) {
        (Cursor::Before, true) => Cursor::At(0),
        (Cursor::Before, false) => Cursor::Before,
        (Cursor::After, true) => Cursor::After,
        (Cursor::After, false) => Cursor::At(len - 1),
        (Cursor::At(i), true) if i + 1 >= len => Cursor::After,
        (Cursor::At(i), true) => Cursor::At(i + 1),
        (Cursor::At(0), false) => Cursor::Before,
        (Cursor::At(i), false) => Cursor::At((i - 1).min(len - 1)),
    }
}

/// Index of the sub-target in `candidates` overlapping `reference` the
/// most horizontally. `None` when nothing overlaps.
fn closest_sub(reference: Rect, candidates: &[Rect]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, r) in candidates.iter().enumerate() {
        let overlap = reference.horizontal_overlap(r);
        if overlap > 0.0 && best.is_none_or(|(_, b)| overlap > b) {
            best = Some((i, overlap));
        }
    }
    best.map(|(i, _)| i)
}

impl EntryList {
    /// Navigable entries in display order: each navigable entry followed by
    /// its descendants. With `only_visible`, hidden entries and the children
    /// of collapsed groups are skipped.
    pub fn flatten(&self, only_visible: bool) -> Vec<NavTarget> {
        let mut out = Vec::new();
        let mut y = self.viewport().y - self.scroll_offset();
        for &root in self.tree().roots() {
            self.flatten_node(root, None, 0, only_visible, true, &mut y, &mut out);
        }
        out
    }

    #[allow(clippy::too_many_arguments)]
    fn flatten_node(
        &self,
        id: EntryId,
        parent: Option<EntryId>,
        depth: usize,
        only_visible: bool,
        revealed: bool,
        y: &mut f32,
        out: &mut Vec<NavTarget>,
    ) {
        let tree = self.tree();
        let Some(node) = tree.node(id) else {
            return;
        };
        let visible = tree.is_visible(id);
        if only_visible && !visible {
            return;
        }
        if !node.entry.is_navigable() {
            if revealed {
                *y += tree.total_height(id);
            }
            return;
        }
        let revealed = revealed && visible;
        let area = if revealed {
            let h = tree.own_height(id);
            let area = self.row_area(*y, h, depth);
            *y += h;
            area
        } else {
            Rect::default()
        };
        let subs: SmallVec<[Rect; 4]> = (0..node.entry.sub_target_count())
            .map(|i| node.entry.sub_target_area(area, i))
            .collect();
        let last_sub = node.last_sub.filter(|&s| s < subs.len());
        out.push(NavTarget {
            id,
            parent,
            depth,
            area,
            subs,
            last_sub,
        });
        if only_visible && !node.expanded {
            return;
        }
        let children_revealed = revealed && node.expanded;
        for &child in &node.children {
            self.flatten_node(
                child,
                Some(id),
                depth + 1,
                only_visible,
                children_revealed,
                y,
                out,
            );
        }
    }

    /// Resolve the stored selection against a fresh flattening. A stale
    /// selection falls back to its nearest ancestor still present, or is
    /// cleared. Returns the target index and validated sub-target.
    pub(crate) fn resolve_selection(
        &mut self,
        targets: &[NavTarget],
    ) -> Option<(usize, Option<usize>)> {
        let selected = self.selected?;
        if let Some(i) = targets.iter().position(|t| t.id == selected.entry) {
            let sub = selected.sub.filter(|&s| s < targets[i].subs.len());
            if sub != selected.sub {
                self.selected = Some(TargetRef {
                    entry: selected.entry,
                    sub,
                });
            }
            return Some((i, sub));
        }
        for ancestor in self.tree().ancestors(selected.entry) {
            if let Some(i) = targets.iter().position(|t| t.id == ancestor) {
                log::debug!(
                    "selection {:?} is stale, falling back to {:?}",
                    selected.entry,
                    ancestor
                );
                self.selected = Some(TargetRef::entry(ancestor));
                return Some((i, None));
            }
        }
        log::debug!("selection {:?} is stale, clearing", selected.entry);
        self.selected = None;
        None
    }

    /// Currently selected target, after stale-selection fallback.
    pub fn selected_target(&mut self) -> Option<TargetRef> {
        let targets = self.flatten(true);
        self.resolve_selection(&targets)?;
        self.selected
    }

    /// Move the vertical cursor by one target. Landing on an entry with
    /// sub-targets selects its remembered sub-target, else the one closest
    /// to the current sub-target, else the first. Returns false when the
    /// cursor would leave the sequence.
    pub fn navigate_entries(&mut self, forward: bool, now: Instant) -> bool {
        let targets = self.flatten(true);
        if targets.is_empty() {
            self.selected = None;
            return false;
        }
        let current = self.resolve_selection(&targets);
        let cursor = match current {
            Some((i, _)) => Cursor::At(i),
            None if forward => Cursor::Before,
            None => Cursor::After,
        };
        let Cursor::At(next) = step(cursor, forward, targets.len()) else {
            return false;
        };
        let target = &targets[next];
        let sub = if target.subs.is_empty() {
            None
        } else {
            let reference = current.and_then(|(i, s)| s.map(|s| targets[i].subs[s]));
            Some(
                target
                    .last_sub
                    .or_else(|| reference.and_then(|r| closest_sub(r, &target.subs)))
                    .unwrap_or(0),
            )
        };
        self.select(
            TargetRef {
                entry: target.id,
                sub,
            },
            now,
        );
        true
    }

    /// Move across the selected entry's sub-targets. Returns false at either
    /// boundary or when the entry has none.
    pub fn navigate_sub(&mut self, forward: bool, now: Instant) -> bool {
        let targets = self.flatten(true);
        let Some((i, sub)) = self.resolve_selection(&targets) else {
            return false;
        };
        let count = targets[i].subs.len();
        if count == 0 {
            return false;
        }
        let cursor = match sub {
            Some(s) => Cursor::At(s),
            None if forward => Cursor::Before,
            None => Cursor::After,
        };
        let Cursor::At(next) = step(cursor, forward, count) else {
            return false;
        };
        self.select(
            TargetRef {
                entry: targets[i].id,
                sub: Some(next),
            },
            now,
        );
        true
    }

    /// Horizontal navigation. Moves across sub-targets first; at a boundary
    /// stepping in expands a collapsed group and stepping out collapses an
    /// expanded one or selects the enclosing group.
    pub fn navigate_horizontal(&mut self, forward: bool, recursive: bool, now: Instant) -> bool {
        if self.navigate_sub(forward, now) {
            return true;
        }
        let Some(target) = self.selected_target() else {
            return false;
        };
        let id = target.entry;
        let expandable = self.tree().is_expandable(id);
        let expanded = self.tree().is_expanded(id);
        if forward {
            if expandable && !expanded {
                return self.set_expanded(id, true, recursive);
            }
            return false;
        }
        if expandable && expanded {
            return self.set_expanded(id, false, recursive);
        }
        let enclosing = self
            .tree()
            .ancestors(id)
            .into_iter()
            .find(|&a| self.tree().is_expandable(a));
        match enclosing {
            Some(group) => {
                self.select(TargetRef::entry(group), now);
                true
            }
            None => false,
        }
    }

    /// Select `target`: remember the sub-target, focus the entry, and keep
    /// it in view.
    pub(crate) fn select(&mut self, target: TargetRef, now: Instant) {
        self.selected = Some(target);
        let part = {
            let tree = self.tree_mut();
            if let Some(node) = tree.node_mut(target.entry) {
                if target.sub.is_some() {
                    node.last_sub = target.sub;
                }
                node.entry.on_navigate(target.sub);
                let parts = node.entry.focus_parts();
                let part = target.sub.map_or(0, |s| s as u16);
                (part < parts).then_some(part)
            } else {
                None
            }
        };
        self.tree_mut().focus_entry(target.entry, part);
        self.ensure_visible(target.entry, now);
    }
}
