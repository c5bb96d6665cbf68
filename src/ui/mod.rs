mod animation;
pub mod demo;
mod draw;
mod entry;
mod focus;
mod input;
mod keybindings;
mod list;
mod nav;
mod scroll;
mod search;
mod settings;
mod theme;

pub use animation::{Easing, ease};
pub use draw::{DrawList, PanelCommand, TextCommand};
pub use entry::{Entry, RowContext};
pub use focus::FocusItem;
pub use input::MouseButton;
pub use keybindings::{Action, KeyBindings, KeyCombo, ModifierFlags};
pub use list::{EntryList, RowLayout};
pub use nav::{Cursor, NavTarget, TargetRef, step};
pub use scroll::{ScrollState, scroll_for, thumb_geometry};
pub use search::{CompiledPattern, SearchHistory, SearchQuery, SearchResult};
pub use settings::ListSettings;
pub use theme::Theme;

use std::cell::Cell;
use std::time::Instant;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    /// Handle into the entry arena. Stable across insertions/removals.
    pub struct EntryId;
}

// ---------------------------------------------------------------------------
// Geometry primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Returns true if the point (px, py) is inside this rectangle.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Length of the overlap between the horizontal spans of two rects.
    pub fn horizontal_overlap(&self, other: &Rect) -> f32 {
        (self.right().min(other.right()) - self.x.max(other.x)).max(0.0)
    }
}

// ---------------------------------------------------------------------------
// Entry node (arena entry)
// ---------------------------------------------------------------------------

/// Arena entry pairing an `Entry` with tree, expansion, and focus metadata.
pub(crate) struct EntryNode {
    pub entry: Box<dyn Entry>,
    pub parent: Option<EntryId>,
    pub children: Vec<EntryId>,
    pub expanded: bool,
    /// Sub-target selected the last time navigation visited this entry.
    /// Validated against `sub_target_count` before use.
    pub last_sub: Option<usize>,
    /// This node's link in the focus chain.
    pub focused: Option<FocusItem>,
    /// Hidden by search filter mode.
    pub filtered: bool,
    /// Cached `total_height`: own row plus expanded descendants.
    pub subtree_height: f32,
}

impl EntryNode {
    fn new(entry: Box<dyn Entry>, parent: Option<EntryId>) -> Self {
        Self {
            entry,
            parent,
            children: Vec::new(),
            expanded: false,
            last_sub: None,
            focused: None,
            filtered: false,
            subtree_height: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// EntryTree
// ---------------------------------------------------------------------------

/// Arena-backed ordered tree of list entries.
///
/// Groups are entries with children; children only contribute to layout
/// while their group is expanded. Structural changes bump `revision`, which
/// derived state (search matches) uses to know when to recompute.
///
/// Subtree heights are cached per node and patched along the ancestor
/// chain on every change, so height queries never walk the whole tree.
/// Entries are only mutated through `update_entry`, which re-reads their
/// height and shown state afterwards.
pub struct EntryTree {
    arena: SlotMap<EntryId, EntryNode>,
    roots: Vec<EntryId>,
    /// Focus link of the list itself; only ever holds `FocusItem::Child`.
    pub(crate) root_focus: Option<FocusItem>,
    revision: u64,
    /// Sum of the roots' cached heights; `None` after a root changed.
    content: Cell<Option<f32>>,
}

impl EntryTree {
    pub fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
            roots: Vec::new(),
            root_focus: None,
            revision: 0,
            content: Cell::new(Some(0.0)),
        }
    }

    /// Insert an entry at the top level.
    pub fn insert_root(&mut self, entry: Box<dyn Entry>) -> EntryId {
        let id = self.arena.insert(EntryNode::new(entry, None));
        self.roots.push(id);
        self.revision += 1;
        self.refresh_height(id);
        id
    }

    /// Insert an entry as the last child of `parent`. Returns `None` if the
    /// parent no longer exists.
    pub fn insert(&mut self, parent: EntryId, entry: Box<dyn Entry>) -> Option<EntryId> {
        if !self.arena.contains_key(parent) {
            log::warn!("insert under missing parent {:?}", parent);
            return None;
        }
        let id = self.arena.insert(EntryNode::new(entry, Some(parent)));
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(id);
        }
        self.revision += 1;
        self.refresh_height(id);
        Some(id)
    }

    /// Remove an entry and all its descendants. Focus links pointing at the
    /// removed subtree are pruned.
    pub fn remove(&mut self, id: EntryId) -> Vec<EntryId> {
        let mut removed = Vec::new();
        Self::collect_subtree(&self.arena, id, &mut removed);
        if removed.is_empty() {
            return removed;
        }
        let parent = self.parent(id);

        if let Some(node) = self.arena.get(id)
            && let Some(parent_id) = node.parent
            && let Some(parent) = self.arena.get_mut(parent_id)
        {
            parent.children.retain(|c| *c != id);
            if parent.focused == Some(FocusItem::Child(id)) {
                parent.focused = None;
            }
        }
        self.roots.retain(|r| *r != id);
        if self.root_focus == Some(FocusItem::Child(id)) {
            self.root_focus = None;
        }

        for rid in &removed {
            self.arena.remove(*rid);
        }
        self.revision += 1;
        match parent {
            Some(p) => self.refresh_height(p),
            None => self.content.set(None),
        }
        removed
    }

    fn collect_subtree(arena: &SlotMap<EntryId, EntryNode>, id: EntryId, out: &mut Vec<EntryId>) {
        if let Some(node) = arena.get(id) {
            out.push(id);
            for &child in &node.children {
                Self::collect_subtree(arena, child, out);
            }
        }
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.arena.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub(crate) fn node(&self, id: EntryId) -> Option<&EntryNode> {
        self.arena.get(id)
    }

    pub(crate) fn node_mut(&mut self, id: EntryId) -> Option<&mut EntryNode> {
        self.arena.get_mut(id)
    }

    pub fn entry(&self, id: EntryId) -> Option<&dyn Entry> {
        self.arena.get(id).map(|n| n.entry.as_ref())
    }

    /// Run `f` on the entry, then re-read its height and shown state.
    pub fn update_entry<R>(
        &mut self,
        id: EntryId,
        f: impl FnOnce(&mut dyn Entry) -> R,
    ) -> Option<R> {
        let result = f(self.arena.get_mut(id)?.entry.as_mut());
        self.refresh_height(id);
        Some(result)
    }

    pub fn roots(&self) -> &[EntryId] {
        &self.roots
    }

    pub fn parent(&self, id: EntryId) -> Option<EntryId> {
        self.arena.get(id)?.parent
    }

    pub fn children(&self, id: EntryId) -> &[EntryId] {
        self.arena.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Siblings of `id` including itself, in order.
    pub fn siblings(&self, id: EntryId) -> &[EntryId] {
        match self.parent(id) {
            Some(p) => self.children(p),
            None => &self.roots,
        }
    }

    /// Ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: EntryId) -> SmallVec<[EntryId; 8]> {
        let mut out = SmallVec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            out.push(p);
            current = self.parent(p);
        }
        out
    }

    pub fn depth(&self, id: EntryId) -> usize {
        self.ancestors(id).len()
    }

    /// Structural revision; bumped on insert, remove, expand, and collapse.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // ------------------------------------------------------------------
    // Expansion
    // ------------------------------------------------------------------

    pub fn is_expandable(&self, id: EntryId) -> bool {
        self.arena.get(id).is_some_and(|n| !n.children.is_empty())
    }

    pub fn is_expanded(&self, id: EntryId) -> bool {
        self.arena
            .get(id)
            .is_some_and(|n| n.expanded && !n.children.is_empty())
    }

    /// Expand or collapse a group, optionally applying the same state to
    /// every nested group. Returns true if any node changed.
    pub fn set_expanded(&mut self, id: EntryId, expanded: bool, recursive: bool) -> bool {
        let changed = self.apply_expanded(id, expanded, recursive);
        if changed {
            self.revision += 1;
            if recursive {
                self.refresh_subtree(id);
                match self.parent(id) {
                    Some(p) => self.refresh_height(p),
                    None => self.content.set(None),
                }
            } else {
                self.refresh_height(id);
            }
        }
        changed
    }

    fn apply_expanded(&mut self, id: EntryId, expanded: bool, recursive: bool) -> bool {
        let mut changed = false;
        let mut hidden_focus = None;
        if let Some(node) = self.arena.get_mut(id)
            && !node.children.is_empty()
            && node.expanded != expanded
        {
            node.expanded = expanded;
            changed = true;
            // Collapsing hides the children, so a focus link into them breaks.
            if !expanded && let Some(FocusItem::Child(child)) = node.focused {
                node.focused = None;
                hidden_focus = Some(child);
            }
        }
        if let Some(child) = hidden_focus {
            self.clear_subtree_focus(child);
        }
        if recursive {
            let children: Vec<EntryId> = self.children(id).to_vec();
            for child in children {
                changed |= self.apply_expanded(child, expanded, true);
            }
        }
        changed
    }

    /// Expand every ancestor of `id` so that it becomes reachable.
    pub fn expand_parents(&mut self, id: EntryId) -> bool {
        let mut changed = false;
        for ancestor in self.ancestors(id) {
            changed |= self.set_expanded(ancestor, true, false);
        }
        changed
    }

    // ------------------------------------------------------------------
    // Visibility and heights
    // ------------------------------------------------------------------

    /// Entry reports itself shown and is not hidden by the search filter.
    pub fn is_visible(&self, id: EntryId) -> bool {
        self.arena
            .get(id)
            .is_some_and(|n| !n.filtered && n.entry.is_shown())
    }

    /// Entry and every ancestor report themselves shown. Ignores expansion
    /// and the search filter.
    pub fn is_shown(&self, id: EntryId) -> bool {
        let shown = |e: EntryId| self.arena.get(e).is_some_and(|n| n.entry.is_shown());
        shown(id) && self.ancestors(id).iter().all(|&a| shown(a))
    }

    /// Visible, and every ancestor is visible and expanded.
    pub fn is_revealed(&self, id: EntryId) -> bool {
        self.is_visible(id)
            && self
                .ancestors(id)
                .iter()
                .all(|&a| self.is_visible(a) && self.is_expanded(a))
    }

    /// Callers refresh heights once after a batch of filter changes.
    pub(crate) fn set_filtered(&mut self, id: EntryId, filtered: bool) -> bool {
        match self.arena.get_mut(id) {
            Some(node) if node.filtered != filtered => {
                node.filtered = filtered;
                true
            }
            _ => false,
        }
    }

    /// Height of the entry's own row, or 0 when hidden.
    pub fn own_height(&self, id: EntryId) -> f32 {
        match self.arena.get(id) {
            Some(n) if !n.filtered && n.entry.is_shown() => n.entry.height().max(0.0),
            _ => 0.0,
        }
    }

    /// Height of the entry's row plus every expanded descendant row.
    pub fn total_height(&self, id: EntryId) -> f32 {
        self.arena.get(id).map_or(0.0, |n| n.subtree_height)
    }

    /// Total height of all top-level entries.
    pub fn content_height(&self) -> f32 {
        if let Some(h) = self.content.get() {
            return h;
        }
        let h = self.roots.iter().map(|&r| self.total_height(r)).sum();
        self.content.set(Some(h));
        h
    }

    /// Subtree height from the entry's own row and its children's cached
    /// heights.
    fn compute_height(&self, id: EntryId) -> f32 {
        let Some(node) = self.arena.get(id) else {
            return 0.0;
        };
        if node.filtered || !node.entry.is_shown() {
            return 0.0;
        }
        let mut h = node.entry.height().max(0.0);
        if node.expanded {
            h += node
                .children
                .iter()
                .map(|&c| self.total_height(c))
                .sum::<f32>();
        }
        h
    }

    /// Re-read `id`'s height and patch the cached heights of its ancestors.
    /// Stops at the first ancestor whose height did not change.
    pub fn refresh_height(&mut self, id: EntryId) {
        let mut current = Some(id);
        while let Some(cid) = current {
            let h = self.compute_height(cid);
            let Some(node) = self.arena.get_mut(cid) else {
                return;
            };
            if node.subtree_height == h {
                return;
            }
            node.subtree_height = h;
            current = node.parent;
            if current.is_none() {
                self.content.set(None);
            }
        }
    }

    /// Recompute the cached heights of `id` and all its descendants.
    fn refresh_subtree(&mut self, id: EntryId) {
        let children: SmallVec<[EntryId; 8]> = SmallVec::from_slice(self.children(id));
        for child in children {
            self.refresh_subtree(child);
        }
        let h = self.compute_height(id);
        if let Some(node) = self.arena.get_mut(id) {
            node.subtree_height = h;
        }
    }

    /// Tick every entry, then re-read all heights.
    pub(crate) fn tick_all(&mut self, now: Instant) {
        for node in self.arena.values_mut() {
            node.entry.tick(now);
        }
        self.refresh_all_heights();
    }

    /// Recompute every cached height.
    pub fn refresh_all_heights(&mut self) {
        let roots = self.roots.clone();
        for root in roots {
            self.refresh_subtree(root);
        }
        self.content.set(None);
    }

    /// Offset of the entry's own row from the top of the content.
    /// Meaningful only while the entry is revealed.
    pub fn scroll_anchor_y(&self, id: EntryId) -> Option<f32> {
        if !self.arena.contains_key(id) {
            return None;
        }
        let mut y = 0.0;
        let mut current = id;
        loop {
            for &sibling in self.siblings(current) {
                if sibling == current {
                    break;
                }
                y += self.total_height(sibling);
            }
            match self.parent(current) {
                Some(p) => {
                    y += self.own_height(p);
                    current = p;
                }
                None => return Some(y),
            }
        }
    }

    /// Revealed entries in display order with their nesting depth.
    pub fn walk_visible(&self) -> Vec<(EntryId, usize)> {
        self.walk(Walk::Visible)
    }

    /// Entries that report themselves shown under shown ancestors, in
    /// display order, collapsed and filtered ones included.
    pub fn walk_shown(&self) -> Vec<(EntryId, usize)> {
        self.walk(Walk::Shown)
    }

    /// Every entry in display order, collapsed or hidden ones included.
    pub fn walk_all(&self) -> Vec<(EntryId, usize)> {
        self.walk(Walk::All)
    }

    fn walk(&self, mode: Walk) -> Vec<(EntryId, usize)> {
        let mut out = Vec::new();
        for &root in &self.roots {
            self.walk_node(root, 0, mode, &mut out);
        }
        out
    }

    fn walk_node(&self, id: EntryId, depth: usize, mode: Walk, out: &mut Vec<(EntryId, usize)>) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        let skip = match mode {
            Walk::Visible => node.filtered || !node.entry.is_shown(),
            Walk::Shown => !node.entry.is_shown(),
            Walk::All => false,
        };
        if skip {
            return;
        }
        out.push((id, depth));
        if mode != Walk::Visible || node.expanded {
            for &child in &node.children {
                self.walk_node(child, depth + 1, mode, out);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    /// Revealed rows only: shown, unfiltered, under expanded groups.
    Visible,
    /// Shown entries under shown ancestors.
    Shown,
    All,
}

impl Default for EntryTree {
    fn default() -> Self {
        Self::new()
    }
}
