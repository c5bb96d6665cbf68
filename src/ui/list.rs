use std::time::{Duration, Instant};

use super::draw::{DrawList, PanelCommand, TextCommand};
use super::entry::{Entry, RowContext};
use super::input::{MouseButton, ScrollbarDrag};
use super::keybindings::KeyBindings;
use super::nav::TargetRef;
use super::scroll::{ScrollState, scroll_for, thumb_geometry};
use super::search::{SearchHistory, SearchQuery, SearchResult, SearchState};
use super::settings::ListSettings;
use super::theme::Theme;
use super::{EntryId, EntryTree, Point, Rect};

/// One laid-out row: an entry whose own row intersects the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowLayout {
    pub id: EntryId,
    pub depth: usize,
    pub area: Rect,
}

/// Virtualized, scrollable, collapsible list of entries.
///
/// Owns the entry arena and all derived state: scroll physics, keyboard
/// selection, focus chain, search matches, and the per-frame row layout.
/// Each frame the host calls `render`, which runs `update`, `layout`, and
/// `draw` in that order; input handlers run between frames and read the
/// rows produced by the previous layout.
pub struct EntryList {
    pub(crate) tree: EntryTree,
    pub(crate) scroll: ScrollState,
    pub(crate) search: SearchState,
    pub(crate) settings: ListSettings,
    pub(crate) theme: Theme,
    pub(crate) keys: KeyBindings,
    bounds: Rect,
    /// Rows from the last layout pass, top to bottom.
    rows: Vec<RowLayout>,
    /// Scroll offset the last layout pass used.
    layout_offset: f32,
    pub(crate) selected: Option<TargetRef>,
    /// Entry receiving drag and release events for an in-progress gesture.
    pub(crate) dragged: Option<(MouseButton, EntryId)>,
    pub(crate) scrollbar_drag: Option<ScrollbarDrag>,
    /// Entry to bring into view on the next update, after layout has
    /// caught up with any expansion.
    follow: Option<EntryId>,
    pub(crate) pointer: Point,
    last_frame: Option<Instant>,
    frame_delta: Duration,
}

impl EntryList {
    pub fn new(settings: ListSettings, theme: Theme, keys: KeyBindings, now: Instant) -> Self {
        Self {
            tree: EntryTree::new(),
            scroll: ScrollState::new(&settings, now),
            search: SearchState::new(settings.history_size),
            settings,
            theme,
            keys,
            bounds: Rect::default(),
            rows: Vec::new(),
            layout_offset: 0.0,
            selected: None,
            dragged: None,
            scrollbar_drag: None,
            follow: None,
            pointer: Point::default(),
            last_frame: None,
            frame_delta: Duration::ZERO,
        }
    }

    pub fn with_defaults(now: Instant) -> Self {
        Self::new(
            ListSettings::default(),
            Theme::default(),
            KeyBindings::defaults(),
            now,
        )
    }

    // ------------------------------------------------------------------
    // Entry registration
    // ------------------------------------------------------------------

    pub fn tree(&self) -> &EntryTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut EntryTree {
        &mut self.tree
    }

    pub fn insert_root(&mut self, entry: Box<dyn Entry>) -> EntryId {
        self.tree.insert_root(entry)
    }

    pub fn insert(&mut self, parent: EntryId, entry: Box<dyn Entry>) -> Option<EntryId> {
        self.tree.insert(parent, entry)
    }

    /// Unregister an entry and its descendants. Selection falls back to the
    /// removed entry's parent; a drag on the removed subtree is dropped.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let parent = self.tree.parent(id);
        let removed = self.tree.remove(id);
        if removed.is_empty() {
            return false;
        }
        if let Some(sel) = self.selected
            && removed.contains(&sel.entry)
        {
            self.selected = parent.map(TargetRef::entry);
        }
        if let Some((_, dragged)) = self.dragged
            && removed.contains(&dragged)
        {
            self.dragged = None;
        }
        if self.follow.is_some_and(|f| removed.contains(&f)) {
            self.follow = None;
        }
        log::debug!("removed {} entries", removed.len());
        true
    }

    pub fn set_expanded(&mut self, id: EntryId, expanded: bool, recursive: bool) -> bool {
        self.tree.set_expanded(id, expanded, recursive)
    }

    /// Edit an entry in place. Its height and shown state are re-read
    /// afterwards.
    pub fn update_entry<R>(
        &mut self,
        id: EntryId,
        f: impl FnOnce(&mut dyn Entry) -> R,
    ) -> Option<R> {
        self.tree.update_entry(id, f)
    }

    pub fn expand_parents(&mut self, id: EntryId) -> bool {
        self.tree.expand_parents(id)
    }

    pub fn settings(&self) -> &ListSettings {
        &self.settings
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keys
    }

    pub fn selection(&self) -> Option<TargetRef> {
        self.selected
    }

    pub fn dragged(&self) -> Option<(MouseButton, EntryId)> {
        self.dragged
    }

    pub fn is_dragging_scrollbar(&self) -> bool {
        self.scrollbar_drag.is_some()
    }

    // ------------------------------------------------------------------
    // Viewport
    // ------------------------------------------------------------------

    /// Set the list bounds: `width` pixels wide starting at the left edge,
    /// spanning `[top, bottom)` vertically and clipped to a screen of
    /// `height` pixels. The content point at the viewport centre stays
    /// centred.
    pub fn resize(&mut self, width: f32, height: f32, top: f32, bottom: f32, now: Instant) {
        let old_center = self.scroll.target() + self.bounds.height / 2.0;
        let had_size = self.bounds.height > 0.0;
        let bottom = bottom.min(height).max(top);
        self.bounds = Rect::new(self.bounds.x, top, width.max(0.0), bottom - top);
        self.sync_max_scroll(now);
        if had_size {
            self.scroll
                .set_target(old_center - self.bounds.height / 2.0, false, now);
        }
    }

    pub fn viewport(&self) -> Rect {
        self.bounds
    }

    /// Scroll offset used by the most recent layout pass.
    pub fn scroll_offset(&self) -> f32 {
        self.layout_offset
    }

    pub fn scroll_target(&self) -> f32 {
        self.scroll.target()
    }

    pub fn scroll_value(&self, now: Instant) -> f32 {
        self.scroll.get(now)
    }

    pub fn max_scroll(&self) -> f32 {
        self.scroll.max_scroll()
    }

    pub fn content_height(&self) -> f32 {
        self.tree.content_height()
    }

    pub fn scrollbar_x(&self) -> f32 {
        self.bounds.right() - self.settings.scrollbar_width
    }

    pub(crate) fn sync_max_scroll(&mut self, now: Instant) {
        let max = (self.tree.content_height() - self.bounds.height).max(0.0);
        self.scroll.set_max_scroll(max, false, now);
    }

    /// Screen-space area of a row at content-relative screen `y`.
    pub(crate) fn row_area(&self, y: f32, height: f32, depth: usize) -> Rect {
        let x = self.bounds.x + self.settings.row_inset + depth as f32 * self.settings.indent;
        let right = self.scrollbar_x() - self.settings.row_inset;
        Rect::new(x, y, (right - x).max(0.0), height)
    }

    // ------------------------------------------------------------------
    // Scrolling
    // ------------------------------------------------------------------

    pub fn scroll_to_offset(&mut self, offset: f32, animated: bool, now: Instant) {
        self.scroll
            .set_target(offset, animated && self.settings.smooth_scrolling, now);
    }

    /// Reveal `id` and scroll it into view on the next update, once layout
    /// reflects the expansion.
    pub fn scroll_to_entry(&mut self, id: EntryId) -> bool {
        if !self.tree.contains(id) {
            return false;
        }
        self.tree.expand_parents(id);
        self.follow = Some(id);
        true
    }

    /// Keep `id` inside the viewport with the focus margin.
    pub fn ensure_visible(&mut self, id: EntryId, now: Instant) {
        self.sync_max_scroll(now);
        let Some(y) = self.tree.scroll_anchor_y(id) else {
            return;
        };
        let h = self.tree.own_height(id);
        let margin = self.settings.focus_scroll_margin;
        let current = self.scroll.target();
        let target = scroll_for(y, h, current, self.bounds.height, margin, margin);
        if target != current {
            self.scroll
                .set_target(target, self.settings.smooth_scrolling, now);
        }
    }

    fn resolve_follow(&mut self, now: Instant) {
        let Some(id) = self.follow.take() else {
            return;
        };
        let Some(y) = self.tree.scroll_anchor_y(id) else {
            return;
        };
        let target = scroll_for(
            y,
            self.tree.own_height(id),
            self.scroll.target(),
            self.bounds.height,
            self.settings.forced_scroll_margin,
            self.settings.preferred_scroll_margin,
        );
        self.scroll
            .set_target(target, self.settings.smooth_scrolling, now);
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Per-frame state advance: search refresh, scroll bounds, deferred
    /// follow, and scroll animation. Touches no entry outside the viewport
    /// unless the tree changed.
    pub fn update(&mut self, now: Instant) {
        self.frame_delta = self
            .last_frame
            .map_or(Duration::ZERO, |t| now.saturating_duration_since(t));
        self.last_frame = Some(now);

        if self.search.is_stale(&self.tree) {
            let before = self.search.focused_match();
            self.search.refresh(&mut self.tree);
            if let Some(id) = self.search.focused_match()
                && Some(id) != before
            {
                self.reveal_match(id);
            }
        }

        self.sync_max_scroll(now);
        self.resolve_follow(now);
        self.scroll.tick(now);
    }

    /// Advance every entry's own timers. Hosts call this at their tick
    /// rate, independently of `render`.
    pub fn tick(&mut self, now: Instant) {
        self.tree.tick_all(now);
    }

    /// Compute rows for entries intersecting the viewport. Entries above
    /// the viewport only contribute their heights; the walk stops at the
    /// first row below it.
    pub fn layout(&mut self, now: Instant) {
        self.layout_offset = self.scroll.get(now);
        let view = self.bounds;
        let mut rows = std::mem::take(&mut self.rows);
        rows.clear();
        let mut y = view.y - self.layout_offset;
        for &root in self.tree.roots() {
            if y >= view.bottom() {
                break;
            }
            self.layout_node(root, 0, &mut y, view, &mut rows);
        }
        self.rows = rows;
    }

    fn layout_node(
        &self,
        id: EntryId,
        depth: usize,
        y: &mut f32,
        view: Rect,
        rows: &mut Vec<RowLayout>,
    ) {
        let total = self.tree.total_height(id);
        if total <= 0.0 {
            return;
        }
        if *y + total <= view.y {
            *y += total;
            return;
        }
        let own = self.tree.own_height(id);
        if own > 0.0 && *y < view.bottom() && *y + own > view.y {
            rows.push(RowLayout {
                id,
                depth,
                area: self.row_area(*y, own, depth),
            });
        }
        *y += own;
        if self.tree.is_expanded(id) {
            for &child in self.tree.children(id) {
                if *y >= view.bottom() {
                    break;
                }
                self.layout_node(child, depth + 1, y, view, rows);
            }
        }
    }

    pub fn rows(&self) -> &[RowLayout] {
        &self.rows
    }

    /// Emit draw commands for the rows from the last layout pass.
    pub fn draw(&self, out: &mut DrawList) {
        let view = self.bounds;
        let theme = &self.theme;
        out.panels.push(PanelCommand::fill(view, theme.bg));

        let focused_match = self.search.focused_match();
        let pointer_active = self.scrollbar_drag.is_none() && self.dragged.is_none();
        for row in &self.rows {
            let Some(entry) = self.tree.entry(row.id) else {
                continue;
            };
            let hovered = pointer_active && row.area.contains(self.pointer.x, self.pointer.y);
            if self.search.is_match(row.id) {
                let color = if focused_match == Some(row.id) {
                    theme.focused_match_bg
                } else {
                    theme.match_bg
                };
                out.panels.push(PanelCommand::fill(row.area, color));
            }
            if hovered {
                out.panels.push(PanelCommand::fill(row.area, theme.hover));
            }
            let ctx = RowContext {
                area: row.area,
                pointer: self.pointer,
                frame_delta: self.frame_delta,
                hovered,
                expanded: self.tree.is_expanded(row.id),
                theme,
            };
            entry.render(&ctx, out);
            if let Some(sel) = self.selected
                && sel.entry == row.id
            {
                let area = match sel.sub {
                    Some(s) if s < entry.sub_target_count() => entry.sub_target_area(row.area, s),
                    _ => row.area,
                };
                out.panels.push(PanelCommand::outline(
                    area,
                    theme.accent,
                    theme.selection_border,
                ));
            }
        }

        if self.rows.is_empty() {
            // Entries exist but the filter hid them all.
            let filtered_out =
                self.search.is_active() && self.search.query().filter && !self.tree.is_empty();
            let placeholder = if filtered_out {
                &theme.no_matches_placeholder
            } else {
                &theme.placeholder
            };
            let approx_width = placeholder.chars().count() as f32 * theme.font_size * 0.5;
            out.texts.push(TextCommand {
                text: placeholder.clone(),
                x: view.x + (view.width - approx_width) / 2.0,
                y: view.y + (view.height - theme.font_size) / 2.0,
                color: theme.text_dim,
                font_size: theme.font_size,
            });
        }

        if let Some((thumb_y, thumb_h)) = thumb_geometry(
            self.tree.content_height(),
            view.height,
            self.layout_offset,
            self.scroll.max_scroll(),
            self.settings.min_thumb_height,
        ) {
            let x = self.scrollbar_x();
            let w = self.settings.scrollbar_width;
            out.panels.push(PanelCommand::fill(
                Rect::new(x, view.y, w, view.height),
                theme.scrollbar_track,
            ));
            let color = if self.scrollbar_drag.is_some() {
                theme.scrollbar_thumb_active
            } else {
                theme.scrollbar_thumb
            };
            out.panels.push(PanelCommand::fill(
                Rect::new(x, view.y + thumb_y, w, thumb_h),
                color,
            ));
        }
    }

    /// `update`, `layout`, then `draw`.
    pub fn render(&mut self, now: Instant, out: &mut DrawList) {
        self.update(now);
        self.layout(now);
        self.draw(out);
    }

    // ------------------------------------------------------------------
    // Hit testing
    // ------------------------------------------------------------------

    /// Entry whose row spans screen `y`, using the last layout. Points over
    /// the scrollbar or outside the list hit nothing.
    pub fn entry_at(&self, x: f32, y: f32) -> Option<(EntryId, Rect)> {
        if !self.bounds.contains(x, y) || x >= self.scrollbar_x() - 1.0 {
            return None;
        }
        self.rows
            .iter()
            .find(|r| y >= r.area.y && y < r.area.bottom())
            .map(|r| (r.id, r.area))
    }

    /// Screen-space area of an entry's own row, laid out or not.
    pub fn entry_area(&self, id: EntryId) -> Option<Rect> {
        if let Some(row) = self.rows.iter().find(|r| r.id == id) {
            return Some(row.area);
        }
        let anchor = self.tree.scroll_anchor_y(id)?;
        let y = self.bounds.y - self.layout_offset + anchor;
        Some(self.row_area(y, self.tree.own_height(id), self.tree.depth(id)))
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Run `query`. A newly focused match is selected, its groups expanded,
    /// and it is scrolled into view.
    pub fn search(&mut self, query: SearchQuery) -> SearchResult {
        let before = self.search.focused_match();
        let result = self.search.set_query(&mut self.tree, query);
        if let Some(id) = self.search.focused_match()
            && Some(id) != before
        {
            self.reveal_match(id);
        }
        result
    }

    /// Step to the next or previous match and commit the query to history.
    pub fn next_match(&mut self, forward: bool) -> SearchResult {
        let result = self.search.next_match(forward);
        self.search.commit_history();
        if let Some(id) = self.search.focused_match() {
            self.reveal_match(id);
        }
        result
    }

    pub fn search_result(&self) -> SearchResult {
        self.search.result()
    }

    pub fn search_query(&self) -> &SearchQuery {
        self.search.query()
    }

    pub fn search_matches(&self) -> &[EntryId] {
        self.search.matches()
    }

    pub fn search_history(&self) -> &SearchHistory {
        &self.search.history
    }

    pub fn toggle_case_sensitive(&mut self) -> SearchResult {
        let mut query = self.search.query().clone();
        query.case_sensitive = !query.case_sensitive;
        self.search(query)
    }

    pub fn toggle_regex(&mut self) -> SearchResult {
        let mut query = self.search.query().clone();
        query.regex = !query.regex;
        self.search(query)
    }

    pub fn toggle_filter(&mut self) -> SearchResult {
        let mut query = self.search.query().clone();
        query.filter = !query.filter;
        self.search(query)
    }

    /// Clear the query and unhide filtered entries.
    pub fn dismiss_search(&mut self) {
        self.search.dismiss(&mut self.tree);
    }

    fn reveal_match(&mut self, id: EntryId) {
        self.tree.expand_parents(id);
        self.selected = Some(TargetRef::entry(id));
        let part = self
            .tree
            .entry(id)
            .and_then(|e| (e.focus_parts() > 0).then_some(0));
        self.tree.focus_entry(id, part);
        self.scroll_to_entry(id);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::super::demo::{Caption, TextField};
    use super::*;

    const ROW: f32 = 20.0;

    /// Row that grows by 10px per tick.
    struct Growing {
        height: f32,
        ticks: Rc<Cell<u32>>,
    }

    impl Entry for Growing {
        fn height(&self) -> f32 {
            self.height
        }

        fn tick(&mut self, _now: Instant) {
            self.height += 10.0;
            self.ticks.set(self.ticks.get() + 1);
        }

        fn render(&self, _row: &RowContext<'_>, _out: &mut DrawList) {}
    }

    /// `n` flat 20px rows in a 100px viewport.
    fn flat_list(n: usize, now: Instant) -> (EntryList, Vec<EntryId>) {
        let mut list = EntryList::with_defaults(now);
        let ids = (0..n)
            .map(|i| list.insert_root(Box::new(TextField::new(&format!("Item {}", i), ""))))
            .collect();
        list.resize(200.0, 600.0, 0.0, 100.0, now);
        list.update(now);
        list.layout(now);
        (list, ids)
    }

    #[test]
    fn layout_emits_only_visible_rows() {
        let t0 = Instant::now();
        let (list, ids) = flat_list(10, t0);
        let laid: Vec<EntryId> = list.rows().iter().map(|r| r.id).collect();
        assert_eq!(laid, ids[0..5].to_vec());
        for (i, row) in list.rows().iter().enumerate() {
            assert!((row.area.y - i as f32 * ROW).abs() < 1e-4);
        }
    }

    #[test]
    fn scrolled_layout_includes_partial_rows() {
        let t0 = Instant::now();
        let (mut list, ids) = flat_list(20, t0);
        list.scroll_to_offset(30.0, false, t0);
        list.layout(t0);
        let laid: Vec<EntryId> = list.rows().iter().map(|r| r.id).collect();
        // Rows 1 (partially) through 6 (partially).
        assert_eq!(laid, ids[1..7].to_vec());
        assert!((list.rows()[0].area.y + 10.0).abs() < 1e-4);
    }

    #[test]
    fn max_scroll_follows_content() {
        let t0 = Instant::now();
        let (mut list, ids) = flat_list(10, t0);
        assert!((list.max_scroll() - 100.0).abs() < 1e-4);
        list.scroll_to_offset(100.0, false, t0);
        for &id in &ids[5..] {
            list.remove(id);
        }
        list.update(t0);
        assert_eq!(list.max_scroll(), 0.0);
        assert_eq!(list.scroll_value(t0), 0.0);
    }

    #[test]
    fn hit_test_maps_y_to_entry() {
        let t0 = Instant::now();
        let (mut list, ids) = flat_list(10, t0);
        assert_eq!(list.entry_at(50.0, 45.0).map(|(id, _)| id), Some(ids[2]));
        list.scroll_to_offset(40.0, false, t0);
        list.layout(t0);
        assert_eq!(list.entry_at(50.0, 45.0).map(|(id, _)| id), Some(ids[4]));
        // Outside the list and over the scrollbar.
        assert_eq!(list.entry_at(50.0, 150.0), None);
        assert_eq!(list.entry_at(197.0, 45.0), None);
    }

    #[test]
    fn empty_list_draws_placeholder() {
        let t0 = Instant::now();
        let mut list = EntryList::with_defaults(t0);
        list.resize(200.0, 600.0, 0.0, 100.0, t0);
        let mut dl = DrawList::new();
        list.render(t0, &mut dl);
        assert_eq!(list.max_scroll(), 0.0);
        assert_eq!(dl.texts.len(), 1);
        assert_eq!(dl.texts[0].text, "No entries");
        // Background only, no scrollbar.
        assert_eq!(dl.panels.len(), 1);
    }

    #[test]
    fn filter_without_matches_draws_no_matches() {
        let t0 = Instant::now();
        let (mut list, _) = flat_list(3, t0);
        list.search(SearchQuery::literal("zzz"));
        list.toggle_filter();
        let mut dl = DrawList::new();
        list.render(t0, &mut dl);
        assert!(list.rows().is_empty());
        assert_eq!(dl.texts.len(), 1);
        assert_eq!(dl.texts[0].text, "No matches");

        list.toggle_filter();
        let mut dl = DrawList::new();
        list.render(t0, &mut dl);
        assert_eq!(list.rows().len(), 3);
        assert!(dl.texts.iter().all(|t| t.text != "No matches"));
    }

    #[test]
    fn entries_tick_only_when_the_host_ticks() {
        let t0 = Instant::now();
        let (mut list, _) = flat_list(2, t0);
        let ticks = Rc::new(Cell::new(0));
        list.insert_root(Box::new(Growing {
            height: ROW,
            ticks: Rc::clone(&ticks),
        }));
        let t1 = t0 + Duration::from_millis(16);
        let mut dl = DrawList::new();
        list.render(t1, &mut dl);
        assert_eq!(ticks.get(), 0);
        assert!((list.content_height() - 3.0 * ROW).abs() < 1e-4);

        list.tick(t1);
        assert_eq!(ticks.get(), 1);
        assert!((list.content_height() - 3.0 * ROW - 10.0).abs() < 1e-4);
    }

    #[test]
    fn scrollbar_drawn_only_when_content_overflows() {
        let t0 = Instant::now();
        let (mut list, _) = flat_list(3, t0);
        let mut dl = DrawList::new();
        list.render(t0, &mut dl);
        let without = dl.panels.len();

        let (mut list, _) = flat_list(10, t0);
        let mut dl = DrawList::new();
        list.render(t0, &mut dl);
        let rows = list.rows().len();
        assert_eq!(without, 1);
        // Background, scrollbar track, and thumb; rows draw text only.
        assert_eq!(dl.panels.len(), 3);
        assert_eq!(dl.texts.len(), rows * 2);
    }

    #[test]
    fn resize_keeps_viewport_centre() {
        let t0 = Instant::now();
        let (mut list, _) = flat_list(50, t0);
        list.scroll_to_offset(300.0, false, t0);
        // Centre at content y = 350.
        list.resize(200.0, 600.0, 0.0, 200.0, t0);
        assert!((list.scroll_target() - 250.0).abs() < 1e-4);
    }

    #[test]
    fn scroll_to_entry_expands_and_follows_next_frame() {
        let t0 = Instant::now();
        let mut list = EntryList::with_defaults(t0);
        let mut groups = Vec::new();
        for g in 0..5 {
            let group = list.insert_root(Box::new(Caption::new(&format!("G{}", g))));
            for i in 0..5 {
                list.insert(group, Box::new(TextField::new(&format!("F{}.{}", g, i), "")));
            }
            groups.push(group);
        }
        list.resize(200.0, 600.0, 0.0, 100.0, t0);
        list.update(t0);
        let target = list.tree().children(groups[4])[4];

        assert!(list.scroll_to_entry(target));
        assert!(list.tree().is_expanded(groups[4]));
        // Nothing moves until the next update.
        assert_eq!(list.scroll_target(), 0.0);

        let t1 = t0 + Duration::from_millis(16);
        list.update(t1);
        let later = t1 + Duration::from_millis(500);
        list.update(later);
        list.layout(later);
        assert!(list.rows().iter().any(|r| r.id == target));
    }

    #[test]
    fn selected_row_gets_outline() {
        let t0 = Instant::now();
        let (mut list, ids) = flat_list(5, t0);
        list.select(TargetRef::entry(ids[1]), t0);
        let mut dl = DrawList::new();
        list.render(t0, &mut dl);
        let outlines: Vec<&PanelCommand> =
            dl.panels.iter().filter(|p| p.border_width > 0.0).collect();
        assert_eq!(outlines.len(), 1);
        assert!((outlines[0].y - ROW).abs() < 1e-4);
    }

    #[test]
    fn search_highlights_and_reveals_match() {
        let t0 = Instant::now();
        let mut list = EntryList::with_defaults(t0);
        let group = list.insert_root(Box::new(Caption::new("Video")));
        let fov = list
            .insert(group, Box::new(TextField::new("Field of View", "90")))
            .expect("group exists");
        list.resize(200.0, 600.0, 0.0, 100.0, t0);

        let result = list.search(SearchQuery::literal("view"));
        assert_eq!(result.total, 1);
        assert!(list.tree().is_expanded(group));
        assert_eq!(list.selection(), Some(TargetRef::entry(fov)));

        let mut dl = DrawList::new();
        list.render(t0, &mut dl);
        let theme = Theme::default();
        assert!(dl.panels.iter().any(|p| p.bg_color == theme.focused_match_bg));
    }
}
