use std::time::{Duration, Instant};

use super::draw::DrawList;
use super::input::MouseButton;
use super::keybindings::KeyCombo;
use super::theme::Theme;
use super::{Point, Rect};

/// Everything an entry needs to draw its own row.
pub struct RowContext<'a> {
    /// Screen-space area of the entry's own row (nested children excluded).
    pub area: Rect,
    pub pointer: Point,
    /// Time since the previous rendered frame.
    pub frame_delta: Duration,
    pub hovered: bool,
    /// Whether the entry's nested children are currently shown.
    pub expanded: bool,
    pub theme: &'a Theme,
}

/// Capability interface implemented by every row hosted in an `EntryList`.
///
/// Entries are owned by the list arena and never see their siblings or
/// children directly; nesting, expansion, visibility filtering, focus links,
/// and scroll anchors are tracked by the list. An entry only reports its own
/// row height and reacts to events routed to it.
///
/// Pointer callbacks receive the row `area` the event was routed through and
/// return whether the event was consumed.
pub trait Entry {
    /// Height of the entry's own row, excluding nested children.
    fn height(&self) -> f32;

    fn is_shown(&self) -> bool {
        true
    }

    /// Advance the entry's own timers. Driven by `EntryList::tick`.
    fn tick(&mut self, _now: Instant) {}

    fn render(&self, row: &RowContext<'_>, out: &mut DrawList);

    fn mouse_clicked(&mut self, _area: Rect, _pos: Point, _button: MouseButton) -> bool {
        false
    }

    fn mouse_released(&mut self, _area: Rect, _pos: Point, _button: MouseButton) -> bool {
        false
    }

    /// Pointer moved while this entry holds the drag slot.
    fn mouse_dragged(
        &mut self,
        _area: Rect,
        _pos: Point,
        _button: MouseButton,
        _delta: Point,
    ) -> bool {
        false
    }

    fn mouse_scrolled(&mut self, _area: Rect, _pos: Point, _delta: f32) -> bool {
        false
    }

    /// Key press routed to the innermost focused entry.
    fn key_pressed(&mut self, _combo: KeyCombo) -> bool {
        false
    }

    /// Text tested by the search engine, independent of display formatting.
    fn search_text(&self) -> Option<&str> {
        None
    }

    /// Whether keyboard navigation may select this entry.
    fn is_navigable(&self) -> bool {
        true
    }

    /// Number of horizontally navigable sub-targets inside the row.
    fn sub_target_count(&self) -> usize {
        0
    }

    /// Screen-space area of sub-target `index` within the row `area`.
    fn sub_target_area(&self, area: Rect, _index: usize) -> Rect {
        area
    }

    /// Number of focusable parts inside the row, traversed before any
    /// nested children.
    fn focus_parts(&self) -> u16 {
        1
    }

    fn accepts_focus(&self, _part: u16) -> bool {
        true
    }

    fn set_focused_part(&mut self, _part: Option<u16>) {}

    /// Stop any in-progress capture (key recording, text editing, drag).
    fn cancel_capture(&mut self) {}

    /// Keyboard navigation selected this entry (and optionally a sub-target).
    fn on_navigate(&mut self, _sub: Option<usize>) {}
}
