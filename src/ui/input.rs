use std::time::Instant;

use super::keybindings::{Action, KeyCombo};
use super::list::EntryList;
use super::nav::TargetRef;
use super::scroll::thumb_geometry;
use super::{EntryId, Point};

/// Mouse button identifier (decoupled from winit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Active scrollbar thumb drag state.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScrollbarDrag {
    start_mouse_y: f32,
    start_offset: f32,
}

/// Extra pixels on either side of the scrollbar that still grab it.
const SCROLLBAR_GRAB_LEFT: f32 = 1.0;
const SCROLLBAR_GRAB_RIGHT: f32 = 2.0;

impl EntryList {
    /// Handle cursor movement. Returns true if the list consumed it.
    pub fn handle_cursor_moved(&mut self, x: f32, y: f32, now: Instant) -> bool {
        let previous = self.pointer;
        self.pointer = Point::new(x, y);

        // Active scrollbar drag: map pointer travel onto scroll travel.
        if let Some(drag) = self.scrollbar_drag {
            let view = self.viewport();
            let max = self.max_scroll();
            let offset = if y < view.y {
                0.0
            } else if y > view.bottom() {
                max
            } else {
                let thumb_h = thumb_geometry(
                    self.content_height(),
                    view.height,
                    drag.start_offset,
                    max,
                    self.settings.min_thumb_height,
                )
                .map_or(view.height, |(_, h)| h);
                let track = view.height - thumb_h;
                if track > 0.0 {
                    drag.start_offset + (y - drag.start_mouse_y) * max / track
                } else {
                    drag.start_offset
                }
            };
            self.scroll.set_target(offset, false, now);
            return true;
        }

        // An entry holding the drag slot sees every move until release.
        if let Some((button, id)) = self.dragged {
            let area = self.entry_area(id).unwrap_or_default();
            let delta = Point::new(x - previous.x, y - previous.y);
            let pos = self.pointer;
            self.tree
                .update_entry(id, |e| e.mouse_dragged(area, pos, button, delta));
            return true;
        }

        self.viewport().contains(x, y)
    }

    /// Handle mouse button press/release. Returns true if consumed.
    pub fn handle_mouse_input(
        &mut self,
        button: MouseButton,
        pressed: bool,
        x: f32,
        y: f32,
        now: Instant,
    ) -> bool {
        self.pointer = Point::new(x, y);

        if !pressed {
            if self.scrollbar_drag.take().is_some() {
                return true;
            }
            if let Some((held, id)) = self.dragged.take() {
                let area = self.entry_area(id).unwrap_or_default();
                let pos = self.pointer;
                self.tree
                    .update_entry(id, |e| e.mouse_released(area, pos, held));
                return true;
            }
            return false;
        }

        if button == MouseButton::Left
            && let Some(drag) = self.try_start_scrollbar_drag(x, y, now)
        {
            self.scrollbar_drag = Some(drag);
            return true;
        }

        let Some((id, area)) = self.entry_at(x, y) else {
            return false;
        };
        let pos = self.pointer;
        let consumed = self
            .tree
            .update_entry(id, |e| e.mouse_clicked(area, pos, button))
            .unwrap_or(false);
        if consumed {
            self.dragged = Some((button, id));
        }
        if button != MouseButton::Left {
            return consumed;
        }

        if !consumed && self.tree.is_expandable(id) {
            let expanded = self.tree.is_expanded(id);
            self.set_expanded(id, !expanded, false);
        }
        let (navigable, sub) = match self.tree.entry(id) {
            Some(e) => (
                e.is_navigable(),
                (0..e.sub_target_count()).find(|&i| e.sub_target_area(area, i).contains(x, y)),
            ),
            None => (false, None),
        };
        if navigable {
            self.select(TargetRef { entry: id, sub }, now);
        } else {
            self.tree.focus_entry(id, Some(0));
        }
        true
    }

    /// Handle scroll wheel (positive = scroll down). The entry under the
    /// pointer gets the first chance to consume it.
    pub fn handle_scroll(&mut self, delta: f32, now: Instant) -> bool {
        let pos = self.pointer;
        if !self.viewport().contains(pos.x, pos.y) {
            return false;
        }
        if let Some((id, area)) = self.entry_at(pos.x, pos.y)
            && self
                .tree
                .update_entry(id, |e| e.mouse_scrolled(area, pos, delta))
                .unwrap_or(false)
        {
            return true;
        }
        // Fractional deltas come from touchpads and are applied directly.
        let animated = self.settings.smooth_scrolling && delta.abs() >= 1.0;
        self.scroll
            .scroll_by(delta * self.settings.wheel_step, animated, now);
        true
    }

    /// Handle a key press. With Alt held, navigation bindings run before
    /// the focused entry sees the key; otherwise the focused entry gets the
    /// first chance. Returns true if consumed.
    pub fn handle_key(&mut self, combo: KeyCombo, now: Instant) -> bool {
        if combo.modifiers.alt {
            if let Some(action) = self.keys.lookup(combo) {
                return self.perform(action, now);
            }
            if let Some(action) = self.keys.lookup(combo.without_alt())
                && action.is_navigation()
                && self.perform(action, now)
            {
                return true;
            }
        }

        if let Some((id, _)) = self.tree.focused_entry()
            && self
                .tree
                .update_entry(id, |e| e.key_pressed(combo))
                .unwrap_or(false)
        {
            return true;
        }

        match self.keys.lookup(combo) {
            Some(action) => self.perform(action, now),
            None => false,
        }
    }

    /// Run a bound action. Returns whether it had any effect.
    pub fn perform(&mut self, action: Action, now: Instant) -> bool {
        match action {
            Action::StepUp => self.navigate_entries(false, now),
            Action::StepDown => self.navigate_entries(true, now),
            Action::StepOut { recursive } => self.navigate_horizontal(false, recursive, now),
            Action::StepIn { recursive } => self.navigate_horizontal(true, recursive, now),
            Action::FocusNext | Action::FocusPrev => {
                let forward = action == Action::FocusNext;
                if !self.tree.change_focus(None, forward) {
                    return false;
                }
                if let Some((id, part)) = self.tree.focused_entry() {
                    let sub = part.map(usize::from).filter(|&p| {
                        self.tree
                            .entry(id)
                            .is_some_and(|e| p < e.sub_target_count())
                    });
                    self.selected = Some(TargetRef { entry: id, sub });
                    self.ensure_visible(id, now);
                }
                true
            }
            Action::PageUp | Action::PageDown => {
                let page = self.viewport().height;
                let delta = if action == Action::PageUp { -page } else { page };
                self.scroll
                    .scroll_by(delta, self.settings.smooth_scrolling, now);
                true
            }
            Action::Home => {
                self.scroll_to_offset(0.0, true, now);
                true
            }
            Action::End => {
                let max = self.max_scroll();
                self.scroll_to_offset(max, true, now);
                true
            }
            Action::NextMatch | Action::PrevMatch => {
                if !self.search.is_active() {
                    return false;
                }
                self.next_match(action == Action::NextMatch);
                true
            }
            Action::ToggleCaseSensitive => {
                self.toggle_case_sensitive();
                true
            }
            Action::ToggleRegex => {
                self.toggle_regex();
                true
            }
            Action::ToggleFilter => {
                self.toggle_filter();
                true
            }
            Action::CancelGestures => self.cancel_gestures(),
        }
    }

    /// Drop any drag in progress and stop capture in the dragged and
    /// focused entries. Called on Escape or when an overlay takes input.
    pub fn cancel_gestures(&mut self) -> bool {
        let mut cancelled = self.scrollbar_drag.take().is_some();
        let mut targets: Vec<EntryId> = Vec::with_capacity(2);
        if let Some((_, id)) = self.dragged.take() {
            targets.push(id);
            cancelled = true;
        }
        if let Some((id, _)) = self.tree.focused_entry()
            && !targets.contains(&id)
        {
            targets.push(id);
        }
        for id in targets {
            self.tree.update_entry(id, |e| e.cancel_capture());
        }
        cancelled
    }

    /// A press at (x, y) starts a thumb drag if it lands on the scrollbar
    /// and the content overflows.
    fn try_start_scrollbar_drag(&self, x: f32, y: f32, now: Instant) -> Option<ScrollbarDrag> {
        let view = self.viewport();
        if self.max_scroll() <= 0.0 || y < view.y || y >= view.bottom() {
            return None;
        }
        let sb_x = self.scrollbar_x();
        let sb_right = sb_x + self.settings.scrollbar_width;
        if x < sb_x - SCROLLBAR_GRAB_LEFT || x > sb_right + SCROLLBAR_GRAB_RIGHT {
            return None;
        }
        log::debug!("scrollbar drag started at y={}", y);
        Some(ScrollbarDrag {
            start_mouse_y: y,
            start_offset: self.scroll.get(now),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use winit::keyboard::KeyCode;

    use super::super::demo::{Caption, SliderField, TextField};
    use super::super::keybindings::ModifierFlags;
    use super::*;

    /// `n` flat 20px text fields in a 200x100 viewport.
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

    fn ms(t0: Instant, millis: u64) -> Instant {
        t0 + Duration::from_millis(millis)
    }

    #[test]
    fn wheel_scrolls_when_no_entry_consumes() {
        let t0 = Instant::now();
        let (mut list, _) = flat_list(20, t0);
        list.handle_cursor_moved(50.0, 50.0, t0);
        assert!(list.handle_scroll(2.0, t0));
        assert!((list.scroll_target() - 32.0).abs() < 1e-4);
        let settled = ms(t0, 400);
        assert!((list.scroll_value(settled) - 32.0).abs() < 1e-3);
    }

    #[test]
    fn wheel_outside_list_is_ignored() {
        let t0 = Instant::now();
        let (mut list, _) = flat_list(20, t0);
        list.handle_cursor_moved(50.0, 300.0, t0);
        assert!(!list.handle_scroll(1.0, t0));
        assert_eq!(list.scroll_target(), 0.0);
    }

    #[test]
    fn focused_slider_takes_the_wheel() {
        let t0 = Instant::now();
        let mut list = EntryList::with_defaults(t0);
        let slider = list.insert_root(Box::new(SliderField::new("Volume", 50.0, 0.0, 100.0)));
        for i in 0..10 {
            list.insert_root(Box::new(TextField::new(&format!("Item {}", i), "")));
        }
        list.resize(200.0, 600.0, 0.0, 100.0, t0);
        list.update(t0);
        list.layout(t0);

        list.handle_cursor_moved(50.0, 10.0, t0);
        // Unfocused: the list scrolls.
        list.handle_scroll(1.0, t0);
        assert!(list.scroll_target() > 0.0);

        list.scroll_to_offset(0.0, false, t0);
        list.layout(t0);
        list.tree_mut().focus_entry(slider, Some(0));
        assert!(list.handle_scroll(1.0, t0));
        assert_eq!(list.scroll_target(), 0.0);
    }

    #[test]
    fn click_selects_and_focuses_entry() {
        let t0 = Instant::now();
        let (mut list, ids) = flat_list(5, t0);
        assert!(list.handle_mouse_input(MouseButton::Left, true, 50.0, 45.0, t0));
        assert_eq!(list.selection(), Some(TargetRef::entry(ids[2])));
        assert_eq!(list.tree().focused_entry(), Some((ids[2], Some(0))));
    }

    #[test]
    fn click_on_caption_toggles_group() {
        let t0 = Instant::now();
        let mut list = EntryList::with_defaults(t0);
        let group = list.insert_root(Box::new(Caption::new("Audio")));
        list.insert(group, Box::new(TextField::new("Volume", "")));
        list.resize(200.0, 600.0, 0.0, 100.0, t0);
        list.update(t0);
        list.layout(t0);

        list.handle_mouse_input(MouseButton::Left, true, 50.0, 5.0, t0);
        assert!(list.tree().is_expanded(group));
        list.handle_mouse_input(MouseButton::Left, false, 50.0, 5.0, t0);
        list.handle_mouse_input(MouseButton::Left, true, 50.0, 5.0, t0);
        assert!(!list.tree().is_expanded(group));
    }

    #[test]
    fn drag_routes_to_pressed_entry_until_release() {
        let t0 = Instant::now();
        let mut list = EntryList::with_defaults(t0);
        let slider = list.insert_root(Box::new(SliderField::new("Volume", 0.0, 0.0, 100.0)));
        list.resize(200.0, 600.0, 0.0, 100.0, t0);
        list.update(t0);
        list.layout(t0);

        assert!(list.handle_mouse_input(MouseButton::Left, true, 100.0, 10.0, t0));
        assert_eq!(list.dragged(), Some((MouseButton::Left, slider)));
        // Leaving the row keeps the drag.
        assert!(list.handle_cursor_moved(150.0, 300.0, t0));
        assert_eq!(list.dragged(), Some((MouseButton::Left, slider)));
        list.handle_mouse_input(MouseButton::Left, false, 150.0, 300.0, t0);
        assert_eq!(list.dragged(), None);
    }

    #[test]
    fn scrollbar_drag_maps_pointer_to_offset() {
        let t0 = Instant::now();
        let (mut list, _) = flat_list(20, t0);
        // Content 400, viewport 100: max 300, thumb 32, track 68.
        let sb = list.scrollbar_x() + 1.0;
        assert!(list.handle_mouse_input(MouseButton::Left, true, sb, 10.0, t0));
        assert!(list.is_dragging_scrollbar());

        list.handle_cursor_moved(sb, 44.0, t0);
        assert!((list.scroll_target() - 150.0).abs() < 1e-3);

        // Past the bottom edge jumps to the end, above the top to the start.
        list.handle_cursor_moved(sb, 150.0, t0);
        assert_eq!(list.scroll_target(), 300.0);
        list.handle_cursor_moved(sb, -20.0, t0);
        assert_eq!(list.scroll_target(), 0.0);

        list.handle_mouse_input(MouseButton::Left, false, sb, -20.0, t0);
        assert!(!list.is_dragging_scrollbar());
    }

    #[test]
    fn no_scrollbar_drag_when_content_fits() {
        let t0 = Instant::now();
        let (mut list, _) = flat_list(3, t0);
        let sb = list.scrollbar_x() + 1.0;
        list.handle_mouse_input(MouseButton::Left, true, sb, 10.0, t0);
        assert!(!list.is_dragging_scrollbar());
    }

    #[test]
    fn arrow_keys_step_selection() {
        let t0 = Instant::now();
        let (mut list, ids) = flat_list(3, t0);
        let down = KeyCombo::plain(KeyCode::ArrowDown);
        assert!(list.handle_key(down, t0));
        assert!(list.handle_key(down, t0));
        assert_eq!(list.selection(), Some(TargetRef::entry(ids[1])));
        assert!(list.handle_key(KeyCombo::plain(KeyCode::ArrowUp), t0));
        assert_eq!(list.selection(), Some(TargetRef::entry(ids[0])));
    }

    #[test]
    fn editing_entry_swallows_arrows_unless_alt_held() {
        let t0 = Instant::now();
        let (mut list, ids) = flat_list(3, t0);
        list.handle_mouse_input(MouseButton::Left, true, 50.0, 5.0, t0);
        list.handle_mouse_input(MouseButton::Left, false, 50.0, 5.0, t0);
        // Enter starts editing the focused field.
        assert!(list.handle_key(KeyCombo::plain(KeyCode::Enter), t0));
        let down = KeyCombo::plain(KeyCode::ArrowDown);
        assert!(list.handle_key(down, t0));
        assert_eq!(list.selection(), Some(TargetRef::entry(ids[0])));

        let alt_down = KeyCombo {
            modifiers: ModifierFlags::ALT,
            key: KeyCode::ArrowDown,
        };
        assert!(list.handle_key(alt_down, t0));
        assert_eq!(list.selection(), Some(TargetRef::entry(ids[1])));
    }

    #[test]
    fn escape_cancels_drag_and_capture() {
        let t0 = Instant::now();
        let mut list = EntryList::with_defaults(t0);
        let slider = list.insert_root(Box::new(SliderField::new("Volume", 0.0, 0.0, 100.0)));
        list.resize(200.0, 600.0, 0.0, 100.0, t0);
        list.update(t0);
        list.layout(t0);
        list.handle_mouse_input(MouseButton::Left, true, 100.0, 10.0, t0);
        assert_eq!(list.dragged(), Some((MouseButton::Left, slider)));

        assert!(list.handle_key(KeyCombo::plain(KeyCode::Escape), t0));
        assert_eq!(list.dragged(), None);
        // The release that follows goes nowhere.
        assert!(!list.handle_mouse_input(MouseButton::Left, false, 100.0, 10.0, t0));
    }

    #[test]
    fn page_keys_scroll_by_viewport() {
        let t0 = Instant::now();
        let (mut list, _) = flat_list(20, t0);
        list.handle_key(KeyCombo::plain(KeyCode::PageDown), t0);
        assert!((list.scroll_target() - 100.0).abs() < 1e-4);
        list.handle_key(KeyCombo::plain(KeyCode::End), t0);
        assert!((list.scroll_target() - 300.0).abs() < 1e-4);
        list.handle_key(KeyCombo::plain(KeyCode::Home), t0);
        assert_eq!(list.scroll_target(), 0.0);
    }

    #[test]
    fn tab_moves_focus_and_selection() {
        let t0 = Instant::now();
        let (mut list, ids) = flat_list(3, t0);
        assert!(list.handle_key(KeyCombo::plain(KeyCode::Tab), t0));
        assert!(list.handle_key(KeyCombo::plain(KeyCode::Tab), t0));
        assert_eq!(list.tree().focused_entry(), Some((ids[1], Some(0))));
        assert_eq!(list.selection(), Some(TargetRef::entry(ids[1])));
    }
}
