//! Demo entry kinds used by the showcase binary and the tests.
//!
//! Each kind exercises a different slice of the `Entry` surface: captions
//! head groups, text fields capture keys while editing, toggles react to
//! clicks, pair fields expose two sub-targets, and sliders take drags and
//! (while focused) the mouse wheel.

use winit::keyboard::KeyCode;

use super::draw::{DrawList, PanelCommand, TextCommand};
use super::entry::{Entry, RowContext};
use super::input::MouseButton;
use super::keybindings::KeyCombo;
use super::list::EntryList;
use super::{EntryId, Point, Rect};

const ROW_HEIGHT: f32 = 20.0;
const TEXT_PAD: f32 = 4.0;

fn label_text(row: &RowContext<'_>, text: &str, x: f32, color: [f32; 4]) -> TextCommand {
    TextCommand {
        text: text.to_string(),
        x,
        y: row.area.y + (row.area.height - row.theme.font_size) / 2.0,
        color,
        font_size: row.theme.font_size,
    }
}

/// Right half of a row, where values are drawn.
fn value_area(area: Rect) -> Rect {
    let half = area.width / 2.0;
    Rect::new(area.x + half, area.y, half, area.height)
}

// ---------------------------------------------------------------------------
// Caption
// ---------------------------------------------------------------------------

/// Group header. Its children are the entries nested under it.
pub struct Caption {
    title: String,
}

impl Caption {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
        }
    }
}

impl Entry for Caption {
    fn height(&self) -> f32 {
        ROW_HEIGHT
    }

    fn render(&self, row: &RowContext<'_>, out: &mut DrawList) {
        let arrow = if row.expanded { "v" } else { ">" };
        out.texts.push(label_text(
            row,
            &format!("{} {}", arrow, self.title),
            row.area.x + TEXT_PAD,
            row.theme.text,
        ));
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.title)
    }
}

// ---------------------------------------------------------------------------
// TextField
// ---------------------------------------------------------------------------

/// Labelled text value. Enter toggles editing; while editing every key is
/// captured.
pub struct TextField {
    label: String,
    value: String,
    editing: bool,
}

impl TextField {
    pub fn new(label: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            editing: false,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }
}

/// Character typed by `key`, for the handful of keys a text field accepts.
fn key_char(combo: KeyCombo) -> Option<char> {
    let c = match combo.key {
        KeyCode::KeyA => 'a',
        KeyCode::KeyB => 'b',
        KeyCode::KeyC => 'c',
        KeyCode::KeyD => 'd',
        KeyCode::KeyE => 'e',
        KeyCode::KeyF => 'f',
        KeyCode::KeyG => 'g',
        KeyCode::KeyH => 'h',
        KeyCode::KeyI => 'i',
        KeyCode::KeyJ => 'j',
        KeyCode::KeyK => 'k',
        KeyCode::KeyL => 'l',
        KeyCode::KeyM => 'm',
        KeyCode::KeyN => 'n',
        KeyCode::KeyO => 'o',
        KeyCode::KeyP => 'p',
        KeyCode::KeyQ => 'q',
        KeyCode::KeyR => 'r',
        KeyCode::KeyS => 's',
        KeyCode::KeyT => 't',
        KeyCode::KeyU => 'u',
        KeyCode::KeyV => 'v',
        KeyCode::KeyW => 'w',
        KeyCode::KeyX => 'x',
        KeyCode::KeyY => 'y',
        KeyCode::KeyZ => 'z',
        KeyCode::Digit0 => '0',
        KeyCode::Digit1 => '1',
        KeyCode::Digit2 => '2',
        KeyCode::Digit3 => '3',
        KeyCode::Digit4 => '4',
        KeyCode::Digit5 => '5',
        KeyCode::Digit6 => '6',
        KeyCode::Digit7 => '7',
        KeyCode::Digit8 => '8',
        KeyCode::Digit9 => '9',
        KeyCode::Space => ' ',
        KeyCode::Period => '.',
        KeyCode::Minus => '-',
        _ => return None,
    };
    Some(if combo.modifiers.shift {
        c.to_ascii_uppercase()
    } else {
        c
    })
}

impl Entry for TextField {
    fn height(&self) -> f32 {
        ROW_HEIGHT
    }

    fn render(&self, row: &RowContext<'_>, out: &mut DrawList) {
        let value_rect = value_area(row.area);
        if self.editing {
            out.panels
                .push(PanelCommand::fill(value_rect, row.theme.hover));
        }
        out.texts.push(label_text(
            row,
            &self.label,
            row.area.x + TEXT_PAD,
            row.theme.text,
        ));
        out.texts.push(label_text(
            row,
            &self.value,
            value_rect.x + TEXT_PAD,
            row.theme.text_dim,
        ));
    }

    fn key_pressed(&mut self, combo: KeyCombo) -> bool {
        if combo.key == KeyCode::Enter {
            self.editing = !self.editing;
            return true;
        }
        if !self.editing {
            return false;
        }
        match combo.key {
            KeyCode::Backspace => {
                self.value.pop();
            }
            KeyCode::Escape => self.editing = false,
            _ => {
                if let Some(c) = key_char(combo) {
                    self.value.push(c);
                }
            }
        }
        true
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn set_focused_part(&mut self, part: Option<u16>) {
        if part.is_none() {
            self.editing = false;
        }
    }

    fn cancel_capture(&mut self) {
        self.editing = false;
    }
}

// ---------------------------------------------------------------------------
// ToggleField
// ---------------------------------------------------------------------------

pub struct ToggleField {
    label: String,
    value: bool,
}

impl ToggleField {
    pub fn new(label: &str, value: bool) -> Self {
        Self {
            label: label.to_string(),
            value,
        }
    }

    pub fn value(&self) -> bool {
        self.value
    }
}

impl Entry for ToggleField {
    fn height(&self) -> f32 {
        ROW_HEIGHT
    }

    fn render(&self, row: &RowContext<'_>, out: &mut DrawList) {
        out.texts.push(label_text(
            row,
            &self.label,
            row.area.x + TEXT_PAD,
            row.theme.text,
        ));
        let (text, color) = if self.value {
            ("On", row.theme.accent)
        } else {
            ("Off", row.theme.text_dim)
        };
        out.texts.push(label_text(
            row,
            text,
            value_area(row.area).x + TEXT_PAD,
            color,
        ));
    }

    fn mouse_clicked(&mut self, area: Rect, pos: Point, button: MouseButton) -> bool {
        if button != MouseButton::Left || !value_area(area).contains(pos.x, pos.y) {
            return false;
        }
        self.value = !self.value;
        true
    }

    fn key_pressed(&mut self, combo: KeyCombo) -> bool {
        if matches!(combo.key, KeyCode::Enter | KeyCode::Space) {
            self.value = !self.value;
            return true;
        }
        false
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.label)
    }
}

// ---------------------------------------------------------------------------
// PairField
// ---------------------------------------------------------------------------

/// Key/value pair. The key and the value are separate sub-targets and
/// separate focus parts.
pub struct PairField {
    label: String,
    key: String,
    value: String,
    focused: Option<u16>,
    navigated: Option<usize>,
}

impl PairField {
    pub fn new(label: &str, key: &str, value: &str) -> Self {
        Self {
            label: label.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            focused: None,
            navigated: None,
        }
    }

    pub fn focused_part(&self) -> Option<u16> {
        self.focused
    }

    /// Sub-target last chosen by keyboard navigation.
    pub fn navigated(&self) -> Option<usize> {
        self.navigated
    }
}

impl Entry for PairField {
    fn height(&self) -> f32 {
        ROW_HEIGHT
    }

    fn render(&self, row: &RowContext<'_>, out: &mut DrawList) {
        out.texts.push(label_text(
            row,
            &self.label,
            row.area.x + TEXT_PAD,
            row.theme.text,
        ));
        for (i, text) in [&self.key, &self.value].into_iter().enumerate() {
            let part = self.sub_target_area(row.area, i);
            let color = if self.focused == Some(i as u16) {
                row.theme.accent
            } else {
                row.theme.text_dim
            };
            out.texts
                .push(label_text(row, text, part.x + TEXT_PAD, color));
        }
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn sub_target_count(&self) -> usize {
        2
    }

    fn sub_target_area(&self, area: Rect, index: usize) -> Rect {
        let value = value_area(area);
        let half = value.width / 2.0;
        Rect::new(
            value.x + half * index.min(1) as f32,
            value.y,
            half,
            value.height,
        )
    }

    fn focus_parts(&self) -> u16 {
        2
    }

    fn set_focused_part(&mut self, part: Option<u16>) {
        self.focused = part;
    }

    fn on_navigate(&mut self, sub: Option<usize>) {
        self.navigated = sub;
    }
}

// ---------------------------------------------------------------------------
// SliderField
// ---------------------------------------------------------------------------

/// Numeric slider over the right half of the row. Takes drags, and the
/// mouse wheel while focused.
pub struct SliderField {
    label: String,
    value: f32,
    min: f32,
    max: f32,
    focused: bool,
}

impl SliderField {
    pub fn new(label: &str, value: f32, min: f32, max: f32) -> Self {
        Self {
            label: label.to_string(),
            value: value.clamp(min, max),
            min,
            max,
            focused: false,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    fn set_from_x(&mut self, area: Rect, x: f32) {
        let track = value_area(area);
        if track.width <= 0.0 {
            return;
        }
        let t = ((x - track.x) / track.width).clamp(0.0, 1.0);
        self.value = self.min + t * (self.max - self.min);
    }
}

impl Entry for SliderField {
    fn height(&self) -> f32 {
        ROW_HEIGHT
    }

    fn render(&self, row: &RowContext<'_>, out: &mut DrawList) {
        out.texts.push(label_text(
            row,
            &self.label,
            row.area.x + TEXT_PAD,
            row.theme.text,
        ));
        let track = value_area(row.area);
        let span = self.max - self.min;
        let t = if span > 0.0 {
            (self.value - self.min) / span
        } else {
            0.0
        };
        out.panels
            .push(PanelCommand::fill(track, row.theme.scrollbar_track));
        out.panels.push(PanelCommand::fill(
            Rect::new(track.x, track.y, track.width * t, track.height),
            row.theme.accent,
        ));
        out.texts.push(label_text(
            row,
            &format!("{:.0}", self.value),
            track.x + TEXT_PAD,
            row.theme.text,
        ));
    }

    fn mouse_clicked(&mut self, area: Rect, pos: Point, button: MouseButton) -> bool {
        if button != MouseButton::Left || !value_area(area).contains(pos.x, pos.y) {
            return false;
        }
        self.set_from_x(area, pos.x);
        true
    }

    fn mouse_dragged(
        &mut self,
        area: Rect,
        pos: Point,
        _button: MouseButton,
        _delta: Point,
    ) -> bool {
        self.set_from_x(area, pos.x);
        true
    }

    fn mouse_released(&mut self, _area: Rect, _pos: Point, _button: MouseButton) -> bool {
        true
    }

    fn mouse_scrolled(&mut self, _area: Rect, _pos: Point, delta: f32) -> bool {
        if !self.focused {
            return false;
        }
        let step = (self.max - self.min) / 100.0;
        self.value = (self.value - delta * step).clamp(self.min, self.max);
        true
    }

    fn search_text(&self) -> Option<&str> {
        Some(&self.label)
    }

    fn set_focused_part(&mut self, part: Option<u16>) {
        self.focused = part.is_some();
    }
}

// ---------------------------------------------------------------------------
// Declarative population
// ---------------------------------------------------------------------------

/// Description of one demo entry, as loaded from a KDL file.
#[derive(Debug, Clone, PartialEq)]
pub enum DemoSpec {
    Text {
        label: String,
        value: String,
    },
    Toggle {
        label: String,
        value: bool,
    },
    Pair {
        label: String,
        key: String,
        value: String,
    },
    Slider {
        label: String,
        value: f32,
        min: f32,
        max: f32,
    },
    Group {
        title: String,
        expanded: bool,
        children: Vec<DemoSpec>,
    },
}

impl DemoSpec {
    fn build(&self) -> Box<dyn Entry> {
        match self {
            DemoSpec::Text { label, value } => Box::new(TextField::new(label, value)),
            DemoSpec::Toggle { label, value } => Box::new(ToggleField::new(label, *value)),
            DemoSpec::Pair { label, key, value } => Box::new(PairField::new(label, key, value)),
            DemoSpec::Slider {
                label,
                value,
                min,
                max,
            } => Box::new(SliderField::new(label, *value, *min, *max)),
            DemoSpec::Group { title, .. } => Box::new(Caption::new(title)),
        }
    }
}

/// Insert `specs` as root entries. Returns the ids of the inserted roots.
pub fn populate(list: &mut EntryList, specs: &[DemoSpec]) -> Vec<EntryId> {
    specs
        .iter()
        .map(|spec| {
            let id = list.insert_root(spec.build());
            populate_children(list, id, spec);
            id
        })
        .collect()
}

fn populate_children(list: &mut EntryList, id: EntryId, spec: &DemoSpec) {
    let DemoSpec::Group {
        expanded, children, ..
    } = spec
    else {
        return;
    };
    for child in children {
        if let Some(child_id) = list.insert(id, child.build()) {
            populate_children(list, child_id, child);
        }
    }
    if *expanded {
        list.set_expanded(id, true, false);
    }
}

/// Built-in showcase used when no entry file is available.
pub fn sample() -> Vec<DemoSpec> {
    let text = |label: &str, value: &str| DemoSpec::Text {
        label: label.to_string(),
        value: value.to_string(),
    };
    vec![
        DemoSpec::Group {
            title: "Video".to_string(),
            expanded: true,
            children: vec![
                DemoSpec::Slider {
                    label: "Brightness".to_string(),
                    value: 50.0,
                    min: 0.0,
                    max: 100.0,
                },
                DemoSpec::Slider {
                    label: "Field of View".to_string(),
                    value: 70.0,
                    min: 30.0,
                    max: 110.0,
                },
                DemoSpec::Toggle {
                    label: "VSync".to_string(),
                    value: true,
                },
            ],
        },
        DemoSpec::Group {
            title: "Controls".to_string(),
            expanded: false,
            children: vec![
                DemoSpec::Pair {
                    label: "Jump".to_string(),
                    key: "Space".to_string(),
                    value: "press".to_string(),
                },
                DemoSpec::Pair {
                    label: "Sprint".to_string(),
                    key: "Shift".to_string(),
                    value: "hold".to_string(),
                },
            ],
        },
        text("Player Name", "steve"),
    ]
}
