use std::time::Duration;

use serde::Deserialize;

use super::animation::Easing;

/// Tunables for scrolling, layout, and search behaviour of an `EntryList`.
///
/// Loaded from RON (see `loading::load_settings`); every field falls back
/// to its default when omitted.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    /// Animate scroll changes instead of jumping.
    pub smooth_scrolling: bool,
    /// Duration of a scroll animation in milliseconds.
    pub scroll_duration_ms: u64,
    /// Easing curve for scroll animations.
    pub scroll_easing: Easing,
    /// How far past either bound an animated target may overshoot (pixels).
    pub elastic_allowance: f32,
    /// Pixels scrolled per wheel notch.
    pub wheel_step: f32,
    /// Minimum distance kept between a followed entry and the viewport edge.
    pub forced_scroll_margin: f32,
    /// Preferred distance kept between a followed entry and the viewport edge.
    pub preferred_scroll_margin: f32,
    /// Margin used when keeping the keyboard-focused entry visible.
    pub focus_scroll_margin: f32,
    pub scrollbar_width: f32,
    pub min_thumb_height: f32,
    /// Horizontal inset of rows from the list edges.
    pub row_inset: f32,
    /// Extra horizontal indent per nesting level.
    pub indent: f32,
    /// Maximum entries kept in each search history list.
    pub history_size: usize,
}

impl ListSettings {
    pub fn scroll_duration(&self) -> Duration {
        Duration::from_millis(self.scroll_duration_ms)
    }
}

impl Default for ListSettings {
    fn default() -> Self {
        Self {
            smooth_scrolling: true,
            scroll_duration_ms: 200,
            scroll_easing: Easing::CircOut,
            elastic_allowance: 32.0,
            wheel_step: 16.0,
            forced_scroll_margin: 12.0,
            preferred_scroll_margin: 60.0,
            focus_scroll_margin: 12.0,
            scrollbar_width: 6.0,
            min_thumb_height: 32.0,
            row_inset: 4.0,
            indent: 12.0,
            history_size: 10,
        }
    }
}
