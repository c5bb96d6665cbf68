/// Centralized visual style constants for entry lists.
///
/// Entries and the list draw pass read colors from here instead of
/// hardcoding them.
#[derive(Debug, Clone)]
pub struct Theme {
    // -- Color palette (sRGB RGBA) --
    /// List background: #282828
    pub bg: [f32; 4],
    /// Primary text: #EBDBB2
    pub text: [f32; 4],
    /// Secondary text (captions, placeholders): #A89984
    pub text_dim: [f32; 4],
    /// Accent used for the keyboard selection outline: #C8A850
    pub accent: [f32; 4],
    /// Hovered row tint.
    pub hover: [f32; 4],
    /// Background of rows matching the active search.
    pub match_bg: [f32; 4],
    /// Background of the focused search match.
    pub focused_match_bg: [f32; 4],

    // -- Scrollbar --
    pub scrollbar_track: [f32; 4],
    pub scrollbar_thumb: [f32; 4],
    /// Thumb color while dragged.
    pub scrollbar_thumb_active: [f32; 4],

    // -- Text --
    pub font_size: f32,
    /// Text shown when no entry is laid out.
    pub placeholder: String,
    /// Shown instead of `placeholder` when the search filter hid every entry.
    pub no_matches_placeholder: String,
    /// Outline width of the selection highlight in pixels.
    pub selection_border: f32,
}

/// Convert a hex color (#RRGGBB) to sRGB [f32; 4] with alpha 1.0.
const fn hex(r: u8, g: u8, b: u8) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Convert a hex color with custom alpha.
const fn hex_a(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg: hex(0x28, 0x28, 0x28),
            text: hex(0xEB, 0xDB, 0xB2),
            text_dim: hex(0xA8, 0x99, 0x84),
            accent: hex(0xC8, 0xA8, 0x50),
            hover: hex_a(0xF0, 0xE6, 0xD2, 0.08),
            match_bg: hex_a(0xC8, 0xA8, 0x50, 0.20),
            focused_match_bg: hex_a(0xC8, 0xA8, 0x50, 0.45),

            scrollbar_track: hex_a(0x00, 0x00, 0x00, 0.5),
            scrollbar_thumb: hex_a(0xA8, 0x99, 0x84, 0.8),
            scrollbar_thumb_active: hex(0xEB, 0xDB, 0xB2),

            font_size: 12.0,
            placeholder: "No entries".to_string(),
            no_matches_placeholder: "No matches".to_string(),
            selection_border: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_conversion() {
        let white = hex(0xFF, 0xFF, 0xFF);
        assert!((white[0] - 1.0).abs() < 0.001);
        assert!((white[3] - 1.0).abs() < 0.001);

        let half_alpha = hex_a(0x80, 0x80, 0x80, 0.5);
        assert!((half_alpha[3] - 0.5).abs() < 0.001);
    }

    #[test]
    fn focused_match_stands_out() {
        let t = Theme::default();
        assert!(t.focused_match_bg[3] > t.match_bg[3]);
        assert!(t.match_bg[3] > t.hover[3]);
        assert_eq!(t.placeholder, "No entries");
    }
}
