use super::Rect;

/// Intermediate draw command for a panel quad.
#[derive(Debug, Clone)]
pub struct PanelCommand {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub bg_color: [f32; 4],     // sRGB RGBA
    pub border_color: [f32; 4], // sRGB RGBA
    pub border_width: f32,
}

impl PanelCommand {
    /// Borderless filled quad covering `rect`.
    pub fn fill(rect: Rect, color: [f32; 4]) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            bg_color: color,
            border_color: [0.0; 4],
            border_width: 0.0,
        }
    }

    /// Transparent quad with a border, used for selection outlines.
    pub fn outline(rect: Rect, color: [f32; 4], width: f32) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            bg_color: [0.0; 4],
            border_color: color,
            border_width: width,
        }
    }
}

/// Intermediate draw command for a text run.
#[derive(Debug, Clone)]
pub struct TextCommand {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub color: [f32; 4], // sRGB RGBA
    pub font_size: f32,
}

/// Draw commands produced by one frame of the list, in paint order.
/// Panels paint before texts.
pub struct DrawList {
    pub panels: Vec<PanelCommand>,
    pub texts: Vec<TextCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            panels: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.panels.clear();
        self.texts.clear();
    }

    /// Text runs whose origin lies inside `area`, in paint order.
    pub fn texts_in(&self, area: Rect) -> impl Iterator<Item = &str> {
        self.texts
            .iter()
            .filter(move |t| area.contains(t.x, t.y))
            .map(|t| t.text.as_str())
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texts_in_filters_by_origin() {
        let mut dl = DrawList::new();
        for (i, y) in [5.0, 25.0, 45.0].into_iter().enumerate() {
            dl.texts.push(TextCommand {
                text: format!("row {}", i),
                x: 10.0,
                y,
                color: [1.0; 4],
                font_size: 14.0,
            });
        }
        let row = Rect::new(0.0, 20.0, 100.0, 20.0);
        assert_eq!(dl.texts_in(row).collect::<Vec<_>>(), vec!["row 1"]);
        dl.clear();
        assert_eq!(dl.texts_in(row).count(), 0);
    }

    #[test]
    fn outline_has_no_fill() {
        let p = PanelCommand::outline(Rect::new(1.0, 2.0, 3.0, 4.0), [1.0; 4], 2.0);
        assert_eq!(p.bg_color, [0.0; 4]);
        assert_eq!(p.border_width, 2.0);
        assert_eq!((p.x, p.y, p.width, p.height), (1.0, 2.0, 3.0, 4.0));
    }
}
