use crate::geometry::Color;

/// Compile-time layout tokens, not user-overridable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleTokens {
    pub spacing_4: i32,
    pub spacing_8: i32,
    pub spacing_12: i32,
    pub control_radius: u16,
    pub control_size: u16,
    pub icon_size: u16,
    pub window_initial_width: i32,
    pub window_initial_height: i32,
    pub window_min_width: i32,
    pub window_min_height: i32,
    pub font_size_spin_width: i32,
    pub position_spin_width: i32,
    pub toast_duration_ms: u32,
}

pub const LAYOUT_TOKENS: StyleTokens = StyleTokens {
    spacing_4: 4,
    spacing_8: 8,
    spacing_12: 12,
    control_radius: 8,
    control_size: 32,
    icon_size: 16,
    window_initial_width: 1280,
    window_initial_height: 800,
    window_min_width: 640,
    window_min_height: 400,
    font_size_spin_width: 64,
    position_spin_width: 84,
    toast_duration_ms: 2_000,
};

/// Colors used when painting the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPalette {
    pub background: Color,
    pub grid: Color,
    pub selection: Color,
    pub guide: Color,
    pub handle: Color,
    pub rubber_band: Color,
    pub rubber_band_fill_alpha: f64,
    pub edit_cursor: Color,
}

pub const CANVAS_PALETTE: CanvasPalette = CanvasPalette {
    background: Color::new(255, 255, 255),
    grid: Color::new(230, 230, 230),
    selection: Color::new(0, 0, 255),
    guide: Color::new(255, 0, 0),
    handle: Color::new(0, 0, 255),
    rubber_band: Color::new(48, 140, 198),
    rubber_band_fill_alpha: 0.15,
    edit_cursor: Color::new(0, 0, 0),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_initial_size_respects_minimum() {
        let tokens = LAYOUT_TOKENS;
        assert!(tokens.window_initial_width >= tokens.window_min_width);
        assert!(tokens.window_initial_height >= tokens.window_min_height);
    }

    #[test]
    fn canvas_grid_is_light_gray_and_guides_red() {
        assert_eq!(CANVAS_PALETTE.grid, Color::new(230, 230, 230));
        assert_eq!(CANVAS_PALETTE.guide, Color::new(255, 0, 0));
        assert!((0.0..=1.0).contains(&CANVAS_PALETTE.rubber_band_fill_alpha));
    }
}
