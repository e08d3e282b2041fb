use serde::{Deserialize, Serialize};

/// Target image size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenGeometry {
    pub width: f32,
    pub height: f32,
}

impl ScreenGeometry {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl Default for ScreenGeometry {
    fn default() -> Self {
        // iPhone 15 portrait
        Self::new(1179.0, 2556.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.width.is_finite() && self.height.is_finite()
    }
}

/// Final calendar geometry after auto-scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutParameters {
    pub dot_spacing: f32,
    pub dot_radius: f32,
    pub month_gap: f32,
    pub col_gap: f32,
    pub font_size_month: f32,
    pub font_size_day: f32,
    /// Never affected by auto-scaling.
    pub font_size_stats: f32,
    /// Y of the first month row.
    pub padding_top: f32,
    pub single_row_height: f32,
    /// Uniform factor applied to the calendar dimensions, in `(0, 1]`.
    pub scale: f32,
}

impl LayoutParameters {
    /// Width of one month block: seven dot columns.
    pub fn month_block_width(&self) -> f32 {
        6.0 * self.dot_spacing + 2.0 * self.dot_radius
    }

    /// Width of `columns` month blocks and the gaps between them.
    pub fn grid_width(&self, columns: u32) -> f32 {
        let columns = columns.max(1) as f32;
        columns * self.month_block_width() + (columns - 1.0) * self.col_gap
    }

    /// Left edge of a grid of `columns` blocks centred on a screen `screen_width` wide.
    pub fn grid_start_x(&self, screen_width: f32, columns: u32) -> f32 {
        (screen_width - self.grid_width(columns)) / 2.0
    }
}
