//! Calendar geometry planning.
//!
//! Derives dot spacing, radii, gaps and font sizes from the screen size and
//! configuration, then shrinks everything uniformly when the grid would not
//! fit between the top offset and the reserved bottom band, or would be wider
//! than 94% of the screen.

use crate::models::config::WallpaperConfig;
use crate::models::geometry::{LayoutParameters, ScreenGeometry};

/// Share of the screen width the grid may occupy.
pub const SAFE_WIDTH_RATIO: f32 = 0.94;
/// Scale applied when the band has no room at all, keeps geometry positive.
pub const MIN_SCALE: f32 = 0.01;

const MONTH_FONT_RATIO: f32 = 0.022;
const STATS_FONT_RATIO: f32 = 0.028;
const BOTTOM_WIDGETS_TOP_RATIO: f32 = 0.3;

/// Vertical band the grid must stay inside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalBand {
    pub top: f32,
    pub limit: f32,
}

impl VerticalBand {
    pub fn available(&self) -> f32 {
        self.limit - self.top
    }
}

pub struct LayoutPlanner<'a> {
    config: &'a WallpaperConfig,
    screen: ScreenGeometry,
}

impl<'a> LayoutPlanner<'a> {
    pub fn new(config: &'a WallpaperConfig, screen: ScreenGeometry) -> Self {
        Self { config, screen }
    }

    pub fn stats_font_size(&self) -> f32 {
        self.screen.width * STATS_FONT_RATIO
    }

    /// Top offset and lower limit of the calendar, honouring widget areas.
    pub fn vertical_band(&self) -> VerticalBand {
        let height = self.screen.height;
        let stats_height = if self.config.show_stats {
            self.stats_font_size() * 4.0
        } else {
            0.0
        };

        let mut top = if self.config.widgets_top {
            height * self.config.top_widgets_padding
        } else {
            height * self.config.ratios.top_padding
        };

        let limit = if self.config.widgets_bottom {
            top = height * BOTTOM_WIDGETS_TOP_RATIO;
            height * (1.0 - self.config.bottom_widgets_padding)
        } else {
            height - stats_height
        };

        VerticalBand { top, limit }
    }

    /// Geometry before auto-scaling.
    pub fn unscaled(&self) -> LayoutParameters {
        let config = self.config;
        let width = self.screen.width;

        let dot_spacing = (width / config.ratios.spacing) * config.content_scale;
        let dot_radius = dot_spacing * config.ratios.radius * config.dot_size_multiplier;
        let month_gap = dot_spacing * config.ratios.month_gap;
        let col_gap = dot_spacing * config.ratios.col_gap;
        let font_size_month = width * MONTH_FONT_RATIO * config.content_scale;
        let font_size_day =
            width * MONTH_FONT_RATIO * config.day_font_size_multiplier * config.content_scale;

        LayoutParameters {
            dot_spacing,
            dot_radius,
            month_gap,
            col_gap,
            font_size_month,
            font_size_day,
            font_size_stats: self.stats_font_size(),
            padding_top: self.vertical_band().top,
            single_row_height: row_height(dot_spacing, font_size_month, month_gap),
            scale: 1.0,
        }
    }

    /// Factor that makes `content` fit in `available`; 1 when it already fits
    /// and `MIN_SCALE` when nothing fits.
    pub fn fit_scale(content: f32, available: f32) -> f32 {
        if !(content.is_finite() && content > 0.0) {
            return 1.0;
        }
        if content <= available {
            return 1.0;
        }
        let scale = available / content;
        if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            MIN_SCALE
        }
    }

    /// Final geometry with auto-scaling applied.
    pub fn plan(&self) -> LayoutParameters {
        let base = self.unscaled();
        let band = self.vertical_band();
        let rows = self.config.rows() as f32;
        let columns = self.config.months_per_row;

        let total_height = rows * base.single_row_height;
        let total_width = base.grid_width(columns);

        let height_scale = Self::fit_scale(total_height, band.available());
        let width_scale = Self::fit_scale(total_width, self.screen.width * SAFE_WIDTH_RATIO);
        let scale = height_scale.min(width_scale).min(1.0);

        if band.available() <= 0.0 {
            log::warn!(
                "No vertical room for the calendar (top {:.1}, limit {:.1}); shrinking to minimum",
                band.top,
                band.limit
            );
        }

        if scale >= 1.0 {
            log::debug!(
                "Calendar fits unscaled: {:.1}x{:.1} within {:.1}x{:.1}",
                total_width,
                total_height,
                self.screen.width * SAFE_WIDTH_RATIO,
                band.available()
            );
            return base;
        }

        log::debug!(
            "Auto-scaling calendar by {:.3} (height {:.3}, width {:.3})",
            scale,
            height_scale,
            width_scale
        );

        let dot_spacing = base.dot_spacing * scale;
        let font_size_month = base.font_size_month * scale;
        let month_gap = base.month_gap * scale;

        LayoutParameters {
            dot_spacing,
            dot_radius: base.dot_radius * scale,
            month_gap,
            col_gap: base.col_gap * scale,
            font_size_month,
            font_size_day: base.font_size_day * scale,
            font_size_stats: base.font_size_stats,
            padding_top: base.padding_top,
            single_row_height: row_height(dot_spacing, font_size_month, month_gap),
            scale,
        }
    }
}

/// Six week-row steps of dots, the header, and the gap below.
fn row_height(dot_spacing: f32, font_size_month: f32, month_gap: f32) -> f32 {
    6.0 * dot_spacing + 2.0 * font_size_month + month_gap
}
