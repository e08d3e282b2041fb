//! Bounds of the optional rounded panel drawn behind the month grid.

use crate::models::config::WallpaperConfig;
use crate::models::geometry::{LayoutParameters, Rect, ScreenGeometry};
use crate::services::month_index::MonthIndexResolver;
use crate::utils::date::week_rows;

/// Week rows assumed for the last grid row even when its months are shorter.
pub const MIN_LAST_ROW_WEEKS: u32 = 4;

pub struct ContainerBoundsCalculator<'a> {
    config: &'a WallpaperConfig,
    layout: &'a LayoutParameters,
    resolver: &'a MonthIndexResolver,
}

impl<'a> ContainerBoundsCalculator<'a> {
    pub fn new(
        config: &'a WallpaperConfig,
        layout: &'a LayoutParameters,
        resolver: &'a MonthIndexResolver,
    ) -> Self {
        Self {
            config,
            layout,
            resolver,
        }
    }

    /// Most week rows used by any month in the final grid row, at least four.
    pub fn weeks_in_last_row(&self) -> u32 {
        self.resolver
            .last_row()
            .iter()
            .map(|slot| week_rows(slot.year, slot.month, self.config.first_day_of_week))
            .max()
            .unwrap_or(0)
            .max(MIN_LAST_ROW_WEEKS)
    }

    pub fn bounds(&self, screen: ScreenGeometry) -> Rect {
        let layout = self.layout;
        let columns = self.config.months_per_row;
        let rows = self.config.rows().max(1);

        let padding = layout.dot_spacing * 0.8;
        let start_x = layout.grid_start_x(screen.width, columns);
        let total_width = layout.grid_width(columns);

        let top = layout.padding_top - layout.dot_spacing * 1.2;
        let last_row_y = layout.padding_top + (rows - 1) as f32 * layout.single_row_height;
        let dots_height = (self.weeks_in_last_row() - 1) as f32 * layout.dot_spacing
            + layout.dot_radius * 1.2;
        let bottom = last_row_y + dots_height;

        Rect::new(
            start_x - padding,
            top - padding,
            total_width + padding * 2.0,
            bottom - top + padding * 2.0,
        )
    }
}
