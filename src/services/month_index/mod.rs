use chrono::{Datelike, NaiveDate};

use crate::models::config::WallpaperConfig;
use crate::models::month_slot::MonthSlot;

/// Maps logical slot indices of the viewing window to concrete months and grid cells.
///
/// In fixed-year view slot 0 is January of the current year; otherwise slot 0
/// is the current month. Negative indices reach back into earlier years.
#[derive(Debug, Clone, Copy)]
pub struct MonthIndexResolver {
    current_year: i32,
    /// 0-based.
    current_month0: i32,
    fixed_year_view: bool,
    month_offset: i32,
    months_to_show: u32,
    months_per_row: u32,
}

impl MonthIndexResolver {
    pub fn new(config: &WallpaperConfig, today: NaiveDate) -> Self {
        Self {
            current_year: today.year(),
            current_month0: today.month0() as i32,
            fixed_year_view: config.fixed_year_view,
            month_offset: config.month_offset,
            months_to_show: config.months_to_show,
            months_per_row: config.months_per_row.max(1),
        }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    /// Logical indices of every visible slot, in drawing order.
    pub fn slot_indices(&self) -> std::ops::Range<i32> {
        let start = self.month_offset;
        start..start.saturating_add(i32::try_from(self.months_to_show).unwrap_or(i32::MAX))
    }

    /// Resolve slot `index` to its month and grid position.
    pub fn resolve(&self, index: i32) -> MonthSlot {
        let count = if self.fixed_year_view {
            i64::from(index)
        } else {
            i64::from(self.current_month0) + i64::from(index)
        };

        let year = i64::from(self.current_year) + count.div_euclid(12);
        let month0 = count.rem_euclid(12);

        let grid_index = i64::from(index) - i64::from(self.month_offset);
        let per_row = i64::from(self.months_per_row);

        MonthSlot {
            slot_index: index,
            year: year as i32,
            month: month0 as u32 + 1,
            row: grid_index.div_euclid(per_row) as u32,
            col: grid_index.rem_euclid(per_row) as u32,
        }
    }

    /// Every visible slot, in drawing order.
    pub fn slots(&self) -> Vec<MonthSlot> {
        self.slot_indices().map(|index| self.resolve(index)).collect()
    }

    /// Slots of the final grid row.
    pub fn last_row(&self) -> Vec<MonthSlot> {
        let rows = self.months_to_show.div_ceil(self.months_per_row);
        let last = rows.saturating_sub(1);
        self.slots().into_iter().filter(|slot| slot.row == last).collect()
    }

    /// First and last day covered by the visible window.
    pub fn visible_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let slots = self.slots();
        let first = slots.iter().min_by_key(|slot| (slot.year, slot.month))?;
        let last = slots.iter().max_by_key(|slot| (slot.year, slot.month))?;
        let start = NaiveDate::from_ymd_opt(first.year, first.month, 1)?;
        let end = NaiveDate::from_ymd_opt(
            last.year,
            last.month,
            crate::utils::date::days_in_month(last.year, last.month),
        )?;
        Some((start, end))
    }
}
