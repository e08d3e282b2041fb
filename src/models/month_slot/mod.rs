use serde::{Deserialize, Serialize};

pub const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// One logical position of the viewing window resolved to a concrete month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthSlot {
    /// Logical index in `[monthOffset, monthOffset + monthsToShow)`.
    pub slot_index: i32,
    pub year: i32,
    /// 1-12.
    pub month: u32,
    pub row: u32,
    pub col: u32,
}

impl MonthSlot {
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month.clamp(1, 12) - 1) as usize]
    }

    /// Header text; a `'YY` suffix disambiguates other years and any January
    /// that is not the window's zero slot.
    pub fn header(&self, current_year: i32) -> String {
        let name = self.month_name();
        if self.year != current_year || (self.month == 1 && self.slot_index != 0) {
            format!("{} '{:02}", name, self.year.rem_euclid(100))
        } else {
            name.to_string()
        }
    }
}
