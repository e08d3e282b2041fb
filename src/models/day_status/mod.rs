use serde::{Deserialize, Serialize};

use crate::models::color::{Appearance, RgbaColor};
use crate::models::config::Palette;

/// Visual status of one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayStatus {
    Today,
    /// Manually configured `MM-DD` date.
    Significant { past: bool },
    /// Covered by an event of the calendar with this colour.
    EventOverlap { color: RgbaColor, past: bool },
    Weekend { past: bool },
    PastNoEvent,
    FutureNoEvent,
}

impl DayStatus {
    pub fn is_past(&self) -> bool {
        match self {
            DayStatus::Today | DayStatus::FutureNoEvent => false,
            DayStatus::PastNoEvent => true,
            DayStatus::Significant { past }
            | DayStatus::EventOverlap { past, .. }
            | DayStatus::Weekend { past } => *past,
        }
    }

    /// Resolve to a concrete colour and opacity.
    ///
    /// Past days are dimmed to 0.3 opacity when `dim_past` is set; Today never is.
    /// A dimmed past day without events shows the future-day colour, so the grid
    /// reads as it looked before the day went by.
    pub fn appearance(&self, palette: &Palette, dim_past: bool) -> Appearance {
        let finalize = |color: RgbaColor, past: bool| {
            if dim_past && past {
                Appearance::dimmed(color)
            } else {
                Appearance::of(color)
            }
        };

        match *self {
            DayStatus::Today => Appearance::of(palette.today),
            DayStatus::Significant { past } => finalize(palette.significant, past),
            DayStatus::EventOverlap { color, past } => finalize(color, past),
            DayStatus::Weekend { past } => finalize(palette.weekend, past),
            DayStatus::PastNoEvent => {
                if dim_past {
                    Appearance::dimmed(palette.future_day)
                } else {
                    Appearance::of(palette.past_day)
                }
            }
            DayStatus::FutureNoEvent => Appearance::of(palette.future_day),
        }
    }
}
