use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::models::color::{Appearance, RgbaColor};
use crate::models::config::WallpaperConfig;
use crate::models::day_status::DayStatus;
use crate::models::geometry::{LayoutParameters, Rect, ScreenGeometry};
use crate::models::month_slot::MonthSlot;
use crate::services::background::BackgroundPlan;
use crate::services::canvas::TextAlign;
use crate::services::classifier::DayClassifier;
use crate::services::container::ContainerBoundsCalculator;
use crate::services::event_index::EventIndex;
use crate::services::layout::LayoutPlanner;
use crate::services::month_index::MonthIndexResolver;
use crate::services::stats::{Stats, StatsComputer};
use crate::utils::date::{days_in_month, leading_blank_days};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextItem {
    pub text: String,
    pub rect: Rect,
    pub font_size: f32,
    pub color: RgbaColor,
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DayMark {
    Dot { rect: Rect },
    Number(TextItem),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub date: NaiveDate,
    pub status: DayStatus,
    pub appearance: Appearance,
    pub mark: DayMark,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPlan {
    pub slot: MonthSlot,
    pub header: TextItem,
    pub days: Vec<DayPlan>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerPlan {
    pub rect: Rect,
    pub radius: f32,
    pub color: RgbaColor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPlan {
    pub stats: Stats,
    pub text: TextItem,
}

/// Everything that ends up on the wallpaper, in painting order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WallpaperPlan {
    pub screen: ScreenGeometry,
    pub today: NaiveDate,
    pub layout: LayoutParameters,
    pub background: BackgroundPlan,
    pub container: Option<ContainerPlan>,
    pub months: Vec<MonthPlan>,
    pub stats: Option<StatsPlan>,
}

impl WallpaperPlan {
    pub fn day(&self, date: NaiveDate) -> Option<&DayPlan> {
        self.months
            .iter()
            .flat_map(|month| month.days.iter())
            .find(|day| day.date == date)
    }
}

/// Lays out every visible month and day for one point in time.
pub struct WallpaperPlanner<'a> {
    config: &'a WallpaperConfig,
    screen: ScreenGeometry,
}

impl<'a> WallpaperPlanner<'a> {
    pub fn new(config: &'a WallpaperConfig, screen: ScreenGeometry) -> Self {
        Self { config, screen }
    }

    pub fn plan(
        &self,
        index: &EventIndex,
        now: NaiveDateTime,
        background: BackgroundPlan,
    ) -> WallpaperPlan {
        let config = self.config;
        let today = now.date();

        let layout = LayoutPlanner::new(config, self.screen).plan();
        let resolver = MonthIndexResolver::new(config, today);
        let classifier = DayClassifier::new(config, index, today);

        let container = config.show_container.then(|| {
            let rect = ContainerBoundsCalculator::new(config, &layout, &resolver).bounds(self.screen);
            ContainerPlan {
                rect,
                radius: config.container_radius,
                color: RgbaColor::new(0, 0, 0, unit_to_alpha(config.container_opacity)),
            }
        });

        let months: Vec<MonthPlan> = resolver
            .slots()
            .into_iter()
            .map(|slot| self.plan_month(slot, &layout, &resolver, &classifier))
            .collect();

        let stats = config.show_stats.then(|| {
            let stats = StatsComputer::new(index).compute(config.stats_mode, now);
            let font_size = layout.font_size_stats;
            StatsPlan {
                text: TextItem {
                    text: stats.label(),
                    rect: Rect::new(
                        0.0,
                        self.screen.height - font_size * 3.5,
                        self.screen.width,
                        font_size * 3.0,
                    ),
                    font_size,
                    color: config.colors.stats,
                    align: TextAlign::Center,
                },
                stats,
            }
        });

        log::info!(
            "Planned {} months ({} days) at scale {:.3}",
            months.len(),
            months.iter().map(|m| m.days.len()).sum::<usize>(),
            layout.scale
        );

        WallpaperPlan {
            screen: self.screen,
            today,
            layout,
            background,
            container,
            months,
            stats,
        }
    }

    fn plan_month(
        &self,
        slot: MonthSlot,
        layout: &LayoutParameters,
        resolver: &MonthIndexResolver,
        classifier: &DayClassifier<'_>,
    ) -> MonthPlan {
        let config = self.config;
        let spacing = layout.dot_spacing;
        let start_x = layout.grid_start_x(self.screen.width, config.months_per_row);
        let block_x =
            start_x + slot.col as f32 * (layout.month_block_width() + layout.col_gap);
        let block_y = layout.padding_top + slot.row as f32 * layout.single_row_height;

        let header = TextItem {
            text: slot.header(resolver.current_year()),
            rect: Rect::new(
                block_x - spacing * 0.1,
                block_y - spacing * 1.2,
                layout.month_block_width() + spacing,
                layout.font_size_month * 1.2,
            ),
            font_size: layout.font_size_month,
            color: config.colors.text,
            align: TextAlign::Left,
        };

        let offset = leading_blank_days(slot.year, slot.month, config.first_day_of_week);
        let days = (1..=days_in_month(slot.year, slot.month))
            .filter_map(|day| {
                let date = NaiveDate::from_ymd_opt(slot.year, slot.month, day)?;
                let cell = offset + day - 1;
                let x = block_x + (cell % 7) as f32 * spacing;
                let y = block_y + (cell / 7) as f32 * spacing;

                let status = classifier.classify(date);
                let appearance = status.appearance(&config.colors, config.dim_past_days);
                let mark = if config.show_day_numbers {
                    DayMark::Number(TextItem {
                        text: day.to_string(),
                        rect: Rect::new(x - spacing * 0.1, y - spacing * 0.15, spacing * 1.2, spacing),
                        font_size: layout.font_size_day * 0.9,
                        color: appearance.to_rgba(),
                        align: TextAlign::Center,
                    })
                } else {
                    let diameter = layout.dot_radius * 2.0;
                    DayMark::Dot {
                        rect: Rect::new(x, y, diameter, diameter),
                    }
                };

                Some(DayPlan {
                    date,
                    status,
                    appearance,
                    mark,
                })
            })
            .collect();

        MonthPlan { slot, header, days }
    }
}

fn unit_to_alpha(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
