// Property-based tests for layout, month resolution, classification and stats
// Random configurations and dates must never break the core invariants

use chrono::{Datelike, Duration, NaiveDate};
use proptest::prelude::*;
use yearglance::models::calendar_source::{CalendarSource, EventInterval};
use yearglance::models::color::RgbaColor;
use yearglance::models::config::WallpaperConfig;
use yearglance::models::day_status::DayStatus;
use yearglance::models::geometry::ScreenGeometry;
use yearglance::services::classifier::DayClassifier;
use yearglance::services::event_index::EventIndex;
use yearglance::services::layout::{LayoutPlanner, SAFE_WIDTH_RATIO};
use yearglance::services::month_index::MonthIndexResolver;
use yearglance::services::stats::YearProgress;
use yearglance::utils::date::{end_of_day, start_of_day};

fn date_strategy() -> impl Strategy<Value = NaiveDate> {
    (2000i32..2100, 0i64..366).prop_map(|(year, offset)| {
        let start = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        let date = start + Duration::days(offset);
        if date.year() == year {
            date
        } else {
            start
        }
    })
}

fn config_strategy() -> impl Strategy<Value = WallpaperConfig> {
    (
        1u32..=36,
        1u32..=6,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        0.2f32..3.0,
        0.5f32..2.5,
    )
        .prop_map(
            |(months, per_row, widgets_top, widgets_bottom, show_stats, content_scale, dot_size)| {
                WallpaperConfig {
                    months_to_show: months,
                    months_per_row: per_row,
                    widgets_top,
                    widgets_bottom,
                    show_stats,
                    content_scale,
                    dot_size_multiplier: dot_size,
                    ..WallpaperConfig::default()
                }
            },
        )
}

proptest! {
    /// Property: the final scale is in (0, 1] and the grid fits its bounds
    #[test]
    fn prop_layout_fits_available_space(
        config in config_strategy(),
        width in 200.0f32..1500.0,
        aspect in 1.5f32..2.5,
    ) {
        let height = width * aspect;
        let planner = LayoutPlanner::new(&config, ScreenGeometry::new(width, height));
        let layout = planner.plan();
        let band = planner.vertical_band();

        prop_assert!(layout.scale > 0.0 && layout.scale <= 1.0);
        prop_assert!(layout.dot_spacing.is_finite() && layout.dot_spacing > 0.0);

        let total_height = config.rows() as f32 * layout.single_row_height;
        let total_width = layout.grid_width(config.months_per_row);
        // Portrait screens always leave vertical room, so the minimum scale
        // is never reached and both limits hold.
        prop_assert!(total_height <= band.available() * 1.001 + 0.01);
        prop_assert!(total_width <= width * SAFE_WIDTH_RATIO * 1.001 + 0.01);
    }

    /// Property: fixed-year slot i + 12 is the same month one year later
    #[test]
    fn prop_fixed_year_slots_repeat_yearly(
        today in date_strategy(),
        index in -48i32..48,
        offset in -24i32..24,
    ) {
        let config = WallpaperConfig {
            fixed_year_view: true,
            month_offset: offset,
            ..WallpaperConfig::default()
        };
        let resolver = MonthIndexResolver::new(&config, today);
        let slot = resolver.resolve(index);
        let next = resolver.resolve(index + 12);

        prop_assert_eq!(next.month, slot.month);
        prop_assert_eq!(next.year, slot.year + 1);
        prop_assert!((1..=12).contains(&slot.month));
    }

    /// Property: today is Today no matter what else applies to it
    #[test]
    fn prop_today_always_wins(
        today in date_strategy(),
        significant in any::<bool>(),
        with_event in any::<bool>(),
        weekends in any::<bool>(),
    ) {
        let mut config = WallpaperConfig {
            highlight_weekends: weekends,
            ..WallpaperConfig::default()
        };
        if significant {
            config
                .manual_significant_dates
                .insert(format!("{:02}-{:02}", today.month(), today.day()));
        }
        let events = if with_event {
            vec![EventInterval::new(start_of_day(today), end_of_day(today))]
        } else {
            Vec::new()
        };
        let index = EventIndex::new(vec![CalendarSource {
            name: "*Cal".to_string(),
            color: RgbaColor::rgb(1, 2, 3),
            events,
        }]);

        let classifier = DayClassifier::new(&config, &index, today);
        prop_assert_eq!(classifier.classify(today), DayStatus::Today);
    }

    /// Property: classification does not depend on call order
    #[test]
    fn prop_classifier_is_pure(
        today in date_strategy(),
        offsets in proptest::collection::vec(-400i64..400, 1..20),
    ) {
        let config = WallpaperConfig::default();
        let index = EventIndex::empty();
        let classifier = DayClassifier::new(&config, &index, today);

        let dates: Vec<NaiveDate> = offsets.iter().map(|d| today + Duration::days(*d)).collect();
        let forward: Vec<DayStatus> = dates.iter().map(|d| classifier.classify(*d)).collect();
        let backward: Vec<DayStatus> = dates.iter().rev().map(|d| classifier.classify(*d)).collect();

        let reversed: Vec<DayStatus> = backward.into_iter().rev().collect();
        prop_assert_eq!(forward, reversed);
    }

    /// Property: days left plus days passed is the length of the year
    #[test]
    fn prop_progress_adds_up(
        today in date_strategy(),
        seconds in 0i64..86_400,
    ) {
        let now = start_of_day(today) + Duration::seconds(seconds);
        let progress = YearProgress::at(now);

        prop_assert!(progress.total_days == 365 || progress.total_days == 366);
        prop_assert_eq!(progress.days_left + progress.days_passed, progress.total_days);
        prop_assert!((0..=100).contains(&progress.percent));
    }
}
