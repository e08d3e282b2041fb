// Unit tests for DayStatus appearance resolution
// Covers every status with dimming on and off

use test_case::test_case;
use yearglance::models::color::{Appearance, RgbaColor, DIMMED_OPACITY};
use yearglance::models::config::Palette;
use yearglance::models::day_status::DayStatus;

const EVENT_COLOR: RgbaColor = RgbaColor::rgb(0x30, 0xD1, 0x58);

fn palette() -> Palette {
    Palette::default()
}

#[test_case(DayStatus::Today, false; "today")]
#[test_case(DayStatus::FutureNoEvent, false; "future")]
#[test_case(DayStatus::PastNoEvent, true; "past")]
#[test_case(DayStatus::Significant { past: true }, true; "past significant")]
#[test_case(DayStatus::Weekend { past: false }, false; "future weekend")]
#[test_case(DayStatus::EventOverlap { color: EVENT_COLOR, past: true }, true; "past event")]
fn test_is_past(status: DayStatus, expected: bool) {
    assert_eq!(status.is_past(), expected);
}

#[test]
fn test_today_is_never_dimmed() {
    let palette = palette();
    assert_eq!(
        DayStatus::Today.appearance(&palette, true),
        Appearance::of(palette.today)
    );
}

#[test_case(true; "dimming on")]
#[test_case(false; "dimming off")]
fn test_future_days_are_full_opacity(dim_past: bool) {
    let palette = palette();
    let statuses = [
        (DayStatus::Significant { past: false }, palette.significant),
        (DayStatus::Weekend { past: false }, palette.weekend),
        (
            DayStatus::EventOverlap {
                color: EVENT_COLOR,
                past: false,
            },
            EVENT_COLOR,
        ),
        (DayStatus::FutureNoEvent, palette.future_day),
    ];

    for (status, color) in statuses {
        let appearance = status.appearance(&palette, dim_past);
        assert_eq!(appearance.color, color, "{:?}", status);
        assert_eq!(appearance.opacity, 1.0, "{:?}", status);
    }
}

#[test]
fn test_past_highlighted_days_are_dimmed() {
    let palette = palette();
    let statuses = [
        (DayStatus::Significant { past: true }, palette.significant),
        (DayStatus::Weekend { past: true }, palette.weekend),
        (
            DayStatus::EventOverlap {
                color: EVENT_COLOR,
                past: true,
            },
            EVENT_COLOR,
        ),
    ];

    for (status, color) in statuses {
        let appearance = status.appearance(&palette, true);
        assert_eq!(appearance.color, color, "{:?}", status);
        assert_eq!(appearance.opacity, DIMMED_OPACITY, "{:?}", status);
    }
}

#[test]
fn test_past_plain_day_dims_future_color() {
    // Dimmed past days show how the grid looked before they went by.
    let palette = palette();
    let appearance = DayStatus::PastNoEvent.appearance(&palette, true);
    assert_eq!(appearance.color, palette.future_day);
    assert_eq!(appearance.opacity, DIMMED_OPACITY);
}

#[test]
fn test_past_plain_day_without_dimming_uses_past_color() {
    let palette = palette();
    let appearance = DayStatus::PastNoEvent.appearance(&palette, false);
    assert_eq!(appearance, Appearance::of(palette.past_day));
    assert_eq!(appearance.to_rgba(), palette.past_day);
}

#[test]
fn test_translucent_event_color_keeps_its_alpha_when_not_dimmed() {
    let translucent = RgbaColor::new(0x30, 0xD1, 0x58, 0x80);
    let status = DayStatus::EventOverlap {
        color: translucent,
        past: false,
    };
    assert_eq!(status.appearance(&palette(), true).to_rgba(), translucent);
}
