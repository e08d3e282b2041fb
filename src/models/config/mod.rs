//! Wallpaper configuration.
//!
//! Parsed once from TOML at startup, validated once, then passed by reference
//! into every component. Unknown keys are ignored and missing keys fall back
//! to the defaults below.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::color::RgbaColor;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Largest accepted `monthsToShow`: a century of months.
pub const MAX_MONTHS_TO_SHOW: u32 = 1200;

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Which summary line is drawn under the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StatsMode {
    /// Number of events overlapping today.
    #[default]
    Events,
    /// Days left in the year and percentage elapsed.
    Progress,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Palette {
    pub bg: RgbaColor,
    pub past_day: RgbaColor,
    pub future_day: RgbaColor,
    pub today: RgbaColor,
    pub significant: RgbaColor,
    pub text: RgbaColor,
    pub stats: RgbaColor,
    pub weekend: RgbaColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bg: RgbaColor::rgb(0x00, 0x00, 0x00),
            past_day: RgbaColor::new(0xff, 0xff, 0xff, 242),
            future_day: RgbaColor::rgb(0x2c, 0x2c, 0x2e),
            today: RgbaColor::rgb(0xff, 0x3b, 0x30),
            significant: RgbaColor::rgb(0xff, 0xd6, 0x0a),
            text: RgbaColor::rgb(0x98, 0x98, 0x9d),
            stats: RgbaColor::rgb(0xff, 0x9f, 0x0a),
            weekend: RgbaColor::rgb(0x51, 0x51, 0x55),
        }
    }
}

/// Internal proportions the layout is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutRatios {
    /// Fraction of screen height above the first month row.
    pub top_padding: f32,
    /// Screen width divided by this gives the dot spacing.
    pub spacing: f32,
    /// Dot radius as a fraction of dot spacing.
    pub radius: f32,
    /// Vertical gap between month rows, in dot spacings.
    pub month_gap: f32,
    /// Horizontal gap between month columns, in dot spacings.
    pub col_gap: f32,
}

impl Default for LayoutRatios {
    fn default() -> Self {
        Self {
            top_padding: 0.335,
            spacing: 30.5,
            radius: 0.3,
            month_gap: 1.9,
            col_gap: 1.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WallpaperConfig {
    // General
    pub months_to_show: u32,
    pub months_per_row: u32,
    pub month_offset: i32,
    pub fixed_year_view: bool,
    pub content_scale: f32,

    // Days and dots
    pub show_day_numbers: bool,
    /// 0 = Sunday, 1 = Monday.
    pub first_day_of_week: u8,
    pub highlight_weekends: bool,
    pub dim_past_days: bool,
    pub day_font_size_multiplier: f32,
    pub dot_size_multiplier: f32,

    // Background
    pub show_wallpaper: bool,
    pub overlay_opacity: f32,
    pub use_gradient: bool,
    pub gradient_colors: Vec<RgbaColor>,
    pub show_container: bool,
    pub container_opacity: f32,
    pub container_radius: f32,

    // Widget areas
    pub widgets_top: bool,
    pub top_widgets_padding: f32,
    pub widgets_bottom: bool,
    pub bottom_widgets_padding: f32,

    // Calendars
    pub calendar_prefix: String,
    pub specific_calendar_names: Vec<String>,
    pub manual_significant_dates: BTreeSet<String>,
    pub sort_by_name: bool,

    // Stats
    pub show_stats: bool,
    pub stats_mode: StatsMode,

    pub colors: Palette,
    pub ratios: LayoutRatios,
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            months_to_show: 12,
            months_per_row: 3,
            month_offset: 0,
            fixed_year_view: false,
            content_scale: 1.0,
            show_day_numbers: false,
            first_day_of_week: 1,
            highlight_weekends: true,
            dim_past_days: true,
            day_font_size_multiplier: 1.1,
            dot_size_multiplier: 1.1,
            show_wallpaper: true,
            overlay_opacity: 0.3,
            use_gradient: true,
            gradient_colors: vec![
                RgbaColor::rgb(0x0f, 0x20, 0x27),
                RgbaColor::rgb(0x20, 0x3a, 0x43),
                RgbaColor::rgb(0x2c, 0x53, 0x64),
            ],
            show_container: true,
            container_opacity: 0.8,
            container_radius: 15.0,
            widgets_top: false,
            top_widgets_padding: 0.36,
            widgets_bottom: false,
            bottom_widgets_padding: 0.17,
            calendar_prefix: "*".to_string(),
            specific_calendar_names: Vec::new(),
            manual_significant_dates: BTreeSet::new(),
            sort_by_name: true,
            show_stats: true,
            stats_mode: StatsMode::Events,
            colors: Palette::default(),
            ratios: LayoutRatios::default(),
        }
    }
}

impl WallpaperConfig {
    pub fn config_dir() -> PathBuf {
        ProjectDirs::from("com", "yearglance", "yearglance")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: WallpaperConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields the validated defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.months_to_show == 0 {
            return Err(invalid("monthsToShow", "must be at least 1"));
        }
        if self.months_to_show > MAX_MONTHS_TO_SHOW {
            return Err(invalid(
                "monthsToShow",
                format!("must be at most {}, got {}", MAX_MONTHS_TO_SHOW, self.months_to_show),
            ));
        }
        if self.months_per_row == 0 {
            return Err(invalid("monthsPerRow", "must be at least 1"));
        }
        if self.first_day_of_week > 1 {
            return Err(invalid("firstDayOfWeek", "must be 0 (Sunday) or 1 (Monday)"));
        }

        let positive = [
            ("contentScale", self.content_scale),
            ("dayFontSizeMultiplier", self.day_font_size_multiplier),
            ("dotSizeMultiplier", self.dot_size_multiplier),
            ("ratios.spacing", self.ratios.spacing),
            ("ratios.radius", self.ratios.radius),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(field, format!("must be a positive number, got {}", value)));
            }
        }

        let fractions = [
            ("overlayOpacity", self.overlay_opacity),
            ("containerOpacity", self.container_opacity),
            ("topWidgetsPadding", self.top_widgets_padding),
            ("bottomWidgetsPadding", self.bottom_widgets_padding),
            ("ratios.topPadding", self.ratios.top_padding),
        ];
        for (field, value) in fractions {
            if !(value.is_finite() && (0.0..=1.0).contains(&value)) {
                return Err(invalid(field, format!("must be between 0 and 1, got {}", value)));
            }
        }

        let non_negative = [
            ("containerRadius", self.container_radius),
            ("ratios.monthGap", self.ratios.month_gap),
            ("ratios.colGap", self.ratios.col_gap),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, format!("must not be negative, got {}", value)));
            }
        }

        for date in &self.manual_significant_dates {
            if parse_month_day(date).is_none() {
                return Err(invalid(
                    "manualSignificantDates",
                    format!("'{}' is not a valid MM-DD date", date),
                ));
            }
        }

        Ok(())
    }

    /// Number of grid rows needed for the configured window.
    pub fn rows(&self) -> u32 {
        self.months_to_show.div_ceil(self.months_per_row.max(1))
    }
}

/// Parse a zero-padded `MM-DD` string, accepting Feb 29.
pub fn parse_month_day(value: &str) -> Option<(u32, u32)> {
    let (month, day) = value.split_once('-')?;
    if month.len() != 2 || day.len() != 2 {
        return None;
    }
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    // 2000 is a leap year, so every calendar MM-DD is representable.
    NaiveDate::from_ymd_opt(2000, month, day)?;
    Some((month, day))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = WallpaperConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rows(), 4);
    }

    #[test]
    fn test_missing_keys_default_and_unknown_keys_ignored() {
        let config = WallpaperConfig::from_toml_str(
            r##"
            monthsToShow = 6
            somethingElse = "ignored"

            [colors]
            today = "#00FF00"
            "##,
        )
        .unwrap();

        assert_eq!(config.months_to_show, 6);
        assert_eq!(config.months_per_row, 3);
        assert_eq!(config.colors.today, RgbaColor::rgb(0, 255, 0));
        assert_eq!(config.colors.weekend, Palette::default().weekend);
        assert_eq!(config.ratios, LayoutRatios::default());
    }

    #[test]
    fn test_stats_mode_parses_lowercase() {
        let config = WallpaperConfig::from_toml_str(r#"statsMode = "progress""#).unwrap();
        assert_eq!(config.stats_mode, StatsMode::Progress);
    }

    #[test]
    fn test_zero_months_rejected() {
        let err = WallpaperConfig::from_toml_str("monthsToShow = 0").unwrap_err();
        assert!(err.to_string().contains("monthsToShow"));
    }

    #[test]
    fn test_month_count_upper_bound() {
        assert!(WallpaperConfig::from_toml_str("monthsToShow = 1200").is_ok());
        let err = WallpaperConfig::from_toml_str("monthsToShow = 4294967295").unwrap_err();
        assert!(err.to_string().contains("at most 1200"));
    }

    #[test]
    fn test_zero_months_per_row_rejected() {
        assert!(WallpaperConfig::from_toml_str("monthsPerRow = 0").is_err());
    }

    #[test]
    fn test_invalid_first_day_rejected() {
        assert!(WallpaperConfig::from_toml_str("firstDayOfWeek = 3").is_err());
    }

    #[test]
    fn test_bad_significant_date_rejected() {
        let err = WallpaperConfig::from_toml_str(r#"manualSignificantDates = ["13-01"]"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "manualSignificantDates", .. }));
    }

    #[test]
    fn test_bad_color_is_parse_error() {
        let err = WallpaperConfig::from_toml_str(
            r#"
            [colors]
            bg = "black"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_parse_month_day() {
        assert_eq!(parse_month_day("12-25"), Some((12, 25)));
        assert_eq!(parse_month_day("02-29"), Some((2, 29)));
        assert_eq!(parse_month_day("2-29"), None);
        assert_eq!(parse_month_day("04-31"), None);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = WallpaperConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, WallpaperConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "fixedYearView = true\nmonthOffset = -2\n").unwrap();

        let config = WallpaperConfig::load(&path).unwrap();
        assert!(config.fixed_year_view);
        assert_eq!(config.month_offset, -2);
    }
}
