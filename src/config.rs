use crate::model::{GraphError, IntensityLevel};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_HIGHLIGHT_COLOR: &str = "#7c3aed";

/// Display settings snapshot. Every layout reads it; none of them writes it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// `None` (an explicit `null`) means unset; the renderers then fall back to `false`.
    pub highlight_today: Option<bool>,
    pub highlight_color: Option<String>,
    pub display_only_tasks: bool,
    pub display_style: DisplayStyle,
    pub display_period: Period,
    pub first_day_of_week: Option<FirstDayOfWeek>,
    pub activity_dot_position: DotPosition,
    pub custom_start_date: String,
    pub custom_end_date: String,
    pub daily_notes: DailyNotesSettings,
    pub light_theme: ColorScheme,
    pub dark_theme: ColorScheme,
    pub theme: ThemeMode,
    pub locale: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DailyNotesSettings {
    /// Folder relative to the vault root; empty means the root itself.
    pub folder: String,
    /// moment-style pattern, e.g. `YYYY-MM-DD`.
    pub format: String,
    /// Template note path relative to the vault root, with or without `.md`.
    pub template: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    pub levels: [String; 5],
    #[serde(default)]
    pub text_levels: [Option<String>; 5],
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    #[serde(rename = "1month")]
    OneMonth,
    #[serde(rename = "3months")]
    ThreeMonths,
    #[serde(rename = "6months")]
    SixMonths,
    #[default]
    #[serde(rename = "12months")]
    TwelveMonths,
    #[serde(rename = "custom")]
    Custom,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayStyle {
    #[default]
    CommitGraph,
    Calendar,
    CalendarSheet,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DotPosition {
    #[default]
    Center,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(try_from = "u8", into = "u8")]
pub enum FirstDayOfWeek {
    #[default]
    Sunday,
    Monday,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            highlight_today: Some(true),
            highlight_color: Some(DEFAULT_HIGHLIGHT_COLOR.to_string()),
            display_only_tasks: false,
            display_style: DisplayStyle::CommitGraph,
            display_period: Period::TwelveMonths,
            first_day_of_week: Some(FirstDayOfWeek::Sunday),
            activity_dot_position: DotPosition::Center,
            custom_start_date: String::new(),
            custom_end_date: String::new(),
            daily_notes: DailyNotesSettings::default(),
            light_theme: ColorScheme::github_light(),
            dark_theme: ColorScheme::github_dark(),
            theme: ThemeMode::Dark,
            locale: "en".to_string(),
        }
    }
}

impl Settings {
    pub fn custom_bounds(&self) -> (Option<&str>, Option<&str>) {
        fn non_empty(s: &str) -> Option<&str> {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        }
        (
            non_empty(&self.custom_start_date),
            non_empty(&self.custom_end_date),
        )
    }

    pub fn active_scheme(&self) -> &ColorScheme {
        match self.theme {
            ThemeMode::Light => &self.light_theme,
            ThemeMode::Dark => &self.dark_theme,
        }
    }
}

impl Default for DailyNotesSettings {
    fn default() -> Self {
        DailyNotesSettings {
            folder: String::new(),
            format: "YYYY-MM-DD".to_string(),
            template: String::new(),
        }
    }
}

impl ColorScheme {
    pub fn github_light() -> Self {
        ColorScheme {
            levels: [
                "#ebedf0".into(),
                "#9be9a8".into(),
                "#40c463".into(),
                "#30a14e".into(),
                "#216e39".into(),
            ],
            text_levels: Default::default(),
        }
    }

    pub fn github_dark() -> Self {
        ColorScheme {
            levels: [
                "#161b22".into(),
                "#0e4429".into(),
                "#006d32".into(),
                "#26a641".into(),
                "#39d353".into(),
            ],
            text_levels: Default::default(),
        }
    }

    pub fn level(&self, level: IntensityLevel) -> &str {
        &self.levels[level.index()]
    }

    pub fn text_level(&self, level: IntensityLevel) -> Option<&str> {
        self.text_levels[level.index()].as_deref()
    }
}

impl FirstDayOfWeek {
    pub fn weekday(self) -> Weekday {
        match self {
            FirstDayOfWeek::Sunday => Weekday::Sun,
            FirstDayOfWeek::Monday => Weekday::Mon,
        }
    }

    /// 0 = Sunday, matching `Weekday::num_days_from_sunday`.
    pub fn number(self) -> u32 {
        self.weekday().num_days_from_sunday()
    }
}

impl TryFrom<u8> for FirstDayOfWeek {
    type Error = GraphError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FirstDayOfWeek::Sunday),
            1 => Ok(FirstDayOfWeek::Monday),
            other => Err(GraphError::InvalidInput(format!(
                "first day of week must be 0 (Sunday) or 1 (Monday), got {}",
                other
            ))),
        }
    }
}

impl From<FirstDayOfWeek> for u8 {
    fn from(value: FirstDayOfWeek) -> Self {
        value.number() as u8
    }
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneMonth => "1month",
            Period::ThreeMonths => "3months",
            Period::SixMonths => "6months",
            Period::TwelveMonths => "12months",
            Period::Custom => "custom",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Period::OneMonth => Period::ThreeMonths,
            Period::ThreeMonths => Period::SixMonths,
            Period::SixMonths => Period::TwelveMonths,
            Period::TwelveMonths => Period::Custom,
            Period::Custom => Period::OneMonth,
        }
    }
}

impl DisplayStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStyle::CommitGraph => "commit-graph",
            DisplayStyle::Calendar => "calendar",
            DisplayStyle::CalendarSheet => "calendar-sheet",
        }
    }
}

impl FromStr for Period {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1month" => Ok(Period::OneMonth),
            "3months" => Ok(Period::ThreeMonths),
            "6months" => Ok(Period::SixMonths),
            "12months" => Ok(Period::TwelveMonths),
            "custom" => Ok(Period::Custom),
            other => Err(GraphError::InvalidInput(format!("unknown period: {}", other))),
        }
    }
}

impl FromStr for DisplayStyle {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "commit-graph" => Ok(DisplayStyle::CommitGraph),
            "calendar" => Ok(DisplayStyle::Calendar),
            "calendar-sheet" => Ok(DisplayStyle::CalendarSheet),
            other => Err(GraphError::InvalidInput(format!("unknown style: {}", other))),
        }
    }
}

impl FromStr for DotPosition {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "center" => Ok(DotPosition::Center),
            "top-left" => Ok(DotPosition::TopLeft),
            "top-right" => Ok(DotPosition::TopRight),
            "bottom-left" => Ok(DotPosition::BottomLeft),
            "bottom-right" => Ok(DotPosition::BottomRight),
            other => Err(GraphError::InvalidInput(format!(
                "unknown dot position: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DisplayStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_file_keeps_defaults() {
        let settings: Settings =
            serde_yaml::from_str("display_style: calendar-sheet\nfirst_day_of_week: 1\n").unwrap();
        assert_eq!(settings.display_style, DisplayStyle::CalendarSheet);
        assert_eq!(settings.first_day_of_week, Some(FirstDayOfWeek::Monday));
        assert_eq!(settings.display_period, Period::TwelveMonths);
        assert_eq!(settings.highlight_today, Some(true));
        assert_eq!(settings.light_theme, ColorScheme::github_light());
    }

    #[test]
    fn explicit_null_leaves_highlight_unset() {
        let settings: Settings = serde_yaml::from_str("highlight_today: null\n").unwrap();
        assert_eq!(settings.highlight_today, None);
    }

    #[test]
    fn rejects_unknown_first_day() {
        let parsed: Result<Settings, _> = serde_yaml::from_str("first_day_of_week: 3\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn period_names_round_trip_through_yaml() {
        let yaml = serde_yaml::to_string(&Period::ThreeMonths).unwrap();
        assert_eq!(yaml.trim(), "3months");
        assert_eq!("6months".parse::<Period>().unwrap(), Period::SixMonths);
        assert!("weekly".parse::<Period>().is_err());
    }

    #[test]
    fn custom_bounds_ignore_blank_strings() {
        let mut settings = Settings::default();
        settings.custom_start_date = "  ".into();
        settings.custom_end_date = "2024-01-31".into();
        assert_eq!(settings.custom_bounds(), (None, Some("2024-01-31")));
    }
}
