//! The `activity-graph` code-block option syntax.
//!
//! ```text
//! period: 3months
//! style: calendar
//! colors: [#eee, #cfc, #9f9, #6c6, #393]
//! title: Writing
//! ```
//!
//! One `key: value` per line. A value wrapped in `[...]` is split on commas
//! into a list, with surrounding quotes stripped from each element.

use crate::config::{ColorScheme, DisplayStyle, Period, Settings};
use log::warn;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CodeBlockOptions {
    pub period: Option<String>,
    pub style: Option<String>,
    pub tasks: Option<String>,
    pub highlight_today: Option<String>,
    pub colors: Option<Vec<String>>,
    pub light_colors: Option<Vec<String>>,
    pub dark_colors: Option<Vec<String>>,
    pub text_colors: Option<Vec<String>>,
    pub light_text_colors: Option<Vec<String>>,
    pub dark_text_colors: Option<Vec<String>>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub title: Option<String>,
}

pub fn parse_options(source: &str) -> CodeBlockOptions {
    let mut options = CodeBlockOptions::default();
    for line in source.trim().lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        if value.starts_with('[') && value.ends_with(']') && value.len() >= 2 {
            let list = parse_list(&value[1..value.len() - 1]);
            match key {
                "colors" => options.colors = Some(list),
                "lightColors" => options.light_colors = Some(list),
                "darkColors" => options.dark_colors = Some(list),
                "textColors" => options.text_colors = Some(list),
                "lightTextColors" => options.light_text_colors = Some(list),
                "darkTextColors" => options.dark_text_colors = Some(list),
                _ => {}
            }
            continue;
        }
        let value = Some(value.to_string());
        match key {
            "period" => options.period = value,
            "style" => options.style = value,
            "tasks" => options.tasks = value,
            "highlightToday" => options.highlight_today = value,
            "start" => options.start = value,
            "end" => options.end = value,
            "title" => options.title = value,
            _ => {}
        }
    }
    options
}

fn parse_list(inner: &str) -> Vec<String> {
    inner
        .split(',')
        .map(|item| strip_quotes(item.trim()).to_string())
        .collect()
}

fn strip_quotes(item: &str) -> &str {
    let item = item
        .strip_prefix(['"', '\''])
        .unwrap_or(item);
    item.strip_suffix(['"', '\'']).unwrap_or(item)
}

impl CodeBlockOptions {
    /// Settings for one embedded graph: `base` with these options laid over it.
    pub fn apply(&self, base: &Settings) -> Settings {
        let mut settings = base.clone();

        if let Some(period) = &self.period {
            match period.parse::<Period>() {
                Ok(period) => settings.display_period = period,
                Err(err) => warn!("code block: {}", err),
            }
        }
        if let Some(style) = &self.style {
            match style.parse::<DisplayStyle>() {
                Ok(style) => settings.display_style = style,
                Err(err) => warn!("code block: {}", err),
            }
        }
        match self.tasks.as_deref() {
            Some("true") => settings.display_only_tasks = true,
            Some("false") => settings.display_only_tasks = false,
            _ => {}
        }
        if let Some(highlight) = &self.highlight_today {
            settings.highlight_today = Some(highlight == "true");
        }

        if let Some(colors) = five(&self.colors) {
            set_levels(&mut settings.light_theme, colors);
            set_levels(&mut settings.dark_theme, colors);
        }
        if let Some(colors) = five(&self.text_colors) {
            set_text_levels(&mut settings.light_theme, colors);
            set_text_levels(&mut settings.dark_theme, colors);
        }
        if let Some(colors) = five(&self.light_colors) {
            set_levels(&mut settings.light_theme, colors);
        }
        if let Some(colors) = five(&self.dark_colors) {
            set_levels(&mut settings.dark_theme, colors);
        }
        if let Some(colors) = five(&self.light_text_colors) {
            set_text_levels(&mut settings.light_theme, colors);
        }
        if let Some(colors) = five(&self.dark_text_colors) {
            set_text_levels(&mut settings.dark_theme, colors);
        }

        if let Some(start) = &self.start {
            settings.display_period = Period::Custom;
            settings.custom_start_date = start.clone();
        }
        if let Some(end) = &self.end {
            settings.display_period = Period::Custom;
            settings.custom_end_date = end.clone();
        }
        settings
    }
}

/// Color lists only count when they name all five levels.
fn five(list: &Option<Vec<String>>) -> Option<&[String]> {
    list.as_deref().filter(|colors| colors.len() == 5)
}

fn set_levels(scheme: &mut ColorScheme, colors: &[String]) {
    for (slot, color) in scheme.levels.iter_mut().zip(colors) {
        *slot = color.clone();
    }
}

fn set_text_levels(scheme: &mut ColorScheme, colors: &[String]) {
    for (slot, color) in scheme.text_levels.iter_mut().zip(colors) {
        *slot = Some(color.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_scalars_and_lists() {
        let options = parse_options(
            "\nperiod: 3months\nstyle: calendar\ncolors: [\"#000\", '#111', #222, #333 , #444]\ntitle: My: graph\nnonsense\n",
        );
        assert_eq!(options.period.as_deref(), Some("3months"));
        assert_eq!(options.style.as_deref(), Some("calendar"));
        assert_eq!(options.title.as_deref(), Some("My: graph"));
        assert_eq!(
            options.colors,
            Some(vec![
                "#000".to_string(),
                "#111".into(),
                "#222".into(),
                "#333".into(),
                "#444".into()
            ])
        );
    }

    #[test]
    fn lists_on_scalar_keys_and_unknown_keys_are_ignored() {
        let options = parse_options("period: [a, b]\nfoo: bar\nstart:\n");
        assert_eq!(options, CodeBlockOptions::default());
    }

    #[test]
    fn start_and_end_force_custom_period() {
        let options = parse_options("start: 2024-01-01\nend: 2024-01-31");
        let settings = options.apply(&Settings::default());
        assert_eq!(settings.display_period, Period::Custom);
        assert_eq!(settings.custom_bounds(), (Some("2024-01-01"), Some("2024-01-31")));
    }

    #[test]
    fn shared_colors_apply_to_both_themes_and_theme_lists_override() {
        let options = parse_options(
            "colors: [a, b, c, d, e]\ndarkColors: [v, w, x, y, z]\ntextColors: [1, 2, 3, 4, 5]",
        );
        let settings = options.apply(&Settings::default());
        assert_eq!(settings.light_theme.levels[0], "a");
        assert_eq!(settings.dark_theme.levels[0], "v");
        assert_eq!(settings.dark_theme.text_levels[4].as_deref(), Some("5"));
        assert_eq!(settings.light_theme.text_levels[0].as_deref(), Some("1"));
    }

    #[test]
    fn short_color_lists_are_ignored() {
        let options = parse_options("lightColors: [a, b, c]");
        let settings = options.apply(&Settings::default());
        assert_eq!(settings.light_theme, ColorScheme::github_light());
    }

    #[test]
    fn tasks_and_highlight_flags() {
        let mut base = Settings::default();
        base.display_only_tasks = true;
        let keep = parse_options("tasks: maybe").apply(&base);
        assert!(keep.display_only_tasks);
        let off = parse_options("tasks: false\nhighlightToday: no").apply(&base);
        assert!(!off.display_only_tasks);
        assert_eq!(off.highlight_today, Some(false));
    }

    #[test]
    fn bad_period_keeps_base_value() {
        let settings = parse_options("period: fortnight").apply(&Settings::default());
        assert_eq!(settings.display_period, Period::TwelveMonths);
    }
}
