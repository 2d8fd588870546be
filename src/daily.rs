use crate::config::DailyNotesSettings;
use crate::locale::Locale;
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

const TOKENS: [&str; 10] = ["YYYY", "MMMM", "dddd", "MMM", "ddd", "YY", "MM", "DD", "M", "D"];

/// Formats `date` with a moment-style pattern (`YYYY-MM-DD`, `D MMMM YYYY`,
/// `[Week] dddd`, ...). Text inside `[...]` is copied verbatim; anything
/// that is not a known token is kept as is.
pub fn format_moment(date: NaiveDate, pattern: &str, locale: &Locale) -> String {
    let mut out = String::new();
    let mut rest = pattern;
    while !rest.is_empty() {
        if let Some(stripped) = rest.strip_prefix('[') {
            if let Some(end) = stripped.find(']') {
                out.push_str(&stripped[..end]);
                rest = &stripped[end + 1..];
                continue;
            }
        }
        if let Some(token) = TOKENS.iter().find(|t| rest.starts_with(*t)) {
            out.push_str(&render_token(date, token, locale));
            rest = &rest[token.len()..];
            continue;
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }
    out
}

fn render_token(date: NaiveDate, token: &str, locale: &Locale) -> String {
    let weekday = date.weekday().num_days_from_sunday() as usize;
    match token {
        "YYYY" => format!("{:04}", date.year()),
        "YY" => format!("{:02}", date.year().rem_euclid(100)),
        "MMMM" => locale.month_full(date.month()).to_string(),
        "MMM" => locale.month_short(date.month()).to_string(),
        "MM" => format!("{:02}", date.month()),
        "M" => date.month().to_string(),
        "DD" => format!("{:02}", date.day()),
        "D" => date.day().to_string(),
        "dddd" => locale.days_full[weekday].to_string(),
        "ddd" => locale.days_short[weekday].to_string(),
        _ => token.to_string(),
    }
}

fn pattern(settings: &DailyNotesSettings) -> &str {
    let format = settings.format.trim();
    if format.is_empty() {
        "YYYY-MM-DD"
    } else {
        format
    }
}

pub fn daily_note_path(
    root: &Path,
    settings: &DailyNotesSettings,
    date: NaiveDate,
    locale: &Locale,
) -> PathBuf {
    let file_name = format!("{}.md", format_moment(date, pattern(settings), locale));
    let folder = settings.folder.trim().trim_matches('/');
    if folder.is_empty() {
        root.join(file_name)
    } else {
        root.join(folder).join(file_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyNote {
    pub path: PathBuf,
    pub created: bool,
}

/// Resolves the daily note for `date`, creating it (from the template when
/// one is configured) if it does not exist yet.
pub fn open_daily_note(
    root: &Path,
    settings: &DailyNotesSettings,
    date: NaiveDate,
    locale: &Locale,
) -> Result<DailyNote> {
    let path = daily_note_path(root, settings, date, locale);
    if path.exists() {
        return Ok(DailyNote {
            path,
            created: false,
        });
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {:?}", parent))?;
    }
    let title = format_moment(date, pattern(settings), locale);
    let content = template_content(root, settings)
        .map(|template| {
            template
                .replace("{{date}}", &title)
                .replace("{{title}}", &title)
        })
        .unwrap_or_default();
    fs::write(&path, content).with_context(|| format!("writing {:?}", path))?;
    info!("created daily note {}", path.display());
    Ok(DailyNote {
        path,
        created: true,
    })
}

fn template_content(root: &Path, settings: &DailyNotesSettings) -> Option<String> {
    let template = settings.template.trim();
    if template.is_empty() {
        return None;
    }
    let candidates = [root.join(format!("{}.md", template)), root.join(template)];
    let found = candidates.iter().find(|p| p.is_file());
    match found {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(err) => {
                warn!("reading template {}: {}", path.display(), err);
                None
            }
        },
        None => {
            warn!("daily note template not found: {}", template);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::{EN, RU};
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("YYYY-MM-DD", "2024-03-05")]
    #[case("D MMMM YYYY", "5 March 2024")]
    #[case("ddd, MMM D", "Tue, Mar 5")]
    #[case("dddd", "Tuesday")]
    #[case("YY/M/D", "24/3/5")]
    #[case("[Journal] YYYY-MM-DD", "Journal 2024-03-05")]
    fn formats_moment_patterns(#[case] pattern: &str, #[case] expected: &str) {
        assert_eq!(format_moment(ymd(2024, 3, 5), pattern, &EN), expected);
    }

    #[test]
    fn month_names_follow_locale() {
        assert_eq!(format_moment(ymd(2024, 3, 5), "MMMM", &RU), "Март");
    }

    #[test]
    fn path_joins_folder_and_formatted_name() {
        let settings = DailyNotesSettings {
            folder: "/journal/".into(),
            format: "YYYY-MM-DD".into(),
            template: String::new(),
        };
        let path = daily_note_path(Path::new("/vault"), &settings, ymd(2024, 3, 5), &EN);
        assert_eq!(path, PathBuf::from("/vault/journal/2024-03-05.md"));
    }

    #[test]
    fn creates_note_from_template_once() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("templates")).unwrap();
        fs::write(dir.path().join("templates/daily.md"), "# {{title}}\ncreated {{date}}\n").unwrap();
        let settings = DailyNotesSettings {
            folder: "daily".into(),
            format: "YYYY-MM-DD".into(),
            template: "templates/daily".into(),
        };

        let first = open_daily_note(dir.path(), &settings, ymd(2024, 3, 5), &EN).unwrap();
        assert!(first.created);
        let content = fs::read_to_string(&first.path).unwrap();
        assert_eq!(content, "# 2024-03-05\ncreated 2024-03-05\n");

        let second = open_daily_note(dir.path(), &settings, ymd(2024, 3, 5), &EN).unwrap();
        assert!(!second.created);
        assert_eq!(second.path, first.path);
    }

    #[test]
    fn missing_template_creates_empty_note() {
        let dir = tempfile::tempdir().unwrap();
        let settings = DailyNotesSettings {
            template: "nowhere".into(),
            ..DailyNotesSettings::default()
        };
        let note = open_daily_note(dir.path(), &settings, ymd(2024, 3, 5), &EN).unwrap();
        assert_eq!(fs::read_to_string(note.path).unwrap(), "");
    }
}
