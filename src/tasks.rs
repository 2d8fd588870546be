//! Completed-task extraction from note text.
//!
//! A line is considered only when it is a checked list item (`- [x]` or
//! `* [x]`). The completion date is then taken from the first of these
//! markers that matches, in order:
//!
//! 1. `✅ YYYY-MM-DD`
//! 2. `done:: YYYY-MM-DD`
//! 3. `completion:: YYYY-MM-DD`
//! 4. `[completion:: YYYY-MM-DD]`

use crate::model::{ActivityData, DateKey, TaskStatus, TasksStatusData};
use crate::vault::{read_all, NoteStore};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

static CHECKED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*]\s*\[[xX]\]").expect("checked item pattern"));

static TASK_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[-*]\s*\[([ xX])\]").expect("task item pattern"));

static COMPLETION_DATE: Lazy<[Regex; 4]> = Lazy::new(|| {
    [
        r"✅\s*([0-9]{4}-[0-9]{2}-[0-9]{2})",
        r"done::\s*([0-9]{4}-[0-9]{2}-[0-9]{2})",
        r"completion::\s*([0-9]{4}-[0-9]{2}-[0-9]{2})",
        r"\[completion::\s*([0-9]{4}-[0-9]{2}-[0-9]{2})\]",
    ]
    .map(|pattern| Regex::new(pattern).expect("completion date pattern"))
});

static FILE_NAME_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]{4}-[0-9]{2}-[0-9]{2})").expect("file name date pattern"));

/// Completion dates of every checked task in `content`, one per line at most.
pub fn extract_completed_task_dates(content: &str) -> Vec<DateKey> {
    content
        .lines()
        .filter(|line| CHECKED_ITEM.is_match(line))
        .filter_map(completion_date)
        .collect()
}

fn completion_date(line: &str) -> Option<DateKey> {
    COMPLETION_DATE
        .iter()
        .find_map(|pattern| pattern.captures(line))
        .map(|caps| caps[1].to_string())
}

pub fn count_completed_tasks(content: &str) -> ActivityData {
    extract_completed_task_dates(content)
        .into_iter()
        .map(|date| (date, 1))
        .collect()
}

/// Completed-task counts per date across the whole vault.
///
/// Files that cannot be read contribute nothing.
pub fn load_tasks_from_vault<S: NoteStore + ?Sized>(store: &S) -> ActivityData {
    let mut totals = ActivityData::new();
    for (file, content) in read_all(store) {
        let counts = count_completed_tasks(&content);
        if !counts.is_empty() {
            debug!("{}: {} completed task(s)", file.basename, counts.total());
        }
        totals.merge(&counts);
    }
    totals
}

pub fn analyze_file_tasks(content: &str) -> TaskStatus {
    let mut status = TaskStatus::default();
    for line in content.lines() {
        let Some(caps) = TASK_ITEM.captures(line) else {
            continue;
        };
        if caps[1].eq_ignore_ascii_case("x") {
            status.has_completed = true;
        } else {
            status.has_incomplete = true;
        }
        if status.has_completed && status.has_incomplete {
            break;
        }
    }
    status
}

pub fn date_from_file_name(name: &str) -> Option<DateKey> {
    FILE_NAME_DATE
        .captures(name)
        .map(|caps| caps[1].to_string())
}

/// Task status for every note whose file name carries a date and which
/// contains at least one task.
pub fn load_tasks_status<S: NoteStore + ?Sized>(store: &S) -> TasksStatusData {
    let mut statuses = TasksStatusData::new();
    for file in store.list_note_files() {
        let Some(date) = date_from_file_name(&file.basename) else {
            continue;
        };
        let content = match store.read_file(&file) {
            Ok(content) => content,
            Err(err) => {
                warn!("skipping unreadable note: {}", err);
                continue;
            }
        };
        let status = analyze_file_tasks(&content);
        if status.has_any() {
            statuses.insert(date, status);
        }
    }
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vault::memory::MemoryVault;
    use rstest::rstest;

    #[rstest]
    #[case("- [x] write report ✅ 2024-03-01", Some("2024-03-01"))]
    #[case("- [X] capital ✅2024-03-01", Some("2024-03-01"))]
    #[case("  * [x] nested done:: 2024-03-02", Some("2024-03-02"))]
    #[case("- [x] field completion:: 2024-03-03", Some("2024-03-03"))]
    #[case("- [x] inline [completion:: 2024-03-04]", Some("2024-03-04"))]
    #[case("- [ ] pending ✅ 2024-03-01", None)]
    #[case("plain text ✅ 2024-03-01", None)]
    #[case("- [x] no date at all", None)]
    #[case("- [x] bad date ✅ 2024-3-1", None)]
    fn extracts_one_date_per_checked_line(#[case] line: &str, #[case] expected: Option<&str>) {
        let dates = extract_completed_task_dates(line);
        assert_eq!(dates, expected.map(|d| vec![d.to_string()]).unwrap_or_default());
    }

    #[test]
    fn first_pattern_wins_within_a_line() {
        let dates = extract_completed_task_dates("- [x] both ✅ 2024-03-01 done:: 2024-03-09");
        assert_eq!(dates, vec!["2024-03-01".to_string()]);
    }

    #[test]
    fn mixed_formats_count_separately() {
        let content = "# Log\n- [x] emoji ✅ 2024-03-01\n- [x] dataview done:: 2024-03-02\n- [ ] open\n";
        let counts = count_completed_tasks(content);
        assert_eq!(counts.count("2024-03-01"), 1);
        assert_eq!(counts.count("2024-03-02"), 1);
        assert_eq!(counts.len(), 2);
    }

    #[test]
    fn aggregates_across_notes_and_skips_unreadable_ones() {
        let vault = MemoryVault::default()
            .with("a", "- [x] one ✅ 2024-03-01\n- [x] two ✅ 2024-03-01")
            .with_unreadable("broken")
            .with("b", "- [x] three done:: 2024-03-01");
        let totals = load_tasks_from_vault(&vault);
        assert_eq!(totals.count("2024-03-01"), 3);
    }

    #[test]
    fn repeated_scans_are_identical() {
        let vault = MemoryVault::default().with("a", "- [x] one ✅ 2024-03-01");
        assert_eq!(load_tasks_from_vault(&vault), load_tasks_from_vault(&vault));
    }

    #[rstest]
    #[case("- [x] done\n- [ ] open", true, true)]
    #[case("- [X] done", true, false)]
    #[case("* [ ] open", false, true)]
    #[case("- [-] cancelled\nno tasks", false, false)]
    fn classifies_task_status(
        #[case] content: &str,
        #[case] completed: bool,
        #[case] incomplete: bool,
    ) {
        let status = analyze_file_tasks(content);
        assert_eq!(status.has_completed, completed);
        assert_eq!(status.has_incomplete, incomplete);
    }

    #[test]
    fn date_comes_from_file_name() {
        assert_eq!(
            date_from_file_name("Journal 2024-03-01 morning"),
            Some("2024-03-01".to_string())
        );
        assert_eq!(date_from_file_name("ideas"), None);
    }

    #[test]
    fn status_map_only_holds_dated_notes_with_tasks() {
        let vault = MemoryVault::default()
            .with("2024-03-01", "- [x] done\n- [ ] open")
            .with("2024-03-02", "just prose")
            .with("projects", "- [ ] undated")
            .with_unreadable("2024-03-03");
        let statuses = load_tasks_status(&vault);
        assert_eq!(statuses.len(), 1);
        let status = statuses["2024-03-01"];
        assert!(status.has_completed && status.has_incomplete);
    }
}
