use super::{CellSink, GridCell, GridLayoutEngine, Label, RenderContext, Section, Slot, GAP, SQUARE_SIZE};
use crate::config::FirstDayOfWeek;
use crate::dates::{align_to_week_start, DateRange};
use crate::model::ActivityData;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// GitHub-style graph: one column per week, one row per weekday.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommitGraphLayout;

impl GridLayoutEngine for CommitGraphLayout {
    fn layout(
        &self,
        ctx: &RenderContext<'_>,
        data: &ActivityData,
        range: &DateRange,
        sink: &mut dyn CellSink,
    ) {
        let first_day = ctx.first_day_of_week();
        sink.begin_section(Section {
            title: None,
            month: None,
            navigation: None,
        });

        let start = range.start_date();
        let end = range.end_date();
        let aligned = align_to_week_start(start, first_day);
        let weeks = week_count(aligned, end);

        for (week, date) in month_breaks(aligned, end, weeks) {
            sink.emit_label(Label::Month {
                text: ctx.locale.month_short(date.month()).to_string(),
                week,
                x: week as u32 * (SQUARE_SIZE + GAP),
            });
        }
        for (row, weekday) in day_label_rows(first_day).into_iter().enumerate() {
            let text = weekday
                .map(|wd| ctx.locale.days_short[wd.num_days_from_sunday() as usize].to_string())
                .unwrap_or_default();
            sink.emit_label(Label::DayRow { row, text });
        }

        for week in 0..weeks {
            for row in 0..7 {
                let date = aligned + Duration::days((week * 7 + row) as i64);
                if date > end {
                    continue;
                }
                let slot = Slot { column: week, row };
                if date < start {
                    sink.emit_cell(GridCell::padding(slot));
                    continue;
                }
                sink.emit_cell(ctx.day_cell(data, date, slot));
            }
        }
    }
}

/// Week columns needed to cover `aligned..=end`; zero when the range is inverted.
pub fn week_count(aligned: NaiveDate, end: NaiveDate) -> usize {
    let days = (end - aligned).num_days() + 1;
    if days <= 0 {
        return 0;
    }
    ((days + 6) / 7) as usize
}

/// Weeks that start a new month label: week 0, then every week whose first
/// day falls in a different month or year than the last label.
pub fn month_breaks(aligned: NaiveDate, end: NaiveDate, weeks: usize) -> Vec<(usize, NaiveDate)> {
    let mut breaks = Vec::new();
    let mut current: Option<(i32, u32)> = None;
    for week in 0..weeks {
        let date = aligned + Duration::days(week as i64 * 7);
        if date > end {
            break;
        }
        let key = (date.year(), date.month());
        if current != Some(key) {
            breaks.push((week, date));
            current = Some(key);
        }
    }
    breaks
}

/// Rows carrying a weekday label: Monday, Wednesday and Friday, wherever
/// they fall for the configured first day.
pub fn day_label_rows(first_day: FirstDayOfWeek) -> [Option<Weekday>; 7] {
    let mut rows = [None; 7];
    let mut weekday = first_day.weekday();
    for row in rows.iter_mut() {
        if matches!(weekday, Weekday::Mon | Weekday::Wed | Weekday::Fri) {
            *row = Some(weekday);
        }
        weekday = weekday.succ();
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Period, Settings};
    use crate::dates::compute_date_range;
    use crate::locale::EN;
    use crate::model::IntensityLevel;
    use crate::render::GridBuffer;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn custom(start: &str, end: &str) -> DateRange {
        compute_date_range(Period::Custom, Some(start), Some(end), ymd(2024, 6, 15))
    }

    fn render(settings: &Settings, data: &ActivityData, range: &DateRange) -> GridBuffer {
        let ctx = RenderContext::new(settings, &EN, ymd(2024, 1, 19));
        let mut buffer = GridBuffer::default();
        CommitGraphLayout.layout(&ctx, data, range, &mut buffer);
        buffer
    }

    #[test]
    fn monday_alignment_pads_lead_days() {
        let mut settings = Settings::default();
        settings.first_day_of_week = Some(FirstDayOfWeek::Monday);
        // 2024-01-17 is a Wednesday
        let range = custom("2024-01-17", "2024-01-31");
        let buffer = render(&settings, &ActivityData::new(), &range);
        let cells = &buffer.sections[0].cells;

        assert!(cells[0].padding && cells[1].padding);
        assert_eq!(cells[0].date, None);
        assert_eq!(cells[2].date.as_deref(), Some("2024-01-17"));
        assert_eq!(cells[2].slot, Slot { column: 0, row: 2 });
        assert_eq!(cells.iter().filter(|c| c.padding).count(), 2);
        // 2 padding + 15 real days
        assert_eq!(cells.len(), 17);
        assert_eq!(cells.last().unwrap().date.as_deref(), Some("2024-01-31"));
    }

    #[test]
    fn sunday_alignment_uses_week_columns() {
        let range = custom("2024-01-17", "2024-01-31");
        let buffer = render(&Settings::default(), &ActivityData::new(), &range);
        let cells = &buffer.sections[0].cells;
        assert_eq!(cells.iter().filter(|c| c.padding).count(), 3);
        let last = cells.last().unwrap();
        assert_eq!(last.slot, Slot { column: 2, row: 3 });
    }

    #[test]
    fn counts_and_today_come_from_context() {
        let mut data = ActivityData::new();
        data.add("2024-01-19", 7);
        let range = custom("2024-01-14", "2024-01-20");
        let buffer = render(&Settings::default(), &data, &range);
        let cell = buffer.find("2024-01-19").unwrap();
        assert_eq!(cell.count, 7);
        assert_eq!(cell.level, IntensityLevel::High);
        assert!(cell.is_today && cell.highlighted);
        let other = buffer.find("2024-01-18").unwrap();
        assert_eq!(other.count, 0);
        assert!(!other.is_today);
    }

    #[test]
    fn highlight_follows_setting() {
        let mut settings = Settings::default();
        settings.highlight_today = Some(false);
        let range = custom("2024-01-14", "2024-01-20");
        let buffer = render(&settings, &ActivityData::new(), &range);
        let cell = buffer.find("2024-01-19").unwrap();
        assert!(cell.is_today && !cell.highlighted);
    }

    #[test]
    fn month_labels_break_on_month_change() {
        let range = custom("2024-01-01", "2024-03-31");
        let buffer = render(&Settings::default(), &ActivityData::new(), &range);
        let months: Vec<(String, usize, u32)> = buffer.sections[0]
            .labels
            .iter()
            .filter_map(|l| match l {
                Label::Month { text, week, x } => Some((text.clone(), *week, *x)),
                _ => None,
            })
            .collect();
        // aligned start 2023-12-31 (Sunday) labels December first
        assert_eq!(months[0], ("Dec".to_string(), 0, 0));
        assert_eq!(months[1], ("Jan".to_string(), 1, 15));
        assert_eq!(months[2].0, "Feb");
        assert_eq!(months[3].0, "Mar");
        assert_eq!(months.len(), 4);
    }

    #[test]
    fn month_breaks_notice_year_change() {
        let aligned = ymd(2023, 1, 1);
        let end = ymd(2024, 1, 31);
        let weeks = week_count(aligned, end);
        let breaks = month_breaks(aligned, end, weeks);
        let januaries: Vec<_> = breaks.iter().filter(|(_, d)| d.month() == 1).collect();
        assert_eq!(januaries.len(), 2);
    }

    #[test]
    fn day_labels_follow_first_day() {
        let sunday = day_label_rows(FirstDayOfWeek::Sunday);
        assert_eq!(
            sunday,
            [None, Some(Weekday::Mon), None, Some(Weekday::Wed), None, Some(Weekday::Fri), None]
        );
        let monday = day_label_rows(FirstDayOfWeek::Monday);
        assert_eq!(
            monday,
            [Some(Weekday::Mon), None, Some(Weekday::Wed), None, Some(Weekday::Fri), None, None]
        );
    }

    #[test]
    fn inverted_range_emits_no_cells() {
        let range = custom("2024-02-01", "2024-01-01");
        let buffer = render(&Settings::default(), &ActivityData::new(), &range);
        assert_eq!(buffer.cells().count(), 0);
    }

    #[test]
    fn twelve_month_graph_covers_every_day_once() {
        let range = compute_date_range(Period::TwelveMonths, None, None, ymd(2024, 6, 15));
        let buffer = render(&Settings::default(), &ActivityData::new(), &range);
        let real = buffer.cells().filter(|c| !c.padding).count() as i64;
        assert_eq!(real, (range.end_date() - range.start_date()).num_days() + 1);
    }
}
