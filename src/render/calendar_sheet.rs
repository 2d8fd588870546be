use super::calendar::{cursor_for, emit_month};
use super::{CellSink, GridCell, GridLayoutEngine, RenderContext, TaskDots};
use crate::config::DotPosition;
use crate::dates::{months_in_range, DateRange};
use crate::model::{ActivityData, IntensityLevel, TaskStatus, TasksStatusData};

/// Single navigable month with activity and task-status dots.
#[derive(Debug, Clone, Copy)]
pub struct CalendarSheetLayout<'t> {
    pub tasks: &'t TasksStatusData,
    pub dot_position: DotPosition,
    /// `None` selects the most recent month.
    pub month_index: Option<usize>,
}

impl GridLayoutEngine for CalendarSheetLayout<'_> {
    fn layout(
        &self,
        ctx: &RenderContext<'_>,
        data: &ActivityData,
        range: &DateRange,
        sink: &mut dyn CellSink,
    ) {
        let months = months_in_range(range.start_date(), range.end_date());
        if months.is_empty() {
            return;
        }
        let cursor = cursor_for(self.month_index, months.len());
        emit_month(
            ctx,
            data,
            range,
            months[cursor.index()],
            cursor.navigation(),
            sink,
            |cell| self.decorate(cell),
        );
    }
}

impl CalendarSheetLayout<'_> {
    fn decorate(&self, cell: &mut GridCell) {
        if let Some(status) = cell.date.as_ref().and_then(|d| self.tasks.get(d)) {
            cell.tasks = task_dots(status);
        }
        if cell.count > 0 {
            cell.dot = Some(self.dot_position);
            cell.dark_text = needs_dark_text(self.dot_position, cell.level);
        }
    }
}

pub fn task_dots(status: &TaskStatus) -> TaskDots {
    if status.has_incomplete {
        TaskDots::Open
    } else if status.has_completed {
        TaskDots::Completed
    } else {
        TaskDots::None
    }
}

/// A centered dot sits behind the day number; from level 3 up it is too
/// dark for the normal text style.
pub fn needs_dark_text(position: DotPosition, level: IntensityLevel) -> bool {
    position == DotPosition::Center && level >= IntensityLevel::High
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Period, Settings};
    use crate::dates::compute_date_range;
    use crate::locale::EN;
    use crate::render::{GridBuffer, Navigation};
    use chrono::NaiveDate;
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn status(has_completed: bool, has_incomplete: bool) -> TaskStatus {
        TaskStatus {
            has_completed,
            has_incomplete,
        }
    }

    fn sheet(
        tasks: &TasksStatusData,
        dot_position: DotPosition,
        month_index: Option<usize>,
        data: &ActivityData,
    ) -> GridBuffer {
        let settings = Settings::default();
        let ctx = RenderContext::new(&settings, &EN, ymd(2024, 3, 10));
        let range = compute_date_range(
            Period::Custom,
            Some("2024-02-10"),
            Some("2024-03-20"),
            ymd(2024, 6, 1),
        );
        let layout = CalendarSheetLayout {
            tasks,
            dot_position,
            month_index,
        };
        let mut buffer = GridBuffer::default();
        layout.layout(&ctx, data, &range, &mut buffer);
        buffer
    }

    #[rstest]
    #[case(status(true, true), TaskDots::Open)]
    #[case(status(false, true), TaskDots::Open)]
    #[case(status(true, false), TaskDots::Completed)]
    #[case(status(false, false), TaskDots::None)]
    fn dots_reflect_task_status(#[case] status: TaskStatus, #[case] dots: TaskDots) {
        assert_eq!(task_dots(&status), dots);
    }

    #[rstest]
    #[case(DotPosition::Center, IntensityLevel::Medium, false)]
    #[case(DotPosition::Center, IntensityLevel::High, true)]
    #[case(DotPosition::Center, IntensityLevel::VeryHigh, true)]
    #[case(DotPosition::TopLeft, IntensityLevel::VeryHigh, false)]
    fn dark_text_only_for_center_and_high_levels(
        #[case] position: DotPosition,
        #[case] level: IntensityLevel,
        #[case] expected: bool,
    ) {
        assert_eq!(needs_dark_text(position, level), expected);
    }

    #[test]
    fn shows_latest_month_with_navigation() {
        let buffer = sheet(&TasksStatusData::new(), DotPosition::Center, None, &ActivityData::new());
        assert_eq!(buffer.sections.len(), 1);
        let section = &buffer.sections[0].section;
        assert_eq!(section.month, Some(ymd(2024, 3, 1)));
        assert_eq!(
            section.navigation,
            Some(Navigation {
                can_prev: true,
                can_next: false
            })
        );
    }

    #[test]
    fn overlays_dots_and_keeps_out_of_range_activity() {
        let mut tasks = TasksStatusData::new();
        tasks.insert("2024-03-05".into(), status(true, false));
        tasks.insert("2024-03-06".into(), status(true, true));
        let mut data = ActivityData::new();
        data.add("2024-03-05", 8);
        data.add("2024-03-25", 1);

        let buffer = sheet(&tasks, DotPosition::Center, None, &data);
        let busy = buffer.find("2024-03-05").unwrap();
        assert_eq!(busy.tasks, TaskDots::Completed);
        assert_eq!(busy.dot, Some(DotPosition::Center));
        assert!(busy.dark_text);

        let open = buffer.find("2024-03-06").unwrap();
        assert_eq!(open.tasks, TaskDots::Open);
        assert_eq!(open.dot, None);

        let late = buffer.find("2024-03-25").unwrap();
        assert!(!late.in_range);
        assert_eq!(late.count, 1);
        assert_eq!(late.dot, Some(DotPosition::Center));
        assert!(!late.dark_text);
    }

    #[test]
    fn corner_dots_never_darken_text() {
        let mut data = ActivityData::new();
        data.add("2024-02-12", 20);
        let buffer = sheet(&TasksStatusData::new(), DotPosition::BottomRight, Some(0), &data);
        let cell = buffer.find("2024-02-12").unwrap();
        assert_eq!(cell.dot, Some(DotPosition::BottomRight));
        assert!(!cell.dark_text);
    }
}
