use super::{
    CellSink, GridCell, GridLayoutEngine, Label, MonthCursor, Navigation, RenderContext, Section,
    Slot,
};
use crate::dates::{calendar_padding, days_in_month, months_in_range, DateRange};
use crate::model::{ActivityData, IntensityLevel};
use chrono::{Datelike, NaiveDate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarMode {
    /// Every month of the range, stacked.
    AllMonths,
    /// One month at a time; `None` selects the most recent.
    Compact { month_index: Option<usize> },
}

/// Month-card calendar.
#[derive(Debug, Clone, Copy)]
pub struct CalendarLayout {
    pub mode: CalendarMode,
}

impl CalendarLayout {
    pub fn all_months() -> Self {
        CalendarLayout {
            mode: CalendarMode::AllMonths,
        }
    }

    pub fn compact(month_index: Option<usize>) -> Self {
        CalendarLayout {
            mode: CalendarMode::Compact { month_index },
        }
    }
}

impl GridLayoutEngine for CalendarLayout {
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
        match self.mode {
            CalendarMode::AllMonths => {
                for month in &months {
                    emit_month(ctx, data, range, *month, None, sink, out_of_range_blank);
                }
            }
            CalendarMode::Compact { month_index } => {
                let cursor = cursor_for(month_index, months.len());
                emit_month(
                    ctx,
                    data,
                    range,
                    months[cursor.index()],
                    cursor.navigation(),
                    sink,
                    out_of_range_blank,
                );
            }
        }
    }
}

pub(super) fn cursor_for(month_index: Option<usize>, len: usize) -> MonthCursor {
    match month_index {
        Some(index) => MonthCursor::at(index, len),
        None => MonthCursor::latest(len),
    }
}

/// Out-of-range days keep their number but lose count, level and highlight.
fn out_of_range_blank(cell: &mut GridCell) {
    if cell.in_range {
        return;
    }
    cell.count = 0;
    cell.level = IntensityLevel::None;
    cell.highlighted = false;
}

/// Lays out one month: weekday headers, leading padding, then every day.
/// `decorate` sees each day cell after its in-range flag is set.
pub(super) fn emit_month(
    ctx: &RenderContext<'_>,
    data: &ActivityData,
    range: &DateRange,
    month: NaiveDate,
    navigation: Option<Navigation>,
    sink: &mut dyn CellSink,
    decorate: impl Fn(&mut GridCell),
) {
    let first_day = ctx.first_day_of_week();
    sink.begin_section(Section {
        title: Some(ctx.locale.month_title(month)),
        month: Some(month),
        navigation,
    });
    for (column, name) in ctx.locale.days_short_from(first_day).into_iter().enumerate() {
        sink.emit_label(Label::DayName {
            column,
            text: name.to_string(),
        });
    }

    let padding = calendar_padding(month, first_day) as usize;
    for column in 0..padding {
        sink.emit_cell(GridCell::padding(Slot { column, row: 0 }));
    }
    let days = days_in_month(month.year(), month.month());
    for (offset, date) in (1..=days).filter_map(|d| month.with_day(d)).enumerate() {
        let position = padding + offset;
        let slot = Slot {
            column: position % 7,
            row: position / 7,
        };
        let mut cell = ctx.day_cell(data, date, slot);
        cell.in_range = range.contains(date);
        decorate(&mut cell);
        sink.emit_cell(cell);
    }
}
