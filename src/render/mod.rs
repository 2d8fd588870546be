//! Grid layout engines.
//!
//! Each engine walks a [`DateRange`] and reports what to draw to a
//! [`CellSink`]: sections (one per month card, or the whole graph), labels
//! and day cells. Nothing here knows how cells end up on screen.

pub mod calendar;
pub mod calendar_sheet;
pub mod commit_graph;

use crate::config::{
    DisplayStyle, DotPosition, FirstDayOfWeek, Settings, DEFAULT_HIGHLIGHT_COLOR,
};
use crate::dates::{activity_level, compute_date_range, format_date, DateRange};
use crate::locale::Locale;
use crate::model::{ActivityData, IntensityLevel, TasksStatusData};
use chrono::{Datelike, NaiveDate};

pub use calendar::CalendarLayout;
pub use calendar_sheet::CalendarSheetLayout;
pub use commit_graph::CommitGraphLayout;

pub const SQUARE_SIZE: u32 = 12;
pub const GAP: u32 = 3;

/// State shared by one render call. `today` is captured once at construction.
pub struct RenderContext<'a> {
    pub settings: &'a Settings,
    pub locale: &'static Locale,
    today: String,
}

impl<'a> RenderContext<'a> {
    pub fn new(settings: &'a Settings, locale: &'static Locale, today: NaiveDate) -> Self {
        RenderContext {
            settings,
            locale,
            today: format_date(&today),
        }
    }

    pub fn is_today(&self, date: &str) -> bool {
        date == self.today
    }

    pub fn should_highlight_today(&self) -> bool {
        self.settings.highlight_today.unwrap_or(false)
    }

    pub fn highlight_color(&self) -> &str {
        self.settings
            .highlight_color
            .as_deref()
            .unwrap_or(DEFAULT_HIGHLIGHT_COLOR)
    }

    pub fn first_day_of_week(&self) -> FirstDayOfWeek {
        self.settings.first_day_of_week.unwrap_or_default()
    }

    /// A real day cell with count, level and today flags filled in.
    pub fn day_cell(&self, data: &ActivityData, date: NaiveDate, slot: Slot) -> GridCell {
        let key = format_date(&date);
        let count = data.count(&key);
        let is_today = self.is_today(&key);
        GridCell {
            date: Some(key),
            day: Some(date.day()),
            count,
            level: activity_level(i64::from(count)).unwrap_or(IntensityLevel::None),
            in_range: true,
            is_today,
            highlighted: is_today && self.should_highlight_today(),
            padding: false,
            slot,
            tasks: TaskDots::None,
            dot: None,
            dark_text: false,
        }
    }
}

/// Column/row position of a cell inside its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Slot {
    pub column: usize,
    pub row: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskDots {
    #[default]
    None,
    /// One filled dot: only completed tasks.
    Completed,
    /// Filled and empty dot: at least one open task.
    Open,
}

/// One renderable day, or a blank alignment slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell {
    /// Canonical date string; `None` for padding.
    pub date: Option<String>,
    pub day: Option<u32>,
    pub count: u32,
    pub level: IntensityLevel,
    pub in_range: bool,
    pub is_today: bool,
    /// `is_today` and highlighting is enabled.
    pub highlighted: bool,
    pub padding: bool,
    pub slot: Slot,
    pub tasks: TaskDots,
    /// Activity dot placement; only set by the calendar sheet.
    pub dot: Option<DotPosition>,
    /// Day number drawn over a dark dot needs the high-contrast style.
    pub dark_text: bool,
}

impl GridCell {
    pub fn padding(slot: Slot) -> Self {
        GridCell {
            date: None,
            day: None,
            count: 0,
            level: IntensityLevel::None,
            in_range: false,
            is_today: false,
            highlighted: false,
            padding: true,
            slot,
            tasks: TaskDots::None,
            dot: None,
            dark_text: false,
        }
    }

    /// Padding cells have no date and cannot be opened.
    pub fn is_clickable(&self) -> bool {
        !self.padding && self.in_range
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// Commit-graph month marker above week column `week`.
    Month { text: String, week: usize, x: u32 },
    /// Commit-graph weekday marker; rows without text are still emitted.
    DayRow { row: usize, text: String },
    /// Weekday header of a calendar month grid.
    DayName { column: usize, text: String },
}

/// Month navigation state for compact views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub can_prev: bool,
    pub can_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: Option<String>,
    pub month: Option<NaiveDate>,
    pub navigation: Option<Navigation>,
}

/// Receiver of layout output.
pub trait CellSink {
    fn begin_section(&mut self, section: Section);
    fn emit_label(&mut self, label: Label);
    fn emit_cell(&mut self, cell: GridCell);
}

pub trait GridLayoutEngine {
    fn layout(
        &self,
        ctx: &RenderContext<'_>,
        data: &ActivityData,
        range: &DateRange,
        sink: &mut dyn CellSink,
    );
}

/// The engine picked for a display style.
pub enum Layout<'t> {
    CommitGraph(CommitGraphLayout),
    Calendar(CalendarLayout),
    CalendarSheet(CalendarSheetLayout<'t>),
}

impl<'t> Layout<'t> {
    /// `compact` applies to the calendar style; the sheet is always compact.
    pub fn for_style(
        style: DisplayStyle,
        compact: bool,
        month_index: Option<usize>,
        tasks: &'t TasksStatusData,
        dot_position: DotPosition,
    ) -> Self {
        match style {
            DisplayStyle::CommitGraph => Layout::CommitGraph(CommitGraphLayout),
            DisplayStyle::Calendar if compact => Layout::Calendar(CalendarLayout::compact(month_index)),
            DisplayStyle::Calendar => Layout::Calendar(CalendarLayout::all_months()),
            DisplayStyle::CalendarSheet => Layout::CalendarSheet(CalendarSheetLayout {
                tasks,
                dot_position,
                month_index,
            }),
        }
    }
}

impl GridLayoutEngine for Layout<'_> {
    fn layout(
        &self,
        ctx: &RenderContext<'_>,
        data: &ActivityData,
        range: &DateRange,
        sink: &mut dyn CellSink,
    ) {
        match self {
            Layout::CommitGraph(engine) => engine.layout(ctx, data, range, sink),
            Layout::Calendar(engine) => engine.layout(ctx, data, range, sink),
            Layout::CalendarSheet(engine) => engine.layout(ctx, data, range, sink),
        }
    }
}

pub fn settings_range(settings: &Settings, today: NaiveDate) -> DateRange {
    let (custom_start, custom_end) = settings.custom_bounds();
    compute_date_range(settings.display_period, custom_start, custom_end, today)
}

/// Computes the settings' date range and lays out `data` for the display
/// style into a fresh buffer.
pub fn render_grid(
    settings: &Settings,
    locale: &'static Locale,
    today: NaiveDate,
    data: &ActivityData,
    tasks: &TasksStatusData,
    compact: bool,
    month_index: Option<usize>,
) -> GridBuffer {
    let range = settings_range(settings, today);
    let ctx = RenderContext::new(settings, locale, today);
    let layout = Layout::for_style(
        settings.display_style,
        compact,
        month_index,
        tasks,
        settings.activity_dot_position,
    );
    let mut buffer = GridBuffer::default();
    layout.layout(&ctx, data, &range, &mut buffer);
    buffer
}

/// Index into the months of a range, clamped to `[0, len - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    index: usize,
    len: usize,
}

impl MonthCursor {
    /// Starts at the most recent month.
    pub fn latest(len: usize) -> Self {
        MonthCursor {
            index: len.saturating_sub(1),
            len,
        }
    }

    pub fn at(index: usize, len: usize) -> Self {
        MonthCursor {
            index: index.min(len.saturating_sub(1)),
            len,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn can_prev(&self) -> bool {
        self.index > 0
    }

    pub fn can_next(&self) -> bool {
        self.index + 1 < self.len
    }

    /// Moves by `delta` months; returns false (and stays put) past either end.
    pub fn step(&mut self, delta: isize) -> bool {
        let target = self.index as isize + delta;
        if target < 0 || target >= self.len as isize {
            return false;
        }
        self.index = target as usize;
        true
    }

    pub fn navigation(&self) -> Option<Navigation> {
        (self.len > 1).then_some(Navigation {
            can_prev: self.can_prev(),
            can_next: self.can_next(),
        })
    }
}

/// Collects layout output in memory.
#[derive(Debug, Default, Clone)]
pub struct GridBuffer {
    pub sections: Vec<SectionBuffer>,
}

#[derive(Debug, Clone)]
pub struct SectionBuffer {
    pub section: Section,
    pub labels: Vec<Label>,
    pub cells: Vec<GridCell>,
}

impl GridBuffer {
    fn current(&mut self) -> &mut SectionBuffer {
        if self.sections.is_empty() {
            self.begin_section(Section {
                title: None,
                month: None,
                navigation: None,
            });
        }
        let last = self.sections.len() - 1;
        &mut self.sections[last]
    }

    pub fn cells(&self) -> impl Iterator<Item = &GridCell> {
        self.sections.iter().flat_map(|s| s.cells.iter())
    }

    pub fn find(&self, date: &str) -> Option<&GridCell> {
        self.cells().find(|c| c.date.as_deref() == Some(date))
    }
}

impl CellSink for GridBuffer {
    fn begin_section(&mut self, section: Section) {
        self.sections.push(SectionBuffer {
            section,
            labels: Vec::new(),
            cells: Vec::new(),
        });
    }

    fn emit_label(&mut self, label: Label) {
        self.current().labels.push(label);
    }

    fn emit_cell(&mut self, cell: GridCell) {
        self.current().cells.push(cell);
    }
}
