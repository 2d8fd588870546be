use crate::commands::{default_title, task_status_for, today};
use crate::config::{DisplayStyle, Settings, ThemeMode};
use crate::daily::open_daily_note;
use crate::dates::{first_of_month, format_date, months_in_range, DateRange};
use crate::locale::{self, Locale};
use crate::model::{ActivityData, TasksStatusData};
use crate::paint::{tooltip, Painter, Palette};
use crate::render::{render_grid, settings_range, GridBuffer, MonthCursor, RenderContext};
use crate::schedule::Interval;
use crate::storage::{save_settings, VaultLocation, VaultScope, YamlStore};
use crate::tasks::load_tasks_from_vault;
use crate::tracker::Tracker;
use crate::vault::{ChangeWatcher, FsVault};
use anyhow::Result;
use chrono::{Duration as ChronoDuration, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;
use std::io::{stdout, Stdout};
use std::time::{Duration, Instant};

const WATCH_INTERVAL: Duration = Duration::from_secs(2);

pub fn run(location: VaultLocation, settings: Settings) -> Result<()> {
    let tracker = Tracker::open(YamlStore::for_location(&location), Instant::now())?;
    let mut app = App::new(location, settings, tracker);
    let mut terminal = setup_terminal()?;
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    let closed = app.tracker.close();
    info!("tui closed");
    result.and(closed)
}

struct App {
    location: VaultLocation,
    settings: Settings,
    locale: &'static Locale,
    vault: FsVault,
    watcher: ChangeWatcher,
    watch_timer: Interval,
    tracker: Tracker<YamlStore>,
    task_data: ActivityData,
    tasks_status: TasksStatusData,
    /// Calendar style shows one month at a time.
    compact: bool,
    /// `None` follows the most recent month.
    month: Option<usize>,
    cursor: NaiveDate,
    last_save: Instant,
    status: String,
}

impl App {
    fn new(location: VaultLocation, settings: Settings, tracker: Tracker<YamlStore>) -> Self {
        let vault = FsVault::new(&location.root);
        let watcher = ChangeWatcher::snapshot(&vault);
        let locale = locale::resolve(&settings.locale);
        let status = format!("Watching {}", location.root.display());
        let now = Instant::now();
        let mut app = App {
            location,
            settings,
            locale,
            vault,
            watcher,
            watch_timer: Interval::new(WATCH_INTERVAL, now),
            tracker,
            task_data: ActivityData::new(),
            tasks_status: TasksStatusData::new(),
            compact: false,
            month: None,
            cursor: today(),
            last_save: now,
            status,
        };
        app.rescan();
        app.clamp_cursor();
        app
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                }
            }
            self.tick(Instant::now());
        }
        Ok(())
    }

    fn tick(&mut self, now: Instant) {
        if self.watch_timer.fire(now) {
            let events = self.watcher.poll(&self.vault);
            if events > 0 {
                self.tracker
                    .record_events(today(), u32::try_from(events).unwrap_or(u32::MAX));
                if self.settings.display_only_tasks
                    || self.settings.display_style == DisplayStyle::CalendarSheet
                {
                    self.rescan();
                }
            }
        }
        match self.tracker.tick(now) {
            Ok(true) => self.last_save = now,
            Ok(false) => {}
            Err(err) => self.report_save_error(&err),
        }
    }

    /// Save failures keep the TUI running; the data stays dirty for the next tick.
    fn report_save_error(&mut self, err: &anyhow::Error) {
        warn!("saving activity data: {:#}", err);
        self.status = format!("Could not save activity: {}", err);
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let single_month = self.single_month();
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('1') => self.set_style(DisplayStyle::CommitGraph),
            KeyCode::Char('2') => self.set_style(DisplayStyle::Calendar),
            KeyCode::Char('3') => self.set_style(DisplayStyle::CalendarSheet),
            KeyCode::Char('p') => {
                self.settings.display_period = self.settings.display_period.next();
                self.month = None;
                self.clamp_cursor();
                let message = if self.range().fallback {
                    "Custom range incomplete, showing 12 months".to_string()
                } else {
                    format!("Period {}", self.settings.display_period)
                };
                self.persist_settings(message);
            }
            KeyCode::Char('t') => {
                self.settings.display_only_tasks = !self.settings.display_only_tasks;
                self.rescan();
                let title = default_title(&self.settings, self.locale).to_string();
                self.persist_settings(title);
            }
            KeyCode::Char('c') => {
                self.compact = !self.compact;
                self.follow_cursor();
                self.status = if self.compact {
                    "Single month".into()
                } else {
                    "All months".into()
                };
            }
            KeyCode::Char('d') => {
                self.settings.theme = match self.settings.theme {
                    ThemeMode::Light => ThemeMode::Dark,
                    ThemeMode::Dark => ThemeMode::Light,
                };
                self.persist_settings("Theme switched".into());
            }
            KeyCode::Char('[') => self.step_month(-1),
            KeyCode::Char(']') => self.step_month(1),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(if self.is_graph() { -7 } else { -1 }),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(if self.is_graph() { 7 } else { 1 }),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(if self.is_graph() { -1 } else { -7 }),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(if self.is_graph() { 1 } else { 7 }),
            KeyCode::Enter => self.open_cursor_note(),
            KeyCode::Char('s') => match self.tracker.flush() {
                Ok(()) => {
                    self.last_save = Instant::now();
                    self.status = "Saved".into();
                }
                Err(err) => self.report_save_error(&err),
            },
            KeyCode::Char('r') => {
                self.rescan();
                self.status = "Rescanned vault".into();
            }
            _ => {}
        }
        if single_month != self.single_month() {
            self.follow_cursor();
        }
        false
    }

    fn set_style(&mut self, style: DisplayStyle) {
        if self.settings.display_style == style {
            return;
        }
        self.settings.display_style = style;
        self.rescan();
        self.follow_cursor();
        self.persist_settings(format!("Style {}", style));
    }

    fn persist_settings(&mut self, message: String) {
        match save_settings(&self.location, &self.settings) {
            Ok(()) => self.status = message,
            Err(err) => {
                warn!("saving settings: {:#}", err);
                self.status = format!("{} (settings not saved: {})", message, err);
            }
        }
    }

    /// Reloads everything derived from note contents.
    fn rescan(&mut self) {
        self.task_data = if self.settings.display_only_tasks {
            load_tasks_from_vault(&self.vault)
        } else {
            ActivityData::new()
        };
        self.tasks_status = task_status_for(&self.settings, &self.vault);
    }

    fn data(&self) -> &ActivityData {
        if self.settings.display_only_tasks {
            &self.task_data
        } else {
            self.tracker.data()
        }
    }

    fn range(&self) -> DateRange {
        settings_range(&self.settings, today())
    }

    fn is_graph(&self) -> bool {
        self.settings.display_style == DisplayStyle::CommitGraph
    }

    fn single_month(&self) -> bool {
        match self.settings.display_style {
            DisplayStyle::CommitGraph => false,
            DisplayStyle::Calendar => self.compact,
            DisplayStyle::CalendarSheet => true,
        }
    }

    fn clamp_cursor(&mut self) {
        let range = self.range();
        if range.is_empty() {
            return;
        }
        self.cursor = self.cursor.clamp(range.start_date(), range.end_date());
        self.follow_cursor();
    }

    fn move_cursor(&mut self, days: i64) {
        let range = self.range();
        if range.is_empty() {
            return;
        }
        let target = self.cursor + ChronoDuration::days(days);
        self.cursor = target.clamp(range.start_date(), range.end_date());
        self.follow_cursor();
    }

    /// Keeps the displayed month on the cursor in single-month views.
    fn follow_cursor(&mut self) {
        if !self.single_month() {
            return;
        }
        let range = self.range();
        let months = months_in_range(range.start_date(), range.end_date());
        let month = first_of_month(self.cursor);
        if let Some(idx) = months.iter().position(|m| *m == month) {
            self.month = Some(idx);
        }
    }

    fn step_month(&mut self, delta: isize) {
        if !self.single_month() {
            self.status = "Month navigation needs a single-month view (c)".into();
            return;
        }
        let range = self.range();
        let months = months_in_range(range.start_date(), range.end_date());
        if months.is_empty() {
            return;
        }
        let mut cursor = match self.month {
            Some(idx) => MonthCursor::at(idx, months.len()),
            None => MonthCursor::latest(months.len()),
        };
        if !cursor.step(delta) {
            self.status = "No more months in range".into();
            return;
        }
        self.month = Some(cursor.index());
        self.cursor = months[cursor.index()].clamp(range.start_date(), range.end_date());
        let label = if delta < 0 {
            self.locale.nav_prev_month
        } else {
            self.locale.nav_next_month
        };
        self.status = format!("{}: {}", label, self.locale.month_title(months[cursor.index()]));
    }

    fn open_cursor_note(&mut self) {
        let key = format_date(&self.cursor);
        let clickable = self
            .grid()
            .find(&key)
            .map(|cell| cell.is_clickable())
            .unwrap_or(false);
        if !clickable {
            self.status = "Day is outside the displayed range".into();
            return;
        }
        match open_daily_note(
            &self.location.root,
            &self.settings.daily_notes,
            self.cursor,
            self.locale,
        ) {
            Ok(note) => {
                let verb = if note.created { "Created" } else { "Daily note" };
                self.status = format!("{} {}", verb, note.path.display());
            }
            Err(err) => {
                warn!("opening daily note: {:#}", err);
                self.status = format!("Could not open daily note: {}", err);
            }
        }
    }

    fn grid(&self) -> GridBuffer {
        render_grid(
            &self.settings,
            self.locale,
            today(),
            self.data(),
            &self.tasks_status,
            self.compact,
            self.month,
        )
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(4),
            ])
            .split(f.size());

        let buffer = self.grid();
        self.draw_header(f, layout[0]);
        self.draw_graph(f, layout[1], &buffer);
        self.draw_footer(f, layout[2], &buffer);
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let scope = match self.location.scope {
            VaultScope::Project => "project",
            VaultScope::Global => "global",
        };
        let saved = if self.tracker.is_dirty() {
            format!(
                "unsaved, saving in {}s",
                self.tracker.next_save_in(Instant::now()).as_secs()
            )
        } else {
            format!("saved {}", format_elapsed(self.last_save))
        };
        let title = Line::from(vec![
            Span::styled(
                format!("{} ", self.locale.view_title),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(scope, Style::default().fg(Color::Green)),
            Span::raw("  •  "),
            Span::styled(
                format!("{}", self.location.root.display()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::raw("  •  "),
            Span::styled(saved, Style::default().fg(Color::Gray)),
            Span::raw("  •  "),
            Span::styled(
                format!(
                    "{} {}",
                    self.settings.display_style, self.settings.display_period
                ),
                Style::default().fg(Color::Magenta),
            ),
        ]);

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(title)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_graph(&self, f: &mut ratatui::Frame<'_>, area: Rect, buffer: &GridBuffer) {
        let cursor = format_date(&self.cursor);
        let ctx = RenderContext::new(&self.settings, self.locale, today());
        let painter = Painter::themed(Palette::from_context(&ctx), self.locale)
            .with_selection(Some(&cursor));
        let mut lines = painter.paint(buffer);
        if buffer.sections.is_empty() {
            lines.push(Line::from(Span::styled(
                "Nothing to show for this range",
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::default());
        lines.push(painter.legend());

        let block = Block::default()
            .title(Span::styled(
                default_title(&self.settings, self.locale),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(lines).block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect, buffer: &GridBuffer) {
        let cursor = format_date(&self.cursor);
        let hover = buffer
            .find(&cursor)
            .and_then(|cell| tooltip(self.locale, cell))
            .unwrap_or_default();
        let lines = vec![
            Line::from(vec![
                Span::styled(hover, Style::default().fg(Color::Yellow)),
                Span::raw("  "),
                Span::styled(self.status.clone(), Style::default().fg(Color::Gray)),
            ]),
            Line::from(Span::styled(
                "1/2/3 style  p period  t tasks  c compact  [ ] month  arrows move  Enter note  d theme  s save  r rescan  q quit",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));
        f.render_widget(Paragraph::new(lines).block(block), area);
    }
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn format_elapsed(last: Instant) -> String {
    let secs = last.elapsed().as_secs();
    if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}
