use crate::codeblock::parse_options;
use crate::config::{DisplayStyle, Period, Settings};
use crate::daily::open_daily_note;
use crate::dates::parse_date;
use crate::locale::{self, Locale};
use crate::logging::init_logging;
use crate::model::{ActivityData, TasksStatusData};
use crate::paint::{lines_to_string, Painter};
use crate::render::{render_grid, settings_range, GridBuffer};
use crate::storage::{
    init_vault, load_settings, locate_vault, ActivityStore, VaultLocation, VaultScope, YamlStore,
};
use crate::tasks::{load_tasks_from_vault, load_tasks_status};
use crate::tracker::Tracker;
use crate::ui;
use crate::vault::FsVault;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use log::info;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;
use std::{env, fs, io};

pub fn init(log_level: &str) -> Result<()> {
    let cwd = env::current_dir()?;
    let location = init_vault(&cwd)?;
    start_logging(log_level, &location);
    println!("Initialized vault at {}", location.state_dir.display());
    Ok(())
}

pub fn record(log_level: &str, count: u32) -> Result<()> {
    let location = open_vault(log_level)?;
    let mut tracker = Tracker::open(YamlStore::for_location(&location), Instant::now())?;
    let today = today();
    tracker.record_events(today, count);
    let total = tracker.data().count(&crate::dates::format_date(&today));
    tracker.close()?;
    println!("Recorded {} event(s); {} today", count, total);
    Ok(())
}

pub fn show(
    log_level: &str,
    style: Option<String>,
    period: Option<String>,
    start: Option<String>,
    end: Option<String>,
    tasks: bool,
) -> Result<()> {
    let location = open_vault(log_level)?;
    let mut settings = load_settings(&location)?;
    if let Some(style) = style {
        settings.display_style = style.parse::<DisplayStyle>()?;
    }
    if let Some(period) = period {
        settings.display_period = period.parse::<Period>()?;
    }
    if start.is_some() || end.is_some() {
        settings.display_period = Period::Custom;
        settings.custom_start_date = start.unwrap_or_default();
        settings.custom_end_date = end.unwrap_or_default();
    }
    if tasks {
        settings.display_only_tasks = true;
    }
    let locale = locale::resolve(&settings.locale);
    let title = default_title(&settings, locale);
    print_graph(&location, &settings, locale, Some(title), false)
}

pub fn embed(log_level: &str, file: Option<PathBuf>) -> Result<()> {
    let location = open_vault(log_level)?;
    let source = match file {
        Some(path) => {
            fs::read_to_string(&path).with_context(|| format!("reading {:?}", path))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading code block from stdin")?;
            buf
        }
    };
    let options = parse_options(&source);
    let mut settings = options.apply(&load_settings(&location)?);
    let locale = locale::resolve(&settings.locale);
    let (style, compact) = embedded_style(settings.display_style);
    settings.display_style = style;
    print_graph(&location, &settings, locale, options.title.as_deref(), compact)
}

/// Code blocks show both calendar styles as one compact calendar month.
fn embedded_style(style: DisplayStyle) -> (DisplayStyle, bool) {
    match style {
        DisplayStyle::CommitGraph => (DisplayStyle::CommitGraph, false),
        DisplayStyle::Calendar | DisplayStyle::CalendarSheet => (DisplayStyle::Calendar, true),
    }
}

pub fn open(log_level: &str, date: Option<String>) -> Result<()> {
    let location = open_vault(log_level)?;
    let settings = load_settings(&location)?;
    let date = match date {
        Some(raw) => parse_date(&raw)?,
        None => today(),
    };
    let locale = locale::resolve(&settings.locale);
    let note = open_daily_note(&location.root, &settings.daily_notes, date, locale)?;
    if note.created {
        println!("Created {}", note.path.display());
    } else {
        println!("{}", note.path.display());
    }
    Ok(())
}

pub fn tui(log_level: &str) -> Result<()> {
    let location = open_vault(log_level)?;
    let settings = load_settings(&location)?;
    ui::run(location, settings)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Recorded activity, or completed-task counts when the settings ask for tasks.
pub fn graph_data(settings: &Settings, vault: &FsVault, recorded: &ActivityData) -> ActivityData {
    if settings.display_only_tasks {
        load_tasks_from_vault(vault)
    } else {
        recorded.clone()
    }
}

/// Task dots are only drawn by the calendar sheet; skip the scan otherwise.
pub fn task_status_for(settings: &Settings, vault: &FsVault) -> TasksStatusData {
    if settings.display_style == DisplayStyle::CalendarSheet {
        load_tasks_status(vault)
    } else {
        TasksStatusData::new()
    }
}

pub fn default_title(settings: &Settings, locale: &Locale) -> &'static str {
    if settings.display_only_tasks {
        locale.tasks_graph_title
    } else {
        locale.activity_graph_title
    }
}

fn print_graph(
    location: &VaultLocation,
    settings: &Settings,
    locale: &'static Locale,
    title: Option<&str>,
    compact: bool,
) -> Result<()> {
    let vault = FsVault::new(&location.root);
    let recorded = YamlStore::for_location(location).load()?;
    let data = graph_data(settings, &vault, &recorded);
    let tasks = task_status_for(settings, &vault);
    let today = today();
    if settings_range(settings, today).fallback {
        eprintln!("custom range needs both start and end dates; showing the last 12 months");
    }
    let buffer = render_grid(settings, locale, today, &data, &tasks, compact, None);
    print!("{}", graph_text(locale, title, &buffer));
    Ok(())
}

/// Plain rendering with legend; the title line appears only when given.
fn graph_text(locale: &'static Locale, title: Option<&str>, buffer: &GridBuffer) -> String {
    let painter = Painter::plain(locale);
    let mut lines = painter.paint(buffer);
    lines.push(Default::default());
    lines.push(painter.legend());
    let mut out = String::new();
    if let Some(title) = title {
        out.push_str(title);
        out.push('\n');
    }
    out.push_str(&lines_to_string(&lines));
    out
}

fn open_vault(log_level: &str) -> Result<VaultLocation> {
    let cwd = env::current_dir()?;
    let location = locate_vault(&cwd)?;
    start_logging(log_level, &location);
    if location.scope == VaultScope::Global {
        info!(
            "no .actgraph directory above {}; using global state in {}",
            cwd.display(),
            location.state_dir.display()
        );
    }
    Ok(location)
}

/// Logging problems never stop a command.
fn start_logging(log_level: &str, location: &VaultLocation) {
    if let Err(err) = init_logging(log_level, &location.log_dir()) {
        eprintln!("logging disabled: {:#}", err);
    }
}
