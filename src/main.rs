mod cli;
mod codeblock;
mod commands;
mod config;
mod daily;
mod dates;
mod locale;
mod logging;
mod model;
mod paint;
mod render;
mod schedule;
mod storage;
mod tasks;
mod tracker;
mod ui;
mod vault;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let log_level = args
        .log_level
        .unwrap_or_else(|| logging::default_log_level().to_string());
    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::Init => commands::init(&log_level),
        cli::Command::Record { count } => commands::record(&log_level, count),
        cli::Command::Show {
            style,
            period,
            start,
            end,
            tasks,
        } => commands::show(&log_level, style, period, start, end, tasks),
        cli::Command::Embed { file } => commands::embed(&log_level, file),
        cli::Command::Open { date } => commands::open(&log_level, date),
        cli::Command::Tui => commands::tui(&log_level),
    }
}
