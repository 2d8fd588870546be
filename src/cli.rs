use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "actgraph", version, about = "Activity graphs for a folder of markdown notes")]
pub struct Cli {
    /// Log level for the log file (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a vault in the current directory
    Init,
    /// Record activity for today
    Record {
        /// Number of events to add
        #[arg(long, default_value_t = 1)]
        count: u32,
    },
    /// Print the graph to stdout
    Show {
        /// commit-graph, calendar or calendar-sheet
        #[arg(long)]
        style: Option<String>,
        /// 1month, 3months, 6months, 12months or custom
        #[arg(long)]
        period: Option<String>,
        /// Custom range start (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// Custom range end (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Graph completed tasks instead of recorded activity
        #[arg(long)]
        tasks: bool,
    },
    /// Render an activity-graph code block read from a file or stdin
    Embed {
        /// File holding the block body; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Open (creating if needed) the daily note for a date
    Open {
        /// Date in YYYY-MM-DD format; today when omitted
        date: Option<String>,
    },
    /// Launch the interactive TUI
    Tui,
}
