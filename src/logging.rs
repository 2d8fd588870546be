//! File logging.
//!
//! The TUI owns the terminal, so log output goes to rolling files under the
//! vault's state directory instead of stderr. Initialization happens at most
//! once per process; later calls for the same directory are no-ops.

use anyhow::{anyhow, bail, Context, Result};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "actgraph";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 3;

static LOGGING: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

pub fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        "off" => Ok("off"),
        other => bail!("unsupported log level {:?}; expected trace|debug|info|warn|error|off", other),
    }
}

pub fn init_logging(level: &str, log_dir: &Path) -> Result<()> {
    let level = normalize_level(level)?;
    if let Some(state) = LOGGING.get() {
        if state.log_dir == log_dir {
            return Ok(());
        }
        bail!(
            "logging already writes to {:?}; refusing to switch to {:?}",
            state.log_dir,
            log_dir
        );
    }
    if level == "off" {
        return Ok(());
    }

    LOGGING.get_or_try_init(|| -> Result<LoggingState> {
        fs::create_dir_all(log_dir).with_context(|| format!("creating {:?}", log_dir))?;
        let handle = Logger::try_with_str(level)
            .map_err(|err| anyhow!("invalid log level {}: {}", level, err))?
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
                    .basename(LOG_FILE_BASENAME),
            )
            .rotate(
                Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                Naming::Numbers,
                Cleanup::KeepLogFiles(MAX_LOG_FILES),
            )
            .write_mode(WriteMode::BufferAndFlush)
            .append()
            .format_for_files(flexi_logger::detailed_format)
            .start()
            .context("starting logger")?;
        info!(
            "event=start version={} level={} log_dir={}",
            env!("CARGO_PKG_VERSION"),
            level,
            log_dir.display()
        );
        Ok(LoggingState {
            log_dir: log_dir.to_path_buf(),
            _handle: handle,
        })
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("INFO", "info")]
    #[case(" warning ", "warn")]
    #[case("off", "off")]
    fn normalizes_levels(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(normalize_level(raw).unwrap(), expected);
    }

    #[test]
    fn rejects_unknown_level() {
        assert!(normalize_level("loud").is_err());
    }
}
