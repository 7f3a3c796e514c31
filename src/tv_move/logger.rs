use std::fs;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Local;

use crate::tv_move::config::TvMoveConfig;
use crate::tv_move::types::{Failure, RunSummary, SkipReason};

/// Simple file logger for move operations with buffered writes
pub struct FileLogger {
    writer: BufWriter<File>,
    path: PathBuf,
    start: Instant,
}

impl FileLogger {
    /// Create a new file logger, writing to `~/logs/tvsort/mv2tv_<timestamp>.log`
    pub fn new() -> Result<Self> {
        let log_dir = crate::config::LOG_DIR
            .as_deref()
            .context("Failed to get home directory")?;
        Self::in_directory(log_dir)
    }

    /// Create a new file logger in the given directory.
    pub fn in_directory(log_dir: &Path) -> Result<Self> {
        if !log_dir.exists() {
            fs::create_dir_all(log_dir).context("Failed to create log directory")?;
        }

        let path = log_dir.join(format!("mv2tv_{}.log", Local::now().format("%Y-%m-%d_%H-%M-%S")));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to create log file: {}", path.display()))?;

        Ok(Self {
            writer: BufWriter::new(file),
            path,
            start: Instant::now(),
        })
    }

    /// Path of the log file being written.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn timestamp() -> String {
        Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
    }

    fn write_line(&mut self, level: &str, message: &str) {
        let _ = writeln!(self.writer, "[{}] {level:<7} {message}", Self::timestamp());
        let _ = self.writer.flush();
    }

    /// Log the run configuration
    pub fn log_init(&mut self, config: &TvMoveConfig) {
        let _ = writeln!(
            self.writer,
            "[{}] INIT    \"{}\" -> \"{}\"",
            Self::timestamp(),
            config.source_dir.display(),
            config.target_dir.display()
        );
        let _ = writeln!(self.writer, "  resolution: {}", config.resolution.as_deref().unwrap_or("-"));
        let _ = writeln!(self.writer, "  codec: {}", config.codec.as_deref().unwrap_or("-"));
        let _ = writeln!(
            self.writer,
            "  require_companion_subtitle: {}",
            config.require_companion_subtitle
        );
        let _ = writeln!(self.writer, "  overwrite: {}", config.overwrite);
        let _ = writeln!(self.writer, "  remove_source: {}", config.remove_source);
        let _ = writeln!(self.writer, "  dryrun: {}", config.dryrun);
        let _ = self.writer.flush();
    }

    pub(crate) fn log_info(&mut self, message: &str) {
        self.write_line("INFO", message);
    }

    pub(crate) fn log_warning(&mut self, message: &str) {
        self.write_line("WARNING", message);
    }

    pub(crate) fn log_error(&mut self, message: &str) {
        self.write_line("ERROR", message);
    }

    pub(crate) fn log_move(&mut self, source: &Path, target: &Path, dryrun: bool) {
        let level = if dryrun { "DRYRUN" } else { "MOVE" };
        self.write_line(level, &format!("\"{}\" -> \"{}\"", source.display(), target.display()));
    }

    pub(crate) fn log_skip(&mut self, path: &Path, reason: &SkipReason) {
        self.write_line("SKIP", &format!("\"{}\" | {reason}", path.display()));
    }

    pub(crate) fn log_failure(&mut self, path: &Path, failure: &Failure) {
        self.write_line("ERROR", &format!("\"{}\" | {failure}", path.display()));
    }

    /// Log final statistics
    pub(crate) fn log_summary(&mut self, summary: &RunSummary) {
        let _ = writeln!(self.writer, "[{}] STATISTICS", Self::timestamp());
        let _ = writeln!(self.writer, "  Moved:   {}", summary.success);
        let _ = writeln!(self.writer, "  Failed:  {}", summary.failure);
        let _ = writeln!(self.writer, "  Skipped: {}", summary.skipped);
        let _ = writeln!(self.writer, "  Removed directories: {}", summary.removed);
        let _ = writeln!(
            self.writer,
            "  Total time: {}",
            crate::format_duration(self.start.elapsed())
        );
        let _ = writeln!(self.writer, "[{}] END", Self::timestamp());
        let _ = self.writer.flush();
    }
}

#[cfg(test)]
mod logger_tests {
    use super::*;

    use tempfile::TempDir;

    #[test]
    fn writes_events_and_summary() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let log_dir = temp_dir.path().join("logs");
        let mut logger = FileLogger::in_directory(&log_dir).expect("Failed to create logger");

        logger.log_move(Path::new("/src/a.mkv"), Path::new("/tv/A/S01/a.mkv"), false);
        logger.log_skip(Path::new("/src/b.mkv"), &SkipReason::NotEpisode);
        logger.log_summary(&RunSummary {
            success: 1,
            failure: 0,
            skipped: 1,
            removed: 0,
        });

        let content = fs::read_to_string(logger.path()).expect("Failed to read log");
        assert!(content.contains("MOVE    \"/src/a.mkv\" -> \"/tv/A/S01/a.mkv\""));
        assert!(content.contains("SKIP    \"/src/b.mkv\" | Not a TV episode"));
        assert!(content.contains("  Moved:   1"));
        assert!(content.contains("END"));
    }
}
