//! Observer for run events.

use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::tv_move::logger::FileLogger;
use crate::tv_move::types::{Failure, RunSummary, SkipReason};
use crate::{get_relative_path_or_filename, print_error, print_warning};

/// Receives everything that happens during a run.
///
/// Passed explicitly into the engine and cleanup instead of relying on global logging state.
pub trait Reporter {
    fn directory_created(&mut self, path: &Path);
    fn file_moved(&mut self, source: &Path, target: &Path, dryrun: bool);
    fn file_overwritten(&mut self, target: &Path);
    fn file_skipped(&mut self, path: &Path, reason: &SkipReason);
    fn file_failed(&mut self, path: &Path, failure: &Failure);
    fn directory_removed(&mut self, path: &Path);
    fn cleanup_failed(&mut self, path: &Path, error: &io::Error);
    fn finished(&mut self, summary: &RunSummary);
}

/// Prints events to the terminal, optionally mirroring them to a log file.
pub struct ConsoleReporter {
    source_root: PathBuf,
    target_root: PathBuf,
    verbose: bool,
    logger: Option<FileLogger>,
}

impl ConsoleReporter {
    #[must_use]
    pub const fn new(source_root: PathBuf, target_root: PathBuf, verbose: bool, logger: Option<FileLogger>) -> Self {
        Self {
            source_root,
            target_root,
            verbose,
            logger,
        }
    }

    fn source_display(&self, path: &Path) -> String {
        get_relative_path_or_filename(path, &self.source_root)
    }

    fn target_display(&self, path: &Path) -> String {
        get_relative_path_or_filename(path, &self.target_root)
    }
}

impl Reporter for ConsoleReporter {
    fn directory_created(&mut self, path: &Path) {
        if self.verbose {
            println!("{} {}", "Created directory:".cyan(), self.target_display(path));
        }
        if let Some(logger) = self.logger.as_mut() {
            logger.log_info(&format!("Created directory \"{}\"", path.display()));
        }
    }

    fn file_moved(&mut self, source: &Path, target: &Path, dryrun: bool) {
        let label = if dryrun { "Would move:" } else { "Moved:" };
        println!(
            "{} {}\n  {} {}",
            label.green(),
            self.source_display(source),
            "→".green(),
            self.target_display(target)
        );
        if let Some(logger) = self.logger.as_mut() {
            logger.log_move(source, target, dryrun);
        }
    }

    fn file_overwritten(&mut self, target: &Path) {
        print_warning!("Overwriting existing file: {}", self.target_display(target));
        if let Some(logger) = self.logger.as_mut() {
            logger.log_warning(&format!("Overwriting \"{}\"", target.display()));
        }
    }

    fn file_skipped(&mut self, path: &Path, reason: &SkipReason) {
        if self.verbose {
            println!("{} {} ({reason})", "Skipped:".yellow(), self.source_display(path));
        }
        if let Some(logger) = self.logger.as_mut() {
            logger.log_skip(path, reason);
        }
    }

    fn file_failed(&mut self, path: &Path, failure: &Failure) {
        print_error!("{}: {failure}", self.source_display(path));
        if let Some(logger) = self.logger.as_mut() {
            logger.log_failure(path, failure);
        }
    }

    fn directory_removed(&mut self, path: &Path) {
        println!("{} {}", "Removed directory:".cyan(), self.source_display(path));
        if let Some(logger) = self.logger.as_mut() {
            logger.log_info(&format!("Removed directory \"{}\"", path.display()));
        }
    }

    fn cleanup_failed(&mut self, path: &Path, error: &io::Error) {
        print_error!("Failed to remove directory {}: {error}", path.display());
        if let Some(logger) = self.logger.as_mut() {
            logger.log_error(&format!("Failed to remove directory \"{}\": {error}", path.display()));
        }
    }

    fn finished(&mut self, summary: &RunSummary) {
        if let Some(logger) = self.logger.as_mut() {
            logger.log_summary(summary);
        }
    }
}

/// Collects events in memory for assertions.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingReporter {
    pub(crate) created: Vec<PathBuf>,
    pub(crate) moved: Vec<(PathBuf, PathBuf)>,
    pub(crate) overwritten: Vec<PathBuf>,
    pub(crate) skipped: Vec<(PathBuf, SkipReason)>,
    pub(crate) failed: Vec<(PathBuf, String)>,
    pub(crate) removed: Vec<PathBuf>,
    pub(crate) cleanup_errors: Vec<PathBuf>,
    pub(crate) summary: Option<RunSummary>,
}

#[cfg(test)]
impl Reporter for RecordingReporter {
    fn directory_created(&mut self, path: &Path) {
        self.created.push(path.to_path_buf());
    }

    fn file_moved(&mut self, source: &Path, target: &Path, _dryrun: bool) {
        self.moved.push((source.to_path_buf(), target.to_path_buf()));
    }

    fn file_overwritten(&mut self, target: &Path) {
        self.overwritten.push(target.to_path_buf());
    }

    fn file_skipped(&mut self, path: &Path, reason: &SkipReason) {
        self.skipped.push((path.to_path_buf(), reason.clone()));
    }

    fn file_failed(&mut self, path: &Path, failure: &Failure) {
        self.failed.push((path.to_path_buf(), failure.to_string()));
    }

    fn directory_removed(&mut self, path: &Path) {
        self.removed.push(path.to_path_buf());
    }

    fn cleanup_failed(&mut self, path: &Path, _error: &io::Error) {
        self.cleanup_errors.push(path.to_path_buf());
    }

    fn finished(&mut self, summary: &RunSummary) {
        self.summary = Some(*summary);
    }
}
