//! Two-phase move: videos first, then subtitles that belong to a moved video.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::tv_move::classify::{
    COMPANION_SUBTITLE_SUFFIX, MediaKind, companion_subtitle_path, has_companion_subtitle, is_tv_episode,
    matches_filter,
};
use crate::tv_move::cleanup::remove_emptied_directories;
use crate::tv_move::config::TvMoveConfig;
use crate::tv_move::episode::{EpisodeInfo, SEPARATOR, normalize};
use crate::tv_move::placement::resolve_target_directory;
use crate::tv_move::report::Reporter;
use crate::tv_move::types::{Failure, RunSummary, SkipReason, VideoPlacement};
use crate::{get_normalized_file_name_and_extension, is_hidden, path_to_filename_string};

/// Moves episode files from a source tree into `target/Show.Name/SNN/`.
#[derive(Debug)]
pub struct TvMove {
    config: TvMoveConfig,
}

/// Result of a successful call to [`move_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// File was moved to the contained path (or would be, in a dry run).
    Moved(PathBuf),
    /// File already has its final name in the target directory.
    AlreadyInPlace,
}

/// Mutable state shared by both phases of one run.
#[derive(Debug, Default)]
struct RunState {
    summary: RunSummary,
    /// Moved videos in walk order. Subtitles bind to the first match.
    placements: Vec<VideoPlacement>,
    /// Source directories at least one file was moved out of.
    touched_dirs: BTreeSet<PathBuf>,
}

impl TvMove {
    #[must_use]
    pub const fn new(config: TvMoveConfig) -> Self {
        Self { config }
    }

    /// Move all videos, then their subtitles, then optionally clean up emptied source directories.
    ///
    /// Per-file problems are reported and counted but never stop the run.
    pub fn run(&self, reporter: &mut dyn Reporter) -> RunSummary {
        let mut state = RunState::default();

        for path in self.collect_media_files(MediaKind::Video) {
            self.process_video(&path, &mut state, reporter);
        }

        // Subtitle walk starts only after every video has been handled
        for path in self.collect_media_files(MediaKind::Subtitle) {
            self.process_subtitle(&path, &mut state, reporter);
        }

        if self.config.remove_source && !self.config.dryrun {
            state.summary.removed =
                remove_emptied_directories(&state.touched_dirs, &self.config.source_dir, reporter);
        }

        reporter.finished(&state.summary);
        state.summary
    }

    /// Walk the source tree and collect files of the given kind, sorted by name within each directory.
    /// Hidden entries and a target directory nested inside the source are skipped.
    fn collect_media_files(&self, kind: MediaKind) -> Vec<PathBuf> {
        WalkDir::new(&self.config.source_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0 || (!is_hidden(entry) && entry.path() != self.config.target_dir)
            })
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .map(walkdir::DirEntry::into_path)
            .filter(|path| MediaKind::from_path(path) == Some(kind))
            .collect()
    }

    /// Check the episode marker and the resolution and codec filters.
    fn classify(&self, filename: &str) -> Option<SkipReason> {
        if !is_tv_episode(filename) {
            return Some(SkipReason::NotEpisode);
        }
        if !matches_filter(filename, self.config.resolution.as_deref(), self.config.codec.as_deref()) {
            return Some(SkipReason::FilteredOut);
        }
        None
    }

    fn process_video(&self, path: &Path, state: &mut RunState, reporter: &mut dyn Reporter) {
        let filename = path_to_filename_string(path);

        if let Some(reason) = self.classify(&filename) {
            state.skip(path, &reason, reporter);
            return;
        }
        if self.config.require_companion_subtitle && !has_companion_subtitle(path, COMPANION_SUBTITLE_SUFFIX) {
            let reason = SkipReason::MissingCompanionSubtitle {
                path: companion_subtitle_path(path, COMPANION_SUBTITLE_SUFFIX),
            };
            state.skip(path, &reason, reporter);
            return;
        }

        let episode = match EpisodeInfo::from_filename(&filename) {
            Ok(episode) => episode,
            Err(error) => {
                state.fail(path, &error.into(), reporter);
                return;
            }
        };

        let target_dir =
            match resolve_target_directory(&self.config.target_dir, &episode, self.config.dryrun, reporter) {
                Ok(dir) => dir,
                Err(error) => {
                    state.fail(path, &error.into(), reporter);
                    return;
                }
            };

        match move_file(path, &target_dir, self.config.overwrite, self.config.dryrun, reporter) {
            Ok(MoveOutcome::Moved(_)) => {
                let (stem, _) = split_file_name(path);
                let source_dir = parent_dir(path);
                state.placements.push(VideoPlacement {
                    stem,
                    source_dir: source_dir.clone(),
                    target_dir,
                });
                state.moved(source_dir);
            }
            Ok(MoveOutcome::AlreadyInPlace) => state.skip(path, &SkipReason::AlreadyInPlace, reporter),
            Err(failure) => state.fail(path, &failure, reporter),
        }
    }

    fn process_subtitle(&self, path: &Path, state: &mut RunState, reporter: &mut dyn Reporter) {
        let filename = path_to_filename_string(path);

        if let Some(reason) = self.classify(&filename) {
            state.skip(path, &reason, reporter);
            return;
        }

        let (stem, _) = split_file_name(path);
        let source_dir = parent_dir(path);
        let Some(target_dir) = state
            .placements
            .iter()
            .find(|video| video.matches_subtitle(&source_dir, &stem))
            .map(|video| video.target_dir.clone())
        else {
            state.skip(path, &SkipReason::NoMatchingVideo, reporter);
            return;
        };

        match move_file(path, &target_dir, self.config.overwrite, self.config.dryrun, reporter) {
            Ok(MoveOutcome::Moved(_)) => state.moved(source_dir),
            Ok(MoveOutcome::AlreadyInPlace) => state.skip(path, &SkipReason::AlreadyInPlace, reporter),
            Err(failure) => state.fail(path, &failure, reporter),
        }
    }
}

impl RunState {
    fn moved(&mut self, source_dir: PathBuf) {
        self.summary.success += 1;
        self.touched_dirs.insert(source_dir);
    }

    fn skip(&mut self, path: &Path, reason: &SkipReason, reporter: &mut dyn Reporter) {
        self.summary.skipped += 1;
        reporter.file_skipped(path, reason);
    }

    fn fail(&mut self, path: &Path, failure: &Failure, reporter: &mut dyn Reporter) {
        self.summary.failure += 1;
        reporter.file_failed(path, failure);
    }
}

/// Compose the destination filename: separator-normalized stem with the original extension.
///
/// ```rust
/// use std::path::Path;
/// use tvsort::tv_move::destination_file_name;
///
/// assert_eq!(
///     destination_file_name(Path::new("The Wire (2002) S01E01 [1080p].MKV")),
///     "The.Wire.2002.S01E01.1080p.MKV"
/// );
/// ```
#[must_use]
pub fn destination_file_name(source: &Path) -> String {
    let (stem, extension) = split_file_name(source);
    let normalized = normalize(&stem);
    let normalized = normalized.trim_matches(SEPARATOR);
    if normalized.is_empty() {
        return path_to_filename_string(source);
    }
    if extension.is_empty() {
        normalized.to_string()
    } else {
        format!("{normalized}.{extension}")
    }
}

/// Move a file into the target directory under its normalized name.
///
/// An existing destination file is replaced when `overwrite` is set,
/// otherwise the move fails with a conflict and the source stays where it is.
/// With `dryrun` the move is only reported.
///
/// # Errors
/// Returns a failure on a destination conflict or if the move itself fails.
pub fn move_file(
    source: &Path,
    target_dir: &Path,
    overwrite: bool,
    dryrun: bool,
    reporter: &mut dyn Reporter,
) -> Result<MoveOutcome, Failure> {
    let destination = target_dir.join(destination_file_name(source));
    if destination == source {
        return Ok(MoveOutcome::AlreadyInPlace);
    }

    if destination.exists() {
        if !overwrite {
            return Err(Failure::MoveConflict { path: destination });
        }
        if !dryrun {
            reporter.file_overwritten(&destination);
        }
    }

    if !dryrun {
        rename_or_copy(source, &destination).map_err(|error| Failure::MoveIo {
            path: destination.clone(),
            error,
        })?;
    }

    reporter.file_moved(source, &destination, dryrun);
    Ok(MoveOutcome::Moved(destination))
}

/// Rename the file, falling back to copy and delete when crossing filesystems.
fn rename_or_copy(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Err(error) if error.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(source, destination)?;
            fs::remove_file(source)
        }
        result => result,
    }
}

/// File stem and extension, falling back to the whole filename as stem.
fn split_file_name(path: &Path) -> (String, String) {
    get_normalized_file_name_and_extension(path).unwrap_or_else(|_| (path_to_filename_string(path), String::new()))
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}
