use std::fmt;
use std::io;
use std::path::PathBuf;

use colored::Colorize;

use crate::tv_move::episode::ExtractionError;

/// Aggregate counts for one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub success: usize,
    pub failure: usize,
    pub skipped: usize,
    pub removed: usize,
}

/// Why a candidate file was deliberately left in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No `SxxEyy` marker in the filename
    NotEpisode,
    /// Resolution or codec does not match the requested filter
    FilteredOut,
    /// Required companion subtitle was not found next to the video
    MissingCompanionSubtitle { path: PathBuf },
    /// No video from the same directory was moved for this subtitle
    NoMatchingVideo,
    /// File is already at its destination
    AlreadyInPlace,
}

/// Why moving a candidate file failed.
#[derive(Debug)]
pub enum Failure {
    /// Show name or season could not be parsed
    Extraction(ExtractionError),
    /// Target directory could not be created
    Placement(PlacementError),
    /// Destination exists and overwriting is disabled
    MoveConflict { path: PathBuf },
    /// The move itself failed
    MoveIo { path: PathBuf, error: io::Error },
}

/// Error creating a show or season directory.
#[derive(Debug)]
pub enum PlacementError {
    Permission { path: PathBuf, error: io::Error },
    Os { path: PathBuf, error: io::Error },
}

/// Where a video was moved to. Used to send matching subtitles after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoPlacement {
    /// Video filename without extension, before normalization.
    pub stem: String,
    /// Directory the video was found in.
    pub source_dir: PathBuf,
    /// Season directory the video was moved to.
    pub target_dir: PathBuf,
}

impl RunSummary {
    /// Total number of candidate files processed.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.success + self.failure + self.skipped
    }
}

impl PlacementError {
    /// Classify a directory creation error.
    pub(crate) fn from_io(path: PathBuf, error: io::Error) -> Self {
        if error.kind() == io::ErrorKind::PermissionDenied {
            Self::Permission { path, error }
        } else {
            Self::Os { path, error }
        }
    }
}

impl VideoPlacement {
    /// Check if this video is the counterpart of a subtitle:
    /// same source directory and the video stem is a prefix of the subtitle stem.
    #[must_use]
    pub fn matches_subtitle(&self, subtitle_dir: &std::path::Path, subtitle_stem: &str) -> bool {
        self.source_dir == subtitle_dir && subtitle_stem.starts_with(&self.stem)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} {}, {} {}, {} {}",
            "Success:".green(),
            self.success,
            "Failure:".red(),
            self.failure,
            "Skipped:".yellow(),
            self.skipped,
            "Removed directories:".cyan(),
            self.removed
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEpisode => write!(f, "Not a TV episode"),
            Self::FilteredOut => write!(f, "Does not match resolution or codec filter"),
            Self::MissingCompanionSubtitle { path } => {
                write!(f, "Missing companion subtitle: {}", path.display())
            }
            Self::NoMatchingVideo => write!(f, "No matching video was moved"),
            Self::AlreadyInPlace => write!(f, "Already in its target directory"),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extraction(error) => write!(f, "Could not extract show info: {error}"),
            Self::Placement(error) => write!(f, "{error}"),
            Self::MoveConflict { path } => write!(f, "Destination already exists: {}", path.display()),
            Self::MoveIo { path, error } => write!(f, "Failed to move to {}: {error}", path.display()),
        }
    }
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Permission { path, error } => {
                write!(f, "Permission denied creating directory {}: {error}", path.display())
            }
            Self::Os { path, error } => write!(f, "Failed to create directory {}: {error}", path.display()),
        }
    }
}

impl From<ExtractionError> for Failure {
    fn from(error: ExtractionError) -> Self {
        Self::Extraction(error)
    }
}

impl From<PlacementError> for Failure {
    fn from(error: PlacementError) -> Self {
        Self::Placement(error)
    }
}
