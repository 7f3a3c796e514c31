//! Move TV episode files into a `Show.Name/SNN/` directory layout.
//!
//! Show name and season are parsed from the filename only.
//! Videos are moved first. Subtitles then follow the video from the same directory
//! whose name they start with. Emptied source directories can be removed afterwards.

mod classify;
mod cleanup;
mod config;
mod episode;
mod logger;
mod mover;
mod placement;
mod report;
mod types;

pub use classify::{
    COMPANION_SUBTITLE_SUFFIX, HARMLESS_EXTENSIONS, MediaKind, SUBTITLE_EXTENSIONS, VIDEO_EXTENSIONS,
    companion_subtitle_path, has_companion_subtitle, is_tv_episode, matches_filter,
};
pub use cleanup::remove_emptied_directories;
pub use config::TvMoveConfig;
pub use episode::{AuxiliaryInfo, EpisodeInfo, ExtractionError, normalize};
pub use logger::FileLogger;
pub use mover::{MoveOutcome, TvMove, destination_file_name, move_file};
pub use placement::{resolve_target_directory, target_directory_path};
pub use report::{ConsoleReporter, Reporter};
pub use types::{Failure, PlacementError, RunSummary, SkipReason, VideoPlacement};
