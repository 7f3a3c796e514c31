//! Decide which files are episode candidates.

use std::path::{Path, PathBuf};

use crate::tv_move::episode::{AuxiliaryInfo, RE_SEASON_EPISODE, normalize};

pub const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi"];
pub const SUBTITLE_EXTENSIONS: &[&str] = &["srt", "ass", "sub"];

/// Leftover file types that do not prevent removing an emptied source directory.
pub const HARMLESS_EXTENSIONS: &[&str] = &["nfo", "txt", "jpg", "jpeg", "png", "gif"];

/// Suffix of the generated subtitle file that must exist next to a video
/// unless the requirement is disabled.
pub const COMPANION_SUBTITLE_SUFFIX: &str = ".ai.srt";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Subtitle,
}

impl MediaKind {
    /// Get the media kind from the file extension. Extension case is ignored.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = crate::path_to_file_extension_string(path);
        if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Video)
        } else if SUBTITLE_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Subtitle)
        } else {
            None
        }
    }
}

/// Check if the filename contains a separator-bounded `SxxEyy` marker.
///
/// This is independent of full metadata extraction:
/// a name can pass this check and still fail extraction,
/// for example when the extension is the only separator after the marker.
#[must_use]
pub fn is_tv_episode(filename: &str) -> bool {
    RE_SEASON_EPISODE.is_match(&normalize(filename))
}

/// Check that each given filter value is present in the filename.
///
/// Comparison is case-insensitive. Always true when no filters are given.
#[must_use]
pub fn matches_filter(filename: &str, resolution: Option<&str>, codec: Option<&str>) -> bool {
    if resolution.is_none() && codec.is_none() {
        return true;
    }

    let info = AuxiliaryInfo::from_filename(filename);
    let matches = |wanted: Option<&str>, found: Option<&String>| {
        wanted.is_none_or(|wanted| found.is_some_and(|found| found.eq_ignore_ascii_case(wanted)))
    };

    matches(resolution, info.resolution.as_ref()) && matches(codec, info.codec.as_ref())
}

/// Path of the companion subtitle for a video:
/// same directory, same stem, followed by the given suffix.
#[must_use]
pub fn companion_subtitle_path(video_path: &Path, suffix: &str) -> PathBuf {
    let stem = crate::os_str_to_string(video_path.file_stem().unwrap_or_default());
    video_path.with_file_name(format!("{stem}{suffix}"))
}

/// Check if the companion subtitle exists next to the video.
#[must_use]
pub fn has_companion_subtitle(video_path: &Path, suffix: &str) -> bool {
    companion_subtitle_path(video_path, suffix).is_file()
}
