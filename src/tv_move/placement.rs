//! Map episode metadata to a `base/Show.Name/SNN` directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::tv_move::episode::{EpisodeInfo, normalize};
use crate::tv_move::report::Reporter;
use crate::tv_move::types::PlacementError;

/// Compose the season directory path for an episode without touching the filesystem.
///
/// The show name is normalized the same way as filenames, so spaces become dots.
#[must_use]
pub fn target_directory_path(base_dir: &Path, show_name: &str, season_label: &str) -> PathBuf {
    base_dir.join(normalize(show_name.trim())).join(season_label)
}

/// Resolve the season directory for an episode, creating the show and season directories as needed.
///
/// Existing directories are not an error.
/// If the show directory cannot be created, the season directory is not attempted.
/// With `dryrun` nothing is created and only the path is returned.
///
/// # Errors
/// Returns an error if creating a directory fails.
pub fn resolve_target_directory(
    base_dir: &Path,
    episode: &EpisodeInfo,
    dryrun: bool,
    reporter: &mut dyn Reporter,
) -> Result<PathBuf, PlacementError> {
    let season_dir = target_directory_path(base_dir, &episode.show_name, &episode.season_label());
    if dryrun {
        return Ok(season_dir);
    }

    if let Some(show_dir) = season_dir.parent() {
        create_directory(show_dir, reporter)?;
    }
    create_directory(&season_dir, reporter)?;

    Ok(season_dir)
}

/// Create a single directory if it does not exist yet.
fn create_directory(path: &Path, reporter: &mut dyn Reporter) -> Result<(), PlacementError> {
    if path.is_dir() {
        return Ok(());
    }
    match fs::create_dir(path) {
        Ok(()) => {
            reporter.directory_created(path);
            Ok(())
        }
        // Created by someone else in the meantime
        Err(error) if error.kind() == io::ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(error) => Err(PlacementError::from_io(path.to_path_buf(), error)),
    }
}

#[cfg(test)]
mod placement_tests {
    use super::*;

    use std::fs::File;

    use tempfile::TempDir;

    use crate::tv_move::report::RecordingReporter;

    fn episode(show_name: &str, season: u8) -> EpisodeInfo {
        EpisodeInfo {
            show_name: show_name.to_string(),
            season,
        }
    }

    #[test]
    fn target_path_normalizes_show_name() {
        let path = target_directory_path(Path::new("/tv"), "The Wire", "S01");
        assert_eq!(path, Path::new("/tv/The.Wire/S01"));
    }

    #[test]
    fn creates_show_and_season_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut reporter = RecordingReporter::default();

        let dir = resolve_target_directory(temp_dir.path(), &episode("Invasion", 3), false, &mut reporter)
            .expect("Failed to resolve target directory");

        assert_eq!(dir, temp_dir.path().join("Invasion").join("S03"));
        assert!(dir.is_dir());
        assert_eq!(
            reporter.created,
            vec![temp_dir.path().join("Invasion"), temp_dir.path().join("Invasion").join("S03")]
        );
    }

    #[test]
    fn existing_directories_are_reused() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir_all(temp_dir.path().join("The.Wire").join("S01")).expect("Failed to create dirs");
        let mut reporter = RecordingReporter::default();

        let dir = resolve_target_directory(temp_dir.path(), &episode("The Wire", 1), false, &mut reporter)
            .expect("Failed to resolve target directory");

        assert_eq!(dir, temp_dir.path().join("The.Wire").join("S01"));
        assert!(reporter.created.is_empty());
    }

    #[test]
    fn only_missing_season_directory_is_created() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("Dark")).expect("Failed to create dir");
        let mut reporter = RecordingReporter::default();

        resolve_target_directory(temp_dir.path(), &episode("Dark", 2), false, &mut reporter)
            .expect("Failed to resolve target directory");

        assert_eq!(reporter.created, vec![temp_dir.path().join("Dark").join("S02")]);
    }

    #[test]
    fn dryrun_does_not_create_anything() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let mut reporter = RecordingReporter::default();

        let dir = resolve_target_directory(temp_dir.path(), &episode("Dark", 2), true, &mut reporter)
            .expect("Failed to resolve target directory");

        assert_eq!(dir, temp_dir.path().join("Dark").join("S02"));
        assert!(!temp_dir.path().join("Dark").exists());
        assert!(reporter.created.is_empty());
    }

    #[test]
    fn file_in_place_of_show_directory_fails_before_season() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        File::create(temp_dir.path().join("Dark")).expect("Failed to create file");
        let mut reporter = RecordingReporter::default();

        let result = resolve_target_directory(temp_dir.path(), &episode("Dark", 2), false, &mut reporter);

        match result {
            Err(PlacementError::Os { path, .. }) => assert_eq!(path, temp_dir.path().join("Dark")),
            other => panic!("Expected OS placement error, got {other:?}"),
        }
        assert!(reporter.created.is_empty());
    }
}
