//! Remove source directories that were emptied by a run.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;

use crate::tv_move::classify::HARMLESS_EXTENSIONS;
use crate::tv_move::report::Reporter;

/// Remove each touched directory that no longer contains anything worth keeping.
///
/// Directories are processed deepest first, so a child that gets removed
/// does not keep its parent from being removed.
/// The source root itself is never removed.
/// Returns the number of removed directories.
pub fn remove_emptied_directories(
    touched_dirs: &BTreeSet<PathBuf>,
    source_root: &Path,
    reporter: &mut dyn Reporter,
) -> usize {
    let mut removed = 0;
    for dir in deepest_first(touched_dirs) {
        if dir == source_root || !dir.starts_with(source_root) || !dir.is_dir() {
            continue;
        }
        if !only_harmless_files(dir) {
            continue;
        }
        match fs::remove_dir_all(dir) {
            Ok(()) => {
                reporter.directory_removed(dir);
                removed += 1;
            }
            Err(error) => reporter.cleanup_failed(dir, &error),
        }
    }
    removed
}

/// Sort directories by path depth, deepest first. Equal depths keep path order.
fn deepest_first(dirs: &BTreeSet<PathBuf>) -> Vec<&PathBuf> {
    dirs.iter()
        .sorted_by_key(|dir| Reverse(dir.components().count()))
        .collect()
}

/// Check if the directory contains no files other than harmless leftovers.
/// Subdirectories are not inspected.
fn only_harmless_files(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    for entry in entries {
        let Ok(entry) = entry else {
            return false;
        };
        let is_dir = entry.file_type().is_ok_and(|file_type| file_type.is_dir());
        if is_dir {
            continue;
        }
        let extension = crate::path_to_file_extension_string(&entry.path());
        if !HARMLESS_EXTENSIONS.contains(&extension.as_str()) {
            return false;
        }
    }
    true
}
