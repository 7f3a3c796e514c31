use std::fmt;
use std::path::PathBuf;

/// Final config for one run, combined from CLI arguments and the user config file.
#[derive(Debug, Clone, Default)]
pub struct TvMoveConfig {
    pub source_dir: PathBuf,
    pub target_dir: PathBuf,
    pub resolution: Option<String>,
    pub codec: Option<String>,
    /// Only move videos that have a `.ai.srt` companion subtitle next to them.
    pub require_companion_subtitle: bool,
    /// Replace existing files at the destination.
    pub overwrite: bool,
    /// Remove source directories that only contain leftovers after moving.
    pub remove_source: bool,
    pub dryrun: bool,
    pub verbose: bool,
    pub debug: bool,
    pub log: bool,
}

impl TvMoveConfig {
    /// Config with the default policies for the given directories:
    /// companion subtitle required and existing files overwritten.
    #[must_use]
    pub fn new(source_dir: PathBuf, target_dir: PathBuf) -> Self {
        Self {
            source_dir,
            target_dir,
            require_companion_subtitle: true,
            overwrite: true,
            ..Default::default()
        }
    }
}

impl fmt::Display for TvMoveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config:")?;
        writeln!(f, "  source:        {}", self.source_dir.display())?;
        writeln!(f, "  target:        {}", self.target_dir.display())?;
        writeln!(f, "  resolution:    \"{}\"", self.resolution.as_deref().unwrap_or_default())?;
        writeln!(f, "  codec:         \"{}\"", self.codec.as_deref().unwrap_or_default())?;
        writeln!(
            f,
            "  companion sub: {}",
            crate::colorize_bool(self.require_companion_subtitle)
        )?;
        writeln!(f, "  overwrite:     {}", crate::colorize_bool(self.overwrite))?;
        writeln!(f, "  remove source: {}", crate::colorize_bool(self.remove_source))?;
        writeln!(f, "  dryrun:        {}", crate::colorize_bool(self.dryrun))?;
        writeln!(f, "  verbose:       {}", crate::colorize_bool(self.verbose))?;
        write!(f, "  log:           {}", crate::colorize_bool(self.log))
    }
}
