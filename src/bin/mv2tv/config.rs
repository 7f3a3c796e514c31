use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use tvsort::print_error;
use tvsort::tv_move::TvMoveConfig;

use crate::Args;

/// Final config combined from CLI arguments and user config file.
#[derive(Debug)]
pub struct Config(TvMoveConfig);

/// Config from the user config file
#[derive(Debug, Default, Deserialize)]
struct Mv2TvConfig {
    #[serde(default)]
    resolution: Option<String>,
    #[serde(default)]
    codec: Option<String>,
    #[serde(default)]
    remove_source: bool,
    #[serde(default)]
    force: bool,
    #[serde(default)]
    no_override: bool,
    #[serde(default)]
    dryrun: bool,
    #[serde(default)]
    verbose: bool,
    #[serde(default)]
    debug: bool,
    #[serde(default)]
    log: bool,
}

/// Wrapper needed for parsing the user config file section.
#[derive(Debug, Default, Deserialize)]
struct UserConfig {
    #[serde(default)]
    mv2tv: Mv2TvConfig,
}

impl Mv2TvConfig {
    /// Try to read user config from the file if it exists.
    /// Otherwise, fall back to default config.
    fn get_user_config() -> Self {
        tvsort::config::CONFIG_PATH
            .as_deref()
            .filter(|path| path.is_file())
            .and_then(|path| {
                fs::read_to_string(path)
                    .map_err(|e| {
                        print_error!("Error reading config file {}: {e}", path.display());
                    })
                    .ok()
            })
            .and_then(|config_string| {
                Self::from_toml_str(&config_string)
                    .map_err(|e| print_error!("{e}"))
                    .ok()
            })
            .unwrap_or_default()
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    /// Returns an error if the TOML string is invalid.
    fn from_toml_str(toml_str: &str) -> Result<Self> {
        toml::from_str::<UserConfig>(toml_str)
            .map(|config| config.mv2tv)
            .map_err(|e| anyhow::anyhow!("Failed to parse config: {e}"))
    }

    /// Combine with CLI arguments.
    /// Boolean flags are enabled if set in either, CLI filter values take precedence.
    fn merge(self, args: Args, source_dir: PathBuf, target_dir: PathBuf) -> TvMoveConfig {
        TvMoveConfig {
            source_dir,
            target_dir,
            resolution: args.resolution.or(self.resolution).filter(|value| !value.is_empty()),
            codec: args.codec.or(self.codec).filter(|value| !value.is_empty()),
            require_companion_subtitle: !(args.force || self.force),
            overwrite: !(args.no_override || self.no_override),
            remove_source: args.remove_source || self.remove_source,
            dryrun: args.print || self.dryrun,
            verbose: args.verbose || self.verbose,
            debug: args.debug || self.debug,
            log: args.log || self.log,
        }
    }
}

impl Config {
    /// Create config from given command line args and user config file.
    ///
    /// The source directory must exist, and the target directory must exist and be writable.
    pub fn from_args(args: Args) -> Result<Self> {
        let source = args.source_dir.clone().context("Source directory is required")?;
        let target = args.target_dir.clone().context("Target directory is required")?;

        let source_dir = tvsort::resolve_directory(&source, "Source directory")?;
        let target_dir = tvsort::resolve_directory(&target, "Target directory")?;
        tvsort::check_read_write_access(&target_dir)?;

        let user_config = Mv2TvConfig::get_user_config();
        Ok(Self(user_config.merge(args, source_dir, target_dir)))
    }

    pub fn into_inner(self) -> TvMoveConfig {
        self.0
    }
}

#[cfg(test)]
mod mv2tv_config_tests {
    use super::*;

    use clap::Parser;

    fn parse_args(extra: &[&str]) -> Args {
        let mut argv = vec!["mv2tv", "/downloads", "/tv"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).expect("should parse args")
    }

    fn merged(user_config: Mv2TvConfig, extra: &[&str]) -> TvMoveConfig {
        user_config.merge(parse_args(extra), PathBuf::from("/downloads"), PathBuf::from("/tv"))
    }

    #[test]
    fn from_toml_str_parses_empty_config() {
        let config = Mv2TvConfig::from_toml_str("").expect("should parse empty config");
        assert!(config.resolution.is_none());
        assert!(config.codec.is_none());
        assert!(!config.remove_source);
        assert!(!config.force);
        assert!(!config.no_override);
        assert!(!config.dryrun);
        assert!(!config.verbose);
        assert!(!config.log);
    }

    #[test]
    fn from_toml_str_parses_mv2tv_section() {
        let toml = r#"
[mv2tv]
resolution = "1080p"
codec = "x265"
remove_source = true
force = true
no_override = true
dryrun = true
verbose = true
debug = true
log = true
"#;
        let config = Mv2TvConfig::from_toml_str(toml).expect("should parse config");
        assert_eq!(config.resolution.as_deref(), Some("1080p"));
        assert_eq!(config.codec.as_deref(), Some("x265"));
        assert!(config.remove_source);
        assert!(config.force);
        assert!(config.no_override);
        assert!(config.dryrun);
        assert!(config.verbose);
        assert!(config.debug);
        assert!(config.log);
    }

    #[test]
    fn from_toml_str_invalid_toml_returns_error() {
        let result = Mv2TvConfig::from_toml_str("this is not valid toml {{{");
        assert!(result.is_err());
    }

    #[test]
    fn from_toml_str_ignores_other_sections() {
        let toml = r"
[dirmove]
verbose = false

[mv2tv]
verbose = true
";
        let config = Mv2TvConfig::from_toml_str(toml).expect("should parse config");
        assert!(config.verbose);
        assert!(!config.force);
    }

    #[test]
    fn defaults_require_companion_and_overwrite() {
        let config = merged(Mv2TvConfig::default(), &[]);
        assert!(config.require_companion_subtitle);
        assert!(config.overwrite);
        assert!(!config.remove_source);
        assert!(!config.dryrun);
        assert!(config.resolution.is_none());
        assert!(config.codec.is_none());
    }

    #[test]
    fn cli_flags_enable_options() {
        let config = merged(Mv2TvConfig::default(), &["-f", "-n", "-r", "-p", "-v"]);
        assert!(!config.require_companion_subtitle);
        assert!(!config.overwrite);
        assert!(config.remove_source);
        assert!(config.dryrun);
        assert!(config.verbose);
    }

    #[test]
    fn user_config_flags_enable_options() {
        let user_config = Mv2TvConfig {
            force: true,
            remove_source: true,
            ..Default::default()
        };
        let config = merged(user_config, &[]);
        assert!(!config.require_companion_subtitle);
        assert!(config.remove_source);
    }

    #[test]
    fn cli_filter_overrides_user_config() {
        let user_config = Mv2TvConfig {
            resolution: Some("720p".to_string()),
            codec: Some("x264".to_string()),
            ..Default::default()
        };
        let config = merged(user_config, &["--resolution", "1080p"]);
        assert_eq!(config.resolution.as_deref(), Some("1080p"));
        assert_eq!(config.codec.as_deref(), Some("x264"));
    }

    #[test]
    fn empty_filter_means_no_filter() {
        let user_config = Mv2TvConfig {
            codec: Some(String::new()),
            ..Default::default()
        };
        let config = merged(user_config, &[]);
        assert!(config.codec.is_none());
    }
}
