mod config;

use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;

use tvsort::tv_move::{ConsoleReporter, FileLogger, TvMove};
use tvsort::{print_bold, print_warning};

use crate::config::Config;

#[derive(Parser)]
#[command(
    author,
    version,
    name = env!("CARGO_BIN_NAME"),
    about = "Move TV episodes into Show/Season directories based on file name"
)]
pub(crate) struct Args {
    /// Directory to search for episode files
    #[arg(value_hint = clap::ValueHint::DirPath, required_unless_present = "completion")]
    source_dir: Option<PathBuf>,

    /// Base directory for the Show/Season layout
    #[arg(value_hint = clap::ValueHint::DirPath, required_unless_present = "completion")]
    target_dir: Option<PathBuf>,

    /// Only move files with this resolution, for example 1080p
    #[arg(long, value_name = "RESOLUTION")]
    resolution: Option<String>,

    /// Only move files with this codec, for example x265
    #[arg(long, value_name = "CODEC")]
    codec: Option<String>,

    /// Remove source directories that only contain leftovers after moving
    #[arg(short, long)]
    remove_source: bool,

    /// Move videos even without a companion .ai.srt subtitle
    #[arg(short, long)]
    force: bool,

    /// Do not overwrite existing files in the target directory
    #[arg(short, long)]
    no_override: bool,

    /// Only print changes without moving files
    #[arg(short, long)]
    print: bool,

    /// Print debug information
    #[arg(short = 'D', long)]
    debug: bool,

    /// Write a log file to ~/logs/tvsort
    #[arg(short = 'L', long)]
    log: bool,

    /// Generate shell completion
    #[arg(short = 'l', long, value_name = "SHELL")]
    completion: Option<Shell>,

    /// Print verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if let Some(ref shell) = args.completion {
        return tvsort::generate_shell_completion(*shell, Args::command(), true, env!("CARGO_BIN_NAME"));
    }

    let config = Config::from_args(args)?.into_inner();
    if config.debug {
        eprintln!("{config}");
    }

    let logger = if config.log {
        match FileLogger::new() {
            Ok(mut logger) => {
                logger.log_init(&config);
                if config.verbose {
                    println!("Logging to {}", logger.path().display());
                }
                Some(logger)
            }
            Err(error) => {
                print_warning!("Failed to create log file: {error}");
                None
            }
        }
    } else {
        None
    };

    let mut reporter = ConsoleReporter::new(
        config.source_dir.clone(),
        config.target_dir.clone(),
        config.verbose,
        logger,
    );

    let dryrun = config.dryrun;
    let summary = TvMove::new(config).run(&mut reporter);

    println!();
    if dryrun {
        print_bold!("Dry run finished");
    } else {
        print_bold!("Finished");
    }
    println!("{summary}");

    Ok(())
}
