//! dupescan - duplicate file finder
//!
//! Finds files with identical content beneath one or more directories.
//! Files are first grouped by size; only sizes shared by two or more files
//! are read, and those files are grouped by their CRC-32 checksum.
//!
//! # Library usage
//!
//! ```no_run
//! use dupescan::duplicates::{build_size_index, find_duplicates};
//! use dupescan::scanner::WalkerConfig;
//!
//! let (index, _warnings) = build_size_index(&["/data"], &WalkerConfig::default()).unwrap();
//! for group in find_duplicates(&index).0 {
//!     println!("{} bytes: {:?}", group.size, group.files);
//! }
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::{Cli, Commands, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::Progress;
use crate::scanner::WalkerConfig;

/// Run the application for parsed command-line arguments.
///
/// Returns the exit code for a completed run. Fatal problems are returned
/// as errors; use [`ExitCode::for_error`] to map them.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, a root is unusable,
/// the scan is interrupted or fails in strict mode, or output cannot be
/// written.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let config = match cli.config {
        Some(ref path) => {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            Config::load_from(Some(path))?
        }
        None => Config::load(),
    };
    log::debug!("Effective configuration: {:?}", config);

    match cli.command {
        Commands::Scan(ref args) => run_scan(&cli, args, &config),
    }
}

fn run_scan(cli: &Cli, args: &ScanArgs, config: &Config) -> Result<ExitCode> {
    let handler = signal::install_handler().context("Failed to install Ctrl+C handler")?;

    let mut ignore_patterns = config.ignore_patterns.clone();
    ignore_patterns.extend(args.ignore_patterns.iter().cloned());

    let walker_config = WalkerConfig {
        skip_hidden: args.skip_hidden || config.skip_hidden,
        skip_empty: args.skip_empty || config.skip_empty,
        min_size: args.min_size,
        max_size: args.max_size,
        ignore_patterns,
    };

    let block_size = match args.block_size {
        Some(size) => usize::try_from(size).context("Block size too large")?,
        None => config.block_size,
    };

    let mut finder_config = FinderConfig::default()
        .with_walker_config(walker_config)
        .with_io_threads(args.io_threads.unwrap_or(config.io_threads))
        .with_block_size(block_size)
        .with_strict(args.strict || config.strict)
        .with_verify(args.verify || config.verify)
        .with_shutdown_flag(handler.get_flag());

    let show_progress =
        args.output == OutputFormat::Text && !cli.quiet && std::io::stderr().is_terminal();
    if show_progress {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let finder = DuplicateFinder::new(finder_config);
    let (groups, summary) = finder.find_duplicates_in_paths(args.paths.clone())?;

    if summary.issue_count() > 0 {
        log::warn!(
            "Completed with {} warnings; affected paths were skipped",
            summary.issue_count()
        );
    }

    let stdout = std::io::stdout();
    let color = !cli.no_color && stdout.is_terminal();
    let mut out = stdout.lock();

    match args.output {
        OutputFormat::Text => {
            TextOutput::new(&groups, &summary)
                .with_color(color)
                .with_timings(args.timings || config.show_timings)
                .with_summary(!cli.quiet)
                .write_to(&mut out)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&groups, &summary, ExitCode::Success)
                .write_to(&mut out, true)
                .context("Failed to write JSON report")?;
        }
        OutputFormat::Csv => {
            CsvOutput::new(&groups)
                .write_to(&mut out)
                .context("Failed to write CSV report")?;
        }
    }
    out.flush().context("Failed to flush output")?;

    Ok(ExitCode::Success)
}
