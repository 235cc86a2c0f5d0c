//! Read a directory into memory, then recreate it somewhere else.
//!
//! ```text
//! RUST_LOG=debug cargo run -p bitgrab_io_fs --example basic_usage -- dir_to_copy dir_copy
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use bitgrab_io_fs::{DirectoryRecord, EnumReadPatternMode, SpecReadOptions, show_config};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ArgPatternMode {
    Glob,
    Regex,
    Literal,
}

impl From<ArgPatternMode> for EnumReadPatternMode {
    fn from(value: ArgPatternMode) -> Self {
        match value {
            ArgPatternMode::Glob => Self::Glob,
            ArgPatternMode::Regex => Self::Regex,
            ArgPatternMode::Literal => Self::Literal,
        }
    }
}

#[derive(Debug, Parser)]
#[command(about = "Snapshot a directory tree and replicate it under a new root")]
struct Args {
    /// Directory to read.
    source: PathBuf,
    /// Directory to recreate the tree under.
    destination: PathBuf,
    /// Skip files whose root-relative path matches this pattern.
    #[arg(long = "ignore", value_name = "PATTERN")]
    patterns_ignore: Vec<String>,
    /// How `--ignore` patterns are interpreted.
    #[arg(long, value_enum, default_value_t = ArgPatternMode::Glob)]
    pattern_mode: ArgPatternMode,
    /// Worker threads for reading file contents.
    #[arg(long)]
    workers: Option<usize>,
    /// Print version information first.
    #[arg(long)]
    show_config: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if args.show_config {
        show_config();
    }

    let spec_read_options = SpecReadOptions {
        patterns_ignore: Some(args.patterns_ignore),
        rule_pattern: args.pattern_mode.into(),
        num_workers_max: args.workers,
        ..SpecReadOptions::default()
    };

    let record = match DirectoryRecord::read_with_options(&args.source, &spec_read_options) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    println!("{}", record.report());

    if let Err(e) = record.copy_to(&args.destination) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    println!(
        "[COPY] files={} dirs={} -> {}",
        record.files().len(),
        record.subdirectory_paths().len(),
        args.destination.display()
    );
    ExitCode::SUCCESS
}
