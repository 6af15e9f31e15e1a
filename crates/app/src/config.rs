//! Command-line parsing and resolved configuration.
//!
//! Arguments are parsed with clap and then resolved into a `Config`: default
//! output paths are derived from the input, `--bare` becomes a `Format`, and a
//! missing sample seed is taken from the clock. The resolved values can be
//! printed with `--print-config` so any run can be repeated exactly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand};
use huffzip_core::Format;
use log::LevelFilter;

/// Suffix appended to compressed files.
pub const COMPRESSED_SUFFIX: &str = "huf";

/// Default size of generated sample files (64 KiB).
pub const DEFAULT_SAMPLE_BYTES: usize = 64 * 1024;

#[derive(Debug, Parser)]
#[command(
    name = "huffzip",
    version,
    about = "Lossless file compression with Huffman prefix codes"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the resolved configuration before running
    #[arg(long, global = true)]
    pub print_config: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compress a file
    Compress(CodecArgs),

    /// Decompress a file produced by `compress`
    Decompress(CodecArgs),

    /// Show the header and code table of a compressed file
    Inspect {
        /// Compressed file
        input: PathBuf,

        /// File has no frame prefix (written with --bare)
        #[arg(long)]
        bare: bool,
    },

    /// Generate a sample input with mixed compressibility
    Sample {
        /// Where to write the sample
        output: PathBuf,

        /// Random seed (default: derived from the clock)
        #[arg(long)]
        seed: Option<u64>,

        /// Sample size in bytes
        #[arg(long, default_value_t = DEFAULT_SAMPLE_BYTES)]
        size: usize,
    },
}

#[derive(Debug, Args)]
pub struct CodecArgs {
    /// Input file
    pub input: PathBuf,

    /// Output file (default: derived from the input name)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the bare bitstream without length or checksum prefix
    #[arg(long)]
    pub bare: bool,

    /// Print a metrics summary when done
    #[arg(long)]
    pub stats: bool,
}

/// Work to perform, with every default resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Compress {
        input: PathBuf,
        output: PathBuf,
        format: Format,
        print_stats: bool,
    },
    Decompress {
        input: PathBuf,
        output: PathBuf,
        format: Format,
        print_stats: bool,
    },
    Inspect {
        input: PathBuf,
        format: Format,
    },
    Sample {
        output: PathBuf,
        seed: u64,
        size_bytes: usize,
    },
}

/// Complete configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    pub task: Task,

    /// Number of -v flags
    pub verbosity: u8,

    /// Whether to print the resolved configuration
    pub print_config: bool,
}

impl Config {
    /// Parse configuration from command-line arguments (including argv[0]).
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::from_cli(Cli::try_parse_from(args)?))
    }

    /// Resolve parsed arguments.
    pub fn from_cli(cli: Cli) -> Self {
        let task = match cli.command {
            Command::Compress(args) => Task::Compress {
                output: args
                    .output
                    .unwrap_or_else(|| default_compressed_path(&args.input)),
                input: args.input,
                format: format_for(args.bare),
                print_stats: args.stats,
            },
            Command::Decompress(args) => Task::Decompress {
                output: args
                    .output
                    .unwrap_or_else(|| default_decompressed_path(&args.input)),
                input: args.input,
                format: format_for(args.bare),
                print_stats: args.stats,
            },
            Command::Inspect { input, bare } => Task::Inspect {
                input,
                format: format_for(bare),
            },
            Command::Sample { output, seed, size } => Task::Sample {
                output,
                seed: seed.unwrap_or_else(clock_seed),
                size_bytes: size,
            },
        };

        Self {
            task,
            verbosity: cli.verbose,
            print_config: cli.print_config,
        }
    }

    /// Log level implied by the -v count.
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        println!("=== Configuration ===");
        match &self.task {
            Task::Compress {
                input,
                output,
                format,
                print_stats,
            }
            | Task::Decompress {
                input,
                output,
                format,
                print_stats,
            } => {
                let operation = if matches!(self.task, Task::Compress { .. }) {
                    "compress"
                } else {
                    "decompress"
                };
                println!("Operation:   {operation}");
                println!("Input file:  {}", input.display());
                println!("Output file: {}", output.display());
                println!("Format:      {format}");
                println!("Stats:       {print_stats}");
            }
            Task::Inspect { input, format } => {
                println!("Operation:   inspect");
                println!("Input file:  {}", input.display());
                println!("Format:      {format}");
            }
            Task::Sample {
                output,
                seed,
                size_bytes,
            } => {
                println!("Operation:   sample");
                println!("Output file: {}", output.display());
                println!("Seed:        {seed}");
                println!("Size:        {size_bytes} bytes");
            }
        }
        println!("Log level:   {}", self.log_level());
        println!();
    }
}

fn format_for(bare: bool) -> Format {
    if bare {
        Format::Bare
    } else {
        Format::Framed
    }
}

/// `data.txt` -> `data.txt.huf`
fn default_compressed_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(".");
    name.push(COMPRESSED_SUFFIX);
    PathBuf::from(name)
}

/// `data.txt.huf` -> `data.txt`, anything else -> `<input>.out`
fn default_decompressed_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == COMPRESSED_SUFFIX) {
        input.with_extension("")
    } else {
        let mut name = input.as_os_str().to_owned();
        name.push(".out");
        PathBuf::from(name)
    }
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}
