//! huffzip: compress and decompress files with Huffman prefix codes.

mod config;
mod input_gen;

use std::fs::File;
use std::io::BufReader;

use anyhow::Context;
use huffzip_core::Metrics;

use config::{Config, Task};

fn main() -> anyhow::Result<()> {
    let config = Config::from_args(std::env::args_os()).unwrap_or_else(|err| err.exit());

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();

    if config.print_config {
        config.print();
    }

    run(&config)
}

fn run(config: &Config) -> anyhow::Result<()> {
    match &config.task {
        Task::Compress {
            input,
            output,
            format,
            print_stats,
        } => {
            let metrics = huffzip_core::compress_file(input, output, *format).with_context(|| {
                format!("compressing {} into {}", input.display(), output.display())
            })?;
            report(&metrics, *print_stats);
        }
        Task::Decompress {
            input,
            output,
            format,
            print_stats,
        } => {
            let metrics = huffzip_core::decompress_file(input, output, *format).with_context(|| {
                format!("decompressing {} into {}", input.display(), output.display())
            })?;
            report(&metrics, *print_stats);
        }
        Task::Inspect { input, format } => {
            let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
            let inspection = huffzip_core::inspect(BufReader::new(file), *format)
                .with_context(|| format!("inspecting {}", input.display()))?;
            print!("{inspection}");
        }
        Task::Sample {
            output,
            seed,
            size_bytes,
        } => {
            input_gen::write_sample_file(output, *seed, *size_bytes)
                .with_context(|| format!("writing sample to {}", output.display()))?;
            println!("{}: {size_bytes} bytes (seed {seed})", output.display());
        }
    }
    Ok(())
}

fn report(metrics: &Metrics, print_stats: bool) {
    log::info!(
        "{}: {} -> {} bytes in {} ms",
        metrics.operation,
        metrics.raw_bytes,
        metrics.compressed_bytes,
        metrics.duration().as_millis()
    );
    if print_stats {
        metrics.print_summary();
    }
}
