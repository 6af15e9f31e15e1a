//! Metrics for a single compress or decompress run.
//!
//! Metrics are filled in by the codec as each stage completes and returned
//! to the caller; nothing here is shared between runs.

use std::fmt;
use std::time::{Duration, Instant};

use crate::codec::Format;

/// Which direction a run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Compress => f.write_str("compress"),
            Operation::Decompress => f.write_str("decompress"),
        }
    }
}

/// Sizes and timing of one codec run.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub operation: Operation,
    pub format: Format,

    // === Timing ===
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    // === Sizes ===
    /// Uncompressed size in bytes
    pub raw_bytes: u64,

    /// Compressed size in bytes, including any frame prefix
    pub compressed_bytes: u64,

    // === Model ===
    /// Distinct byte values (leaves of the tree)
    pub distinct_symbols: usize,

    /// Bits taken by the serialized tree
    pub header_bits: u64,

    /// Bits taken by the encoded data, excluding padding
    pub payload_bits: u64,
}

impl Metrics {
    /// Create new metrics with start time set to now.
    pub fn new(operation: Operation, format: Format) -> Self {
        Self {
            operation,
            format,
            start_time: Instant::now(),
            end_time: None,
            raw_bytes: 0,
            compressed_bytes: 0,
            distinct_symbols: 0,
            header_bits: 0,
            payload_bits: 0,
        }
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Get total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Compute compression ratio (compressed / raw).
    ///
    /// Returns 0.0 if no data was processed.
    pub fn compression_ratio(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.compressed_bytes as f64 / self.raw_bytes as f64
        }
    }

    /// Average code length in bits.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.raw_bytes == 0 {
            0.0
        } else {
            self.payload_bits as f64 / self.raw_bytes as f64
        }
    }

    /// Header plus payload bits, without frame prefix or padding.
    pub fn stream_bits(&self) -> u64 {
        self.header_bits + self.payload_bits
    }

    /// Compute throughput in uncompressed bytes/second.
    pub fn throughput_bps(&self) -> f64 {
        let duration_secs = self.duration().as_secs_f64();
        if duration_secs == 0.0 {
            0.0
        } else {
            self.raw_bytes as f64 / duration_secs
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== {} Summary ({}) ===", capitalized(self.operation), self.format);
        println!("Duration: {} ms", self.duration().as_millis());
        println!();
        println!("Raw:        {} bytes", self.raw_bytes);
        println!("Compressed: {} bytes", self.compressed_bytes);
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!();
        println!("=== Model ===");
        println!("Distinct symbols: {}", self.distinct_symbols);
        println!("Header bits: {}", self.header_bits);
        println!("Payload bits: {}", self.payload_bits);
        println!("Bits per symbol: {:.3}", self.bits_per_symbol());
        println!();
        println!("=== Performance ===");
        println!("Throughput: {:.2} MB/s", self.throughput_bps() / 1_000_000.0);
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "operation={}\n\
             format={}\n\
             duration_ms={}\n\
             raw_bytes={}\n\
             compressed_bytes={}\n\
             compression_ratio={:.4}\n\
             distinct_symbols={}\n\
             header_bits={}\n\
             payload_bits={}\n",
            self.operation,
            self.format,
            self.duration().as_millis(),
            self.raw_bytes,
            self.compressed_bytes,
            self.compression_ratio(),
            self.distinct_symbols,
            self.header_bits,
            self.payload_bits,
        )
    }
}

fn capitalized(operation: Operation) -> &'static str {
    match operation {
        Operation::Compress => "Compression",
        Operation::Decompress => "Decompression",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new(Operation::Compress, Format::Framed);
        assert!(metrics.end_time.is_none());
        assert!(metrics.duration().as_millis() < 100); // Should be recent
    }

    #[test]
    fn test_compression_ratio() {
        let mut metrics = Metrics::new(Operation::Compress, Format::Bare);
        assert_eq!(metrics.compression_ratio(), 0.0);

        metrics.raw_bytes = 1000;
        metrics.compressed_bytes = 750;
        assert_eq!(metrics.compression_ratio(), 0.75);
    }

    #[test]
    fn test_bits_per_symbol() {
        let mut metrics = Metrics::new(Operation::Decompress, Format::Framed);
        metrics.raw_bytes = 6;
        metrics.header_bits = 29;
        metrics.payload_bits = 9;
        assert_eq!(metrics.bits_per_symbol(), 1.5);
        assert_eq!(metrics.stream_bits(), 38);
    }

    #[test]
    fn test_throughput() {
        let mut metrics = Metrics::new(Operation::Compress, Format::Framed);
        metrics.raw_bytes = 1_000_000;

        std::thread::sleep(Duration::from_millis(10));
        metrics.complete();

        assert!(metrics.throughput_bps() > 0.0);
    }

    #[test]
    fn test_export_text() {
        let mut metrics = Metrics::new(Operation::Compress, Format::Framed);
        metrics.raw_bytes = 1000;
        metrics.compressed_bytes = 600;
        metrics.distinct_symbols = 10;

        let text = metrics.export_text();
        assert!(text.contains("operation=compress"));
        assert!(text.contains("format=framed"));
        assert!(text.contains("raw_bytes=1000"));
        assert!(text.contains("compressed_bytes=600"));
        assert!(text.contains("distinct_symbols=10"));
    }
}
