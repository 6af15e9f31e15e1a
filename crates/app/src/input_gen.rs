//! Sample input generation for the `sample` command.
//!
//! Samples are built from segments with very different byte statistics so a
//! single file exercises both skewed and near-uniform code tables:
//! - runs of one byte (one or two dominant symbols)
//! - text over a small alphabet
//! - a short repeating motif
//! - uniform random bytes (256 symbols, little to gain)

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest single segment.
const MAX_SEGMENT: usize = 4096;

const TEXT_ALPHABET: &[u8] = b"etaoinshrdlu etaoin cmfwyp .,\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Run,
    Text,
    Motif,
    Noise,
}

impl Segment {
    /// Weighted pick: runs and text are more common than noise.
    fn pick(rng: &mut ChaCha8Rng) -> Self {
        match rng.gen_range(0..10u8) {
            0..=2 => Segment::Run,
            3..=6 => Segment::Text,
            7..=8 => Segment::Motif,
            _ => Segment::Noise,
        }
    }

    fn fill(self, rng: &mut ChaCha8Rng, len: usize, out: &mut Vec<u8>) {
        match self {
            Segment::Run => {
                let byte: u8 = rng.gen();
                out.resize(out.len() + len, byte);
            }
            Segment::Text => {
                let alphabet = TEXT_ALPHABET;
                out.extend((0..len).map(|_| alphabet[rng.gen_range(0..alphabet.len())]));
            }
            Segment::Motif => {
                let motif: Vec<u8> = (0..rng.gen_range(3..=24)).map(|_| rng.gen()).collect();
                out.extend(motif.iter().copied().cycle().take(len));
            }
            Segment::Noise => {
                out.extend((0..len).map(|_| rng.gen::<u8>()));
            }
        }
    }
}

/// Generate `size_bytes` of sample data, fully determined by `seed`.
pub fn generate_sample_data(seed: u64, size_bytes: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(size_bytes);

    while data.len() < size_bytes {
        let remaining = size_bytes - data.len();
        let len = rng.gen_range(1..=MAX_SEGMENT).min(remaining);
        let segment = Segment::pick(&mut rng);
        segment.fill(&mut rng, len, &mut data);
        log::trace!("sample segment {segment:?} of {len} bytes");
    }

    data
}

/// Write a generated sample to `path`.
pub fn write_sample_file(path: &Path, seed: u64, size_bytes: usize) -> io::Result<()> {
    let data = generate_sample_data(seed, size_bytes);
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&data)?;
    writer.flush()?;
    log::info!("wrote {} sample bytes to {} (seed {seed})", data.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use huffzip_core::{compress_bytes, decompress_bytes, Format};

    #[test]
    fn test_exact_sizes() {
        for size in [0, 1, 100, 4096, 4097, 100_000] {
            assert_eq!(generate_sample_data(999, size).len(), size);
        }
    }

    #[test]
    fn test_determinism() {
        assert_eq!(generate_sample_data(12345, 20_000), generate_sample_data(12345, 20_000));
    }

    #[test]
    fn test_different_seeds() {
        assert_ne!(generate_sample_data(1, 1000), generate_sample_data(2, 1000));
    }

    #[test]
    fn test_sample_compresses() {
        let data = generate_sample_data(7, 64 * 1024);
        let packed = compress_bytes(&data, Format::Framed).unwrap();
        assert!(packed.len() < data.len());
        assert_eq!(decompress_bytes(&packed, Format::Framed).unwrap(), data);
    }

    #[test]
    fn test_write_sample_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sample.bin");
        write_sample_file(&path, 3, 5000).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), generate_sample_data(3, 5000));
    }
}
