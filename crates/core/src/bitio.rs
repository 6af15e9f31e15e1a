//! Bit-level adapters over byte-oriented streams.
//!
//! `BitWriter` and `BitReader` wrap any `std::io::Write` / `std::io::Read`
//! and expose single-bit operations. Both operate in MSB-first (most
//! significant bit first) order: the first bit written lands in bit 7 of the
//! first byte.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with trailing zeros
//! - BitReader: cannot tell padding from data (callers must know where the
//!   meaningful bits end)
//!
//! Neither adapter buffers more than one byte. Wrap files in
//! `BufReader`/`BufWriter` for throughput.
//!
//! # Example
//! ```
//! use huffzip_core::bitio::{BitReader, BitWriter};
//!
//! let mut bytes = Vec::new();
//! let mut writer = BitWriter::new(&mut bytes);
//! writer.write_bits(0b101, 3).unwrap(); // Write 3 bits: 1, 0, 1
//! writer.write_bits(0b11, 2).unwrap(); // Write 2 bits: 1, 1
//! writer.finish().unwrap(); // 10111 -> padded to 10111000
//! assert_eq!(bytes, vec![0b1011_1000]);
//!
//! let mut reader = BitReader::new(bytes.as_slice());
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! ```

use std::io::{ErrorKind, Read, Write};

use crate::error::{BitIoError, Result};

/// Writes bits MSB-first into a byte sink.
///
/// Accumulates bits in a one-byte buffer and emits each completed byte to
/// the sink. `finish` pads and emits the final partial byte; dropping an
/// unfinished writer does the same on a best-effort basis.
///
/// # Invariants
/// - `bit_count` is always < 8 between calls
/// - unused low bits of `bit_buffer` are zero
#[derive(Debug)]
pub struct BitWriter<W: Write> {
    /// Byte sink
    inner: W,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
    /// Total bits accepted so far
    bits_written: u64,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter over the given sink.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            bit_buffer: 0,
            bit_count: 0,
            bits_written: 0,
        }
    }

    /// Append a single bit.
    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;
        self.bits_written += 1;

        if self.bit_count == 8 {
            self.emit()?;
        }
        Ok(())
    }

    /// Write up to 64 bits.
    ///
    /// Bits are written MSB-first. For example, writing value=0b101 with
    /// count=3 writes bits 1, 0, 1 in that order.
    ///
    /// # Errors
    /// Returns `BitIoError::InvalidBitCount` if count > 64.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut remaining = count;
        while remaining > 0 {
            // How many bits fit in the current byte?
            let bits_to_write = remaining.min(8 - self.bit_count as usize);

            // Extract the top bits_to_write bits of what is left
            let shift = remaining - bits_to_write;
            let bits = ((value >> shift) & ((1u64 << bits_to_write) - 1)) as u8;

            self.bit_buffer |= bits << (8 - self.bit_count as usize - bits_to_write);
            self.bit_count += bits_to_write as u8;
            self.bits_written += bits_to_write as u64;

            if self.bit_count == 8 {
                self.emit()?;
            }
            remaining -= bits_to_write;
        }

        Ok(())
    }

    /// Write a whole byte, most significant bit first.
    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.write_bits(u64::from(byte), 8)
    }

    /// Total number of bits written, including the pending partial byte.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Number of bits waiting in the partial byte.
    pub fn pending_bits(&self) -> u8 {
        self.bit_count
    }

    /// Emit the zero-padded partial byte (if any) and flush the sink.
    ///
    /// This consumes the writer.
    pub fn finish(mut self) -> Result<()> {
        if self.bit_count > 0 {
            self.emit()?;
        }
        self.inner.flush()?;
        Ok(())
    }

    fn emit(&mut self) -> Result<()> {
        let byte = self.bit_buffer;
        self.bit_buffer = 0;
        self.bit_count = 0;
        self.inner.write_all(&[byte])?;
        Ok(())
    }
}

impl<W: Write> Drop for BitWriter<W> {
    fn drop(&mut self) {
        // Errors cannot be reported from drop; `finish` is the checked path.
        if self.bit_count > 0 {
            let _ = self.emit();
        }
        let _ = self.inner.flush();
    }
}

/// Reads bits MSB-first from a byte source.
///
/// `read_bit` reports end-of-stream as `Ok(None)`; the multi-bit reads treat
/// it as `BitIoError::UnexpectedEof`. Padding bits at the end of the source
/// are returned like any other bits.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Byte source
    inner: R,
    /// Current byte being consumed
    bit_buffer: u8,
    /// Unread bits left in bit_buffer (0-8)
    bits_left: u8,
    /// Total bits consumed so far
    bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new BitReader over the given source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bit_buffer: 0,
            bits_left: 0,
            bits_read: 0,
        }
    }

    /// Read a single bit, or `None` once the source is exhausted.
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.bits_left == 0 {
            match self.next_byte()? {
                Some(byte) => {
                    self.bit_buffer = byte;
                    self.bits_left = 8;
                }
                None => return Ok(None),
            }
        }

        self.bits_left -= 1;
        self.bits_read += 1;
        Ok(Some((self.bit_buffer >> self.bits_left) & 1 == 1))
    }

    /// Read up to 64 bits.
    ///
    /// Bits are read MSB-first. For example, reading 3 bits from byte
    /// 0b10110000 returns 0b101.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if count > 64
    /// - `BitIoError::UnexpectedEof` if the source ends first
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }

        let mut result = 0u64;
        for _ in 0..count {
            let bit = self.read_bit()?.ok_or(BitIoError::UnexpectedEof)?;
            result = (result << 1) | u64::from(bit);
        }
        Ok(result)
    }

    /// Read a whole byte, most significant bit first.
    pub fn read_byte(&mut self) -> Result<u8> {
        Ok(self.read_bits(8)? as u8)
    }

    /// Total number of bits consumed.
    pub fn bits_read(&self) -> u64 {
        self.bits_read
    }

    /// Unread bits left in the current byte.
    pub fn buffered_bits(&self) -> u8 {
        self.bits_left
    }

    /// Give back the underlying source, positioned after the last byte read.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.inner.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }
}
