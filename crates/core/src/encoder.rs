//! Payload encoding: bytes to concatenated codes.

use std::io::Write;

use crate::bitio::BitWriter;
use crate::codebook::CodeMap;
use crate::error::{HuffmanError, Result};

/// Write the code of every byte of `data`, in order.
///
/// Returns the number of payload bits written. The caller finishes the
/// writer afterwards so the trailing partial byte is emitted.
///
/// # Errors
/// `HuffmanError::MissingCode` if a byte has no code, which cannot happen
/// when `codes` was built from `data` itself.
pub fn encode<W: Write>(data: &[u8], codes: &CodeMap, writer: &mut BitWriter<W>) -> Result<u64> {
    let start = writer.bits_written();
    for &byte in data {
        let code = codes.get(byte).ok_or(HuffmanError::MissingCode { byte })?;
        for &bit in code.bits() {
            writer.write_bit(bit)?;
        }
    }

    let bits = writer.bits_written() - start;
    log::debug!("encoded {} bytes into {} payload bits", data.len(), bits);
    Ok(bits)
}
