//! Huffman compression and decompression
//!
//! Every packed stream ends with the code for [`Symbol::EndOfStream`], which
//! is the only end-of-data signal; no length field is stored.

use crate::bits::{BitPacker, BitUnpacker};
use crate::code_table::{Code, CodeTable};
use crate::error::CodecError;
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use crate::tree::HuffmanTree;
use tracing::{debug, warn};

/// Result of a compression run.
#[derive(Debug, Clone)]
pub struct Encoded {
    pub code_table: CodeTable,
    pub frequencies: FrequencyTable,
    pub data: Vec<u8>,
    /// Meaningful bits in `data`, end-of-stream code included.
    pub bit_count: usize,
}

/// Build the code table a frequency table yields.
pub fn code_table_for(frequencies: &FrequencyTable) -> Result<CodeTable, CodecError> {
    let tree = HuffmanTree::build(frequencies)?;
    Ok(CodeTable::from_tree(&tree))
}

/// Compress data using Huffman coding, returning the table and packed bytes.
pub fn compress(data: &[u8]) -> Result<(CodeTable, Vec<u8>), CodecError> {
    let encoded = compress_with_frequencies(data)?;
    Ok((encoded.code_table, encoded.data))
}

/// Like [`compress`], but also hands back the histogram and bit count.
pub fn compress_with_frequencies(data: &[u8]) -> Result<Encoded, CodecError> {
    let frequencies = FrequencyTable::from_bytes(data);
    let code_table = code_table_for(&frequencies)?;

    // byte -> code
    let mut by_byte: Vec<Option<&Code>> = vec![None; 256];
    for (symbol, code) in code_table.iter() {
        if let Symbol::Byte(b) = symbol {
            by_byte[b as usize] = Some(code);
        }
    }
    let end = code_table
        .get(Symbol::EndOfStream)
        .ok_or_else(|| CodecError::InvalidCodeTable("missing end-of-stream entry".into()))?;

    let mut packer = BitPacker::with_capacity(data.len() / 2 + 1);
    for &b in data {
        let code = by_byte[b as usize].ok_or_else(|| {
            CodecError::InvalidCodeTable(format!("no code for byte 0x{b:02X}"))
        })?;
        packer.push_code(code)?;
    }
    packer.push_code(end)?;

    let bit_count = packer.bit_count();
    let packed = packer.finish()?;
    debug!(
        input = data.len(),
        symbols = code_table.len(),
        bits = bit_count,
        packed = packed.len(),
        "compressed"
    );

    Ok(Encoded {
        code_table,
        frequencies,
        data: packed,
        bit_count,
    })
}

/// Decompress Huffman-encoded data with the table it was produced with.
pub fn decompress(code_table: &CodeTable, packed: &[u8]) -> Result<Vec<u8>, CodecError> {
    let lookup = code_table.inverse();
    let max_len = code_table.max_code_len();
    let unpacker = BitUnpacker::new(packed);

    let mut output = Vec::with_capacity(packed.len() * 2);
    let mut candidate = Code::new();
    let mut start = 0;

    for (offset, bit) in unpacker.bits().enumerate() {
        candidate.push(bit);
        match lookup.get(&candidate) {
            Some(Symbol::EndOfStream) => {
                debug!(bits = offset + 1, output = output.len(), "decompressed");
                return Ok(output);
            }
            Some(&Symbol::Byte(b)) => {
                output.push(b);
                candidate.clear();
                start = offset + 1;
            }
            None if candidate.len() >= max_len => {
                warn!(bit_offset = start, "no code matches the stream");
                return Err(CodecError::UnmatchedCode { bit_offset: start });
            }
            None => {}
        }
    }

    warn!(bits = unpacker.len(), "stream ended before end-of-stream code");
    Err(CodecError::TruncatedStream {
        bits_read: unpacker.len(),
    })
}
