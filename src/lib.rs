//! huffpack: Huffman coding compressor with an explicit end-of-stream symbol.
//!
//! Pipeline:
//! - Count byte frequencies
//! - Build the minimum-weight tree from a priority queue
//! - Assign prefix-free codes by walking the tree
//! - Pack the code stream MSB-first, terminated by the end-of-stream code
//!
//! Decompression needs only the code table and the packed bytes.

pub mod bits;
pub mod code_table;
pub mod config;
pub mod entropy;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod stats;
pub mod symbol;
pub mod tree;

pub use crate::code_table::{Code, CodeTable};
pub use crate::huffman::{compress, decompress};
pub use crate::symbol::Symbol;

use crate::config::CodecConfig;
use crate::error::CodecError;
use crate::frequency::FrequencyTable;

/// Compressed output container
///
/// Held in memory only. To persist a run, write `data` as-is and the table
/// through [`stats::StatsTable`], which reloads it as a validated
/// [`CodeTable`].
#[derive(Debug, Clone)]
pub struct CompressedOutput {
    pub code_table: CodeTable,
    pub frequencies: FrequencyTable,
    pub original_size: usize,
    pub compressed_size: usize,
    pub bit_count: usize,
    pub data: Vec<u8>,
    pub ratio: f64,
    pub metadata: CompressionMetadata,
}

/// Metadata about the compression process
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressionMetadata {
    pub entropy_bits: f64,
    pub average_code_length: f64,
    pub symbol_count: usize,
}

/// The main compressor engine
#[derive(Debug, Clone, Default)]
pub struct Compressor {
    config: CodecConfig,
}

impl Compressor {
    /// Create a new compressor with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress data, recording the table and statistics alongside it
    pub fn compress(&self, data: &[u8]) -> Result<CompressedOutput, CodecError> {
        if data.len() > self.config.max_input_size {
            return Err(CodecError::InputTooLarge {
                size: data.len(),
                max: self.config.max_input_size,
            });
        }

        let encoded = huffman::compress_with_frequencies(data)?;
        let ratio = if data.is_empty() {
            1.0
        } else {
            encoded.data.len() as f64 / data.len() as f64
        };
        let metadata = CompressionMetadata {
            entropy_bits: entropy::shannon_entropy(&encoded.frequencies),
            average_code_length: entropy::average_code_length(&encoded.frequencies, &encoded.code_table),
            symbol_count: encoded.code_table.len(),
        };

        Ok(CompressedOutput {
            original_size: data.len(),
            compressed_size: encoded.data.len(),
            bit_count: encoded.bit_count,
            ratio,
            metadata,
            code_table: encoded.code_table,
            frequencies: encoded.frequencies,
            data: encoded.data,
        })
    }

    /// Decompress data, checking the recorded original size
    pub fn decompress(&self, output: &CompressedOutput) -> Result<Vec<u8>, CodecError> {
        let decoded = huffman::decompress(&output.code_table, &output.data)?;
        if decoded.len() != output.original_size {
            return Err(CodecError::SizeMismatch {
                expected: output.original_size,
                actual: decoded.len(),
            });
        }
        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_huffman() {
        let compressor = Compressor::default();
        let data = b"hello world hello world hello world";
        let result = compressor.compress(data).unwrap();
        assert!(result.compressed_size > 0);
        assert_eq!(result.original_size, data.len());
        assert_eq!(result.compressed_size, result.bit_count.div_ceil(8));
    }

    #[test]
    fn test_compress_empty() {
        let compressor = Compressor::default();
        let result = compressor.compress(b"").unwrap();
        assert_eq!(result.data, vec![0x00]);
        assert_eq!(result.metadata.symbol_count, 1);
        assert!(compressor.decompress(&result).unwrap().is_empty());
    }

    #[test]
    fn test_roundtrip_huffman() {
        let compressor = Compressor::default();
        let data = b"the quick brown fox jumps over the lazy dog";
        let compressed = compressor.compress(data).unwrap();
        let decompressed = compressor.decompress(&compressed).unwrap();
        assert_eq!(decompressed, data);
    }

    #[test]
    fn test_input_too_large() {
        let compressor = Compressor::new(CodecConfig {
            max_input_size: 4,
            ..CodecConfig::default()
        });
        let result = compressor.compress(b"12345");
        assert!(matches!(result, Err(CodecError::InputTooLarge { size: 5, max: 4 })));
        assert!(compressor.compress(b"1234").is_ok());
    }

    #[test]
    fn test_size_mismatch() {
        let compressor = Compressor::default();
        let mut compressed = compressor.compress(b"abcabc").unwrap();
        compressed.original_size = 7;
        assert!(matches!(
            compressor.decompress(&compressed),
            Err(CodecError::SizeMismatch { expected: 7, actual: 6 })
        ));
    }

    #[test]
    fn test_compression_ratio() {
        let compressor = Compressor::default();
        let data = "aaaaaaaaaa".repeat(100);
        let result = compressor.compress(data.as_bytes()).unwrap();
        assert!(result.ratio < 1.0, "repetitive data should compress well");
        assert!(result.metadata.entropy_bits < 0.01);
        assert!((result.metadata.average_code_length - 1.0).abs() < 1e-9);
    }
}
