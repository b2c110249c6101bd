//! Error types for huffpack

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("no symbols to build a huffman tree from")]
    EmptyInput,

    #[error("bit index {index} out of range for a {len}-bit buffer")]
    OutOfRange { index: usize, len: usize },

    #[error("stream ended after {bits_read} bits without an end-of-stream code")]
    TruncatedStream { bits_read: usize },

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("symbol frequencies overflow a 64-bit total")]
    FrequencyOverflow,

    #[error("invalid code table: {0}")]
    InvalidCodeTable(String),

    #[error("no code matches the bits starting at offset {bit_offset}")]
    UnmatchedCode { bit_offset: usize },

    #[error("input of {size} bytes exceeds the configured maximum of {max}")]
    InputTooLarge { size: usize, max: usize },

    #[error("decompression size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("malformed statistics at line {line}: {reason}")]
    MalformedStats { line: usize, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(String),
}
