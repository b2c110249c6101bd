//! Bit-level packing of code sequences
//!
//! Bits are laid out most-significant-bit first; a trailing partial byte is
//! padded with zero bits in its low-order positions.

use crate::code_table::Code;
use crate::error::CodecError;
use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use std::io::{Cursor, ErrorKind};

/// Accumulates codes and packs them into bytes.
pub struct BitPacker {
    writer: BitWriter<Vec<u8>, BigEndian>,
    bit_count: usize,
}

impl BitPacker {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Pre-size the output for roughly `bytes` packed bytes.
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            writer: BitWriter::endian(Vec::with_capacity(bytes), BigEndian),
            bit_count: 0,
        }
    }

    pub fn push_bit(&mut self, bit: bool) -> Result<(), CodecError> {
        self.writer.write_bit(bit)?;
        self.bit_count += 1;
        Ok(())
    }

    pub fn push_code(&mut self, code: &Code) -> Result<(), CodecError> {
        for &bit in code.bits() {
            self.push_bit(bit)?;
        }
        Ok(())
    }

    /// Number of meaningful bits written so far.
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Zero-pad to a byte boundary and return the packed bytes.
    pub fn finish(mut self) -> Result<Vec<u8>, CodecError> {
        self.writer.byte_align()?;
        Ok(self.writer.into_writer())
    }
}

impl Default for BitPacker {
    fn default() -> Self {
        Self::new()
    }
}

/// Pack a flat bit sequence in one call.
pub fn pack(bits: &[bool]) -> Result<Vec<u8>, CodecError> {
    let mut packer = BitPacker::with_capacity(bits.len().div_ceil(8));
    for &bit in bits {
        packer.push_bit(bit)?;
    }
    packer.finish()
}

/// Read-only bit view over a packed buffer.
#[derive(Debug, Clone, Copy)]
pub struct BitUnpacker<'a> {
    bytes: &'a [u8],
}

impl<'a> BitUnpacker<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Total bits available, padding included.
    pub fn len(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bit(&self, index: usize) -> Result<bool, CodecError> {
        if index >= self.len() {
            return Err(CodecError::OutOfRange {
                index,
                len: self.len(),
            });
        }
        let mut reader = BitReader::endian(Cursor::new(&self.bytes[index / 8..]), BigEndian);
        reader.skip((index % 8) as u32)?;
        Ok(reader.read_bit()?)
    }

    /// A fresh iterator from the first bit; calling again restarts.
    pub fn bits(&self) -> Bits<'a> {
        Bits {
            reader: BitReader::endian(Cursor::new(self.bytes), BigEndian),
            pos: 0,
            len: self.len(),
        }
    }

    /// The first `n` bits, failing if the buffer is shorter.
    pub fn take(&self, n: usize) -> Result<Vec<bool>, CodecError> {
        let mut bits = self.bits();
        (0..n).map(|_| bits.next_bit()).collect()
    }
}

/// Iterator over the bits of a [`BitUnpacker`], oldest first.
pub struct Bits<'a> {
    reader: BitReader<Cursor<&'a [u8]>, BigEndian>,
    pos: usize,
    len: usize,
}

impl Bits<'_> {
    /// Bits consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Like `next`, but running off the end is an error rather than `None`.
    pub fn next_bit(&mut self) -> Result<bool, CodecError> {
        match self.reader.read_bit() {
            Ok(bit) => {
                self.pos += 1;
                Ok(bit)
            }
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(CodecError::OutOfRange {
                index: self.pos,
                len: self.len,
            }),
            Err(e) => Err(e.into()),
        }
    }
}

impl Iterator for Bits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        self.next_bit().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Bits<'_> {}
