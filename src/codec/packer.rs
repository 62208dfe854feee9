//! Byte-to-word packing.
//!
//! Each incoming byte is shifted into a 64-bit scratch register:
//! `scratch = (scratch << 8) | byte`.  A word is emitted every `W` bytes.
//! A trailing partial word holds its `r` real bytes in the low positions of
//! the register; it is shifted left by `(W - r) * 8` so the real bytes sit in
//! the high positions and the vacated low bytes are zero.

use std::io::{BufReader, Read};

use super::{CodecError, WordWidth};

/// Words produced from one byte stream, with the exact source length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedSequence {
    pub words:            Vec<u64>,
    pub total_byte_count: u64,
    pub word_width:       WordWidth,
}

impl PackedSequence {
    /// Number of zero bytes appended to complete the final word.
    pub fn padding_bytes(&self) -> usize {
        let w = self.word_width.bytes() as u64;
        match self.total_byte_count % w {
            0 => 0,
            r => (w - r) as usize,
        }
    }

    /// Array length declared in the emitted document: `1 + n / W`.
    /// Always at least the number of packed words.
    pub fn declared_len(&self) -> u64 {
        1 + self.total_byte_count / self.word_width.bytes() as u64
    }
}

// ── Streaming packer ─────────────────────────────────────────────────────────

/// Incremental packer.  Feed bytes with [`push`](Self::push), then call
/// [`finish`](Self::finish) once for the padded tail word, if any.
#[derive(Debug, Clone)]
pub struct WordPacker {
    width:      WordWidth,
    scratch:    u64,
    bytes_read: u64,
}

impl WordPacker {
    pub fn new(width: WordWidth) -> Self {
        Self { width, scratch: 0, bytes_read: 0 }
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Accumulate one byte.  Returns the completed word every `W` bytes.
    #[inline]
    pub fn push(&mut self, byte: u8) -> Option<u64> {
        self.scratch = (self.scratch << 8) | byte as u64;
        self.bytes_read += 1;
        if self.bytes_read % self.width.bytes() as u64 == 0 {
            let word = self.scratch;
            self.scratch = 0;
            Some(word)
        } else {
            None
        }
    }

    /// Emit the zero-padded tail word when the stream length is not a
    /// multiple of the word width.
    pub fn finish(&mut self) -> Option<u64> {
        let w = self.width.bytes() as u64;
        let r = self.bytes_read % w;
        if r == 0 {
            return None;
        }
        let word = self.scratch << ((w - r) * 8);
        self.scratch = 0;
        Some(word)
    }
}

// ── Entry points ─────────────────────────────────────────────────────────────

/// Pack everything `reader` yields.  Read failures propagate as
/// [`CodecError::Io`]; there is no other failure mode.
pub fn pack<R: Read>(reader: R, width: WordWidth) -> Result<PackedSequence, CodecError> {
    let mut packer = WordPacker::new(width);
    let mut words = Vec::new();
    for byte in BufReader::new(reader).bytes() {
        if let Some(word) = packer.push(byte?) {
            words.push(word);
        }
    }
    words.extend(packer.finish());

    tracing::debug!(
        bytes = packer.bytes_read(),
        words = words.len(),
        width = width.bits(),
        "packed byte stream"
    );
    Ok(PackedSequence {
        words,
        total_byte_count: packer.bytes_read(),
        word_width: width,
    })
}

/// Pack an in-memory buffer.
pub fn pack_bytes(data: &[u8], width: WordWidth) -> PackedSequence {
    let mut packer = WordPacker::new(width);
    let mut words = Vec::with_capacity(data.len().div_ceil(width.bytes()));
    words.extend(data.iter().filter_map(|&b| packer.push(b)));
    words.extend(packer.finish());
    PackedSequence {
        words,
        total_byte_count: data.len() as u64,
        word_width: width,
    }
}
