//! Executable model of the emitted decoder.
//!
//! [`WordReader`] follows the same read semantics as the C++ reader produced
//! by [`crate::decoder`]: a byte cursor, a one-word chunk cache laid out in
//! the consumer's native byte order, and end-of-stream / fail flags.  The
//! consumer's byte order is a parameter, so a single machine can run both
//! branches.

use std::io::{self, Read};

use super::{Endian, PackedSequence};

pub struct WordReader<'a> {
    packed:     &'a PackedSequence,
    endian:     Endian,
    read_index: u64,
    chunk:      [u8; 8],
    eof:        bool,
    fail:       bool,
}

impl<'a> WordReader<'a> {
    pub fn new(packed: &'a PackedSequence, endian: Endian) -> Self {
        Self {
            packed,
            endian,
            read_index: 0,
            chunk: [0u8; 8],
            eof: packed.total_byte_count == 0,
            fail: false,
        }
    }

    /// Copy up to `buf.len()` bytes.  Returns the number delivered; a short
    /// count means the request ran past the end and the fail flag is set.
    pub fn get(&mut self, buf: &mut [u8]) -> usize {
        let width = self.packed.word_width;
        let w = width.bytes() as u64;
        let mut delivered = 0;

        while delivered < buf.len() {
            if self.read_index >= self.packed.total_byte_count {
                self.eof = true;
                self.fail = true;
                break;
            }
            let offset = (self.read_index % w) as usize;
            if offset == 0 {
                match self.packed.words.get((self.read_index / w) as usize) {
                    Some(&word) => self.chunk = self.endian.layout(word, width),
                    None => {
                        // Byte count claims more than the words hold.
                        self.fail = true;
                        break;
                    }
                }
            }
            buf[delivered] = self.chunk[self.endian.chunk_index(width, offset)];
            delivered += 1;
            self.read_index += 1;
            if self.read_index == self.packed.total_byte_count {
                self.eof = true;
            }
        }
        delivered
    }

    pub fn eof(&self) -> bool {
        self.eof
    }

    pub fn fail(&self) -> bool {
        self.fail
    }

    pub fn tell(&self) -> u64 {
        self.read_index
    }
}

impl Read for WordReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = self.packed.total_byte_count - self.read_index;
        let want = buf.len().min(remaining as usize);
        let delivered = self.get(&mut buf[..want]);
        if delivered < want {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("packed words end at byte {} of {}", self.read_index, self.packed.total_byte_count),
            ));
        }
        Ok(delivered)
    }
}
