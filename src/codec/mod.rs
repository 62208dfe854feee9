//! Word codec: widths, host byte order, and the shared byte-position rule.
//!
//! # Packing rule
//! Bytes are folded into words most-significant first: the byte read first
//! lands in the highest byte of the word, independent of the machine doing
//! the packing.  See [`packer`].
//!
//! # Unpacking rule
//! A consumer copies each word into a `W`-byte buffer using its own native
//! byte order (a raw memory copy), then picks bytes out of that buffer with
//! [`Endian::chunk_index`].  That single function is the only place the
//! endianness-dependent index formula lives; the decoder emitter, the
//! in-memory reader model and the verifier all call it.
//!
//! # Endianness
//! Host byte order is always an explicit [`Endian`] parameter.  Only
//! [`Endian::native`] looks at the build target, so both branches can be
//! exercised on any machine.

pub mod packer;
pub mod reader;

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::io;
use thiserror::Error;

pub use packer::{pack, pack_bytes, PackedSequence, WordPacker};
pub use reader::WordReader;

// ── Word width ───────────────────────────────────────────────────────────────

/// One of the four supported literal widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordWidth {
    W8,
    W16,
    W32,
    W64,
}

impl WordWidth {
    pub const ALL: [WordWidth; 4] = [WordWidth::W8, WordWidth::W16, WordWidth::W32, WordWidth::W64];

    /// Resolve a bit count.  Anything other than 16, 32 or 64 falls back to
    /// 8-bit words with a warning; an unsupported width is never fatal.
    pub fn from_bits(bits: usize) -> Self {
        Self::try_from_bits(bits).unwrap_or_else(|| {
            tracing::warn!(bits, "unsupported word width, falling back to 8-bit words");
            WordWidth::W8
        })
    }

    /// Strict variant of [`from_bits`](Self::from_bits), used by the parser.
    pub fn try_from_bits(bits: usize) -> Option<Self> {
        match bits {
            8  => Some(WordWidth::W8),
            16 => Some(WordWidth::W16),
            32 => Some(WordWidth::W32),
            64 => Some(WordWidth::W64),
            _  => None,
        }
    }

    #[inline]
    pub fn bits(self) -> usize {
        self.bytes() * 8
    }

    #[inline]
    pub fn bytes(self) -> usize {
        match self {
            WordWidth::W8  => 1,
            WordWidth::W16 => 2,
            WordWidth::W32 => 4,
            WordWidth::W64 => 8,
        }
    }

    /// Mask selecting the significant low bits of a word of this width.
    #[inline]
    pub fn mask(self) -> u64 {
        match self {
            WordWidth::W64 => u64::MAX,
            w              => (1u64 << w.bits()) - 1,
        }
    }

    /// C++ fixed-width integer type used for the emitted literals.
    pub fn type_name(self) -> &'static str {
        match self {
            WordWidth::W8  => "uint8_t",
            WordWidth::W16 => "uint16_t",
            WordWidth::W32 => "uint32_t",
            WordWidth::W64 => "uint64_t",
        }
    }
}

// ── Host byte order ──────────────────────────────────────────────────────────

/// Byte order of the machine that *consumes* the packed words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endian {
    Big,
    Little,
}

impl Endian {
    pub const BOTH: [Endian; 2] = [Endian::Big, Endian::Little];

    /// Byte order of the build target.
    pub fn native() -> Self {
        if cfg!(target_endian = "big") { Endian::Big } else { Endian::Little }
    }

    pub fn name(self) -> &'static str {
        match self {
            Endian::Big    => "big",
            Endian::Little => "little",
        }
    }

    /// Index into a natively laid-out word buffer that holds the byte at
    /// `offset` (0 = first byte read) within the word.
    ///
    /// Big-endian hosts store the most-significant byte first, so the
    /// position is `offset`; little-endian hosts store it last, so the
    /// position is `width - 1 - offset`.
    #[inline]
    pub fn chunk_index(self, width: WordWidth, offset: usize) -> usize {
        debug_assert!(offset < width.bytes());
        match self {
            Endian::Big    => offset,
            Endian::Little => width.bytes() - 1 - offset,
        }
    }

    /// Copy the low `width` bytes of `word` into a buffer the way a host of
    /// this byte order stores a `uintN_t` in memory.  Only the first
    /// `width.bytes()` entries of the result are meaningful.
    pub fn layout(self, word: u64, width: WordWidth) -> [u8; 8] {
        let mut chunk = [0u8; 8];
        let n = width.bytes();
        let value = word & width.mask();
        match self {
            Endian::Big    => BigEndian::write_uint(&mut chunk[..n], value, n),
            Endian::Little => LittleEndian::write_uint(&mut chunk[..n], value, n),
        }
        chunk
    }
}

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum CodecError {
    /// Invalid configuration, e.g. a decoder requested for 8-bit words.
    #[error("Configuration error: {0}")]
    Config(String),
    /// Malformed literal text met while re-reading an emitted document.
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
