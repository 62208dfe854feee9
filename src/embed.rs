//! High-level [`convert`] and [`self_test`] entry points.
//!
//! ```no_run
//! use bin2hpp::codec::WordWidth;
//! use bin2hpp::embed::{convert, EmbedOptions};
//! use std::path::Path;
//!
//! let opts = EmbedOptions { word_width: WordWidth::W32, decoder: true, ..EmbedOptions::default() };
//! convert(Path::new("logo.png"), Path::new("logo.hpp"), &opts)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::codec::{pack, pack_bytes, CodecError, Endian, PackedSequence, WordWidth};
use crate::decoder::emit_decoder;
use crate::document::{sanitize_identifier, LiteralDocument, DEFAULT_MAX_COLUMNS};
use crate::sniff::{sniff_file, EncodingTag};
use crate::verify::{
    verify_decoder_text, verify_document_text, verify_packed, verify_reader, VerificationReport,
};

/// Struct name used by the self-test when there is no input file.
pub const SELFTEST_STRUCT_NAME: &str = "Test";
/// Default size of the generated self-test buffer.  Not a multiple of any
/// word width, so the padded tail is always exercised.
pub const DEFAULT_RANDOM_LEN: usize = 4099;
pub const DEFAULT_SEED: u64 = 0x6269_6e32_6870_70;

// ── EmbedOptions ──────────────────────────────────────────────────────────────

/// Configuration shared by [`convert`] and [`self_test`].
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    pub word_width:  WordWidth,
    pub max_columns: usize,
    /// Aggregate name.  Derived from the output (or input) file stem when
    /// unset; either way it is made into a valid C++ identifier.
    pub struct_name: Option<String>,
    /// Append a generated reader to the document.
    pub decoder:     bool,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            word_width:  WordWidth::W8,
            max_columns: DEFAULT_MAX_COLUMNS,
            struct_name: None,
            decoder:     false,
        }
    }
}

impl EmbedOptions {
    fn name_or(&self, path: Option<&Path>, fallback: &str) -> String {
        match &self.struct_name {
            Some(name) => sanitize_identifier(name),
            None => path
                .and_then(Path::file_stem)
                .map(|stem| sanitize_identifier(&stem.to_string_lossy()))
                .unwrap_or_else(|| fallback.to_string()),
        }
    }

    /// Generated decoder text, or `None` when no decoder was requested.
    /// Fails for 8-bit words before any input is read or output created.
    fn decoder_text(&self) -> Result<Option<String>, CodecError> {
        self.decoder.then(|| emit_decoder(self.word_width)).transpose()
    }

    /// The document for `packed`, shared by [`convert`] and [`self_test`].
    fn document(
        &self,
        struct_name: String,
        packed:      PackedSequence,
        encoding:    EncodingTag,
        decoder:     Option<String>,
    ) -> LiteralDocument {
        let doc = LiteralDocument::new(struct_name, packed, self.max_columns).with_encoding(encoding);
        match decoder {
            Some(text) => doc.with_decoder(text),
            None       => doc,
        }
    }
}

/// `input` with its extension replaced by `hpp`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("hpp")
}

// ── Conversion ────────────────────────────────────────────────────────────────

/// What [`convert`] produced.
#[derive(Debug, Clone)]
pub struct ConvertSummary {
    pub struct_name:      String,
    pub encoding:         EncodingTag,
    pub total_byte_count: u64,
    pub words:            usize,
}

/// Convert the file at `input` into a header at `output`.
pub fn convert(input: &Path, output: &Path, opts: &EmbedOptions) -> Result<ConvertSummary, CodecError> {
    let decoder = opts.decoder_text()?;
    let sniffed = sniff_file(input)?;
    let packed = pack(File::open(input)?, opts.word_width)?;

    let struct_name = opts.name_or(Some(output), SELFTEST_STRUCT_NAME);
    let summary = ConvertSummary {
        struct_name:      struct_name.clone(),
        encoding:         sniffed.encoding,
        total_byte_count: packed.total_byte_count,
        words:            packed.words.len(),
    };

    let doc = opts.document(struct_name, packed, sniffed.encoding, decoder);
    let sink = BufWriter::new(File::create(output)?);
    doc.write_to(sink)?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        bytes = summary.total_byte_count,
        words = summary.words,
        "wrote header"
    );
    Ok(summary)
}

// ── Self-test ─────────────────────────────────────────────────────────────────

/// Where the self-test takes its original bytes from.
#[derive(Debug, Clone)]
pub enum SelfTestSource {
    File(PathBuf),
    Random { seed: u64, len: usize },
}

impl Default for SelfTestSource {
    fn default() -> Self {
        SelfTestSource::Random { seed: DEFAULT_SEED, len: DEFAULT_RANDOM_LEN }
    }
}

/// Reproducible pseudo-random bytes.
pub fn random_bytes(seed: u64, len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    data
}

/// Encode the source and prove the encoding is lossless.
///
/// Runs, in order: direct comparison of packed words against the source for
/// the native byte order and both forced byte orders; the reader model for
/// both byte orders; parse-back of the rendered document; and, when a
/// decoder is requested, the decoder's byte-order tables.
///
/// Configuration and I/O errors abort; failed checks only accumulate.
pub fn self_test(source: &SelfTestSource, opts: &EmbedOptions) -> Result<VerificationReport, CodecError> {
    let decoder = opts.decoder_text()?;
    let (data, struct_name, encoding) = match source {
        SelfTestSource::File(path) => {
            let encoding = sniff_file(path)?.encoding;
            let mut data = Vec::new();
            File::open(path)?.read_to_end(&mut data)?;
            (data, opts.name_or(Some(path.as_path()), SELFTEST_STRUCT_NAME), encoding)
        }
        SelfTestSource::Random { seed, len } => (
            random_bytes(*seed, *len),
            opts.name_or(None, SELFTEST_STRUCT_NAME),
            EncodingTag::Raw,
        ),
    };

    let packed = pack_bytes(&data, opts.word_width);
    let mut report = VerificationReport::default();

    verify_packed(&data[..], &packed, Endian::native(), &mut report)?;
    for endian in Endian::BOTH {
        verify_packed(&data[..], &packed, endian, &mut report)?;
        verify_reader(&data, &packed, endian, &mut report);
    }

    let text = opts.document(struct_name, packed.clone(), encoding, decoder.clone()).render();
    tracing::debug!("Test output:\n{text}");

    if let Err(e) = verify_document_text(&text, &packed, encoding, &mut report) {
        report.fail(format!("rendered document does not parse: {e}"));
    }
    if let Some(text) = &decoder {
        verify_decoder_text(text, &packed, &mut report);
    }

    tracing::info!(
        bytes = data.len(),
        width = opts.word_width.bits(),
        total = report.total,
        failed = report.failed,
        "self-test finished"
    );
    Ok(report)
}
