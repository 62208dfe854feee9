//! Lossless round-trip verification.
//!
//! Checks never abort on the first mismatch: every comparison is recorded in
//! a [`VerificationReport`] that is returned to the caller.

pub mod report;

use std::io::{self, Read};

use crate::codec::{CodecError, Endian, PackedSequence, WordReader};
use crate::decoder::{order_table, parse_order_table};
use crate::document::parse_document;
use crate::sniff::EncodingTag;

pub use report::VerificationReport;

/// Compare `packed` byte-for-byte against `source`, unpacking each word the
/// way a host of byte order `endian` would.
///
/// Padding in the final word is not compared; there are no source bytes
/// left for it.  A source that runs longer or shorter than the packed byte
/// count is recorded as a failure.
pub fn verify_packed<R: Read>(
    source: R,
    packed: &PackedSequence,
    endian: Endian,
    report: &mut VerificationReport,
) -> io::Result<()> {
    let width = packed.word_width;
    let mut source = io::BufReader::new(source).bytes();
    let mut position = 0u64;
    let mut exhausted = false;

    'words: for &word in &packed.words {
        let chunk = endian.layout(word, width);
        for offset in 0..width.bytes() {
            let original = match source.next() {
                Some(byte) => byte?,
                None => {
                    exhausted = true;
                    break 'words;
                }
            };
            let index = endian.chunk_index(width, offset);
            report.check(chunk[index] == original, || {
                format!(
                    "{} endian, byte {position}: chunk[{index}] = {:#04x}, source = {original:#04x}",
                    endian.name(),
                    chunk[index],
                )
            });
            position += 1;
        }
    }

    if !exhausted && source.next().is_some() {
        // Drain so the message can name the real length.
        let extra = 1 + source.by_ref().count() as u64;
        report.check(false, || {
            format!("source has {extra} byte(s) beyond the {} packed bytes", packed.total_byte_count)
        });
    }
    report.check(position == packed.total_byte_count, || {
        format!(
            "{} endian: compared {position} bytes, packed sequence declares {}",
            endian.name(),
            packed.total_byte_count
        )
    });
    Ok(())
}

/// Run the reader model over `packed` and compare its output with `source`.
pub fn verify_reader(
    source: &[u8],
    packed: &PackedSequence,
    endian: Endian,
    report: &mut VerificationReport,
) {
    let mut reader = WordReader::new(packed, endian);
    let mut decoded = vec![0u8; source.len()];
    let delivered = reader.get(&mut decoded);

    report.check(delivered == source.len(), || {
        format!("{} endian reader delivered {delivered} of {} bytes", endian.name(), source.len())
    });
    match decoded.iter().zip(source).position(|(a, b)| a != b) {
        None => report.pass(),
        Some(at) => report.fail(format!(
            "{} endian reader diverges at byte {at}: {:#04x} != {:#04x}",
            endian.name(),
            decoded[at],
            source[at],
        )),
    }
    report.check(reader.eof() && !reader.fail(), || {
        format!("{} endian reader flags: eof={} fail={}", endian.name(), reader.eof(), reader.fail())
    });

    // One more byte must come back short and raise the fail flag.
    let mut extra = [0u8; 1];
    let short = reader.get(&mut extra);
    report.check(short == 0 && reader.fail(), || {
        format!("{} endian reader read past the end without failing", endian.name())
    });
}

/// Parse a rendered document and check that it carries exactly `packed`,
/// tagged with `encoding`.
///
/// A document that cannot be parsed is returned as an error; callers in
/// self-test mode record it as a failed check.
pub fn verify_document_text(
    text: &str,
    packed: &PackedSequence,
    encoding: EncodingTag,
    report: &mut VerificationReport,
) -> Result<(), CodecError> {
    let parsed = parse_document(text)?;

    report.check(parsed.encoding.as_deref() == encoding.label(), || {
        format!("document encoding {:?}, expected {:?}", parsed.encoding, encoding.label())
    });

    report.check(parsed.word_width == packed.word_width, || {
        format!("document width {:?}, packed width {:?}", parsed.word_width, packed.word_width)
    });
    report.check(parsed.total_byte_count == packed.total_byte_count, || {
        format!(
            "document data_size {}, packed byte count {}",
            parsed.total_byte_count, packed.total_byte_count
        )
    });
    report.check(parsed.declared_len == packed.declared_len(), || {
        format!("document declares {} elements, expected {}", parsed.declared_len, packed.declared_len())
    });
    report.check(parsed.words.len() == packed.words.len(), || {
        format!("document holds {} literals, packed {}", parsed.words.len(), packed.words.len())
    });
    for (i, (&got, &want)) in parsed.words.iter().zip(&packed.words).enumerate() {
        report.check(got == want, || format!("literal {i}: document {got:#x}, packed {want:#x}"));
    }
    Ok(())
}

/// Check the byte-order tables embedded in decoder text against the shared
/// index formula, for both byte orders.
pub fn verify_decoder_text(
    decoder: &str,
    packed: &PackedSequence,
    report: &mut VerificationReport,
) {
    let width = packed.word_width;
    for endian in Endian::BOTH {
        let expected = order_table(endian, width);
        match parse_order_table(decoder, endian) {
            Some(table) => report.check(table == expected, || {
                format!("{} endian decoder table {table:?}, expected {expected:?}", endian.name())
            }),
            None => report.fail(format!("decoder has no {} endian table", endian.name())),
        }
    }
}
