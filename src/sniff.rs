//! Input classification by extension and magic bytes.
//!
//! The result only selects the `encoding` tag written into the document; it
//! never changes how bytes are packed.
//!
//! Brotli streams carry no reliable magic number, so a `.br` extension is
//! trusted as-is.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// gzip member header: ID1 ID2.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingTag {
    Raw,
    Gzip,
    Brotli,
}

impl EncodingTag {
    /// Value of the emitted `encoding` declaration; `None` for raw data.
    pub fn label(self) -> Option<&'static str> {
        match self {
            EncodingTag::Raw    => None,
            EncodingTag::Gzip   => Some("gzip"),
            EncodingTag::Brotli => Some("br"),
        }
    }
}

/// Outcome of [`sniff`]: the tag plus an optional non-fatal diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sniffed {
    pub encoding: EncodingTag,
    pub warning:  Option<String>,
}

/// Classify `path` given (up to) its first two bytes.
pub fn sniff(path: &Path, head: &[u8]) -> Sniffed {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase());

    match ext.as_deref() {
        Some("gz") => {
            if head.len() >= 2 && head[..2] == GZIP_MAGIC {
                Sniffed { encoding: EncodingTag::Gzip, warning: None }
            } else {
                let warning = format!(
                    "{} has a .gz extension but starts with {} instead of {}; treating as raw",
                    path.display(),
                    if head.is_empty() { "nothing".to_string() } else { hex::encode(head) },
                    hex::encode(GZIP_MAGIC),
                );
                tracing::warn!("{warning}");
                Sniffed { encoding: EncodingTag::Raw, warning: Some(warning) }
            }
        }
        Some("br") => Sniffed { encoding: EncodingTag::Brotli, warning: None },
        _ => Sniffed { encoding: EncodingTag::Raw, warning: None },
    }
}

/// Open `path`, read at most two bytes and classify it.
pub fn sniff_file(path: &Path) -> io::Result<Sniffed> {
    let mut head = Vec::with_capacity(2);
    File::open(path)?.take(2).read_to_end(&mut head)?;
    Ok(sniff(path, &head))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gzip_magic_is_required_for_gz() {
        let ok = sniff(Path::new("foo.gz"), &[0x1F, 0x8B]);
        assert_eq!(ok, Sniffed { encoding: EncodingTag::Gzip, warning: None });

        let bad = sniff(Path::new("foo.gz"), &[0x00, 0x8B]);
        assert_eq!(bad.encoding, EncodingTag::Raw);
        assert!(bad.warning.unwrap().contains("008b"));
    }

    #[test]
    fn truncated_gz_is_raw() {
        let one = sniff(Path::new("foo.gz"), &[0x1F]);
        assert_eq!(one.encoding, EncodingTag::Raw);
        assert!(one.warning.is_some());
    }

    #[test]
    fn brotli_trusts_the_extension() {
        assert_eq!(sniff(Path::new("foo.br"), b"xx").encoding, EncodingTag::Brotli);
        assert_eq!(sniff(Path::new("foo.br"), &[]).encoding, EncodingTag::Brotli);
    }

    #[test]
    fn other_extensions_are_raw() {
        assert_eq!(sniff(Path::new("foo.bin"), &GZIP_MAGIC).encoding, EncodingTag::Raw);
        assert_eq!(sniff(Path::new("Makefile"), &[]).encoding, EncodingTag::Raw);
        assert_eq!(EncodingTag::Raw.label(), None);
    }
}
