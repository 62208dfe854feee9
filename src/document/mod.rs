//! The emitted C++ header.
//!
//! ```text
//! #pragma once
//!
//! #include <array>
//! #include <cstddef>
//! #include <cstdint>
//!
//! struct name {
//!     static constexpr const char* encoding{"gzip"};
//!     static constexpr std::size_t data_size{3};
//!     static constexpr std::array<uint16_t, 2> data {
//!      0x0102, 0x0300
//!     };
//! };
//! ```
//!
//! `encoding` is omitted for raw input.  The array is declared with
//! `1 + data_size / W` elements, which is never fewer than the number of
//! literals; unlisted elements are zero-initialised.

pub mod columns;
pub mod parse;

use std::io::{self, Write};

use crate::codec::PackedSequence;
use crate::sniff::EncodingTag;

pub use columns::{format_words, ColumnWriter};
pub use parse::{parse_document, ParsedDocument};

/// Default maximum line width of the literal block.
pub const DEFAULT_MAX_COLUMNS: usize = 160;

#[derive(Debug, Clone)]
pub struct LiteralDocument {
    pub struct_name: String,
    pub encoding:    EncodingTag,
    pub packed:      PackedSequence,
    pub max_columns: usize,
    /// Generated reader source, placed inside the aggregate.
    pub decoder:     Option<String>,
}

impl LiteralDocument {
    pub fn new(struct_name: impl Into<String>, packed: PackedSequence, max_columns: usize) -> Self {
        Self {
            struct_name: struct_name.into(),
            encoding: EncodingTag::Raw,
            packed,
            max_columns,
            decoder: None,
        }
    }

    pub fn with_encoding(mut self, encoding: EncodingTag) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_decoder(mut self, decoder: String) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn render(&self) -> String {
        let width = self.packed.word_width;
        let mut out = String::with_capacity(
            256 + self.packed.words.len() * ColumnWriter::word_cost(width)
                + self.decoder.as_ref().map_or(0, String::len),
        );

        out.push_str("#pragma once\n\n");
        out.push_str("#include <array>\n");
        if self.decoder.is_some() {
            out.push_str("#include <bit>\n");
        }
        out.push_str("#include <cstddef>\n");
        out.push_str("#include <cstdint>\n");
        if self.decoder.is_some() {
            out.push_str("#include <cstring>\n");
        }
        out.push('\n');

        out.push_str(&format!("struct {} {{\n", self.struct_name));
        if let Some(label) = self.encoding.label() {
            out.push_str(&format!("    static constexpr const char* encoding{{\"{label}\"}};\n"));
        }
        out.push_str(&format!(
            "    static constexpr std::size_t data_size{{{}}};\n",
            self.packed.total_byte_count
        ));
        out.push_str(&format!(
            "    static constexpr std::array<{}, {}> data {{\n",
            width.type_name(),
            self.packed.declared_len()
        ));

        let mut writer = ColumnWriter::new(&mut out, width, self.max_columns);
        for &word in &self.packed.words {
            writer.push(word);
        }
        if writer.finish() > 0 {
            out.push('\n');
        }
        out.push_str("    };\n");

        if let Some(decoder) = &self.decoder {
            out.push('\n');
            out.push_str(decoder);
        }
        out.push_str("};\n");
        out
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.render().as_bytes())?;
        writer.flush()
    }
}

/// Turn a file stem into a usable C++ identifier: anything outside
/// `[A-Za-z0-9_]` becomes `_`, and a leading digit gets a `_` prefix.
pub fn sanitize_identifier(raw: &str) -> String {
    let mut ident: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}
