//! Generates a C++ stream-like reader over the packed `data` array.
//!
//! The reader is emitted as a nested `class reader` of the aggregate.  It
//! keeps a byte cursor, a one-word chunk filled by `std::memcpy` (so the
//! chunk is in the consumer's native byte order) and eof/fail flags.  Byte
//! selection inside the chunk goes through two constexpr tables, one per
//! byte order, picked with `std::endian::native`.  Both tables are generated
//! from [`Endian::chunk_index`], the same function the verifier uses.

use std::fmt::Write;

use crate::codec::{CodecError, Endian, WordWidth};

fn table_name(endian: Endian) -> String {
    format!("{}_endian_order", endian.name())
}

/// Byte-selection table for one byte order: entry `i` is the chunk index of
/// the `i`-th byte of a word.
pub fn order_table(endian: Endian, width: WordWidth) -> Vec<usize> {
    (0..width.bytes()).map(|offset| endian.chunk_index(width, offset)).collect()
}

fn join(values: &[usize]) -> String {
    values.iter().map(usize::to_string).collect::<Vec<_>>().join(", ")
}

/// Emit the reader for `width`.  8-bit words need no reassembly, so there is
/// no decoder for them.
pub fn emit_decoder(width: WordWidth) -> Result<String, CodecError> {
    if width == WordWidth::W8 {
        return Err(CodecError::Config("no decoder for 8-bit width".into()));
    }
    let w = width.bytes();
    let ty = width.type_name();
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "    class reader {{");
    for endian in Endian::BOTH {
        let _ = writeln!(
            out,
            "        static constexpr std::array<std::size_t, {w}> {}{{{}}};",
            table_name(endian),
            join(&order_table(endian, width)),
        );
    }
    let _ = write!(
        out,
        r#"
        std::size_t read_index{{0}};
        std::array<uint8_t, {w}> chunk{{}};
        bool eof_flag{{data_size == 0}};
        bool fail_flag{{false}};

    public:
        // Copies up to `count` bytes into `buffer` and returns how many were
        // delivered. Reading past the end sets fail() and returns a short count.
        std::size_t get(uint8_t* buffer, std::size_t count) {{
            constexpr auto& order =
                std::endian::native == std::endian::big ? {big} : {little};
            std::size_t delivered{{0}};
            for (; delivered < count; ++delivered) {{
                if (read_index >= data_size) {{
                    eof_flag = true;
                    fail_flag = true;
                    break;
                }}
                const std::size_t offset = read_index % {w};
                if (offset == 0) {{
                    const {ty} word = data[read_index / {w}];
                    std::memcpy(chunk.data(), &word, sizeof word);
                }}
                buffer[delivered] = chunk[order[offset]];
                if (++read_index == data_size) eof_flag = true;
            }}
            return delivered;
        }}

        bool eof() const {{ return eof_flag; }}
        bool fail() const {{ return fail_flag; }}
        std::size_t tell() const {{ return read_index; }}
        static constexpr std::size_t size() {{ return data_size; }}
    }};
"#,
        big = table_name(Endian::Big),
        little = table_name(Endian::Little),
    );

    tracing::debug!(width = width.bits(), "emitted decoder");
    Ok(out)
}

/// Read back the byte-order table for `endian` from emitted decoder text.
pub fn parse_order_table(decoder: &str, endian: Endian) -> Option<Vec<usize>> {
    let marker = format!("> {}{{", table_name(endian));
    let line = decoder.lines().find(|l| l.contains(&marker))?;
    let start = line.find(&marker)? + marker.len();
    let end = start + line[start..].find('}')?;
    line[start..end]
        .split(',')
        .map(|v| v.trim().parse::<usize>().ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_words_have_no_decoder() {
        let err = emit_decoder(WordWidth::W8).unwrap_err();
        assert!(matches!(err, CodecError::Config(ref m) if m == "no decoder for 8-bit width"));
    }

    #[test]
    fn tables_follow_the_shared_formula() {
        for width in [WordWidth::W16, WordWidth::W32, WordWidth::W64] {
            let text = emit_decoder(width).unwrap();
            for endian in Endian::BOTH {
                assert_eq!(parse_order_table(&text, endian), Some(order_table(endian, width)));
            }
        }
    }

    #[test]
    fn thirty_two_bit_tables() {
        let text = emit_decoder(WordWidth::W32).unwrap();
        assert!(text.contains("static constexpr std::array<std::size_t, 4> big_endian_order{0, 1, 2, 3};"));
        assert!(text.contains("static constexpr std::array<std::size_t, 4> little_endian_order{3, 2, 1, 0};"));
        assert!(text.contains("const uint32_t word = data[read_index / 4];"));
    }
}
