//! Lexical re-reading of a rendered document.
//!
//! Only understands the layout produced by [`super::LiteralDocument`]; it is
//! used to check that the text renderer and the packer agree, not as a
//! general C++ parser.

use crate::codec::{CodecError, PackedSequence, WordWidth};

use super::columns::{LITERAL_PREFIX, SEPARATOR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    pub struct_name:      String,
    pub encoding:         Option<String>,
    pub total_byte_count: u64,
    pub word_width:       WordWidth,
    pub declared_len:     u64,
    pub words:            Vec<u64>,
}

impl ParsedDocument {
    pub fn into_packed(self) -> PackedSequence {
        PackedSequence {
            words:            self.words,
            total_byte_count: self.total_byte_count,
            word_width:       self.word_width,
        }
    }
}

fn parse_err(line_no: usize, msg: impl std::fmt::Display) -> CodecError {
    CodecError::Parse(format!("line {}: {msg}", line_no + 1))
}

/// Text between `open` and the next `close` in `line`.
fn between<'a>(line: &'a str, open: &str, close: char) -> Option<&'a str> {
    let start = line.find(open)? + open.len();
    let len = line[start..].find(close)?;
    Some(&line[start..start + len])
}

/// `<uintNN_t, LEN> data {` → (width, LEN)
fn parse_array_decl(line_no: usize, line: &str) -> Result<(WordWidth, u64), CodecError> {
    let args = between(line, "std::array<", '>')
        .ok_or_else(|| parse_err(line_no, "malformed array declaration"))?;
    let (ty, len) = args
        .split_once(',')
        .ok_or_else(|| parse_err(line_no, "array declaration without a length"))?;
    let bits = ty
        .trim()
        .strip_prefix("uint")
        .and_then(|t| t.strip_suffix("_t"))
        .and_then(|b| b.parse::<usize>().ok())
        .ok_or_else(|| parse_err(line_no, format!("unknown literal type `{}`", ty.trim())))?;
    let width = WordWidth::try_from_bits(bits)
        .ok_or_else(|| parse_err(line_no, format!("unsupported literal width {bits}")))?;
    let len = len
        .trim()
        .parse::<u64>()
        .map_err(|e| parse_err(line_no, format!("bad array length: {e}")))?;
    Ok((width, len))
}

fn parse_literal(line_no: usize, token: &str, width: WordWidth) -> Result<u64, CodecError> {
    let digits = token
        .strip_prefix(LITERAL_PREFIX)
        .ok_or_else(|| parse_err(line_no, format!("literal `{token}` lacks the {LITERAL_PREFIX} prefix")))?;
    if digits.len() != 2 * width.bytes() {
        return Err(parse_err(
            line_no,
            format!("literal `{token}` has {} digits, expected {}", digits.len(), 2 * width.bytes()),
        ));
    }
    u64::from_str_radix(digits, 16).map_err(|e| parse_err(line_no, format!("literal `{token}`: {e}")))
}

/// Recover the width, byte count and words from a rendered document.
pub fn parse_document(text: &str) -> Result<ParsedDocument, CodecError> {
    let mut struct_name = None;
    let mut encoding = None;
    let mut total_byte_count = None;
    let mut array = None;
    let mut words = Vec::new();
    let mut closed = false;

    let mut lines = text.lines().enumerate();
    while let Some((line_no, line)) = lines.next() {
        let trimmed = line.trim();
        if struct_name.is_none() {
            if let Some(rest) = trimmed.strip_prefix("struct ") {
                struct_name = rest.strip_suffix('{').map(|n| n.trim().to_string());
            }
        } else if trimmed.contains(" encoding{") {
            encoding = between(trimmed, "{\"", '"').map(str::to_string);
        } else if trimmed.contains(" data_size{") {
            let n = between(trimmed, "data_size{", '}')
                .and_then(|n| n.parse::<u64>().ok())
                .ok_or_else(|| parse_err(line_no, "malformed data_size"))?;
            total_byte_count = Some(n);
        } else if trimmed.ends_with("> data {") {
            let (width, len) = parse_array_decl(line_no, trimmed)?;
            for (line_no, body) in lines.by_ref() {
                let body = body.trim();
                if body == "};" {
                    closed = true;
                    break;
                }
                for token in body.split(SEPARATOR).map(str::trim).filter(|t| !t.is_empty()) {
                    words.push(parse_literal(line_no, token, width)?);
                }
            }
            array = Some((width, len));
            break;
        }
    }

    let struct_name = struct_name.ok_or_else(|| CodecError::Parse("no struct declaration".into()))?;
    let total_byte_count =
        total_byte_count.ok_or_else(|| CodecError::Parse("no data_size declaration".into()))?;
    let (word_width, declared_len) = array.ok_or_else(|| CodecError::Parse("no data array".into()))?;
    if !closed {
        return Err(CodecError::Parse("data array is not terminated".into()));
    }
    let expected = total_byte_count.div_ceil(word_width.bytes() as u64);
    if words.len() as u64 != expected {
        return Err(CodecError::Parse(format!(
            "{} literals for data_size {total_byte_count}, expected {expected} {}-bit words",
            words.len(),
            word_width.bits(),
        )));
    }
    if words.len() as u64 > declared_len {
        return Err(CodecError::Parse(format!(
            "{} literals in an array declared with {declared_len} elements",
            words.len()
        )));
    }

    Ok(ParsedDocument {
        struct_name,
        encoding,
        total_byte_count,
        word_width,
        declared_len,
        words,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD: &str = "\
#pragma once

struct blob {
    static constexpr std::size_t data_size{3};
    static constexpr std::array<uint16_t, 2> data {
     0x0102, 0x0300
    };
};
";

    fn parse_error(text: &str) -> String {
        match parse_document(text) {
            Err(CodecError::Parse(msg)) => msg,
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn well_formed_document() {
        let parsed = parse_document(GOOD).unwrap();
        assert_eq!(parsed.struct_name, "blob");
        assert_eq!(parsed.word_width, WordWidth::W16);
        assert_eq!(parsed.total_byte_count, 3);
        assert_eq!(parsed.declared_len, 2);
        assert_eq!(parsed.words, vec![0x0102, 0x0300]);
    }

    #[test]
    fn literal_count_must_cover_data_size() {
        let text = "\
struct blob {
    static constexpr std::size_t data_size{9};
    static constexpr std::array<uint16_t, 5> data {
     0x0102
    };
};
";
        assert!(parse_error(text).contains("1 literals for data_size 9, expected 5"));

        let extra = GOOD.replace("0x0102, 0x0300", "0x0102, 0x0300, 0x0000");
        assert!(parse_error(&extra).contains("expected 2"));
    }

    #[test]
    fn missing_data_size() {
        let text = GOOD.replace("    static constexpr std::size_t data_size{3};\n", "");
        assert_eq!(parse_error(&text), "no data_size declaration");
    }

    #[test]
    fn unterminated_array() {
        let text = GOOD.replace("    };\n};\n", "");
        assert_eq!(parse_error(&text), "data array is not terminated");
    }

    #[test]
    fn literal_with_wrong_digit_count() {
        let text = GOOD.replace("0x0300", "0x300");
        assert!(parse_error(&text).contains("has 3 digits, expected 4"));
    }

    #[test]
    fn literal_without_prefix() {
        let text = GOOD.replace("0x0300", "0300");
        assert!(parse_error(&text).contains("lacks the 0x prefix"));
    }

    #[test]
    fn unsupported_literal_type() {
        let text = GOOD.replace("uint16_t", "uint24_t");
        assert!(parse_error(&text).contains("unsupported literal width 24"));
        let text = GOOD.replace("uint16_t", "int16_t");
        assert!(parse_error(&text).contains("unknown literal type `int16_t`"));
    }

    #[test]
    fn no_struct() {
        assert_eq!(parse_error("#pragma once\n"), "no struct declaration");
    }
}
