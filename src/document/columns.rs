//! Column-wrapped hexadecimal literal layout.
//!
//! Every literal is written as `" 0x"` followed by exactly `2 * W` lowercase
//! hex digits; literals are separated by `","`.  The separator of a word that
//! opens a new line stays at the end of the previous line.
//!
//! The running column counter charges each word `4 + 2 * W` (separator,
//! space, prefix, digits) on top of the indentation.  A line break is taken
//! when adding the current word would push the counter past `max_columns`;
//! there is no lookahead to the next word.  With the trailing separator
//! included, the counter is exactly the length of the line, so no line is
//! longer than `max_columns` unless it holds a single literal that is wider
//! on its own.

use std::fmt::Write;

use crate::codec::WordWidth;

pub const INDENT: &str = "    ";
pub const SEPARATOR: char = ',';
pub const LITERAL_PREFIX: &str = "0x";

pub struct ColumnWriter<'a> {
    out:           &'a mut String,
    width:         WordWidth,
    max_columns:   usize,
    columns:       usize,
    words:         u64,
    words_on_line: usize,
}

impl<'a> ColumnWriter<'a> {
    pub fn new(out: &'a mut String, width: WordWidth, max_columns: usize) -> Self {
        Self {
            out,
            width,
            max_columns,
            columns: INDENT.len(),
            words: 0,
            words_on_line: 0,
        }
    }

    /// Columns charged for one word, separator included.
    #[inline]
    pub fn word_cost(width: WordWidth) -> usize {
        1 + 1 + LITERAL_PREFIX.len() + 2 * width.bytes()
    }

    pub fn push(&mut self, word: u64) {
        let cost = Self::word_cost(self.width);
        if self.words == 0 {
            self.out.push_str(INDENT);
        } else {
            self.out.push(SEPARATOR);
        }
        if self.words_on_line > 0 && self.columns + cost > self.max_columns {
            self.out.push('\n');
            self.out.push_str(INDENT);
            self.columns = INDENT.len();
            self.words_on_line = 0;
        }
        self.columns += cost;
        // Writing into a String cannot fail.
        let _ = write!(
            self.out,
            " {LITERAL_PREFIX}{:0digits$x}",
            word & self.width.mask(),
            digits = 2 * self.width.bytes(),
        );
        self.words += 1;
        self.words_on_line += 1;
    }

    /// Number of literals written so far.
    pub fn finish(self) -> u64 {
        self.words
    }
}

/// Render `words` as a standalone block of wrapped literals.
pub fn format_words(words: &[u64], width: WordWidth, max_columns: usize) -> String {
    let mut out = String::new();
    let mut writer = ColumnWriter::new(&mut out, width, max_columns);
    for &word in words {
        writer.push(word);
    }
    writer.finish();
    out
}
