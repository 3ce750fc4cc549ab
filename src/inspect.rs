use std::fmt::{self, Write};
use unicode_general_category::{get_general_category, GeneralCategory};

use bstr::ByteSlice;

/// Renders bytes as a double-quoted JavaScript string literal.
pub(crate) fn js_str_inspect(s: &[u8]) -> JsStringInspector<'_> {
    JsStringInspector(s)
}

pub(crate) struct JsStringInspector<'a>(&'a [u8]);

impl<'a> fmt::Display for JsStringInspector<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for chunk in ByteSlice::utf8_chunks(self.0) {
            for char in chunk.valid().chars() {
                let esc = match char {
                    '\0' => Some("\\0"),
                    '\n' => Some("\\n"),
                    '\r' => Some("\\r"),
                    '\t' => Some("\\t"),
                    '\x0C' => Some("\\f"),
                    '\x0B' => Some("\\v"),
                    '\x08' => Some("\\b"),
                    '"' => Some("\\\""),
                    '\\' => Some("\\\\"),
                    _ => None,
                };
                if let Some(esc) = esc {
                    f.write_str(esc)?;
                } else if is_printable(char) {
                    f.write_char(char)?;
                } else if (char as u32) < 0x10000 {
                    write!(f, "\\u{:04X}", char as u32)?;
                } else {
                    write!(f, "\\u{{{:X}}}", char as u32)?;
                }
            }
            for &byte in chunk.invalid() {
                write!(f, "\\x{:02X}", byte)?;
            }
        }
        f.write_str("\"")
    }
}

fn is_printable(ch: char) -> bool {
    match get_general_category(ch) {
        GeneralCategory::Control
        | GeneralCategory::LineSeparator
        | GeneralCategory::ParagraphSeparator
        | GeneralCategory::Unassigned => false,
        GeneralCategory::Surrogate => unreachable!(),
        _ => true,
    }
}
