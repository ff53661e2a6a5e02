//! Encode/decode block ids for use as keys inside `Structure.blocks`.
//!
//! Block ids are user-assigned strings that may contain characters illegal
//! in a document map key — MongoDB rejects keys containing `.` or a
//! leading `$`. `encode` maps those characters to a reversible escape
//! sequence built from `．` (fullwidth full stop) and `＄` (fullwidth
//! dollar sign), so that `decode(encode(x)) == x` for every admissible `x`.

lazy_static::lazy_static! {
    static ref ENCODE_DOT: regex::Regex = regex::Regex::new(r"\.").unwrap();
    static ref ENCODE_DOLLAR: regex::Regex = regex::Regex::new(r"^\$").unwrap();
    static ref DECODE_DOT: regex::Regex = regex::Regex::new("\u{FF0E}").unwrap();
    static ref DECODE_DOLLAR: regex::Regex = regex::Regex::new("^\u{FF04}").unwrap();
}

pub struct KeyEncoder;

impl KeyEncoder {
    /// Escape a block id for use as a `Structure.blocks` key.
    pub fn encode(id: &str) -> String {
        let escaped = ENCODE_DOT.replace_all(id, "\u{FF0E}");
        ENCODE_DOLLAR.replace(&escaped, "\u{FF04}").into_owned()
    }

    /// Invert [KeyEncoder::encode]. `decode(encode(x)) == x` for every `x`.
    pub fn decode(key: &str) -> String {
        let unescaped = DECODE_DOT.replace_all(key, ".");
        DECODE_DOLLAR.replace(&unescaped, "$").into_owned()
    }
}

#[cfg(test)]
#[path = "keys_test.rs"]
mod keys_test;
