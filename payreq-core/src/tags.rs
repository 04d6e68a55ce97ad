//! Registry of the tagged fields a payment request may carry.

use std::collections::HashMap;

use bech32::u5;
use once_cell::sync::Lazy;

use crate::invoice::SectionValue;
use crate::words::{unknown_tag_value, words_to_hex, words_to_int_be, words_to_utf8};

pub const PAYMENT_HASH: &str = "payment_hash";
pub const PAYMENT_SECRET: &str = "payment_secret";
pub const DESCRIPTION: &str = "description";
pub const PAYEE: &str = "payee";
pub const DESCRIPTION_HASH: &str = "description_hash";
pub const EXPIRY: &str = "expiry";
pub const MIN_FINAL_CLTV_EXPIRY: &str = "min_final_cltv_expiry";
pub const FALLBACK_ADDRESS: &str = "fallback_address";
pub const METADATA: &str = "metadata";
pub const UNKNOWN_TAG: &str = "unknown_tag";

/// Expiry in seconds to assume when a payment request has no `expiry` tag.
pub const DEFAULT_EXPIRY_SECS: u64 = 3600;
/// Final CLTV delta to assume when a payment request has no `min_final_cltv_expiry` tag.
pub const DEFAULT_MIN_FINAL_CLTV_EXPIRY: u64 = 9;

const TAG_CODES: [(&str, u8); 9] = [
    (PAYMENT_HASH, 1),
    (PAYMENT_SECRET, 16),
    (DESCRIPTION, 13),
    (PAYEE, 19),
    // commits to longer descriptions, used by lnurl-pay
    (DESCRIPTION_HASH, 23),
    (EXPIRY, 6),
    (MIN_FINAL_CLTV_EXPIRY, 24),
    (FALLBACK_ADDRESS, 9),
    (METADATA, 27),
];

static TAG_NAMES: Lazy<HashMap<u8, &'static str>> =
    Lazy::new(|| TAG_CODES.iter().map(|(name, code)| (*code, *name)).collect());

/// How the payload words of a tag are turned into a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagParser {
    Hex,
    Utf8,
    Integer,
    /// Keeps the payload as is, for tags without a dedicated parser.
    Raw,
}

impl TagParser {
    fn for_code(code: u8) -> Self {
        match code {
            // payment_hash, payment_secret, payee, description_hash, metadata
            1 | 16 | 19 | 23 | 27 => TagParser::Hex,
            13 => TagParser::Utf8,
            6 | 24 => TagParser::Integer,
            _ => TagParser::Raw,
        }
    }

    pub fn parse(&self, code: u8, words: &[u5]) -> SectionValue {
        match self {
            TagParser::Hex => SectionValue::Hex(words_to_hex(words)),
            TagParser::Utf8 => SectionValue::Utf8(words_to_utf8(words)),
            TagParser::Integer => SectionValue::Integer(words_to_int_be(words)),
            TagParser::Raw => SectionValue::Unknown(unknown_tag_value(code, words)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagEntry {
    pub code: u8,
    pub name: &'static str,
    pub parser: TagParser,
}

/// Looks up a tag code, falling back to an `unknown_tag` entry that preserves the payload.
pub fn lookup(code: u8) -> TagEntry {
    TagEntry {
        code,
        name: TAG_NAMES.get(&code).copied().unwrap_or(UNKNOWN_TAG),
        parser: TagParser::for_code(code),
    }
}

/// The tag code registered for a name.
pub fn code_for(name: &str) -> Option<u8> {
    TAG_CODES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, code)| *code)
}
