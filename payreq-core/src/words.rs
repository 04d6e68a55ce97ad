//! Conversions between bech32 5-bit words and the values carried by tagged fields.

use bech32::{u5, FromBase32, Variant};
use hex_conservative::DisplayHex;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::PayReqError;

/// Human readable part used to re-encode the payload of tags we do not understand.
pub const UNKNOWN_TAG_HRP: &str = "unknown";

/// Interprets the words as a big-endian base-32 integer.
///
/// Returns `None` if the value does not fit into a `u64`.
pub fn words_to_int_be(words: &[u5]) -> Option<u64> {
    words.iter().try_fold(0u64, |total, word| {
        total.checked_mul(32)?.checked_add(word.to_u8() as u64)
    })
}

fn words_to_bytes(words: &[u5]) -> Option<Vec<u8>> {
    Vec::<u8>::from_base32(words).ok()
}

/// Repacks the words into bytes and renders them as lowercase hex.
///
/// Returns `None` when the words are not byte-aligned or carry non-zero padding.
pub fn words_to_hex(words: &[u5]) -> Option<String> {
    words_to_bytes(words).map(|bytes| bytes.as_slice().to_lower_hex_string())
}

/// Repacks the words into bytes and reads them as UTF-8.
pub fn words_to_utf8(words: &[u5]) -> Option<String> {
    words_to_bytes(words).and_then(|bytes| String::from_utf8(bytes).ok())
}

/// Raw payload of a tag without a registered parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownTag {
    pub tag_code: u8,
    /// The payload words bech32 encoded under [UNKNOWN_TAG_HRP].
    pub words: String,
}

impl UnknownTag {
    /// Decodes the preserved payload back into words.
    pub fn payload(&self) -> Result<Vec<u5>, PayReqError> {
        unknown_tag_words(&self.words)
    }
}

pub fn unknown_tag_value(tag_code: u8, words: &[u5]) -> UnknownTag {
    let words = match bech32::encode(UNKNOWN_TAG_HRP, words, Variant::Bech32) {
        Ok(encoded) => encoded,
        Err(e) => {
            warn!("could not preserve payload of tag {tag_code}: {e}");
            String::new()
        }
    };

    UnknownTag { tag_code, words }
}

pub fn unknown_tag_words(encoded: &str) -> Result<Vec<u5>, PayReqError> {
    let (_, words, _) = bech32::decode(encoded)?;
    Ok(words)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::*;
    use bech32::ToBase32;

    #[test]
    fn test_words_to_int_be() {
        assert_eq!(words_to_int_be(&u5s(&[])), Some(0));
        assert_eq!(words_to_int_be(&u5s(&[1, 3])), Some(35));
        assert_eq!(words_to_int_be(&u5s(&[3, 16, 16])), Some(3600));
        // pj429x7
        assert_eq!(
            words_to_int_be(&u5s(&[1, 18, 21, 10, 5, 6, 30])),
            Some(1700074718)
        );
        assert_eq!(words_to_int_be(&u5s(&[31; 13])), None);
    }

    #[test]
    fn test_words_to_hex() {
        let words = [0xde_u8, 0xad, 0xbe, 0xef].to_base32();
        assert_eq!(words_to_hex(&words), Some("deadbeef".to_string()));
        assert_eq!(words_to_hex(&[]), Some(String::new()));

        // a single word can never hold a whole byte
        assert_eq!(words_to_hex(&u5s(&[1])), None);
        // non-zero padding bits
        assert_eq!(words_to_hex(&u5s(&[0, 1])), None);
    }

    #[test]
    fn test_words_to_utf8() {
        let words = "coffee ☕".as_bytes().to_base32();
        assert_eq!(words_to_utf8(&words), Some("coffee ☕".to_string()));

        let invalid = [0xff_u8, 0xfe].to_base32();
        assert_eq!(words_to_utf8(&invalid), None);
    }

    #[test]
    fn test_unknown_tag_round_trip() {
        let payload = u5s(&[4, 8, 15, 16, 23, 31, 0]);
        let value = unknown_tag_value(5, &payload);

        assert_eq!(value.tag_code, 5);
        assert!(value.words.starts_with("unknown1"));
        assert_eq!(value.payload().unwrap(), payload);
    }

    #[test]
    fn test_unknown_tag_serializes_camel_case() {
        let value = unknown_tag_value(30, &[]);
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["tagCode"], 30);
        assert!(json["words"].as_str().unwrap().starts_with("unknown1"));
    }
}
