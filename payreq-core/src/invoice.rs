use bech32::Variant;
use log::{debug, trace};
use serde::Serialize;
use serde_json::Value;

use crate::error::PayReqError;
use crate::network::{resolve_network, HrpParts, NetworkParams};
use crate::parser::{parse_sections, ParseMode};
use crate::tags;
use crate::words::UnknownTag;

/// Words taken up by the recoverable signature at the end of the data part.
const SIGNATURE_WORDS: usize = 104;

/// Decoded payload of a [Section].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SectionValue {
    None,
    Network(NetworkParams),
    Timestamp(u64),
    Hex(Option<String>),
    Utf8(Option<String>),
    Integer(Option<u64>),
    Unknown(UnknownTag),
}

/// A consecutive piece of a payment request and what it decoded to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<char>,
    /// The characters of the payment request this section was read from.
    pub letters: String,
    pub value: SectionValue,
}

impl Section {
    pub(crate) fn fixed(name: &'static str, letters: &str, value: SectionValue) -> Self {
        Section {
            name,
            tag: None,
            letters: letters.to_string(),
            value,
        }
    }
}

/// A BOLT11 payment request split into its sections, in wire order.
///
/// The first four sections are always `lightning_network`, `coin_network`, `separator`
/// and `timestamp`; the tagged fields follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedInvoice {
    payment_request: String,
    sections: Vec<Section>,
    timestamp: u64,
    #[serde(skip)]
    hrp: HrpParts,
}

impl DecodedInvoice {
    /// The decoded payment request, lower-cased.
    pub fn payment_request(&self) -> &str {
        &self.payment_request
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Creation time in unix seconds.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn network(&self) -> &NetworkParams {
        &self.hrp.network
    }

    /// The amount requested in the human readable part, in millisatoshis.
    pub fn amount_msat(&self) -> Option<u64> {
        self.hrp.amount_msat()
    }

    /// First section with the given name.
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// Seconds after [Self::timestamp] the request expires, if it carries an `expiry` tag.
    ///
    /// Callers must assume [tags::DEFAULT_EXPIRY_SECS] when this is `None`.
    pub fn expiry(&self) -> Option<u64> {
        self.integer(tags::EXPIRY)
    }

    pub fn expiry_or_default(&self) -> u64 {
        self.expiry().unwrap_or(tags::DEFAULT_EXPIRY_SECS)
    }

    pub fn min_final_cltv_expiry(&self) -> Option<u64> {
        self.integer(tags::MIN_FINAL_CLTV_EXPIRY)
    }

    pub fn min_final_cltv_expiry_or_default(&self) -> u64 {
        self.min_final_cltv_expiry()
            .unwrap_or(tags::DEFAULT_MIN_FINAL_CLTV_EXPIRY)
    }

    pub fn payment_hash(&self) -> Option<&str> {
        self.text(tags::PAYMENT_HASH)
    }

    pub fn payment_secret(&self) -> Option<&str> {
        self.text(tags::PAYMENT_SECRET)
    }

    pub fn description(&self) -> Option<&str> {
        self.text(tags::DESCRIPTION)
    }

    pub fn description_hash(&self) -> Option<&str> {
        self.text(tags::DESCRIPTION_HASH)
    }

    /// Hex encoded compressed public key of the payee, if the request names one.
    pub fn payee(&self) -> Option<&str> {
        self.text(tags::PAYEE)
    }

    pub fn metadata(&self) -> Option<&str> {
        self.text(tags::METADATA)
    }

    /// Tags that were kept as raw payloads.
    pub fn unknown_tags(&self) -> impl Iterator<Item = &UnknownTag> {
        self.sections.iter().filter_map(|s| match &s.value {
            SectionValue::Unknown(tag) => Some(tag),
            _ => None,
        })
    }

    fn text(&self, name: &str) -> Option<&str> {
        match &self.section(name)?.value {
            SectionValue::Hex(value) | SectionValue::Utf8(value) => value.as_deref(),
            _ => None,
        }
    }

    fn integer(&self, name: &str) -> Option<u64> {
        match self.section(name)?.value {
            SectionValue::Integer(value) => value,
            _ => None,
        }
    }
}

/// Decodes a BOLT11 payment request.
pub fn decode(payment_request: &str) -> Result<DecodedInvoice, PayReqError> {
    decode_with(payment_request, ParseMode::default())
}

/// Decodes a payment request handed over as JSON, failing if it is not a string.
pub fn decode_value(payment_request: &Value) -> Result<DecodedInvoice, PayReqError> {
    let payment_request = payment_request
        .as_str()
        .ok_or(PayReqError::TypeMismatch)?;
    decode(payment_request)
}

pub fn decode_with(payment_request: &str, mode: ParseMode) -> Result<DecodedInvoice, PayReqError> {
    let starts_with_ln = payment_request
        .get(..2)
        .map_or(false, |p| p.eq_ignore_ascii_case("ln"));
    if !starts_with_ln {
        return Err(PayReqError::NotAnInvoice);
    }

    let (prefix, words, variant) = bech32::decode(payment_request).map_err(|e| {
        debug!("payment request failed bech32 validation: {e}");
        PayReqError::from(e)
    })?;
    if variant == Variant::Bech32m {
        return Err(PayReqError::InvalidEncoding(bech32::Error::InvalidChecksum));
    }

    let payment_request = payment_request.to_lowercase();
    let letters = payment_request.get(prefix.len() + 1..).unwrap_or_default();
    let words = &words[..words.len().saturating_sub(SIGNATURE_WORDS)];

    let hrp = resolve_network(&prefix)?;
    let (sections, timestamp) = parse_sections(&hrp, words, letters, mode);

    trace!(
        "decoded payment request on {} into {} sections",
        hrp.network.bech32_prefix,
        sections.len()
    );

    Ok(DecodedInvoice {
        payment_request,
        sections,
        timestamp,
        hrp,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::network::REGTEST;
    use crate::parser::{COIN_NETWORK, LIGHTNING_NETWORK, SEPARATOR, TIMESTAMP};
    use crate::test_utils::*;
    use bech32::ToBase32;

    #[test]
    fn test_decode_known_invoice() {
        let decoded = decode(REGTEST_INVOICE).unwrap();

        assert_eq!(decoded.timestamp(), REGTEST_INVOICE_TIMESTAMP);
        assert_eq!(decoded.expiry(), Some(3600));
        assert_eq!(decoded.payment_request(), REGTEST_INVOICE.to_lowercase());
        assert_eq!(decoded.network(), &REGTEST);
        assert_eq!(decoded.amount_msat(), Some(123_000));
        assert_eq!(decoded.payment_hash(), Some(REGTEST_INVOICE_PAYMENT_HASH));
        assert_eq!(decoded.description(), Some(""));
        assert_eq!(decoded.min_final_cltv_expiry(), Some(80));

        let names: Vec<_> = decoded.sections().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                LIGHTNING_NETWORK,
                COIN_NETWORK,
                SEPARATOR,
                TIMESTAMP,
                tags::PAYMENT_HASH,
                tags::DESCRIPTION,
                tags::MIN_FINAL_CLTV_EXPIRY,
                tags::EXPIRY,
            ]
        );
        assert_eq!(decoded.sections()[3].letters, "pj429x7");
        assert_eq!(decoded.section(tags::EXPIRY).unwrap().letters, "xqrrss");
        assert_eq!(decoded.section(tags::EXPIRY).unwrap().tag, Some('x'));

        // the payment secret follows the expiry tag and is dropped
        assert_eq!(decoded.payment_secret(), None);
    }

    #[test]
    fn test_decode_is_deterministic() {
        assert_eq!(decode(REGTEST_INVOICE).unwrap(), decode(REGTEST_INVOICE).unwrap());
    }

    #[test]
    fn test_decode_upper_case() {
        let decoded = decode(&REGTEST_INVOICE.to_uppercase()).unwrap();
        assert_eq!(decoded, decode(REGTEST_INVOICE).unwrap());
    }

    #[test]
    fn test_decode_exhaustive() {
        let decoded = decode_with(REGTEST_INVOICE, ParseMode::Exhaustive).unwrap();

        assert_eq!(
            decoded.payment_secret(),
            Some("f640b679861d75d1f033ec5d5c2dffb255b06c4572df5ae1d6b41e377e7748e9")
        );
        // the features field has no parser
        let unknown: Vec<_> = decoded.unknown_tags().collect();
        assert_eq!(unknown.len(), 1);
        assert_eq!(unknown[0].tag_code, 5);
        assert_eq!(unknown[0].payload().unwrap().len(), 4);
    }

    #[test]
    fn test_decode_rejects_non_invoices() {
        let missing_ln = REGTEST_INVOICE.trim_start_matches("ln");
        assert_eq!(decode(missing_ln), Err(PayReqError::NotAnInvoice));
        assert_eq!(decode(""), Err(PayReqError::NotAnInvoice));
        assert_eq!(decode("l"), Err(PayReqError::NotAnInvoice));
    }

    #[test]
    fn test_decode_bad_checksum() {
        let mut corrupted = REGTEST_INVOICE.to_string();
        corrupted.pop();
        corrupted.push('q');
        assert!(matches!(
            decode(&corrupted),
            Err(PayReqError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_decode_unknown_network() {
        let words = timestamp_words(1);
        let invoice = encode_invoice("lnxy", &words);
        assert_eq!(
            decode(&invoice),
            Err(PayReqError::UnknownNetwork("xy".to_string()))
        );
    }

    #[test]
    fn test_decode_value_type_mismatch() {
        assert_eq!(
            decode_value(&serde_json::json!(42)),
            Err(PayReqError::TypeMismatch)
        );
        assert_eq!(
            decode_value(&serde_json::json!(REGTEST_INVOICE)).unwrap(),
            decode(REGTEST_INVOICE).unwrap()
        );
    }

    #[test]
    fn test_unknown_tag_preserved() {
        let payload = u5s(&[7, 7, 7, 1, 2]);
        let mut words = timestamp_words(1_600_000_000);
        words.extend(tagged_field(30, &payload));
        let decoded = decode(&encode_invoice("lntb", &words)).unwrap();

        let section = decoded.section(tags::UNKNOWN_TAG).unwrap();
        match &section.value {
            SectionValue::Unknown(tag) => {
                assert_eq!(tag.tag_code, 30);
                assert_eq!(tag.payload().unwrap(), payload);
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn test_early_exit_on_expiry() {
        let mut words = timestamp_words(1_600_000_000);
        words.extend(tagged_field(13, &"coffee".as_bytes().to_base32()));
        words.extend(tagged_field(6, &u5s(&[1, 28])));
        words.extend(tagged_field(1, &[7u8; 32].to_base32()));
        let invoice = encode_invoice("lnbc10u", &words);

        let decoded = decode(&invoice).unwrap();
        assert_eq!(decoded.sections().last().unwrap().name, tags::EXPIRY);
        assert_eq!(decoded.expiry(), Some(60));
        assert_eq!(decoded.description(), Some("coffee"));
        assert_eq!(decoded.payment_hash(), None);

        let decoded = decode_with(&invoice, ParseMode::Exhaustive).unwrap();
        assert_eq!(decoded.payment_hash(), Some("07".repeat(32).as_str()));
    }

    #[test]
    fn test_expiry_default() {
        let mut words = timestamp_words(1_600_000_000);
        words.extend(tagged_field(1, &[1u8; 32].to_base32()));
        let decoded = decode(&encode_invoice("lnbc", &words)).unwrap();

        assert_eq!(decoded.expiry(), None);
        assert_eq!(decoded.expiry_or_default(), 3600);
        assert_eq!(decoded.min_final_cltv_expiry(), None);
        assert_eq!(decoded.min_final_cltv_expiry_or_default(), 9);
        assert_eq!(decoded.amount_msat(), None);
    }

    #[test]
    fn test_serialize_decoded_invoice() {
        let json = serde_json::to_value(decode(REGTEST_INVOICE).unwrap()).unwrap();

        assert_eq!(json["timestamp"], 1700074718);
        assert_eq!(json["paymentRequest"], REGTEST_INVOICE);
        assert_eq!(json["sections"][0]["name"], "lightning_network");
        assert_eq!(json["sections"][0]["value"], serde_json::Value::Null);
        assert_eq!(json["sections"][1]["value"]["bech32"], "bcrt");
        assert_eq!(json["sections"][7]["tag"], "x");
        assert_eq!(json["sections"][7]["value"], 3600);
    }
}
