use bech32::{u5, Variant};

use crate::utils::FixedClock;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

/// Regtest invoice for 1230n created at 1700074718 with an expiry of one hour.
pub const REGTEST_INVOICE: &str = "lnbcrt1230n1pj429x7pp57t97q4awqj3f529snr0pa6senk83sq5pp760qf5a4jzvd7xgwcksdqqcqzzsxqrrsssp57eqtv7vxr46arupna3w4ct0lkf2mqmz9wt044cwkks0rwlnhfr5s9qyyssqragwpwav7nfwv2xyuuamxxj4pnnpzv2hlw7j473repd3sq7st698ta9kmzmygt0w7tmncl56a6mnma0w7e5dlpqd0wy6x3v35rssldspjhh8p0";
pub const REGTEST_INVOICE_TIMESTAMP: u64 = 1700074718;
pub const REGTEST_INVOICE_PAYMENT_HASH: &str =
    "f2cbe057ae04a29a28b098de1eea199d8f1802810fb4f0269dac84c6f8c8762d";

pub fn u5s(values: &[u8]) -> Vec<u5> {
    values
        .iter()
        .map(|v| u5::try_from_u8(*v).unwrap())
        .collect()
}

/// Writes `value` as `n` big-endian words.
pub fn int_words(value: u64, n: usize) -> Vec<u5> {
    (0..n)
        .rev()
        .map(|i| u5::try_from_u8(((value >> (5 * i)) & 31) as u8).unwrap())
        .collect()
}

pub fn timestamp_words(timestamp: u64) -> Vec<u5> {
    int_words(timestamp, 7)
}

pub fn tagged_field(code: u8, payload: &[u5]) -> Vec<u5> {
    let mut words = u5s(&[code]);
    words.extend(int_words(payload.len() as u64, 2));
    words.extend_from_slice(payload);
    words
}

/// The letters the given words are written as in a bech32 string.
pub fn data_letters(words: &[u5]) -> String {
    words
        .iter()
        .map(|w| CHARSET[w.to_u8() as usize] as char)
        .collect()
}

/// Builds a payment request around the given timestamp and tagged field words, with
/// an all zero signature.
pub fn encode_invoice(hrp: &str, words: &[u5]) -> String {
    let mut data = words.to_vec();
    data.extend(u5s(&[0; 104]));
    bech32::encode(hrp, data, Variant::Bech32).unwrap()
}

/// Payment request with a description, an expiry and a payee, created at `timestamp`.
pub fn invoice_with(timestamp: u64, description: &str, expiry: Option<u64>) -> String {
    use bech32::ToBase32;

    let mut words = timestamp_words(timestamp);
    words.extend(tagged_field(1, &[3u8; 32].to_base32()));
    words.extend(tagged_field(13, &description.as_bytes().to_base32()));
    words.extend(tagged_field(19, &PAYEE.to_base32()));
    if let Some(expiry) = expiry {
        words.extend(tagged_field(6, &int_words(expiry, 4)));
    }
    encode_invoice("lnbc2500u", &words)
}

pub const PAYEE: [u8; 33] = [
    0x03, 0xe7, 0x15, 0x6a, 0xe3, 0x3b, 0x0a, 0x20, 0x8d, 0x07, 0x44, 0x19, 0x91, 0x63, 0x17,
    0x7e, 0x90, 0x9e, 0x80, 0x17, 0x6e, 0x55, 0xd9, 0x7a, 0x2f, 0x22, 0x1e, 0xde, 0x0f, 0x93,
    0x4d, 0xd9, 0xad,
];
pub const PAYEE_HEX: &str = "03e7156ae33b0a208d0744199163177e909e80176e55d97a2f221ede0f934dd9ad";

pub fn fixed_clock(unix_secs: u64) -> FixedClock {
    FixedClock(unix_secs * 1000)
}
