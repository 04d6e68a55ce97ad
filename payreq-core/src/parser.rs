use bech32::u5;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::invoice::{Section, SectionValue};
use crate::network::HrpParts;
use crate::tags;
use crate::words::words_to_int_be;

pub const LIGHTNING_NETWORK: &str = "lightning_network";
pub const COIN_NETWORK: &str = "coin_network";
pub const SEPARATOR: &str = "separator";
pub const TIMESTAMP: &str = "timestamp";

const TIMESTAMP_WORDS: usize = 7;
const TAG_LENGTH_WORDS: usize = 2;

/// Where the tagged field stream stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Stop right after an `expiry` tag; anything following it is dropped.
    #[default]
    StopAtExpiry,
    /// Read tagged fields until the words run out.
    Exhaustive,
}

/// Consumes words and their letters in lock step. Reading past the end yields
/// whatever is left rather than failing.
struct WordCursor<'a> {
    words: &'a [u5],
    letters: &'a str,
}

impl<'a> WordCursor<'a> {
    fn take_words(&mut self, n: usize) -> &'a [u5] {
        let (head, tail) = self.words.split_at(n.min(self.words.len()));
        self.words = tail;
        head
    }

    fn take_letters(&mut self, n: usize) -> &'a str {
        let mut end = n.min(self.letters.len());
        while !self.letters.is_char_boundary(end) {
            end -= 1;
        }
        let (head, tail) = self.letters.split_at(end);
        self.letters = tail;
        head
    }

    fn next_letter(&self) -> Option<char> {
        self.letters.chars().next()
    }

    fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Splits the data words of a payment request into ordered sections.
///
/// `words` holds the timestamp and tagged fields (signature already trimmed) and
/// `letters` the lower-cased data part they were read from.
pub(crate) fn parse_sections(
    hrp: &HrpParts,
    words: &[u5],
    letters: &str,
    mode: ParseMode,
) -> (Vec<Section>, u64) {
    let mut sections = vec![
        Section::fixed(LIGHTNING_NETWORK, "ln", SectionValue::None),
        Section::fixed(
            COIN_NETWORK,
            hrp.network.bech32_prefix,
            SectionValue::Network(hrp.network),
        ),
        Section::fixed(SEPARATOR, "1", SectionValue::None),
    ];

    let mut cursor = WordCursor { words, letters };

    // 35 bits always fit
    let timestamp = words_to_int_be(cursor.take_words(TIMESTAMP_WORDS)).unwrap_or_default();
    sections.push(Section {
        name: TIMESTAMP,
        tag: None,
        letters: cursor.take_letters(TIMESTAMP_WORDS).to_string(),
        value: SectionValue::Timestamp(timestamp),
    });

    // there is no tag count to go on, so keep hacking off words until none are left
    while !cursor.is_empty() {
        let code = cursor.take_words(1)[0].to_u8();
        let entry = tags::lookup(code);

        let length = words_to_int_be(cursor.take_words(TAG_LENGTH_WORDS)).unwrap_or_default();
        let length = length as usize;
        let payload = cursor.take_words(length);

        let tag = cursor.next_letter();
        let letters = cursor.take_letters(1 + TAG_LENGTH_WORDS + length);
        sections.push(Section {
            name: entry.name,
            tag,
            letters: letters.to_string(),
            value: entry.parser.parse(code, payload),
        });

        if payload.len() < length {
            trace!(
                "tag {} declared {length} words but only {} remained",
                entry.name,
                payload.len()
            );
        }

        if mode == ParseMode::StopAtExpiry && entry.name == tags::EXPIRY {
            break;
        }
    }

    (sections, timestamp)
}
