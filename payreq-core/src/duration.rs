//! Human readable durations for expiry countdowns.

use once_cell::sync::Lazy;
use regex::Regex;

/// Options handed to a [DurationFormatter].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    pub language: String,
    /// Languages to try, in order, when `language` is not supported.
    pub fallbacks: Vec<String>,
    /// Round the smallest shown unit instead of truncating it.
    pub round: bool,
    /// Maximum number of units shown.
    pub largest: usize,
}

impl FormatOptions {
    /// The options expiry countdowns are rendered with.
    pub fn for_locale(locale: &str) -> Self {
        let language = if locale.starts_with("zh") {
            "zh_CN".to_string()
        } else {
            locale.to_string()
        };

        Self {
            language,
            fallbacks: vec!["en".to_string()],
            round: true,
            largest: 2,
        }
    }
}

pub trait DurationFormatter {
    fn format(&self, millis: u64, options: &FormatOptions) -> String;
}

struct Unit {
    millis: u64,
    singular: &'static str,
    plural: &'static str,
}

const YEAR_MILLIS: u64 = 31_557_600_000;

const UNITS: [Unit; 7] = [
    Unit {
        millis: YEAR_MILLIS,
        singular: "year",
        plural: "years",
    },
    Unit {
        millis: YEAR_MILLIS / 12,
        singular: "month",
        plural: "months",
    },
    Unit {
        millis: 604_800_000,
        singular: "week",
        plural: "weeks",
    },
    Unit {
        millis: 86_400_000,
        singular: "day",
        plural: "days",
    },
    Unit {
        millis: 3_600_000,
        singular: "hour",
        plural: "hours",
    },
    Unit {
        millis: 60_000,
        singular: "minute",
        plural: "minutes",
    },
    Unit {
        millis: 1_000,
        singular: "second",
        plural: "seconds",
    },
];

const SUPPORTED_LANGUAGES: [&str; 1] = ["en"];

/// Built-in English duration formatter, e.g. `2 hours, 5 minutes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HumanDuration;

impl HumanDuration {
    fn resolve_language<'a>(&self, options: &'a FormatOptions) -> Option<&'a str> {
        std::iter::once(&options.language)
            .chain(options.fallbacks.iter())
            .map(String::as_str)
            .find(|lang| {
                let primary = lang.split(['-', '_']).next().unwrap_or_default();
                SUPPORTED_LANGUAGES.contains(&primary)
            })
    }
}

fn split_units(millis: u64) -> [u64; 7] {
    let mut rest = millis;
    let mut counts = [0u64; 7];
    for (count, unit) in counts.iter_mut().zip(UNITS.iter()) {
        *count = rest / unit.millis;
        rest %= unit.millis;
    }
    counts
}

impl DurationFormatter for HumanDuration {
    fn format(&self, millis: u64, options: &FormatOptions) -> String {
        if self.resolve_language(options).is_none() {
            log::debug!(
                "no duration translations for {}, using english",
                options.language
            );
        }

        let largest = options.largest.max(1);
        let first = split_units(millis)
            .iter()
            .position(|c| *c > 0)
            .unwrap_or(UNITS.len() - 1);
        let smallest = (first + largest - 1).min(UNITS.len() - 1);

        let unit = UNITS[smallest].millis;
        let millis = if options.round {
            (millis + unit / 2) / unit * unit
        } else {
            millis / unit * unit
        };

        // rounding may carry into a larger unit
        let counts = split_units(millis);
        let first = counts.iter().position(|c| *c > 0);
        let pieces: Vec<String> = match first {
            None => vec![format!("0 {}", UNITS[UNITS.len() - 1].plural)],
            Some(first) => counts
                .iter()
                .zip(UNITS.iter())
                .skip(first)
                .take(largest)
                .filter(|(count, _)| **count > 0)
                .map(|(count, unit)| match *count {
                    1 => format!("1 {}", unit.singular),
                    n => format!("{n} {}", unit.plural),
                })
                .collect(),
        };

        pieces.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    LeftToRight,
    RightToLeft,
}

const RTL_LANGUAGES: [&str; 6] = ["ar", "fa", "he", "ur", "ps", "yi"];

impl TextDirection {
    pub fn for_language(language: &str) -> Self {
        let primary = language
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        if RTL_LANGUAGES.contains(&primary.as_str()) {
            TextDirection::RightToLeft
        } else {
            TextDirection::LeftToRight
        }
    }
}

static LTR_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d) +([^,])").expect("valid regex"));
static RTL_SPACING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^,]) +(\d)").expect("valid regex"));

/// Glues numbers to their units with a non-breaking space so a countdown never wraps
/// between the two.
pub fn normalize_spacing(text: &str, direction: TextDirection) -> String {
    let pattern = match direction {
        TextDirection::LeftToRight => &LTR_SPACING,
        TextDirection::RightToLeft => &RTL_SPACING,
    };
    pattern.replace_all(text, "${1}\u{a0}${2}").into_owned()
}

/// Formats a countdown of `millis` for `locale`.
pub fn format_duration(millis: u64, locale: &str, formatter: &dyn DurationFormatter) -> String {
    let options = FormatOptions::for_locale(locale);
    normalize_spacing(
        &formatter.format(millis, &options),
        TextDirection::for_language(locale),
    )
}
