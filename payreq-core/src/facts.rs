//! Facts derived from a backend record together with its decoded payment request.
//!
//! Backends disagree on where amounts, fees and expiry live. Every fact here walks a
//! fixed precedence chain over the candidates and falls back to a neutral value rather
//! than failing, so a record whose payment request does not decode still renders.

use log::debug;
use serde_json::Value;

use crate::config::FactsConfig;
use crate::duration::{format_duration, DurationFormatter, HumanDuration};
use crate::error::PayReqError;
use crate::invoice::{decode_with, DecodedInvoice};
use crate::records::{AmountFields, Backend, FeeFields, InvoiceRecord, PaymentRecord};
use crate::tags::DEFAULT_EXPIRY_SECS;
use crate::utils::Clock;

/// The first candidate that is present and not zero.
pub fn first_nonzero<I>(candidates: I) -> Option<u64>
where
    I: IntoIterator<Item = Option<u64>>,
{
    candidates.into_iter().flatten().find(|v| *v != 0)
}

/// The first candidate that is present and not an empty string.
pub fn first_non_empty<'a, I>(candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    candidates.into_iter().flatten().find(|v| !v.is_empty())
}

pub fn amount_sats(fields: &AmountFields, decoded: Option<&DecodedInvoice>) -> u64 {
    first_nonzero([
        fields.amount_msat.map(|msat| msat / 1000),
        fields.value_sat,
        fields.value,
        fields.msatoshi_sent.map(|msat| msat / 1000),
        fields.amount_sent_msat.map(|msat| msat / 1000),
        decoded.and_then(|d| d.amount_msat()).map(|msat| msat / 1000),
    ])
    .unwrap_or_default()
}

/// Renders millisatoshis as a decimal amount of sats, e.g. `1500` as `1.5`.
pub fn msat_to_sats_string(msat: u64) -> String {
    let sats = msat / 1000;
    match msat % 1000 {
        0 => sats.to_string(),
        fraction => {
            let fraction = format!("{fraction:03}");
            format!("{sats}.{}", fraction.trim_end_matches('0'))
        }
    }
}

pub fn fee_sats(fields: &FeeFields) -> String {
    if let Some(sats) = first_nonzero([fields.fee_sat]) {
        return sats.to_string();
    }

    let msat = first_nonzero([
        fields.fee_msat,
        fields
            .amount_sent_msat
            .zip(fields.amount_msat)
            .map(|(sent, amount)| sent.saturating_sub(amount)),
    ]);
    msat.map(msat_to_sats_string)
        .unwrap_or_else(|| "0".to_string())
}

fn decode_request(payment_request: Option<&str>, config: &FactsConfig) -> Option<DecodedInvoice> {
    let payment_request = payment_request?;
    match decode_with(payment_request, config.parse_mode) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            debug!("could not decode payment request: {e}");
            None
        }
    }
}

/// An outgoing payment with its payment request decoded once up front.
#[derive(Debug, Clone, PartialEq)]
pub struct Payment {
    record: PaymentRecord,
    decoded: Option<DecodedInvoice>,
}

impl Payment {
    pub fn new(record: PaymentRecord, config: &FactsConfig) -> Self {
        let decoded = decode_request(record.payment_request(), config);
        Self { record, decoded }
    }

    pub fn from_json(
        backend: Backend,
        value: Value,
        config: &FactsConfig,
    ) -> Result<Self, PayReqError> {
        Ok(Self::new(PaymentRecord::from_json(backend, value)?, config))
    }

    pub fn record(&self) -> &PaymentRecord {
        &self.record
    }

    pub fn decoded(&self) -> Option<&DecodedInvoice> {
        self.decoded.as_ref()
    }

    pub fn amount_sats(&self) -> u64 {
        amount_sats(&self.record.amount_fields(), self.decoded())
    }

    pub fn fee_sats(&self) -> String {
        fee_sats(&self.record.fee_fields())
    }

    /// The node the payment went to.
    pub fn destination(&self) -> Option<&str> {
        first_non_empty([
            self.record.destination(),
            self.decoded().and_then(|d| d.payee()),
        ])
    }

    pub fn memo(&self) -> Option<&str> {
        self.decoded().and_then(|d| d.description())
    }

    pub fn payment_hash(&self) -> Option<&str> {
        self.decoded().and_then(|d| d.payment_hash())
    }

    pub fn timestamp(&self) -> u64 {
        first_nonzero([
            self.decoded().map(|d| d.timestamp()),
            self.record.created_at(),
        ])
        .unwrap_or_default()
    }
}

/// An incoming invoice with its payment request decoded once up front.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    record: InvoiceRecord,
    decoded: Option<DecodedInvoice>,
    apply_default_expiry: bool,
    never_label: String,
    expired_label: String,
}

impl Invoice {
    pub fn new(record: InvoiceRecord, config: &FactsConfig) -> Self {
        let decoded = decode_request(record.payment_request(), config);
        Self {
            record,
            decoded,
            apply_default_expiry: config.apply_default_expiry,
            never_label: config.never_label.clone(),
            expired_label: config.expired_label.clone(),
        }
    }

    pub fn from_json(
        backend: Backend,
        value: Value,
        config: &FactsConfig,
    ) -> Result<Self, PayReqError> {
        Ok(Self::new(InvoiceRecord::from_json(backend, value)?, config))
    }

    pub fn record(&self) -> &InvoiceRecord {
        &self.record
    }

    pub fn decoded(&self) -> Option<&DecodedInvoice> {
        self.decoded.as_ref()
    }

    pub fn amount_sats(&self) -> u64 {
        amount_sats(&self.record.amount_fields(), self.decoded())
    }

    pub fn memo(&self) -> Option<&str> {
        self.decoded().and_then(|d| d.description())
    }

    pub fn timestamp(&self) -> u64 {
        first_nonzero([
            self.decoded().map(|d| d.timestamp()),
            self.record.expires_at(),
            self.record.created_at(),
        ])
        .unwrap_or_default()
    }

    pub fn is_paid(&self) -> bool {
        self.record.is_paid()
    }

    /// Seconds the invoice was valid for when it was created, `None` if it never expires.
    pub fn original_time_until_expiry_secs(&self) -> Option<i64> {
        let decoded = self.decoded()?;
        if let Some(expires_at) = self.record.expires_at() {
            let created = i64::try_from(decoded.timestamp()).ok()?;
            return i64::try_from(expires_at).ok()?.checked_sub(created);
        }

        match decoded.expiry() {
            Some(expiry) => i64::try_from(expiry).ok(),
            None if self.apply_default_expiry => Some(DEFAULT_EXPIRY_SECS as i64),
            None => None,
        }
    }

    /// Unix seconds at which the invoice stops being payable, counted from the creation
    /// time inside the payment request.
    pub fn expiry_unix_timestamp(&self) -> Option<i64> {
        let created = i64::try_from(self.decoded()?.timestamp()).ok()?;
        created.checked_add(self.original_time_until_expiry_secs()?)
    }

    pub fn remaining_millis_until_expiry(&self, clock: &dyn Clock) -> Option<i64> {
        let now = i64::try_from(clock.now_millis()).ok()?;
        self.expiry_unix_timestamp()?
            .checked_mul(1000)?
            .checked_sub(now)
    }

    pub fn is_expired(&self, clock: &dyn Clock) -> bool {
        self.remaining_millis_until_expiry(clock)
            .map_or(false, |remaining| remaining <= 0)
    }

    pub fn formatted_original_time_until_expiry(&self, locale: &str) -> String {
        self.formatted_original_time_until_expiry_with(locale, &HumanDuration)
    }

    pub fn formatted_original_time_until_expiry_with(
        &self,
        locale: &str,
        formatter: &dyn DurationFormatter,
    ) -> String {
        self.format_countdown(
            self.original_time_until_expiry_secs()
                .and_then(|s| s.checked_mul(1000)),
            locale,
            formatter,
        )
    }

    pub fn formatted_time_until_expiry(&self, locale: &str, clock: &dyn Clock) -> String {
        self.formatted_time_until_expiry_with(locale, clock, &HumanDuration)
    }

    pub fn formatted_time_until_expiry_with(
        &self,
        locale: &str,
        clock: &dyn Clock,
        formatter: &dyn DurationFormatter,
    ) -> String {
        self.format_countdown(self.remaining_millis_until_expiry(clock), locale, formatter)
    }

    fn format_countdown(
        &self,
        millis: Option<i64>,
        locale: &str,
        formatter: &dyn DurationFormatter,
    ) -> String {
        match millis {
            None => self.never_label.clone(),
            Some(millis) if millis <= 0 => self.expired_label.clone(),
            Some(millis) => format_duration(millis as u64, locale, formatter),
        }
    }
}
