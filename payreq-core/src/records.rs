//! Payment and invoice listings as the supported backends report them.
//!
//! Each backend spells amounts, fees and expiry differently. The records keep the
//! native spelling and project it onto [AmountFields], [FeeFields] and friends, which
//! the fact functions in [crate::facts] consume.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::PayReqError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    Lnd,
    /// Core Lightning through its REST interface.
    #[serde(rename = "cln-rest")]
    Clightning,
    Lndhub,
    /// A Cashu mint quote.
    Cashu,
}

impl FromStr for Backend {
    type Err = PayReqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lnd" | "embedded-lnd" | "lightning-node-connect" => Ok(Backend::Lnd),
            "cln-rest" | "clightning" | "c-lightning-REST" | "core-lightning" => {
                Ok(Backend::Clightning)
            }
            "lndhub" => Ok(Backend::Lndhub),
            "cashu" => Ok(Backend::Cashu),
            other => Err(PayReqError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Lnd => write!(f, "lnd"),
            Backend::Clightning => write!(f, "cln-rest"),
            Backend::Lndhub => write!(f, "lndhub"),
            Backend::Cashu => write!(f, "cashu"),
        }
    }
}

/// Reads an amount that may come as a number, a numeric string or a string with a
/// `msat`/`sat` unit suffix. Anything else, like Core Lightning's `"any"`, is absent.
fn lenient_amount<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(parse_amount))
}

pub(crate) fn parse_amount(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => {
            let s = s.trim();
            let s = s
                .strip_suffix("msat")
                .or_else(|| s.strip_suffix("sat"))
                .unwrap_or(s);
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.max(0.0) as u64))
        }
        _ => None,
    }
}

/// Native amount fields of a record, in precedence order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AmountFields {
    pub amount_msat: Option<u64>,
    pub value_sat: Option<u64>,
    pub value: Option<u64>,
    pub msatoshi_sent: Option<u64>,
    pub amount_sent_msat: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeeFields {
    pub fee_sat: Option<u64>,
    pub fee_msat: Option<u64>,
    pub amount_sent_msat: Option<u64>,
    pub amount_msat: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LndPayment {
    #[serde(default)]
    pub payment_hash: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub value_sat: Option<u64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub value: Option<u64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub fee_sat: Option<u64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub fee_msat: Option<u64>,
    #[serde(default)]
    pub payment_request: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub creation_date: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClnPayment {
    #[serde(default)]
    pub payment_hash: Option<String>,
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub bolt11: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount_msat: Option<u64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount_sent_msat: Option<u64>,
    /// Pre-0.12 spelling of `amount_sent_msat`.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub msatoshi_sent: Option<u64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub created_at: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LndhubPayment {
    #[serde(default)]
    pub payment_hash: Option<String>,
    #[serde(default)]
    pub payment_request: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub value: Option<u64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub fee: Option<u64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub timestamp: Option<u64>,
    #[serde(default)]
    pub memo: Option<String>,
}

/// A paid Cashu melt quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashuPayment {
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub request: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount: Option<u64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub fee_reserve: Option<u64>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub paid: Option<bool>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub mint_time: Option<u64>,
}

/// An outgoing payment as reported by one of the backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum PaymentRecord {
    Lnd(LndPayment),
    #[serde(rename = "cln-rest")]
    Clightning(ClnPayment),
    Lndhub(LndhubPayment),
    Cashu(CashuPayment),
}

impl PaymentRecord {
    pub fn from_json(backend: Backend, value: Value) -> Result<Self, PayReqError> {
        Ok(match backend {
            Backend::Lnd => PaymentRecord::Lnd(serde_json::from_value(value)?),
            Backend::Clightning => PaymentRecord::Clightning(serde_json::from_value(value)?),
            Backend::Lndhub => PaymentRecord::Lndhub(serde_json::from_value(value)?),
            Backend::Cashu => PaymentRecord::Cashu(serde_json::from_value(value)?),
        })
    }

    pub fn backend(&self) -> Backend {
        match self {
            PaymentRecord::Lnd(_) => Backend::Lnd,
            PaymentRecord::Clightning(_) => Backend::Clightning,
            PaymentRecord::Lndhub(_) => Backend::Lndhub,
            PaymentRecord::Cashu(_) => Backend::Cashu,
        }
    }

    /// The BOLT11 string the payment was made for, if the backend reports it.
    pub fn payment_request(&self) -> Option<&str> {
        match self {
            PaymentRecord::Lnd(p) => p.payment_request.as_deref(),
            PaymentRecord::Clightning(p) => p.bolt11.as_deref(),
            PaymentRecord::Lndhub(p) => p.payment_request.as_deref(),
            PaymentRecord::Cashu(p) => p.request.as_deref(),
        }
        .filter(|r| !r.is_empty())
    }

    pub fn amount_fields(&self) -> AmountFields {
        match self {
            PaymentRecord::Lnd(p) => AmountFields {
                value_sat: p.value_sat,
                value: p.value,
                ..Default::default()
            },
            PaymentRecord::Clightning(p) => AmountFields {
                amount_msat: p.amount_msat,
                msatoshi_sent: p.msatoshi_sent,
                amount_sent_msat: p.amount_sent_msat,
                ..Default::default()
            },
            PaymentRecord::Lndhub(p) => AmountFields {
                value: p.value,
                ..Default::default()
            },
            PaymentRecord::Cashu(p) => AmountFields {
                value_sat: p.amount,
                ..Default::default()
            },
        }
    }

    pub fn fee_fields(&self) -> FeeFields {
        match self {
            PaymentRecord::Lnd(p) => FeeFields {
                fee_sat: p.fee_sat,
                fee_msat: p.fee_msat,
                ..Default::default()
            },
            PaymentRecord::Clightning(p) => FeeFields {
                amount_sent_msat: p.amount_sent_msat.or(p.msatoshi_sent),
                amount_msat: p.amount_msat,
                ..Default::default()
            },
            PaymentRecord::Lndhub(p) => FeeFields {
                fee_sat: p.fee,
                ..Default::default()
            },
            PaymentRecord::Cashu(p) => FeeFields {
                fee_sat: p.fee_reserve,
                ..Default::default()
            },
        }
    }

    pub fn destination(&self) -> Option<&str> {
        match self {
            PaymentRecord::Clightning(p) => p.destination.as_deref(),
            _ => None,
        }
        .filter(|d| !d.is_empty())
    }

    /// Creation time in unix seconds, as reported by the backend.
    pub fn created_at(&self) -> Option<u64> {
        match self {
            PaymentRecord::Lnd(p) => p.creation_date,
            PaymentRecord::Clightning(p) => p.created_at,
            PaymentRecord::Lndhub(p) => p.timestamp,
            PaymentRecord::Cashu(p) => p.mint_time,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LndInvoice {
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub value: Option<u64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub value_msat: Option<u64>,
    #[serde(default)]
    pub payment_request: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub creation_date: Option<u64>,
    #[serde(default)]
    pub settled: Option<bool>,
    #[serde(default)]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClnInvoice {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub bolt11: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount_msat: Option<u64>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amount_received_msat: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    /// Unix seconds; the payment request itself may not carry an expiry.
    #[serde(default, deserialize_with = "lenient_amount")]
    pub expires_at: Option<u64>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LndhubInvoice {
    #[serde(default)]
    pub payment_request: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub amt: Option<u64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub timestamp: Option<u64>,
    #[serde(default)]
    pub ispaid: Option<bool>,
}

/// A Cashu mint quote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashuInvoice {
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub request: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub paid: Option<bool>,
    #[serde(default, deserialize_with = "lenient_amount")]
    pub expires_at: Option<u64>,
    #[serde(default, rename = "mintUrl", alias = "mint_url")]
    pub mint_url: Option<String>,
}

/// An incoming invoice as reported by one of the backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum InvoiceRecord {
    Lnd(LndInvoice),
    #[serde(rename = "cln-rest")]
    Clightning(ClnInvoice),
    Lndhub(LndhubInvoice),
    Cashu(CashuInvoice),
}

impl InvoiceRecord {
    pub fn from_json(backend: Backend, value: Value) -> Result<Self, PayReqError> {
        Ok(match backend {
            Backend::Lnd => InvoiceRecord::Lnd(serde_json::from_value(value)?),
            Backend::Clightning => InvoiceRecord::Clightning(serde_json::from_value(value)?),
            Backend::Lndhub => InvoiceRecord::Lndhub(serde_json::from_value(value)?),
            Backend::Cashu => InvoiceRecord::Cashu(serde_json::from_value(value)?),
        })
    }

    pub fn backend(&self) -> Backend {
        match self {
            InvoiceRecord::Lnd(_) => Backend::Lnd,
            InvoiceRecord::Clightning(_) => Backend::Clightning,
            InvoiceRecord::Lndhub(_) => Backend::Lndhub,
            InvoiceRecord::Cashu(_) => Backend::Cashu,
        }
    }

    pub fn payment_request(&self) -> Option<&str> {
        match self {
            InvoiceRecord::Lnd(i) => i.payment_request.as_deref(),
            InvoiceRecord::Clightning(i) => i.bolt11.as_deref(),
            InvoiceRecord::Lndhub(i) => i.payment_request.as_deref(),
            InvoiceRecord::Cashu(i) => i.request.as_deref(),
        }
        .filter(|r| !r.is_empty())
    }

    pub fn amount_fields(&self) -> AmountFields {
        match self {
            InvoiceRecord::Lnd(i) => AmountFields {
                amount_msat: i.value_msat,
                value: i.value,
                ..Default::default()
            },
            InvoiceRecord::Clightning(i) => AmountFields {
                amount_msat: i.amount_msat.or(i.amount_received_msat),
                ..Default::default()
            },
            InvoiceRecord::Lndhub(i) => AmountFields {
                value: i.amt,
                ..Default::default()
            },
            // the mint quote only carries the amount inside its payment request
            InvoiceRecord::Cashu(_) => AmountFields::default(),
        }
    }

    /// Out-of-band expiry in unix seconds, for backends that report one.
    pub fn expires_at(&self) -> Option<u64> {
        match self {
            InvoiceRecord::Clightning(i) => i.expires_at,
            InvoiceRecord::Cashu(i) => i.expires_at,
            _ => None,
        }
    }

    pub fn created_at(&self) -> Option<u64> {
        match self {
            InvoiceRecord::Lnd(i) => i.creation_date,
            InvoiceRecord::Lndhub(i) => i.timestamp,
            InvoiceRecord::Clightning(_) | InvoiceRecord::Cashu(_) => None,
        }
    }

    pub fn is_paid(&self) -> bool {
        match self {
            InvoiceRecord::Lnd(i) => {
                i.settled.unwrap_or(false) || i.state.as_deref() == Some("SETTLED")
            }
            InvoiceRecord::Clightning(i) => i.status.as_deref() == Some("paid"),
            InvoiceRecord::Lndhub(i) => i.ispaid.unwrap_or(false),
            InvoiceRecord::Cashu(i) => {
                i.paid.unwrap_or(false) || i.state.as_deref() == Some("PAID")
            }
        }
    }
}
