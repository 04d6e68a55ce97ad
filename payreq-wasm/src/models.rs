use gloo_utils::format::JsValueSerdeExt;
use payreq_core::utils::Clock;
use payreq_core::{FactsConfig, Invoice, Payment};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[wasm_bindgen]
pub struct PaymentFacts {
    pub amount_sats: u64,
    fee_sats: String,
    destination: Option<String>,
    memo: Option<String>,
    payment_hash: Option<String>,
    pub timestamp: u64,
}

#[wasm_bindgen]
impl PaymentFacts {
    #[wasm_bindgen(getter)]
    pub fn value(&self) -> JsValue {
        JsValue::from_serde(self).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(getter)]
    pub fn fee_sats(&self) -> String {
        self.fee_sats.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn destination(&self) -> Option<String> {
        self.destination.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn memo(&self) -> Option<String> {
        self.memo.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn payment_hash(&self) -> Option<String> {
        self.payment_hash.clone()
    }
}

impl From<&Payment> for PaymentFacts {
    fn from(p: &Payment) -> Self {
        PaymentFacts {
            amount_sats: p.amount_sats(),
            fee_sats: p.fee_sats(),
            destination: p.destination().map(str::to_string),
            memo: p.memo().map(str::to_string),
            payment_hash: p.payment_hash().map(str::to_string),
            timestamp: p.timestamp(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq)]
#[wasm_bindgen]
pub struct InvoiceFacts {
    pub amount_sats: u64,
    memo: Option<String>,
    pub timestamp: u64,
    pub paid: bool,
    pub expired: bool,
    /// Seconds the invoice was valid for, unset if it never expires.
    pub original_expiry_secs: Option<i64>,
    pub expires_at: Option<i64>,
    formatted_original_time_until_expiry: String,
    formatted_time_until_expiry: String,
}

#[wasm_bindgen]
impl InvoiceFacts {
    #[wasm_bindgen(getter)]
    pub fn value(&self) -> JsValue {
        JsValue::from_serde(self).unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(getter)]
    pub fn memo(&self) -> Option<String> {
        self.memo.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn formatted_original_time_until_expiry(&self) -> String {
        self.formatted_original_time_until_expiry.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn formatted_time_until_expiry(&self) -> String {
        self.formatted_time_until_expiry.clone()
    }
}

impl InvoiceFacts {
    pub(crate) fn new(invoice: &Invoice, config: &FactsConfig, clock: &dyn Clock) -> Self {
        InvoiceFacts {
            amount_sats: invoice.amount_sats(),
            memo: invoice.memo().map(str::to_string),
            timestamp: invoice.timestamp(),
            paid: invoice.is_paid(),
            expired: invoice.is_expired(clock),
            original_expiry_secs: invoice.original_time_until_expiry_secs(),
            expires_at: invoice.expiry_unix_timestamp(),
            formatted_original_time_until_expiry: invoice
                .formatted_original_time_until_expiry(&config.locale),
            formatted_time_until_expiry: invoice
                .formatted_time_until_expiry(&config.locale, clock),
        }
    }
}
