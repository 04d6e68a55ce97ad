extern crate payreq_core;

pub mod error;
mod models;
mod utils;

use crate::error::PayReqJsError;
use crate::models::*;
use gloo_utils::format::JsValueSerdeExt;
use payreq_core::records::Backend;
use payreq_core::utils::{Clock, SystemClock};
use payreq_core::{FactsConfig, Invoice, PayReqError, Payment};
use serde_json::Value;
use std::str::FromStr;
use wasm_bindgen::prelude::*;

/// Decodes a BOLT11 payment request into its sections.
#[wasm_bindgen]
pub fn decode(payment_request: JsValue) -> Result<JsValue, PayReqJsError> {
    let payment_request = payment_request
        .as_string()
        .ok_or(PayReqJsError::TypeMismatch)?;
    let decoded = payreq_core::decode(&payment_request)?;
    Ok(JsValue::from_serde(&decoded)?)
}

/// Derives amount, fee, destination and memo of a payment as listed by `backend`.
#[wasm_bindgen]
pub fn payment_facts(
    backend: String,
    record: JsValue,
    config: JsValue,
) -> Result<PaymentFacts, PayReqJsError> {
    let config = read_config(config)?;
    payment_facts_from_value(&backend, read_record(record)?, &config)
}

/// Derives amount, memo and expiry of an invoice as listed by `backend`.
#[wasm_bindgen]
pub fn invoice_facts(
    backend: String,
    record: JsValue,
    config: JsValue,
) -> Result<InvoiceFacts, PayReqJsError> {
    let config = read_config(config)?;
    invoice_facts_from_value(&backend, read_record(record)?, &config, &SystemClock)
}

fn read_record(record: JsValue) -> Result<Value, PayReqJsError> {
    record
        .into_serde()
        .map_err(|e| PayReqJsError::from(PayReqError::from(e)))
}

fn read_config(config: JsValue) -> Result<FactsConfig, PayReqJsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(FactsConfig::default());
    }
    Ok(config.into_serde()?)
}

fn payment_facts_from_value(
    backend: &str,
    record: Value,
    config: &FactsConfig,
) -> Result<PaymentFacts, PayReqJsError> {
    let backend = Backend::from_str(backend)?;
    let payment = Payment::from_json(backend, record, config)?;
    Ok(PaymentFacts::from(&payment))
}

fn invoice_facts_from_value(
    backend: &str,
    record: Value,
    config: &FactsConfig,
    clock: &dyn Clock,
) -> Result<InvoiceFacts, PayReqJsError> {
    let backend = Backend::from_str(backend)?;
    let invoice = Invoice::from_json(backend, record, config)?;
    Ok(InvoiceFacts::new(&invoice, config, clock))
}
