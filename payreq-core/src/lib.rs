#![crate_name = "payreq_core"]

pub mod config;
pub mod duration;
pub mod error;
pub mod facts;
mod invoice;
pub mod logging;
pub mod network;
mod parser;
pub mod records;
pub mod tags;
pub mod utils;
mod words;

#[cfg(test)]
mod test_utils;

pub use crate::config::{FactsConfig, FactsConfigBuilder};
pub use crate::error::PayReqError;
pub use crate::facts::{Invoice, Payment};
pub use crate::invoice::{decode, decode_value, decode_with, DecodedInvoice, Section, SectionValue};
pub use crate::parser::{ParseMode, COIN_NETWORK, LIGHTNING_NETWORK, SEPARATOR, TIMESTAMP};
pub use crate::records::{Backend, InvoiceRecord, PaymentRecord};
pub use crate::words::{UnknownTag, UNKNOWN_TAG_HRP};
