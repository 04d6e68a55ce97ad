use thiserror::Error;

#[derive(Error, Debug)]
/// An error raised while turning a payment request into a [crate::DecodedInvoice].
///
/// Only structural problems are reported here. Individual tagged fields that fail to
/// decode degrade to empty values inside an otherwise valid invoice.
pub enum PayReqError {
    /// The payment request was not given as a string.
    #[error("Lightning Payment Request must be string")]
    TypeMismatch,
    /// The payment request does not start with `ln`.
    #[error("Not a proper lightning payment request")]
    NotAnInvoice,
    /// The human readable part does not look like `ln<network>[amount][multiplier]`.
    #[error("Malformed human readable part: {0}")]
    MalformedPrefix(String),
    /// The network id of the human readable part is not one we know about.
    #[error("Unknown coin bech32 prefix: {0}")]
    UnknownNetwork(String),
    /// The bech32 checksum or alphabet validation failed.
    #[error("Invalid bech32 encoding: {0}")]
    InvalidEncoding(#[from] bech32::Error),
    /// A backend record could not be read.
    #[error("Failed to read backend record: {0}")]
    JsonReadWriteError(#[from] serde_json::Error),
    /// The given backend name is not supported.
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),
}

impl PartialEq for PayReqError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::TypeMismatch, Self::TypeMismatch) => true,
            (Self::NotAnInvoice, Self::NotAnInvoice) => true,
            (Self::MalformedPrefix(a), Self::MalformedPrefix(b)) => a == b,
            (Self::UnknownNetwork(a), Self::UnknownNetwork(b)) => a == b,
            (Self::InvalidEncoding(a), Self::InvalidEncoding(b)) => a == b,
            (Self::JsonReadWriteError(a), Self::JsonReadWriteError(b)) => {
                a.to_string() == b.to_string()
            }
            (Self::UnknownBackend(a), Self::UnknownBackend(b)) => a == b,
            _ => false,
        }
    }
}
