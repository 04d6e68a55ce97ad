use log::error;
use payreq_core::PayReqError;
use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PayReqJsError {
    /// The payment request was not given as a string.
    #[error("Lightning Payment Request must be string")]
    TypeMismatch,
    /// The payment request does not start with `ln`.
    #[error("Not a proper lightning payment request")]
    NotAnInvoice,
    /// The human readable part could not be split into network and amount.
    #[error("Malformed human readable part.")]
    MalformedPrefix,
    /// The network of the payment request is not supported.
    #[error("Unknown coin bech32 prefix.")]
    UnknownNetwork,
    /// The bech32 checksum or characters are invalid.
    #[error("Invalid bech32 encoding.")]
    InvalidEncoding,
    /// The backend record could not be read.
    #[error("Failed to read or write json from the front end")]
    JsonReadWriteError,
    /// The backend name is not supported.
    #[error("Unknown backend.")]
    UnknownBackend,
    /// Converting between JS and rust values failed.
    #[error("Failed to convert to or from a javascript value.")]
    WasmBindgenError,
}

impl From<PayReqError> for PayReqJsError {
    fn from(e: PayReqError) -> Self {
        match e {
            PayReqError::TypeMismatch => PayReqJsError::TypeMismatch,
            PayReqError::NotAnInvoice => PayReqJsError::NotAnInvoice,
            PayReqError::MalformedPrefix(_) => PayReqJsError::MalformedPrefix,
            PayReqError::UnknownNetwork(_) => PayReqJsError::UnknownNetwork,
            PayReqError::InvalidEncoding(_) => PayReqJsError::InvalidEncoding,
            PayReqError::JsonReadWriteError(e) => {
                error!("could not read backend record: {e}");
                PayReqJsError::JsonReadWriteError
            }
            PayReqError::UnknownBackend(_) => PayReqJsError::UnknownBackend,
        }
    }
}

impl From<serde_json::error::Error> for PayReqJsError {
    fn from(_e: serde_json::error::Error) -> Self {
        Self::WasmBindgenError
    }
}

impl From<PayReqJsError> for JsValue {
    fn from(e: PayReqJsError) -> Self {
        JsValue::from(e.to_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_core_error() {
        assert_eq!(
            PayReqJsError::from(PayReqError::NotAnInvoice),
            PayReqJsError::NotAnInvoice
        );
        assert_eq!(
            PayReqJsError::from(PayReqError::UnknownNetwork("xx".to_string())),
            PayReqJsError::UnknownNetwork
        );
        assert_eq!(
            PayReqJsError::from(PayReqError::UnknownBackend("eclair".to_string())),
            PayReqJsError::UnknownBackend
        );
        let unreadable = serde_json::from_str::<serde_json::Value>("").unwrap_err();
        assert_eq!(
            PayReqJsError::from(PayReqError::from(unreadable)),
            PayReqJsError::JsonReadWriteError
        );
        assert_eq!(
            PayReqJsError::TypeMismatch.to_string(),
            "Lightning Payment Request must be string"
        );
    }
}
