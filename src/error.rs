//! Failure taxonomy for page swaps.
//!
//! Every variant is non-fatal to the host page: the navigation layer
//! converts a failed swap into a full browser navigation, which is always
//! correct even if less smooth.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Reasons a page swap can fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwapError {
    /// The target responded with a non-2xx status.
    #[error("http status {status}")]
    Http { status: u16 },

    /// The fetch itself failed (DNS, connection reset, offline).
    #[error("network: {0}")]
    Network(String),

    /// The fetched document has no locatable content region.
    #[error("no content region found in fetched document")]
    MissingContentRegion,

    /// A DOM operation rejected; carries the stringified JS error.
    #[error("dom: {0}")]
    Dom(String),
}

/// Result alias used throughout the swap path.
pub type SwapResult<T> = Result<T, SwapError>;

/// How a requested swap ended.
///
/// `Superseded` and `Queued` are not failures: they mean another
/// navigation took ownership of the viewport and must not trigger the
/// full-navigation fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The swap ran to completion and the new region is active.
    Completed,
    /// A newer navigation cancelled this one mid-flight.
    Superseded,
    /// The request was parked behind an in-flight swap (queue policy).
    Queued,
}

/// Render a JS error value for logs and error payloads.
pub(crate) fn describe_js(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl From<JsValue> for SwapError {
    fn from(err: JsValue) -> Self {
        SwapError::Dom(describe_js(&err))
    }
}

impl From<SwapError> for JsValue {
    fn from(err: SwapError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            SwapError::Http { status: 404 }.to_string(),
            "http status 404"
        );
        assert_eq!(
            SwapError::Network("connection reset".into()).to_string(),
            "network: connection reset"
        );
        assert_eq!(
            SwapError::MissingContentRegion.to_string(),
            "no content region found in fetched document"
        );
    }

    #[test]
    fn test_outcomes_are_distinct() {
        assert_ne!(SwapOutcome::Completed, SwapOutcome::Superseded);
        assert_ne!(SwapOutcome::Completed, SwapOutcome::Queued);
    }
}
