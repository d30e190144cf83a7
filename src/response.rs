//! Wire envelope for bridge write endpoints.
//!
//! The pairing endpoint and every state-mutating endpoint answer with a
//! JSON array of result objects, each carrying either a `success` or an
//! `error` member.

use serde::Deserialize;

/// One element of the result array a write endpoint returns.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResult<S> {
    pub success: Option<S>,
    pub error: Option<ApiError>,
}

/// Structured error object embedded in a result.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiError {
    #[serde(rename = "type")]
    pub code: i32,
    #[serde(default)]
    pub address: String,
    pub description: String,
}

/// Success object of the pairing endpoint, carrying the issued credential.
#[derive(Debug, Deserialize)]
pub(crate) struct PairingSuccess {
    pub username: String,
}

/// Scan a result array for an embedded error.
///
/// When the bridge reports several errors at once the last one wins,
/// matching how callers treat the array as a single outcome.
pub(crate) fn embedded_error<S>(results: &[ApiResult<S>]) -> Option<&ApiError> {
    results.iter().filter_map(|r| r.error.as_ref()).next_back()
}
