use crate::store::StoreError;

/// All error types that can occur when talking to a Hue bridge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Pairing was never confirmed within the attempt budget.
    #[error("pairing was not confirmed after {attempts} attempts")]
    AuthTimeout { attempts: u32 },

    /// A transport-level failure while reaching the bridge.
    #[error("http request to the bridge failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The bridge answered with JSON this crate could not decode.
    #[error("failed to decode bridge response: {0:?}")]
    Decode(serde_json::Error),

    /// The bridge answered a write with a structured error result.
    #[error("bridge rejected the request: {0}")]
    RemoteRejected(String),

    /// Attempted to send a [`crate::StateUpdate`] with no fields set.
    #[error("state update contains no fields to change")]
    EmptyUpdate,

    /// The credential store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

impl Error {
    /// Create a new remote rejection error from a bridge error description.
    pub(crate) fn rejected(description: &str) -> Self {
        Error::RemoteRejected(description.to_string())
    }
}

/// Hacky implementation of PartialEq for testing
#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}
