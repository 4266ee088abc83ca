use thiserror::Error;

use crate::storage::StoreError;

/// Every way an auth operation can fail. The `Display` text is meant for the user.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Input rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The server refused the credentials or token.
    #[error("{0}")]
    Unauthorized(String),

    #[error("cannot reach the server at {0}; check that the API server is running")]
    Unreachable(String),

    /// A 2xx response without the expected fields.
    #[error("malformed server response: {0}")]
    MalformedResponse(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("not logged in")]
    NotAuthenticated,

    #[error("failed to save session: {0}")]
    Storage(#[from] StoreError),
}
