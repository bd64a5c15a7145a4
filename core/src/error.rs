//! Error types for the users API client.
//!
//! # Design
//! The two client errors the server describes precisely get their own
//! variants: `NotFound` (404) and `Validation` (400 with a field-error
//! mapping). Other 400s carry the server's message; any remaining
//! unexpected status lands in `HttpError` with the raw body.

use std::collections::BTreeMap;

use thiserror::Error;

/// Errors returned by `UsersClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server returned 404: no user with that id.
    #[error("user not found")]
    NotFound,

    /// The request body failed validation; field name to messages.
    #[error("validation failed for {}", .0.keys().cloned().collect::<Vec<_>>().join(", "))]
    Validation(BTreeMap<String, Vec<String>>),

    /// The server rejected the request with a single message, e.g. a bad
    /// `sort` field or an unparsable body.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Any other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
