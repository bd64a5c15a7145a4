//! Synchronous API client core for the users service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip.
//!
//! # Design
//! - `UsersClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Server error bodies are decoded into typed `ClientError` variants.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::UsersClient;
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{ListUsersParams, NewUser, User, UserPatch};
