//! Wire types for the users API.
//!
//! # Design
//! Defined independently of the server crate so the client carries no axum
//! or tokio dependency; the integration test catches any schema drift.

use serde::{Deserialize, Serialize};

/// A user as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub age: i64,
    pub city: String,
    pub state: String,
    pub zip: i64,
    pub email: String,
    pub web: String,
}

/// Request payload for creating a user. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub company_name: String,
    pub age: i64,
    pub city: String,
    pub state: String,
    pub zip: i64,
    pub email: String,
    pub web: String,
}

/// Request payload for a partial update. Only the fields present in the
/// JSON are applied; omitted fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
}

/// Query parameters for listing users. `None` leaves the server default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    /// Case-insensitive substring of the first or last name.
    pub name: Option<String>,
    /// Field name, `-` prefixed for descending order.
    pub sort: Option<String>,
}
