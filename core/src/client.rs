//! Stateless HTTP request builder and response parser for the users API.
//!
//! # Design
//! `UsersClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ListUsersParams, NewUser, User, UserPatch};

/// Synchronous, stateless client for the users API.
#[derive(Debug, Clone)]
pub struct UsersClient {
    base_url: String,
}

#[derive(Deserialize)]
struct Message {
    message: String,
}

impl UsersClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/api/users/", self.base_url)
    }

    fn item_url(&self, id: u64) -> String {
        format!("{}/api/users/{id}/", self.base_url)
    }

    pub fn build_list_users(&self, params: &ListUsersParams) -> HttpRequest {
        let mut query = form_urlencoded::Serializer::new(String::new());
        if let Some(page) = params.page {
            query.append_pair("page", &page.to_string());
        }
        if let Some(limit) = params.limit {
            query.append_pair("limit", &limit.to_string());
        }
        if let Some(name) = &params.name {
            query.append_pair("name", name);
        }
        if let Some(sort) = &params.sort {
            query.append_pair("sort", sort);
        }
        let query = query.finish();

        let mut path = self.collection_url();
        if !query.is_empty() {
            path.push('?');
            path.push_str(&query);
        }
        HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_user(&self, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_user(&self, input: &NewUser) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection_url(),
            headers: json_headers(),
            body: Some(to_json(input)?),
        })
    }

    pub fn build_update_user(
        &self,
        id: u64,
        input: &UserPatch,
    ) -> Result<HttpRequest, ClientError> {
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: self.item_url(id),
            headers: json_headers(),
            body: Some(to_json(input)?),
        })
    }

    pub fn build_delete_user(&self, id: u64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: self.item_url(id),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, ClientError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, ClientError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    pub fn parse_create_user(&self, response: HttpResponse) -> Result<User, ClientError> {
        check_status(&response, 201)?;
        from_json(&response.body)
    }

    pub fn parse_update_user(&self, response: HttpResponse) -> Result<User, ClientError> {
        check_status(&response, 200)?;
        from_json(&response.body)
    }

    /// Returns the server's confirmation message.
    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<String, ClientError> {
        check_status(&response, 200)?;
        from_json::<Message>(&response.body).map(|m| m.message)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![("content-type".to_string(), "application/json".to_string())]
}

fn to_json<T: serde::Serialize>(input: &T) -> Result<String, ClientError> {
    serde_json::to_string(input).map_err(|e| ClientError::Serialization(e.to_string()))
}

fn from_json<T: DeserializeOwned>(body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| ClientError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `ClientError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ClientError> {
    match response.status {
        status if status == expected => Ok(()),
        404 => Err(ClientError::NotFound),
        400 => Err(bad_request(&response.body)),
        status => Err(ClientError::HttpError {
            status,
            body: response.body.clone(),
        }),
    }
}

/// A 400 body is either `{"error": ..}` / `{"detail": ..}` or a mapping of
/// field name to messages.
fn bad_request(body: &str) -> ClientError {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return ClientError::HttpError {
            status: 400,
            body: body.to_string(),
        };
    };
    for key in ["error", "detail"] {
        if let Some(message) = value.get(key).and_then(Value::as_str) {
            return ClientError::BadRequest(message.to_string());
        }
    }
    match serde_json::from_value::<BTreeMap<String, Vec<String>>>(value) {
        Ok(fields) => ClientError::Validation(fields),
        Err(_) => ClientError::HttpError {
            status: 400,
            body: body.to_string(),
        },
    }
}
