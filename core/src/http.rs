//! Wire-level request and response values exchanged with the users server.
//!
//! # Design
//! `UsersClient` never performs I/O. It emits an `HttpRequest` naming the
//! users endpoint (`/api/users/` or `/api/users/{id}/`), the verb and, for
//! create and update, a JSON body with its `content-type` header. The
//! caller sends it with its own HTTP stack and hands the status and body
//! back as an `HttpResponse` for the matching `parse_*` method.

/// Verbs the users API answers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// List (collection) or retrieve (item).
    Get,
    /// Create on the collection endpoint.
    Post,
    /// Partial update on the item endpoint.
    Put,
    /// Delete on the item endpoint.
    Delete,
}

/// A request to send to the users server.
///
/// `path` is the absolute URL, including the encoded `page`, `limit`,
/// `name` and `sort` parameters for a list request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// What came back from the users server. Only `status` and `body` are read
/// by the parsers; `headers` is there for callers that want to log them.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}
