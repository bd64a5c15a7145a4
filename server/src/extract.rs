//! Request extractors that reject with `ApiError` instead of axum's plain
//! text rejections.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query},
    http::request::Parts,
};

use crate::error::ApiError;
use crate::model::UserId;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct JsonBody<T>(pub T);

/// Deserialized query string.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct QueryParams<T>(pub T);

/// The `{id}` path segment of the item endpoint. Anything that is not an
/// integer cannot name a user, so it is reported as not found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserKey(pub UserId);

impl<S> FromRequestParts<S> for UserKey
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                tracing::debug!(%rejection, "missing user id segment");
                ApiError::NotFound
            })?;
        raw.parse().map(UserKey).map_err(|_| {
            tracing::warn!(id = %raw, "user id is not an integer");
            ApiError::NotFound
        })
    }
}
