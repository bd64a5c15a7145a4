//! Collection and item handlers for `/api/users/`.
//!
//! Handlers are stateless: each one takes the store handle from router
//! state, does one store operation (two for update), and shapes the
//! response. Every handler runs in its own span under the per-request span
//! opened by the trace layer.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::extract::{JsonBody, QueryParams, UserKey};
use crate::model::{User, UserId};
use crate::query::{ListParams, ListQuery};
use crate::serializer;
use crate::store::UserStore;

pub const DELETED_MESSAGE: &str = "User deleted";

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: &'static str,
}

#[tracing::instrument(skip(store))]
pub async fn list_users(
    State(store): State<UserStore>,
    QueryParams(pairs): QueryParams<Vec<(String, String)>>,
) -> Result<Json<Vec<User>>, ApiError> {
    let params: ListParams = pairs.into_iter().collect();
    let query = ListQuery::parse(&params).inspect_err(|err| {
        tracing::warn!(%err, "rejected list parameters");
    })?;
    tracing::info!(
        page = query.page.get(),
        limit = query.limit.get(),
        name = query.name.as_deref().unwrap_or(""),
        sort = %query.sort.map(|s| s.to_string()).unwrap_or_default(),
        "fetching user list"
    );
    let users = store.query(&query.to_store_query()?).await?;
    tracing::debug!(count = users.len(), "user list fetched");
    Ok(Json(users))
}

#[tracing::instrument(skip(store, body))]
pub async fn create_user(
    State(store): State<UserStore>,
    JsonBody(body): JsonBody<Value>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let new_user = serializer::deserialize_new(&body).inspect_err(|errors| {
        tracing::warn!(?errors, "user creation failed");
    })?;
    let user = store.insert(new_user).await?;
    tracing::info!(id = user.id, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[tracing::instrument(skip(store))]
pub async fn get_user(
    State(store): State<UserStore>,
    UserKey(id): UserKey,
) -> Result<Json<User>, ApiError> {
    let user = fetch(&store, id).await?;
    Ok(Json(user))
}

/// Partial update. Existence is checked before the body is parsed or
/// validated, so an unknown id is a 404 whatever the body holds.
#[tracing::instrument(skip(store, body))]
pub async fn update_user(
    State(store): State<UserStore>,
    UserKey(id): UserKey,
    body: Result<JsonBody<Value>, ApiError>,
) -> Result<Json<User>, ApiError> {
    fetch(&store, id).await?;
    let JsonBody(body) = body.inspect_err(|err| {
        tracing::warn!(id, %err, "unreadable update body");
    })?;
    let patch = serializer::deserialize_patch(&body).inspect_err(|errors| {
        tracing::warn!(id, ?errors, "failed to update user");
    })?;
    // The row may have been deleted since the lookup above.
    let user = store.update(id, patch).await?.ok_or_else(|| {
        tracing::warn!(id, "user removed during update");
        ApiError::NotFound
    })?;
    tracing::info!(id, "user updated");
    Ok(Json(user))
}

/// Deleting an id twice answers 404 the second time.
#[tracing::instrument(skip(store))]
pub async fn delete_user(
    State(store): State<UserStore>,
    UserKey(id): UserKey,
) -> Result<Json<Message>, ApiError> {
    if !store.remove(id).await? {
        tracing::warn!(id, "user not found");
        return Err(ApiError::NotFound);
    }
    tracing::info!(id, "user deleted");
    Ok(Json(Message {
        message: DELETED_MESSAGE,
    }))
}

async fn fetch(store: &UserStore, id: UserId) -> Result<User, ApiError> {
    match store.get(id).await? {
        Some(user) => {
            tracing::debug!(id, "user fetched");
            Ok(user)
        }
        None => {
            tracing::warn!(id, "user not found");
            Err(ApiError::NotFound)
        }
    }
}
