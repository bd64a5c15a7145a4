//! Users API server.
//!
//! # Overview
//! One resource, `user`, served as JSON over a collection endpoint
//! (`/api/users/`: list with `page`/`limit`/`name`/`sort`, create) and an
//! item endpoint (`/api/users/{id}/`: retrieve, partial update, delete).
//!
//! # Design
//! - `query` translates list parameters into a `store::UserQuery`.
//! - `serializer` validates request bodies into `NewUser` / `UserPatch`.
//! - `store` owns the records in SQLite through sea-orm (`entity` maps the
//!   table); handlers share the store handle through router state.
//! - `error::ApiError` is the only failure type handlers return.

pub mod config;
pub mod entity;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod model;
pub mod query;
pub mod serializer;
pub mod store;

use std::future::Future;

use axum::{routing::get, Router};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ServerError};
pub use model::{NewUser, User, UserField, UserId, UserPatch};
pub use store::{StoreError, UserStore};

/// Router over a fresh, empty in-memory store.
pub async fn app() -> Result<Router, StoreError> {
    Ok(app_with_store(UserStore::in_memory().await?))
}

/// Router over `store`. Both endpoints answer with and without the
/// trailing slash.
pub fn app_with_store(store: UserStore) -> Router {
    let collection = get(handlers::list_users).post(handlers::create_user);
    let item = get(handlers::get_user)
        .put(handlers::update_user)
        .delete(handlers::delete_user);
    Router::new()
        .route("/api/users", collection.clone())
        .route("/api/users/", collection)
        .route("/api/users/{id}", item.clone())
        .route("/api/users/{id}/", item)
        .layer(TraceLayer::new_for_http())
        .with_state(store)
}

pub async fn run(listener: TcpListener) -> Result<(), ServerError> {
    serve(listener, app().await?, std::future::pending()).await
}

/// Serve `app` until `shutdown` resolves, then drain in-flight requests.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, starting graceful shutdown"),
        _ = terminate => tracing::info!("received SIGTERM, starting graceful shutdown"),
    }
}
