use clap::Parser;
use tokio::net::TcpListener;
use users_server::config::{self, Config};
use users_server::{ServerError, UserStore};

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    let config = Config::parse();
    config::init_tracing(&config)?;
    let store = UserStore::connect(&config.database_url).await?;
    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "listening");
    users_server::serve(
        listener,
        users_server::app_with_store(store),
        users_server::shutdown_signal(),
    )
    .await
}
