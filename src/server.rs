use std::{io, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::{net::TcpListener, sync::Mutex, sync::oneshot};

use crate::{
    api::{self, AppState},
    info,
    types::PendingAuthorization,
};

/// Serves the proxy API until Ctrl-C is received.
pub async fn start_api_server(state: AppState, addr: &str) -> io::Result<()> {
    let app = api::router(state);
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
}

/// Serves `path` for the duration of `spotbot auth`.
///
/// The server stops as soon as `shutdown` fires (or its sender is dropped).
pub async fn start_callback_server(
    shared_state: Arc<Mutex<Option<PendingAuthorization>>>,
    addr: String,
    path: String,
    shutdown: oneshot::Receiver<()>,
) -> io::Result<()> {
    let app = Router::new()
        .route("/health", get(api::health::health))
        .route(&path, get(api::callback).layer(Extension(shared_state)));

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = shutdown.await;
        })
        .await
}
