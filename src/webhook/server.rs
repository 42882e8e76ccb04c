use crate::config::Config;
use crate::error::Error;
use crate::provider::DynProvider;
use crate::webhook::media_type::MediaTypes;
use crate::webhook::routes;
use axum::Router;
use std::future::Future;
use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub(super) struct AppState {
    pub provider: DynProvider,
    pub media_types: Arc<MediaTypes>,
    pub provider_timeout: Option<Duration>,
}

/// Build the webhook [`Router`] serving `provider`, health bypass included. Provider calls
/// taking longer than `provider_timeout` are dropped and answered with HTTP 500.
pub fn router(provider: DynProvider, provider_timeout: Option<Duration>) -> Router {
    routes::new(AppState {
        provider,
        media_types: Arc::new(MediaTypes::default()),
        provider_timeout,
    })
}

/// Bind the configured address and serve the webhook until `shutdown` resolves.
///
/// # Errors
///
/// Returns [`Error::IO`] if the address can't be bound, and [`Error::Server`] if the server
/// fails while running.
pub async fn serve(
    config: &Config,
    provider: DynProvider,
    shutdown: impl Future<Output = ()>,
) -> Result<(), Error> {
    let listener = TcpListener::bind((config.server_host.as_str(), config.server_port))?;
    tracing::info!("webhook listening on {}", listener.local_addr()?);

    let mut server = axum::Server::from_tcp(listener)?;
    if let Some(read_timeout) = config.server_read_timeout {
        server = server.http1_header_read_timeout(read_timeout);
    }
    server
        .serve(router(provider, config.server_write_timeout).into_make_service())
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
