//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::{GatehouseError, Result};
use crate::ratelimit::LimiterRegistry;

use super::service;

/// HTTP server for the admission check API.
pub struct HttpServer {
    /// Address to bind to
    addr: SocketAddr,
    /// The limiter registry served by this instance
    registry: Arc<LimiterRegistry>,
}

impl HttpServer {
    /// Create a new HTTP server over a limiter registry.
    pub fn new(addr: SocketAddr, registry: Arc<LimiterRegistry>) -> Self {
        Self { addr, registry }
    }

    /// Start the server.
    ///
    /// This method will block until the server is shut down.
    pub async fn serve(self) -> Result<()> {
        let app = service::router(self.registry);

        info!(addr = %self.addr, "Starting HTTP server for admission checks");

        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(listener, app).await.map_err(|e| {
            error!(error = %e, "HTTP server failed");
            GatehouseError::Server(e.to_string())
        })
    }

    /// Start the server with graceful shutdown.
    ///
    /// The server will shut down when the provided signal resolves.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let app = service::router(self.registry);

        info!(
            addr = %self.addr,
            "Starting HTTP server for admission checks with graceful shutdown"
        );

        let listener = TcpListener::bind(self.addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP server failed");
                GatehouseError::Server(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use crate::ratelimit::PolicySet;

    use super::*;

    #[test]
    fn test_server_creation() {
        let addr: SocketAddr = "127.0.0.1:8081".parse().unwrap();
        let registry = Arc::new(LimiterRegistry::new(&PolicySet::default()));
        let _server = HttpServer::new(addr, registry);
    }
}
