//! TLS dev server
//!
//! Serves the build output over HTTPS with the cached dev certificate,
//! speaking HTTP/1.1 and HTTP/2 on the same port.

pub mod middleware;
pub mod router;

pub use middleware::HostAllowList;
pub use router::{StaticSite, create_router};

use std::sync::Arc;

use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::service::TowerToHyperService;
use rustls::ServerConfig;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_rustls::TlsAcceptor;

/// HTTPS server for the build output
pub struct DevServer {
    address: String,
    site: StaticSite,
    hosts: HostAllowList,
    tls: Arc<ServerConfig>,
}

impl DevServer {
    pub fn new(
        address: impl Into<String>,
        site: StaticSite,
        hosts: HostAllowList,
        tls: Arc<ServerConfig>,
    ) -> Self {
        Self {
            address: address.into(),
            site,
            hosts,
            tls,
        }
    }

    /// Accept connections until Ctrl+C or SIGTERM
    pub async fn run(self) -> anyhow::Result<()> {
        let router = create_router(&self.site, self.hosts.clone());
        let acceptor = TlsAcceptor::from(self.tls);

        let listener = TcpListener::bind(&self.address).await.map_err(|e| {
            tracing::error!(error = %e, address = %self.address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", self.address, e)
        })?;

        tracing::info!(
            address = %self.address,
            root = %self.site.root.display(),
            base_path = %self.site.base_path,
            allowed_hosts = ?self.hosts.hosts(),
            "Dev server listening"
        );

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            let (stream, peer) = tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        continue;
                    }
                },
                _ = &mut shutdown => break,
            };

            let acceptor = acceptor.clone();
            let service = TowerToHyperService::new(router.clone());
            tokio::spawn(async move {
                let stream = match acceptor.accept(stream).await {
                    Ok(stream) => stream,
                    Err(e) => {
                        tracing::debug!(peer = %peer, error = %e, "TLS handshake failed");
                        return;
                    }
                };

                if let Err(e) = auto::Builder::new(TokioExecutor::new())
                    .serve_connection_with_upgrades(TokioIo::new(stream), service)
                    .await
                {
                    tracing::debug!(peer = %peer, error = %e, "Connection closed with error");
                }
            });
        }

        tracing::info!("Dev server stopped");
        Ok(())
    }
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
