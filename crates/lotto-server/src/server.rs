use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::config::Settings;
use crate::db::DbPool;

mod handlers;
mod router;
mod types;

pub use router::build_router;

pub struct HttpServer {
    pool: DbPool,
    addr: SocketAddr,
    cors_origins: Vec<String>,
    shutdown_timeout: Duration,
}

/// Handle of a running server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: tokio::task::JoinHandle<()>,
    shutdown_timeout: Duration,
}

impl HttpServer {
    pub fn new(pool: DbPool, settings: &Settings) -> Self {
        Self {
            pool,
            addr: settings.socket_addr(),
            cors_origins: settings.cors_origins.clone(),
            shutdown_timeout: settings.shutdown_timeout,
        }
    }

    pub async fn start(&self) -> anyhow::Result<ServerHandle> {
        let app = build_router(self.pool.clone(), &self.cors_origins);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        let addr = listener.local_addr()?;
        log::info!("HTTP server listening on {addr}");

        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let shutdown = async {
                rx.await.ok();
            };
            if let Err(e) = axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
            {
                log::error!("HTTP server stopped: {e}");
            }
        });

        Ok(ServerHandle {
            addr,
            shutdown: Some(tx),
            task,
            shutdown_timeout: self.shutdown_timeout,
        })
    }
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop accepting connections and wait for in-flight requests, at most the shutdown timeout.
    pub async fn shutdown(mut self) -> anyhow::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }

        match tokio::time::timeout(self.shutdown_timeout, &mut self.task).await {
            Ok(joined) => {
                joined?;
                log::info!("HTTP server stopped");
            }
            Err(_) => {
                log::warn!(
                    "HTTP server did not drain within {}s, aborting",
                    self.shutdown_timeout.as_secs()
                );
                self.task.abort();
            }
        }
        Ok(())
    }
}

/// Resolves on SIGINT, or SIGTERM on unix.
pub async fn shutdown_signal() -> anyhow::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal;

        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;
        tokio::select! {
            result = signal::ctrl_c() => {
                result?;
                log::info!("Received SIGINT, shutting down...");
            }
            _ = sigterm.recv() => {
                log::info!("Received SIGTERM, shutting down...");
            }
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        log::info!("Received SIGINT, shutting down...");
    }

    Ok(())
}
