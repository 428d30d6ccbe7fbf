use axum::Router;
use core_config::server::ServerConfig;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// An HTTP server that has claimed its port but not started serving.
///
/// Binding and serving are separate steps so callers (and tests) can learn
/// the bound address before traffic starts, and stop the server explicitly.
pub struct Server {
    listener: TcpListener,
    router: Router,
}

impl Server {
    /// Binds `config.address()`. Port 0 asks the OS for a free port.
    pub async fn bind(router: Router, config: &ServerConfig) -> io::Result<Self> {
        let listener = TcpListener::bind(config.address()).await?;
        Ok(Self { listener, router })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves until `signal` resolves, then drains in-flight requests.
    pub async fn serve_until<F>(self, signal: F) -> io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        info!(%addr, "Server listening");

        axum::serve(self.listener, self.router.into_make_service())
            .with_graceful_shutdown(signal)
            .await
            .inspect_err(|e| error!(error = %e, "Server encountered an error"))?;

        info!(%addr, "Server stopped");
        Ok(())
    }

    /// Serves on a background task and returns a handle that stops it.
    pub fn spawn(self) -> io::Result<ServerHandle> {
        let addr = self.local_addr()?;
        let (tx, rx) = oneshot::channel::<()>();
        let task = tokio::spawn(self.serve_until(async move {
            let _ = rx.await;
        }));

        Ok(ServerHandle {
            addr,
            shutdown: Some(tx),
            task,
        })
    }
}

/// Handle to a server started with [`Server::spawn`].
///
/// Dropping the handle also stops the server.
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<io::Result<()>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL such as `http://127.0.0.1:40123`.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Signals shutdown and waits for the server task to finish.
    pub async fn shutdown(mut self) -> io::Result<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) => Err(io::Error::other(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;

    #[tokio::test]
    async fn test_spawn_serves_and_stops() {
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        let server = Server::bind(router, &ServerConfig::ephemeral()).await.unwrap();
        let addr = server.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        let handle = server.spawn().unwrap();
        let body = reqwest::get(format!("{}/ping", handle.url()))
            .await
            .unwrap()
            .text()
            .await
            .unwrap();
        assert_eq!(body, "pong");

        handle.shutdown().await.unwrap();
        assert!(reqwest::get(format!("http://{}/ping", addr)).await.is_err());
    }
}
