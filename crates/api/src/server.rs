//! Listener lifecycle: bind, serve, graceful stop.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::ServerError;

/// A bound but not yet serving HTTP server.
pub struct Server {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds `addr` (`"host:port"`). Port `0` picks a free port.
    pub async fn bind(addr: &str, router: Router) -> Result<Self, ServerError> {
        let bind_err = |source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        };
        let listener = TcpListener::bind(addr).await.map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;
        Ok(Self {
            listener,
            router,
            local_addr,
        })
    }

    /// Address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serves until `signal` resolves, then stops accepting connections and
    /// waits for in-flight requests to finish.
    pub async fn run_until<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tracing::info!(addr = %self.local_addr, "serving HTTP");
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(signal)
            .await?;
        tracing::info!(addr = %self.local_addr, "listener closed");
        Ok(())
    }

    /// Serves on a background task. Dropping the handle also stops the server.
    pub fn spawn(self) -> ServerHandle {
        let (shutdown, stopped) = oneshot::channel::<()>();
        let local_addr = self.local_addr;
        let task = tokio::spawn(self.run_until(async move {
            let _ = stopped.await;
        }));
        ServerHandle {
            local_addr,
            shutdown,
            task,
        }
    }
}

/// Handle to a server running on a background task.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<Result<(), ServerError>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Triggers graceful shutdown and waits for the server to drain.
    pub async fn stop(self) -> Result<(), ServerError> {
        let _ = self.shutdown.send(());
        self.task.await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bind_to_port_zero_reports_real_port() {
        let server = Server::bind("127.0.0.1:0", Router::new()).await.unwrap();
        assert_ne!(server.local_addr().port(), 0);
    }

    #[tokio::test]
    async fn bind_to_occupied_port_fails() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = occupied.local_addr().unwrap().to_string();

        let result = Server::bind(&addr, Router::new()).await;
        match result {
            Err(ServerError::Bind { addr: failed, .. }) => assert_eq!(failed, addr),
            other => panic!("expected bind error, got {:?}", other.map(|s| s.local_addr())),
        }
    }

    #[tokio::test]
    async fn spawned_server_stops_cleanly() {
        let server = Server::bind("127.0.0.1:0", Router::new()).await.unwrap();
        let handle = server.spawn();
        handle.stop().await.unwrap();
    }
}
