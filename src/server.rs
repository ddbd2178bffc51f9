use std::{io, net::SocketAddr, time::Duration};

use axum::{Extension, Router, routing::get};
use thiserror::Error;
use tokio::{
    net::{TcpListener, ToSocketAddrs},
    sync::{mpsc, oneshot},
};

use crate::api;

const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum CallbackError {
    #[error("failed to bind the callback listener: {0}")]
    Bind(#[source] io::Error),

    #[error("callback server failed: {0}")]
    Serve(#[source] io::Error),

    #[error("no OAuth callback received within {0:?}")]
    TimedOut(Duration),

    #[error("callback server stopped before an authorization code arrived")]
    Closed,
}

/// One-shot HTTP listener for the OAuth redirect.
///
/// Bind it before sending the user to the authorization page so an early
/// redirect cannot hit a closed port.
pub struct CallbackServer {
    listener: TcpListener,
    path: String,
}

impl CallbackServer {
    pub async fn bind<A: ToSocketAddrs>(addr: A, path: &str) -> Result<Self, CallbackError> {
        let listener = TcpListener::bind(addr).await.map_err(CallbackError::Bind)?;
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };

        Ok(Self { listener, path })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves the redirect path until a request with a `code` arrives, then
    /// shuts the server down and returns the code.
    ///
    /// Requests without a code are answered with 400 and do not end the wait.
    /// `None` waits without a deadline.
    pub async fn wait_for_code(self, timeout: Option<Duration>) -> Result<String, CallbackError> {
        let (code_tx, mut code_rx) = mpsc::channel::<String>(1);
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new()
            .route(&self.path, get(api::callback))
            .layer(Extension(code_tx));

        let listener = self.listener;
        let mut server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        let received = match timeout {
            Some(limit) => tokio::time::timeout(limit, code_rx.recv())
                .await
                .map_err(|_| CallbackError::TimedOut(limit)),
            None => Ok(code_rx.recv().await),
        };

        let _ = shutdown_tx.send(());
        let stopped = tokio::time::timeout(SHUTDOWN_GRACE, &mut server).await;
        if stopped.is_err() {
            server.abort();
        }

        match received? {
            Some(code) => Ok(code),
            None => match stopped {
                Ok(Ok(Err(e))) => Err(CallbackError::Serve(e)),
                _ => Err(CallbackError::Closed),
            },
        }
    }
}
