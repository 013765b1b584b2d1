use std::{net::SocketAddr, sync::Arc};

use axum::{Extension, Router, routing::get};
use tokio::sync::Mutex;

use crate::{api, error::AuthError, warning};

/// Handoff cell between the `/callback` handler (writer) and the polling
/// loop (reader).
pub type CodeCell = Arc<Mutex<Option<String>>>;

/// Local HTTP endpoint that captures the authorization code of the browser
/// redirect.
///
/// The server lives until the process exits. Starting it twice is a no-op,
/// so repeated authorization attempts never collide on the port.
pub struct CallbackServer {
    addr: SocketAddr,
    code: CodeCell,
    bound: Mutex<Option<SocketAddr>>,
}

impl CallbackServer {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            code: Arc::new(Mutex::new(None)),
            bound: Mutex::new(None),
        }
    }

    /// Binds the listener and serves in the background.
    ///
    /// Returns once the socket is bound, so the redirect target is listening
    /// before the browser is opened.
    pub async fn start(&self) -> Result<SocketAddr, AuthError> {
        let mut bound = self.bound.lock().await;
        if let Some(addr) = *bound {
            return Ok(addr);
        }

        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| AuthError::CallbackServer(format!("cannot bind {}: {}", self.addr, e)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| AuthError::CallbackServer(e.to_string()))?;

        let app = Router::new()
            .route("/callback", get(api::callback))
            .layer(Extension(Arc::clone(&self.code)));

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                warning!("Callback server stopped: {}", e);
            }
        });

        *bound = Some(local_addr);
        Ok(local_addr)
    }

    /// The last captured code, if any. An empty string means the redirect
    /// arrived without a `code` parameter.
    pub async fn authorization_code(&self) -> Option<String> {
        self.code.lock().await.clone()
    }

    /// Forgets a previously captured code before a new attempt.
    pub async fn clear(&self) {
        *self.code.lock().await = None;
    }
}
