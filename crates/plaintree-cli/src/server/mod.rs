mod emit;
mod handlers;
mod html;
mod mime;

use anyhow::Result;
use axum::{routing::get, Router};
use plaintree::Store;
use std::collections::HashMap;
use std::sync::Arc;

use crate::refs::RefStore;

pub use handlers::respond;

/// Shared per-request state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub refs: Arc<RefStore>,
    /// Extension -> MIME type, from config
    pub mime_types: HashMap<String, String>,
    /// Redirect slash-less directory URLs with a 301
    pub ensure_trailing_slash: bool,
}

pub struct PlainServer {
    state: AppState,
    addr: String,
}

impl PlainServer {
    pub fn new(
        store: Arc<dyn Store>,
        refs: Arc<RefStore>,
        mime_types: HashMap<String, String>,
        addr: String,
    ) -> Self {
        Self {
            state: AppState {
                store,
                refs,
                mime_types,
                ensure_trailing_slash: true,
            },
            addr,
        }
    }

    pub fn with_ensure_trailing_slash(mut self, ensure: bool) -> Self {
        self.state.ensure_trailing_slash = ensure;
        self
    }

    pub async fn run(self) -> Result<()> {
        let app = Router::new()
            .route("/", get(handlers::serve_root))
            .route("/*path", get(handlers::serve_path))
            .with_state(self.state);

        tracing::info!("Listening on {}", self.addr);
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }
}
