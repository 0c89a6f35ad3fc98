//! HTTP server setup.
//!
//! # Responsibilities
//! - Build the shared handler (pooled upstream client + endpoint resolver)
//! - Hand the listener to the configured engine
//! - Stop accepting and drain when the shutdown signal fires

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{Engine, PassthroughConfig};
use crate::http::{axum_engine, hyper_engine};
use crate::passthrough::Passthrough;
use crate::upstream::UpstreamResult;

/// HTTP server for the passthrough.
pub struct HttpServer {
    config: PassthroughConfig,
    passthrough: Arc<Passthrough>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: PassthroughConfig) -> UpstreamResult<Self> {
        let passthrough = Arc::new(Passthrough::new(&config)?);
        Ok(Self {
            config,
            passthrough,
        })
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let engine = self.config.server.engine;
        tracing::info!(
            address = %addr,
            engine = %engine,
            "HTTP server starting"
        );

        match engine {
            Engine::Axum => {
                let router = axum_engine::build_router(&self.config, self.passthrough);
                axum_engine::serve(listener, router, shutdown).await?;
            }
            Engine::Hyper => {
                hyper_engine::serve(listener, &self.config, self.passthrough, shutdown).await?;
            }
        }

        tracing::info!(engine = %engine, "HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &PassthroughConfig {
        &self.config
    }
}
