//! API server setup and configuration.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::Request;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::api::routes;
use crate::collector::Collector;
use crate::error::Result;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server start time for uptime calculation
    pub start_time: Instant,
    /// Scrape entry point
    pub collector: Arc<Collector>,
}

impl AppState {
    pub fn new(collector: Arc<Collector>) -> Self {
        Self {
            start_time: Instant::now(),
            collector,
        }
    }
}

/// API server.
pub struct ApiServer {
    addr: SocketAddr,
    state: AppState,
    cancel_token: CancellationToken,
}

impl ApiServer {
    pub fn new(addr: SocketAddr, state: AppState) -> Self {
        Self {
            addr,
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Get the cancellation token for graceful shutdown.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Build the router with all middleware and routes.
    pub fn build_router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Bind and serve until the cancellation token fires.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let router = self.build_router();

        tracing::info!("Listening on {}", listener.local_addr()?);

        let cancel_token = self.cancel_token.clone();

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                cancel_token.cancelled().await;
                tracing::info!("Server shutting down...");
            })
            .await?;

        Ok(())
    }

    /// Shutdown the server.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

/// Routes plus request tracing. Health probes are not traced.
pub fn build_router(state: AppState) -> Router {
    routes::create_router(state).layer(
        TraceLayer::new_for_http()
            .make_span_with(|req: &Request| {
                if req.uri().path().starts_with("/health") {
                    Span::none()
                } else {
                    let mut make_span =
                        tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::DEBUG);
                    use tower_http::trace::MakeSpan;
                    make_span.make_span(req)
                }
            })
            .on_response(
                |res: &axum::http::Response<_>, latency: Duration, span: &Span| {
                    if span.is_disabled() {
                        return;
                    }
                    let on_response =
                        tower_http::trace::DefaultOnResponse::new().level(tracing::Level::DEBUG);
                    use tower_http::trace::OnResponse;
                    on_response.on_response(res, latency, span);
                },
            ),
    )
}
