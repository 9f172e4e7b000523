//! API server initialization

use std::net::SocketAddr;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use tokio::net::TcpListener;

use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware;
use super::openapi::{openapi_json, swagger_ui_html};
use super::routes::{health, items};
use crate::core::CoreApp;
use crate::core::constants::DEFAULT_BODY_LIMIT;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Returns CoreApp for graceful shutdown
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        // Clone shutdown before moving app
        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let items_routes = items::routes(app.database.clone(), app.config.pagination.clone());

        let router = Router::new()
            .route("/api/v1/health", get(health::health))
            .route("/api/openapi.json", get(openapi_json))
            .route("/api/docs", get(swagger_ui_html))
            .route("/api/docs/", get(swagger_ui_html))
            .nest("/api/v1/items", items_routes)
            .fallback(middleware::handle_404)
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new())
            .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT));

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        Ok(app)
    }
}
