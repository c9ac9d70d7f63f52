//! # HTTP Server
//!
//! Combines the resource routers behind one CORS layer and serves them.

use std::io;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::auth_routes::auth_routes;
use super::config::HttpServerConfig;
use super::health_routes::health_routes;
use super::person_routes::person_routes;
use super::state::SharedState;
use super::vehicle_routes::vehicle_routes;
use crate::observability::{log_event_with_fields, Event};

pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: SharedState) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    fn build_router(config: &HttpServerConfig, state: SharedState) -> Router {
        Router::new()
            .merge(health_routes())
            .nest("/auth", auth_routes(state.clone()))
            .nest("/vehicle", vehicle_routes(state.clone()))
            .nest("/person", person_routes(state))
            .layer(cors_layer(&config.cors_origins))
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// The assembled router, for driving requests without a listener
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until Ctrl-C
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid listen address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?.to_string();
        log_event_with_fields(Event::ServerStart, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event_with_fields(Event::ServerStop, &[("addr", bound.as_str())]);
        Ok(())
    }
}

/// Empty origin list allows any origin
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.iter().filter_map(|s| s.parse().ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    // an unsupported signal handler means we only stop with the process
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::SessionConfig;
    use crate::http_server::AppState;
    use crate::storage::Database;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn server(config: HttpServerConfig) -> HttpServer {
        let db = Arc::new(Database::open_in_memory().unwrap());
        HttpServer::new(config, AppState::new(db, SessionConfig::default(), 100).shared())
    }

    #[test]
    fn test_socket_addr_comes_from_config() {
        let config = HttpServerConfig {
            port: 9191,
            ..HttpServerConfig::default()
        };
        assert_eq!(server(config).socket_addr(), "127.0.0.1:9191");
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let router = server(HttpServerConfig::default()).router();
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_echoes_configured_origin() {
        let router = server(HttpServerConfig::default()).router();
        let request = Request::builder()
            .uri("/health")
            .header("origin", "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
    }
}
