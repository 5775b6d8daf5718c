//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, metrics, timeout, body limit)
//! - Serve on a listener until the shutdown signal arrives
//! - Flip readiness to draining when shutdown begins

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::health::{probes, Readiness};
use crate::http::handlers;
use crate::http::request::{make_span, timeout_as_json, track_metrics, UuidRequestId};
use crate::observability::metrics::{self, MetricsError};
use crate::store::UserStore;

const METRICS_UPKEEP_INTERVAL: Duration = Duration::from_secs(5);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UserStore>,
    pub service_name: Arc<str>,
    pub readiness: Readiness,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(
        config: &ServiceConfig,
        store: Arc<UserStore>,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        Self {
            store,
            service_name: Arc::from(config.service.name.as_str()),
            readiness: Readiness::new(),
            metrics,
        }
    }
}

/// HTTP server for the user service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a server whose store is seeded according to the configuration.
    pub fn new(config: ServiceConfig) -> Result<Self, MetricsError> {
        let store = if config.service.seed_defaults {
            UserStore::seeded()
        } else {
            UserStore::new()
        };
        Self::with_store(config, Arc::new(store))
    }

    /// Create a server around an existing store.
    pub fn with_store(config: ServiceConfig, store: Arc<UserStore>) -> Result<Self, MetricsError> {
        let handle = if config.observability.metrics_enabled {
            Some(metrics::install()?)
        } else {
            None
        };
        metrics::record_user_count(store.len());

        let state = AppState::new(&config, store, handle);
        let router = build_router(&config, state.clone());
        Ok(Self {
            router,
            config,
            state,
        })
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service = %self.state.service_name,
            users = self.state.store.len(),
            "User service listening"
        );

        let upkeep = self
            .state
            .metrics
            .clone()
            .map(|handle| tokio::spawn(metrics::run_upkeep(handle, METRICS_UPKEEP_INTERVAL)));

        let readiness = self.state.readiness.clone();
        let served = axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                readiness.set_draining();
                tracing::info!("Draining connections");
            })
            .await;

        if let Some(task) = upkeep {
            task.abort();
        }
        served?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// A clone of the fully layered router, for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the Axum router with all middleware layers.
///
/// `/users` and `/users/{id}` also answer with a trailing slash.
#[allow(deprecated)]
pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
    let users = get(handlers::list_users).post(handlers::create_user);
    let user = get(handlers::get_user)
        .put(handlers::update_user)
        .delete(handlers::delete_user);

    let mut router = Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(probes::health))
        .route("/ready", get(probes::ready))
        .route("/users", users.clone())
        .route("/users/", users)
        .route("/users/{id}", user.clone())
        .route("/users/{id}/", user);
    if state.metrics.is_some() {
        router = router.route("/metrics", get(handlers::render_metrics));
    }

    router
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.security.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(middleware::from_fn(timeout_as_json))
        .layer(middleware::from_fn(track_metrics))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}
