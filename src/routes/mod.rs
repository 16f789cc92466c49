// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::time::Instant;
use tokio::sync::broadcast;
use tower_http::cors::{Any, CorsLayer};

use crate::aggregator::Aggregator;
use crate::command::CommandRunner;
use crate::host_probe::HostProbe;
use crate::models::Snapshot;

pub(crate) struct AppState<R, P> {
    pub(crate) aggregator: Arc<Aggregator<R, P>>,
    pub(crate) stats_tx: broadcast::Sender<Snapshot>,
    pub(crate) ws_system_connections: Arc<AtomicUsize>,
    pub(crate) started_at: Instant,
}

// Manual impl: derive would demand R: Clone and P: Clone.
impl<R, P> Clone for AppState<R, P> {
    fn clone(&self) -> Self {
        Self {
            aggregator: self.aggregator.clone(),
            stats_tx: self.stats_tx.clone(),
            ws_system_connections: self.ws_system_connections.clone(),
            started_at: self.started_at,
        }
    }
}

pub fn app<R: CommandRunner, P: HostProbe>(
    aggregator: Arc<Aggregator<R, P>>,
    stats_tx: broadcast::Sender<Snapshot>,
    ws_system_connections: Arc<AtomicUsize>,
) -> Router {
    let state = AppState {
        aggregator,
        stats_tx,
        ws_system_connections,
        started_at: Instant::now(),
    };
    Router::new()
        .route("/", get(|| async { "hostmon: host monitoring server" })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route(
            "/api/monitoring-data",
            get(http::monitoring_data_handler::<R, P>),
        ) // GET /api/monitoring-data
        .route("/api/debug-info", get(http::debug_info_handler::<R, P>)) // GET /api/debug-info
        .route("/ws/system", get(ws::ws_system::<R, P>)) // WS /ws/system
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any))
        .with_state(state)
}
