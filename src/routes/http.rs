// GET handlers: version, monitoring-data, debug-info

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::command::CommandRunner;
use crate::error::CollectError;
use crate::host_probe::HostProbe;
use crate::models::Snapshot;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// One structured failure for a poll that could not produce a snapshot.
pub(super) struct PollFailure(CollectError);

impl IntoResponse for PollFailure {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({
                "error": "Failed to fetch monitoring data",
                "details": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/monitoring-data: polls every source now and returns the snapshot.
pub(super) async fn monitoring_data_handler<R: CommandRunner, P: HostProbe>(
    State(state): State<AppState<R, P>>,
) -> Result<Json<Snapshot>, PollFailure> {
    tracing::debug!("Fetching monitoring data");
    match state.aggregator.poll().await {
        Ok(snapshot) => {
            tracing::debug!(gpus = snapshot.gpus.len(), "monitoring data fetched");
            Ok(Json(snapshot))
        }
        Err(e) => {
            tracing::error!(error = %e, operation = "poll", "Error fetching monitoring data");
            Err(PollFailure(e))
        }
    }
}

/// GET /api/debug-info: process/environment details plus which tier served each source last.
pub(super) async fn debug_info_handler<R: CommandRunner, P: HostProbe>(
    State(state): State<AppState<R, P>>,
) -> impl IntoResponse {
    let sources = state.aggregator.last_report().await;
    Json(serde_json::json!({
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "process": {
            "pid": std::process::id(),
            "uptime": state.started_at.elapsed().as_secs_f64(),
        },
        "environment": {
            "version": VERSION,
            "platform": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "debugMode": tracing::enabled!(tracing::Level::DEBUG),
        },
        "sources": sources,
    }))
}
