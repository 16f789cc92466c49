// WebSocket handler and stream logic

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::command::CommandRunner;
use crate::host_probe::HostProbe;
use crate::models::Snapshot;

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Decrements ws_system connection count on drop (connect = +1, drop = -1).
struct WsSystemGuard(Arc<AtomicUsize>);

impl Drop for WsSystemGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

pub(super) async fn ws_system<R: CommandRunner, P: HostProbe>(
    ws: WebSocketUpgrade,
    State(state): State<AppState<R, P>>,
) -> impl IntoResponse {
    let tx = state.stats_tx.clone();
    let conn_count = state.ws_system_connections.clone();
    ws.on_upgrade(move |socket| async move {
        let mut rx = tx.subscribe();
        if let Err(e) = stream_system(socket, &mut rx, conn_count).await {
            tracing::info!("System stream error: {}", e);
        }
    })
}

/// True when the message was written within the send timeout.
async fn try_send(socket: &mut WebSocket, msg: Message) -> bool {
    matches!(timeout(WS_SEND_TIMEOUT, socket.send(msg)).await, Ok(Ok(())))
}

async fn stream_system(
    mut socket: WebSocket,
    rx: &mut broadcast::Receiver<Snapshot>,
    conn_count: Arc<AtomicUsize>,
) -> anyhow::Result<()> {
    conn_count.fetch_add(1, Ordering::Relaxed);
    let _guard = WsSystemGuard(conn_count);
    tracing::info!("Client connected to System stream");

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    loop {
        tokio::select! {
            result = rx.recv() => {
                let snapshot = match result {
                    Ok(s) => s,
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(skipped, "System stream client lagging; skipped snapshots");
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                };
                let json = serde_json::to_string(&snapshot)?;
                if !try_send(&mut socket, Message::Text(json.into())).await {
                    break;
                }
            }
            _ = ping_interval.tick() => {
                if !try_send(&mut socket, Message::Ping(Bytes::new())).await {
                    break;
                }
            }
        }
    }
    Ok(())
}
