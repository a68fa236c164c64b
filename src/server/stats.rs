use axum::{extract::State, Json};
use serde_json::Value;

use super::{track, APIError, AppState};
use crate::metrics::http_server;

/// Raw Grafana datasource response with the bot's connection status and uptime.
pub(super) async fn connected(State(state): State<AppState>) -> Result<Json<Value>, APIError> {
  let endpoint_name = "stats.connected";
  http_server::requests_total(endpoint_name).inc();

  let res = match &state.grafana {
    Some(grafana) => grafana.fetch_connected().await.map(Json),
    None => Err(APIError::unavailable("Grafana is not configured")),
  };
  track(endpoint_name, res)
}
