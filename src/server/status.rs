use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::{Value, json};

use crate::error::FleetError;
use crate::fleet::iso_timestamp;

use super::AppState;

/// Basic health endpoint; never impacted by chaos.
pub(crate) async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok", "timestamp": iso_timestamp() }))
}

pub(crate) async fn readyz() -> Json<Value> {
    Json(json!({ "status": "ready", "timestamp": iso_timestamp() }))
}

pub(crate) async fn livez() -> Json<Value> {
    Json(json!({ "status": "alive", "timestamp": iso_timestamp() }))
}

/// Exposes the resolved config plus a best-effort fleet snapshot.
pub(crate) async fn node_status(State(state): State<AppState>) -> Json<Value> {
    let snapshot = gather_fleet_snapshot(&state).await;
    Json(json!({
        "service": "spaceport",
        "timestamp": iso_timestamp(),
        "config": state.config.describe(),
        "fleet": snapshot,
    }))
}

/// Collects the overall missions plus this planet's orders; either side
/// failing is reported in place rather than failing the endpoint.
async fn gather_fleet_snapshot(state: &AppState) -> Value {
    let missions = state.fleet.fetch_json("/missions", &[]);
    match state.config.planet_id.as_deref() {
        Some(planet_id) => {
            let orders_params = [("planetId", planet_id)];
            let orders = state.fleet.fetch_json("/orders", &orders_params);
            let (missions_result, orders_result) = tokio::join!(missions, orders);
            json!({
                "missions": snapshot_entry(missions_result),
                "orders": snapshot_entry(orders_result),
                "fetchedAt": iso_timestamp(),
            })
        }
        None => {
            let missions_result = missions.await;
            json!({
                "missions": snapshot_entry(missions_result),
                "orders": Value::Null,
                "fetchedAt": iso_timestamp(),
            })
        }
    }
}

fn snapshot_entry(result: Result<Value, FleetError>) -> Value {
    match result {
        Ok(data) => json!({ "ok": true, "data": data }),
        Err(err) => json!({ "ok": false, "error": err.to_string() }),
    }
}

/// Mirrors the fleet API missions listing.
pub(crate) async fn missions_proxy(
    State(state): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match state.fleet.fetch_json("/missions", &[]).await {
        Ok(data) => Ok(Json(data)),
        Err(err) => Err((
            StatusCode::BAD_GATEWAY,
            Json(json!({ "error": format!("Fleet API unreachable: {}", err) })),
        )),
    }
}
