use std::time::Duration;

use axum::Json;
use axum::extract::State;
use rand::Rng;
use rand::seq::SliceRandom;
use tokio::time::sleep;
use tracing::info;

use crate::fleet::{DockOperation, DockingRequest, DockingResponse, iso_timestamp};

use super::AppState;

/// Handling steps a convoy can go through while docked.
pub(crate) const DOCK_OPERATIONS: [&str; 6] = [
    "Requesting docking clearance",
    "Synchronizing shields",
    "Aligning cargo bay doors",
    "Unloading cargo containers",
    "Routing goods to storage rings",
    "Signing customs ledger",
];

const MIN_OPERATIONS: usize = 3;
const STEP_DURATION_BOUNDS: (f64, f64) = (0.2, 1.5);

/// Simulates cargo handling for missions targeting this planet.
pub(crate) async fn receive_cargo(
    State(state): State<AppState>,
    Json(payload): Json<DockingRequest>,
) -> Json<DockingResponse> {
    let destination_id = match payload.destination.identity() {
        "" => state
            .config
            .planet_id
            .clone()
            .unwrap_or_else(|| "unknown".to_owned()),
        id => id.to_owned(),
    };
    let origin_id = match payload.source.identity() {
        "" => "unknown",
        id => id,
    }
    .to_owned();
    let mission_label = payload
        .mission_id
        .clone()
        .unwrap_or_else(|| "unknown".to_owned());
    info!(
        "Receiving convoy for mission {} from {} to {}",
        mission_label, origin_id, destination_id
    );
    let plan = plan_docking_operations(&mut rand::thread_rng());
    let operations = execute_docking_operations(&mission_label, plan).await;
    let cargo_quantity = payload
        .cargo
        .iter()
        .fold(0u64, |total, entry| {
            total.saturating_add(u64::from(entry.quantity))
        });
    Json(DockingResponse {
        mission_id: payload.mission_id,
        status: "completed".to_owned(),
        processed_at: iso_timestamp(),
        planet_id: destination_id,
        operations,
        cargo_processed: cargo_quantity,
    })
}

/// Picks the docking steps for one delivery: a random-size distinct subset
/// of the catalog, each step with a random duration.
pub(crate) fn plan_docking_operations<R: Rng>(rng: &mut R) -> Vec<(&'static str, f64)> {
    let total = DOCK_OPERATIONS.len();
    let upper = total.max(MIN_OPERATIONS);
    let selection = rng.gen_range(MIN_OPERATIONS..=upper).min(total);
    let steps: Vec<&'static str> = DOCK_OPERATIONS
        .choose_multiple(rng, selection)
        .copied()
        .collect();
    let (low, high) = STEP_DURATION_BOUNDS;
    steps
        .into_iter()
        .map(|step| (step, round2(rng.gen_range(low..high))))
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

async fn execute_docking_operations(
    mission_label: &str,
    plan: Vec<(&'static str, f64)>,
) -> Vec<DockOperation> {
    let mut operations = Vec::with_capacity(plan.len());
    for (action, duration_seconds) in plan {
        info!("Mission {}: {}", mission_label, action);
        sleep(Duration::from_secs_f64(duration_seconds)).await;
        operations.push(DockOperation {
            action: action.to_owned(),
            duration_seconds,
            completed_at: iso_timestamp(),
        });
    }
    operations
}
