use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use rand::Rng;
use serde_json::json;
use tokio::time::sleep;

use crate::config::NodeConfig;
use crate::fleet::iso_timestamp;

use super::AppState;

/// Paths that must never be delayed or failed, whatever the configuration.
const CHAOS_EXEMPT_PATHS: [&str; 3] = ["/healthz", "/readyz", "/livez"];

/// Applies nebula latency and chaos failure injection, in that order, to all
/// non-exempt inbound traffic.
pub(crate) async fn nebula_and_chaos(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let exempt = is_exempt(normalize_path(request.uri().path()));
    if !exempt {
        let delay = state.config.nebula_delay();
        if !delay.is_zero() {
            sleep(delay).await;
        }
        if state.config.chaos_enabled
            && chaos_strikes(&mut rand::thread_rng(), state.config.chaos_failure_rate)
        {
            return chaos_failure_response(&state.config);
        }
    }
    next.run(request).await
}

fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

fn is_exempt(path: &str) -> bool {
    CHAOS_EXEMPT_PATHS.contains(&path)
}

/// One uniform draw against the configured failure rate.
pub(crate) fn chaos_strikes<R: Rng>(rng: &mut R, failure_rate: f64) -> bool {
    rng.gen_range(0.0..1.0) < failure_rate
}

fn chaos_failure_response(config: &NodeConfig) -> Response {
    let body = json!({
        "error": "Chaos experiments triggered a simulated failure.",
        "timestamp": iso_timestamp(),
        "config": {
            "chaosExperimentsEnabled": config.chaos_enabled,
            "chaosFailureRate": config.chaos_failure_rate,
        },
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
