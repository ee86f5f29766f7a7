use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::error::FleetError;

use super::client::{FleetClient, OrdersSource};
use super::types::{Endpoint, Mission, iso_timestamp};

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

const SAMPLE_ORDERS: &str = r#"{
    "missions": [
        {
            "id": "m1",
            "source": {"id": "vastaya", "displayName": "Vastaya"},
            "destination": {"id": "ionia"},
            "rps": 10,
            "speed": "cruise",
            "escortEnabled": true
        },
        {
            "id": "m2",
            "destination": {"code": "targon"}
        }
    ]
}"#;

#[test]
fn endpoint_identity_prefers_id_then_code_then_display_name() -> Result<(), String> {
    let full = Endpoint {
        id: Some("ionia".to_owned()),
        code: Some("ION".to_owned()),
        display_name: Some("Ionia".to_owned()),
    };
    if full.identity() != "ionia" {
        return Err(format!("Expected id, got {}", full.identity()));
    }

    let code_only = Endpoint {
        id: Some("  ".to_owned()),
        code: Some(" ION ".to_owned()),
        display_name: None,
    };
    if code_only.identity() != "ION" {
        return Err(format!("Expected trimmed code, got {}", code_only.identity()));
    }

    let display_only = Endpoint {
        id: None,
        code: None,
        display_name: Some("Ionia".to_owned()),
    };
    if display_only.identity() != "Ionia" {
        return Err("Expected display name fallback".to_owned());
    }

    if Endpoint::default().identity() != "" {
        return Err("An empty endpoint has no identity".to_owned());
    }
    Ok(())
}

#[test]
fn missions_decode_from_the_fleet_wire_format() -> Result<(), String> {
    let payload: super::types::OrdersPayload =
        serde_json::from_str(SAMPLE_ORDERS).map_err(|err| format!("Decode failed: {}", err))?;
    let first = payload.missions.first().ok_or("Missing first mission")?;
    if first.mission_id() != Some("m1") || first.source_identity() != "vastaya" {
        return Err("First mission decoded incorrectly".to_owned());
    }
    if first.effective_rps() != 10 || !first.escort_enabled {
        return Err("camelCase fields must map onto the mission".to_owned());
    }

    let second = payload.missions.get(1).ok_or("Missing second mission")?;
    if second.source_identity() != "" || second.destination_identity() != "targon" {
        return Err("Partial missions must fill in defaults".to_owned());
    }
    if second.effective_rps() != 1 || second.escort_enabled {
        return Err("Missing rps/escort must default".to_owned());
    }
    Ok(())
}

#[test]
fn effective_rps_floors_out_of_range_values() -> Result<(), String> {
    let mut convoy = Mission {
        id: Some("m1".to_owned()),
        ..Mission::default()
    };
    for (raw, expected) in [(None, 1u32), (Some(0), 1), (Some(-5), 1), (Some(25), 25)] {
        convoy.rps = raw;
        if convoy.effective_rps() != expected {
            return Err(format!("rps {:?} resolved to {}", raw, convoy.effective_rps()));
        }
    }
    Ok(())
}

#[test]
fn speed_key_normalizes_case_and_blanks() -> Result<(), String> {
    let mut convoy = Mission::default();
    for (raw, expected) in [
        (None, "cruise"),
        (Some("  WARP "), "warp"),
        (Some(""), "cruise"),
        (Some("Chaotic"), "chaotic"),
    ] {
        convoy.speed = raw.map(str::to_owned);
        if convoy.speed_key() != expected {
            return Err(format!("speed {:?} resolved to {}", raw, convoy.speed_key()));
        }
    }
    Ok(())
}

#[test]
fn timestamps_are_iso_8601_utc() -> Result<(), String> {
    let stamp = iso_timestamp();
    if chrono::DateTime::parse_from_rfc3339(&stamp).is_err() {
        return Err(format!("'{}' is not RFC 3339", stamp));
    }
    if !stamp.ends_with('Z') {
        return Err(format!("'{}' is not UTC", stamp));
    }
    Ok(())
}

type QueryLog = Arc<Mutex<Vec<String>>>;

async fn spawn_fleet_stub(
    status: StatusCode,
    body: Value,
) -> Result<(SocketAddr, QueryLog), String> {
    let log: QueryLog = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&log);
    let app = Router::new().route(
        "/api/fleet/orders",
        get(move |Query(params): Query<Vec<(String, String)>>| {
            let seen = Arc::clone(&seen);
            let body = body.clone();
            async move {
                if let Ok(mut entries) = seen.lock() {
                    entries.extend(params.into_iter().map(|(key, value)| {
                        format!("{}={}", key, value)
                    }));
                }
                (status, Json(body))
            }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .map_err(|err| format!("Failed to bind fleet stub: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("Failed to read stub address: {}", err))?;
    drop(tokio::spawn(async move {
        drop(axum::serve(listener, app).await);
    }));
    Ok((addr, log))
}

#[test]
fn fetch_orders_decodes_missions_and_filters_by_planet() -> Result<(), String> {
    run_async_test(async {
        let body: Value =
            serde_json::from_str(SAMPLE_ORDERS).map_err(|err| format!("Bad fixture: {}", err))?;
        let (addr, log) = spawn_fleet_stub(StatusCode::OK, body).await?;
        let client = FleetClient::new(
            &format!("http://{}/api/fleet/", addr),
            Duration::from_secs(2),
        )
        .map_err(|err| format!("Failed to build client: {}", err))?;

        let missions = client
            .fetch_orders("vastaya")
            .await
            .map_err(|err| format!("fetch_orders failed: {}", err))?;
        if missions.len() != 2 {
            return Err(format!("Expected 2 missions, got {}", missions.len()));
        }

        let queries = log
            .lock()
            .map_err(|err| format!("Query log poisoned: {}", err))?;
        if !queries.iter().any(|entry| entry == "planetId=vastaya") {
            return Err(format!("planetId query missing: {:?}", queries));
        }
        Ok(())
    })
}

#[test]
fn fetch_orders_surfaces_non_2xx_as_status_errors() -> Result<(), String> {
    run_async_test(async {
        let (addr, _log) =
            spawn_fleet_stub(StatusCode::SERVICE_UNAVAILABLE, json!({"error": "down"})).await?;
        let client = FleetClient::new(
            &format!("http://{}/api/fleet", addr),
            Duration::from_secs(2),
        )
        .map_err(|err| format!("Failed to build client: {}", err))?;

        match client.fetch_orders("vastaya").await {
            Err(FleetError::Status { status: 503, .. }) => Ok(()),
            Err(other) => Err(format!("Expected a status error, got {}", other)),
            Ok(_) => Err("Expected the fetch to fail".to_owned()),
        }
    })
}

#[test]
fn fetch_orders_surfaces_malformed_bodies_as_decode_errors() -> Result<(), String> {
    run_async_test(async {
        let (addr, _log) =
            spawn_fleet_stub(StatusCode::OK, json!({"missions": "not-a-list"})).await?;
        let client = FleetClient::new(
            &format!("http://{}/api/fleet", addr),
            Duration::from_secs(2),
        )
        .map_err(|err| format!("Failed to build client: {}", err))?;

        match client.fetch_orders("vastaya").await {
            Err(FleetError::Decode { .. }) => Ok(()),
            Err(other) => Err(format!("Expected a decode error, got {}", other)),
            Ok(_) => Err("Expected the fetch to fail".to_owned()),
        }
    })
}

#[test]
fn unreachable_fleet_is_a_transport_error() -> Result<(), String> {
    run_async_test(async {
        let client = FleetClient::new("http://127.0.0.1:9/api/fleet", Duration::from_millis(250))
            .map_err(|err| format!("Failed to build client: {}", err))?;
        match client.fetch_orders("vastaya").await {
            Err(FleetError::Transport { .. }) => Ok(()),
            Err(other) => Err(format!("Expected a transport error, got {}", other)),
            Ok(_) => Err("Expected the fetch to fail".to_owned()),
        }
    })
}
