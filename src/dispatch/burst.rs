use futures_util::future::join_all;
use rand::Rng;
use reqwest::Client;
use tracing::warn;

use crate::error::DispatchError;
use crate::fleet::{DockingRequest, Endpoint, Mission, iso_timestamp};

use super::cargo::build_cargo_manifest;

/// Everything a stream needs to address one burst.
pub(crate) struct BurstTarget<'ctx> {
    pub client: &'ctx Client,
    pub mission: &'ctx Mission,
    pub source_id: &'ctx str,
    pub destination_id: &'ctx str,
    pub url: &'ctx str,
}

/// Fires `burst_size` concurrent delivery attempts and waits for all of
/// them to settle. Individual failures are logged, never propagated; a
/// partially failed burst is still a completed burst.
pub(crate) async fn emit_burst<R: Rng>(target: &BurstTarget<'_>, burst_size: usize, rng: &mut R) {
    if burst_size == 0 {
        return;
    }
    let payloads: Vec<DockingRequest> = (0..burst_size)
        .map(|_| build_docking_payload(target, rng))
        .collect();
    let attempts = payloads
        .into_iter()
        .map(|payload| send_docking_request(target.client, target.url, payload));
    let mission_id = target.mission.mission_id().unwrap_or("unknown");
    for outcome in join_all(attempts).await {
        if let Err(err) = outcome {
            warn!(
                "Mission {} dispatch to {} failed: {}",
                mission_id, target.destination_id, err
            );
        }
    }
}

fn build_docking_payload<R: Rng>(target: &BurstTarget<'_>, rng: &mut R) -> DockingRequest {
    let mission = target.mission;
    let source = if mission.source.identity().is_empty() {
        Endpoint::with_id(target.source_id)
    } else {
        mission.source.clone()
    };
    let destination = if mission.destination.identity().is_empty() {
        Endpoint::with_id(target.destination_id)
    } else {
        mission.destination.clone()
    };
    DockingRequest {
        mission_id: mission.id.clone(),
        source,
        destination,
        rps: mission.rps,
        speed: mission.speed.clone(),
        escort_enabled: mission.escort_enabled,
        cargo: build_cargo_manifest(rng),
        sent_at: Some(iso_timestamp()),
    }
}

async fn send_docking_request(
    client: &Client,
    url: &str,
    payload: DockingRequest,
) -> Result<(), DispatchError> {
    let response = client
        .post(url)
        .json(&payload)
        .send()
        .await
        .map_err(|err| DispatchError::DeliveryTransport {
            url: url.to_owned(),
            source: err,
        })?;
    let status = response.status();
    if !status.is_success() {
        return Err(DispatchError::DeliveryStatus {
            url: url.to_owned(),
            status: status.as_u16(),
        });
    }
    Ok(())
}
