use rand::SeedableRng;
use rand::rngs::StdRng;
use reqwest::Client;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::NodeConfig;
use crate::error::DispatchError;
use crate::fleet::Mission;

use super::burst::{BurstTarget, emit_burst};
use super::profile::resolve_speed_profile;
use super::signature::StreamSignature;

/// Capacity of each stream's private stop channel (one signal).
const STOP_CHANNEL_CAPACITY: usize = 1;

/// A running load stream plus everything needed to stop it.
///
/// Handles are owned exclusively by the reconciler; at most one exists per
/// mission id at any time.
pub(crate) struct StreamHandle {
    signature: StreamSignature,
    stop_tx: broadcast::Sender<()>,
    task: JoinHandle<()>,
}

impl StreamHandle {
    /// Starts a load stream for `mission` toward `destination_id`.
    pub(crate) fn spawn(
        mission: Mission,
        destination_id: String,
        signature: StreamSignature,
        config: &NodeConfig,
    ) -> Result<Self, DispatchError> {
        let mission_id = mission
            .mission_id()
            .map(str::to_owned)
            .ok_or(DispatchError::MissingMissionId)?;
        let client = Client::builder()
            .timeout(config.dispatch_timeout)
            .build()
            .map_err(|err| DispatchError::BuildClient {
                mission_id: mission_id.clone(),
                source: err,
            })?;
        let url = config.docking_url(&destination_id);
        let source_id = match mission.source_identity() {
            "" => config
                .planet_id
                .clone()
                .unwrap_or_else(|| "unknown".to_owned()),
            id => id.to_owned(),
        };
        let (stop_tx, stop_rx) = broadcast::channel(STOP_CHANNEL_CAPACITY);
        let context = StreamContext {
            mission_id,
            mission,
            source_id,
            destination_id,
            url,
            client,
        };
        let task = tokio::spawn(run_stream(context, stop_rx));
        Ok(Self {
            signature,
            stop_tx,
            task,
        })
    }

    pub(crate) const fn signature(&self) -> &StreamSignature {
        &self.signature
    }

    /// True once the stream task has settled on its own (stopped itself or
    /// crashed); such handles are reaped lazily by the reconciler.
    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signals the stream to stop and waits for its task to settle.
    pub(crate) async fn stop(self) {
        drop(self.stop_tx.send(()));
        if let Err(err) = self.task.await
            && err.is_panic()
        {
            warn!("Load stream task ended in a panic: {}", err);
        }
    }

    #[cfg(test)]
    pub(crate) fn abort_task(&self) {
        self.task.abort();
    }
}

struct StreamContext {
    mission_id: String,
    mission: Mission,
    source_id: String,
    destination_id: String,
    url: String,
    client: Client,
}

/// Burst/cooldown loop of one stream.
///
/// Running until the stop signal arrives; the signal is checked at exactly
/// one suspension point per iteration, so an in-flight burst always settles
/// before the stream stops.
async fn run_stream(context: StreamContext, mut stop_rx: broadcast::Receiver<()>) {
    let rps = context.mission.effective_rps();
    let speed_key = context.mission.speed_key();
    let profile = resolve_speed_profile(Some(&speed_key));
    info!(
        "Mission {} streaming {}rps ({}) toward {}",
        context.mission_id, rps, profile.key, context.destination_id
    );
    let mut rng = StdRng::from_entropy();
    let target = BurstTarget {
        client: &context.client,
        mission: &context.mission,
        source_id: &context.source_id,
        destination_id: &context.destination_id,
        url: &context.url,
    };
    loop {
        let burst_size = profile.burst_size(rps, &mut rng);
        emit_burst(&target, burst_size, &mut rng).await;
        let pause = profile.cooldown(&mut rng);
        tokio::select! {
            _ = stop_rx.recv() => break,
            () = sleep(pause) => {}
        }
    }
    info!("Mission {} load stream stopped", context.mission_id);
}
