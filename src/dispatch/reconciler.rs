use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::config::NodeConfig;
use crate::error::DispatchError;
use crate::fleet::{Mission, OrdersSource};
use crate::shutdown::ShutdownReceiver;

use super::signature::StreamSignature;
use super::stream::StreamHandle;

/// Outcome counts of one reconcile pass, logged per cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub started: usize,
    pub restarted: usize,
    pub stopped: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl ReconcileSummary {
    const fn is_quiet(&self) -> bool {
        self.started == 0 && self.restarted == 0 && self.stopped == 0 && self.skipped == 0
    }
}

enum StreamAction {
    Started,
    Restarted,
    Unchanged,
}

/// Owns the mission-id → load-stream map and keeps it in line with the
/// fleet's desired orders.
///
/// The map has exactly one writer, this reconciler, which is what makes the
/// one-stream-per-mission invariant hold without locks.
pub struct MissionReconciler {
    config: Arc<NodeConfig>,
    orders: Arc<dyn OrdersSource>,
    streams: HashMap<String, StreamHandle>,
}

impl MissionReconciler {
    #[must_use]
    pub fn new(config: Arc<NodeConfig>, orders: Arc<dyn OrdersSource>) -> Self {
        Self {
            config,
            orders,
            streams: HashMap::new(),
        }
    }

    /// Polls the fleet API until shutdown, then drains every stream.
    pub async fn run(mut self, mut shutdown_rx: ShutdownReceiver) {
        let Some(planet_id) = self.config.planet_id.clone() else {
            info!("PLANET_ID not set; mission dispatch loop disabled.");
            return;
        };
        info!(
            "Mission dispatch loop active for {} (poll {:?})",
            planet_id, self.config.poll_interval
        );
        let mut poll_tick = interval(self.config.poll_interval);
        poll_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => break,
                _ = poll_tick.tick() => self.poll_once(&planet_id).await,
            }
        }
        info!("Draining {} active load streams", self.stream_count());
        self.drain().await;
    }

    /// One poll cycle: fetch desired orders, reconcile on success, skip the
    /// cycle on any fetch failure. Poll failures are never fatal.
    pub(crate) async fn poll_once(&mut self, planet_id: &str) {
        match self.orders.fetch_orders(planet_id).await {
            Ok(missions) => {
                let summary = self.reconcile(missions, planet_id).await;
                if !summary.is_quiet() {
                    debug!("Reconcile cycle: {:?}", summary);
                }
            }
            Err(err) => warn!("Failed to fetch fleet orders: {}", err),
        }
    }

    /// Diffs the desired mission list against the live streams and issues
    /// the start/stop/restart actions that close the gap.
    pub(crate) async fn reconcile(
        &mut self,
        missions: Vec<Mission>,
        planet_id: &str,
    ) -> ReconcileSummary {
        let mut summary = ReconcileSummary::default();
        let mut desired: HashSet<String> = HashSet::new();
        for mission in missions {
            if mission.source_identity() != planet_id {
                continue;
            }
            let Some(mission_id) = mission.mission_id().map(str::to_owned) else {
                warn!("Skipping a mission without an id");
                summary.skipped = summary.skipped.saturating_add(1);
                continue;
            };
            desired.insert(mission_id.clone());
            match self.ensure_stream(mission_id.clone(), mission).await {
                Ok(StreamAction::Started) => summary.started = summary.started.saturating_add(1),
                Ok(StreamAction::Restarted) => {
                    summary.restarted = summary.restarted.saturating_add(1);
                }
                Ok(StreamAction::Unchanged) => {
                    summary.unchanged = summary.unchanged.saturating_add(1);
                }
                Err(err) => {
                    warn!("Mission {} skipped: {}", mission_id, err);
                    summary.skipped = summary.skipped.saturating_add(1);
                }
            }
        }
        let stale: Vec<String> = self
            .streams
            .keys()
            .filter(|id| !desired.contains(*id))
            .cloned()
            .collect();
        for mission_id in stale {
            self.stop_stream(&mission_id).await;
            summary.stopped = summary.stopped.saturating_add(1);
        }
        summary
    }

    async fn ensure_stream(
        &mut self,
        mission_id: String,
        mission: Mission,
    ) -> Result<StreamAction, DispatchError> {
        let destination_id = mission.destination_identity().to_owned();
        if destination_id.is_empty() {
            return Err(DispatchError::MissingDestination { mission_id });
        }
        let signature = StreamSignature::for_mission(&mission, &destination_id);

        let restart = match self.streams.get(&mission_id) {
            Some(handle) if handle.is_finished() => true,
            Some(handle) if handle.signature() == &signature => {
                return Ok(StreamAction::Unchanged);
            }
            Some(_) => true,
            None => false,
        };
        if restart {
            // The old stream must be fully settled before its replacement
            // starts; two live streams for one mission would double traffic.
            self.stop_stream(&mission_id).await;
        }
        let handle = StreamHandle::spawn(mission, destination_id, signature, &self.config)?;
        self.streams.insert(mission_id, handle);
        Ok(if restart {
            StreamAction::Restarted
        } else {
            StreamAction::Started
        })
    }

    async fn stop_stream(&mut self, mission_id: &str) {
        if let Some(handle) = self.streams.remove(mission_id) {
            handle.stop().await;
        }
    }

    /// Stops every stream and waits for each task to settle.
    pub(crate) async fn drain(&mut self) {
        let pending: Vec<String> = self.streams.keys().cloned().collect();
        for mission_id in pending {
            self.stop_stream(&mission_id).await;
        }
    }

    pub(crate) fn stream_count(&self) -> usize {
        self.streams.len()
    }

    #[cfg(test)]
    pub(crate) fn has_stream(&self, mission_id: &str) -> bool {
        self.streams.contains_key(mission_id)
    }

    #[cfg(test)]
    pub(crate) fn signature_of(&self, mission_id: &str) -> Option<&StreamSignature> {
        self.streams.get(mission_id).map(StreamHandle::signature)
    }

    #[cfg(test)]
    pub(crate) fn abort_stream_task(&self, mission_id: &str) -> bool {
        match self.streams.get(mission_id) {
            Some(handle) => {
                handle.abort_task();
                true
            }
            None => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn stream_task_finished(&self, mission_id: &str) -> bool {
        self.streams
            .get(mission_id)
            .is_some_and(StreamHandle::is_finished)
    }
}
