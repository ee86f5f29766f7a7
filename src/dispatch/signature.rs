use crate::fleet::Mission;

/// The subset of mission fields that determines traffic shape.
///
/// Two snapshots of one mission with equal signatures need no restart; any
/// difference forces stop-then-start. `escort_enabled` never affects pacing
/// but rides in every emitted payload, so it participates here purely to
/// force a restart when it flips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSignature {
    destination: String,
    rps: u32,
    speed: String,
    escort_enabled: bool,
}

impl StreamSignature {
    #[must_use]
    pub fn for_mission(mission: &Mission, destination_id: &str) -> Self {
        Self {
            destination: destination_id.to_owned(),
            rps: mission.effective_rps(),
            speed: mission.speed_key(),
            escort_enabled: mission.escort_enabled,
        }
    }
}
