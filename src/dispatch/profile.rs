use std::collections::HashMap;
use std::time::Duration;

use once_cell::sync::Lazy;
use rand::Rng;

/// Shortest pause allowed between two bursts of one stream.
pub(crate) const COOLDOWN_FLOOR: Duration = Duration::from_millis(50);

/// How a mission speed shapes burst sizing and pacing.
///
/// Both ranges are inclusive `[low, high]` bounds sampled uniformly; a
/// degenerate range always yields `low`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedProfile {
    pub key: &'static str,
    burst_multiplier: (f64, f64),
    cooldown_seconds: (f64, f64),
}

impl SpeedProfile {
    const fn new(
        key: &'static str,
        burst_multiplier: (f64, f64),
        cooldown_seconds: (f64, f64),
    ) -> Self {
        Self {
            key,
            burst_multiplier,
            cooldown_seconds,
        }
    }

    /// Number of requests the next burst should carry, never below one.
    pub fn burst_size<R: Rng>(&self, rps: u32, rng: &mut R) -> usize {
        let multiplier = sample(self.burst_multiplier, rng);
        let size = (f64::from(rps) * multiplier).round();
        if size < 1.0 { 1 } else { size as usize }
    }

    /// Pause before the stream's next burst, never below the floor.
    pub fn cooldown<R: Rng>(&self, rng: &mut R) -> Duration {
        let seconds = sample(self.cooldown_seconds, rng).max(0.0);
        Duration::from_secs_f64(seconds).max(COOLDOWN_FLOOR)
    }
}

fn sample<R: Rng>(bounds: (f64, f64), rng: &mut R) -> f64 {
    let (lower, upper) = bounds;
    if upper <= lower {
        return lower;
    }
    rng.gen_range(lower..upper)
}

/// Fallback for unknown speed keys: neutral sizing, one-second pacing.
static DEFAULT_SPEED_PROFILE: SpeedProfile = SpeedProfile::new("cruise", (1.0, 1.0), (1.0, 1.0));

static SPEED_PROFILES: Lazy<HashMap<&'static str, SpeedProfile>> = Lazy::new(|| {
    HashMap::from([
        (
            "cruise",
            SpeedProfile::new("cruise", (0.95, 1.05), (0.9, 1.1)),
        ),
        ("warp", SpeedProfile::new("warp", (1.75, 3.0), (1.2, 2.4))),
        (
            "chaotic",
            SpeedProfile::new("chaotic", (0.35, 4.0), (0.35, 1.5)),
        ),
    ])
});

/// Resolves a mission speed string into a configured profile.
#[must_use]
pub fn resolve_speed_profile(speed: Option<&str>) -> &'static SpeedProfile {
    let normalized = speed.unwrap_or("cruise").trim().to_ascii_lowercase();
    SPEED_PROFILES
        .get(normalized.as_str())
        .unwrap_or(&DEFAULT_SPEED_PROFILE)
}
