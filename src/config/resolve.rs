use std::time::Duration;

use serde_json::{Value, json};
use tracing::warn;
use url::Url;

use crate::args::{NodeArgs, parse_bool_env};

const DEFAULT_FLEET_BASE_URL: &str = "http://localhost:4006/api/fleet";
const DEFAULT_SERVICE_TEMPLATE: &str = "http://{planet}-service";
const DEFAULT_PORT: u16 = 8080;

const DEFAULT_FLEET_TIMEOUT_SECONDS: f64 = 5.0;
const FLEET_TIMEOUT_BOUNDS: (f64, f64) = (0.1, 30.0);
const DEFAULT_POLL_INTERVAL_SECONDS: f64 = 5.0;
const POLL_INTERVAL_BOUNDS: (f64, f64) = (0.5, 120.0);
const DEFAULT_DISPATCH_TIMEOUT_SECONDS: f64 = 5.0;
const DISPATCH_TIMEOUT_BOUNDS: (f64, f64) = (0.5, 60.0);
const DEFAULT_CHAOS_FAILURE_RATE: f64 = 0.18;
const CHAOS_FAILURE_RATE_BOUNDS: (f64, f64) = (0.0, 1.0);

/// Resolved node configuration.
///
/// All numeric values have been clamped to their documented bounds and every
/// unparseable input has already fallen back to its default, so consumers can
/// treat the fields as trusted.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    pub planet_id: Option<String>,
    pub fleet_api_base_url: String,
    pub fleet_timeout: Duration,
    pub poll_interval: Duration,
    pub dispatch_timeout: Duration,
    pub planet_service_template: String,
    pub nebula_enabled: bool,
    pub nebula_density_ms: u64,
    pub chaos_enabled: bool,
    pub chaos_failure_rate: f64,
    pub port: u16,
}

impl NodeConfig {
    /// Resolves parsed CLI/environment options into a usable configuration.
    #[must_use]
    pub fn resolve(args: &NodeArgs) -> Self {
        let planet_id = args
            .planet_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned);

        Self {
            planet_id,
            fleet_api_base_url: resolve_base_url(&args.fleet_api_base_url),
            fleet_timeout: resolve_seconds(
                args.fleet_timeout_seconds.as_deref(),
                "FLEET_API_TIMEOUT_SECONDS",
                DEFAULT_FLEET_TIMEOUT_SECONDS,
                FLEET_TIMEOUT_BOUNDS,
            ),
            poll_interval: resolve_seconds(
                args.mission_poll_interval_seconds.as_deref(),
                "MISSION_POLL_INTERVAL_SECONDS",
                DEFAULT_POLL_INTERVAL_SECONDS,
                POLL_INTERVAL_BOUNDS,
            ),
            dispatch_timeout: resolve_seconds(
                args.mission_dispatch_timeout_seconds.as_deref(),
                "MISSION_DISPATCH_TIMEOUT_SECONDS",
                DEFAULT_DISPATCH_TIMEOUT_SECONDS,
                DISPATCH_TIMEOUT_BOUNDS,
            ),
            planet_service_template: resolve_template(&args.planet_service_template),
            nebula_enabled: resolve_bool(args.nebula_enabled.as_deref(), "NEBULA_ENABLED", false),
            nebula_density_ms: resolve_u64(args.nebula_density_ms.as_deref(), "NEBULA_DENSITY", 0),
            chaos_enabled: resolve_bool(
                args.chaos_experiments_enabled.as_deref(),
                "CHAOS_EXPERIMENTS_ENABLED",
                false,
            ),
            chaos_failure_rate: resolve_bounded_f64(
                args.chaos_failure_rate.as_deref(),
                "CHAOS_FAILURE_RATE",
                DEFAULT_CHAOS_FAILURE_RATE,
                CHAOS_FAILURE_RATE_BOUNDS,
            ),
            port: resolve_port(args.port.as_deref()),
        }
    }

    /// Returns the nebula latency budget for one inbound request.
    #[must_use]
    pub fn nebula_delay(&self) -> Duration {
        if !self.nebula_enabled {
            return Duration::ZERO;
        }
        Duration::from_millis(self.nebula_density_ms)
    }

    /// Expands the service template into the base URL of a peer planet.
    #[must_use]
    pub fn planet_service_base(&self, planet_id: &str) -> String {
        let slug = sanitize_planet_slug(planet_id);
        let mut base = self.planet_service_template.clone();
        for (key, value) in [
            ("{planet}", slug.as_str()),
            ("{planet_slug}", slug.as_str()),
            ("{slug}", slug.as_str()),
            ("{planetId}", planet_id),
            ("{planet_id}", planet_id),
        ] {
            base = base.replace(key, value);
        }
        let trimmed = base.trim_end_matches('/');
        if trimmed.is_empty() {
            slug
        } else {
            trimmed.to_owned()
        }
    }

    /// Returns the docking endpoint of a peer planet.
    #[must_use]
    pub fn docking_url(&self, planet_id: &str) -> String {
        format!("{}/dock", self.planet_service_base(planet_id))
    }

    /// Returns the camelCase payload reported by `/status`.
    #[must_use]
    pub fn describe(&self) -> Value {
        json!({
            "planetId": self.planet_id,
            "fleetApiBaseUrl": self.fleet_api_base_url,
            "fleetTimeoutSeconds": self.fleet_timeout.as_secs_f64(),
            "missionPollIntervalSeconds": self.poll_interval.as_secs_f64(),
            "missionDispatchTimeoutSeconds": self.dispatch_timeout.as_secs_f64(),
            "planetServiceTemplate": self.planet_service_template,
            "nebulaEnabled": self.nebula_enabled,
            "nebulaDensity": self.nebula_density_ms,
            "chaosExperimentsEnabled": self.chaos_enabled,
            "chaosFailureRate": self.chaos_failure_rate,
            "port": self.port,
        })
    }
}

/// Collapses a planet id into a DNS-friendly slug.
pub(crate) fn sanitize_planet_slug(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;
    for ch in value.to_ascii_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "planet".to_owned()
    } else {
        slug
    }
}

fn resolve_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    match Url::parse(trimmed) {
        Ok(_) => trimmed.to_owned(),
        Err(err) => {
            warn!(
                "Invalid FLEET_API_BASE_URL '{}' ({}); using default {}",
                raw, err, DEFAULT_FLEET_BASE_URL
            );
            DEFAULT_FLEET_BASE_URL.to_owned()
        }
    }
}

fn resolve_template(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_SERVICE_TEMPLATE.to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn resolve_seconds(raw: Option<&str>, field: &str, default: f64, bounds: (f64, f64)) -> Duration {
    let seconds = resolve_bounded_f64(raw, field, default, bounds);
    Duration::from_secs_f64(seconds)
}

fn resolve_bounded_f64(raw: Option<&str>, field: &str, default: f64, bounds: (f64, f64)) -> f64 {
    let (min, max) = bounds;
    let value = match raw {
        None => default,
        Some(text) => match text.trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() => parsed,
            Ok(_) | Err(_) => {
                warn!("Invalid {} '{}'; using default {}", field, text, default);
                default
            }
        },
    };
    value.clamp(min, max)
}

fn resolve_u64(raw: Option<&str>, field: &str, default: u64) -> u64 {
    match raw {
        None => default,
        Some(text) => match text.trim().parse::<u64>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid {} '{}'; using default {}", field, text, default);
                default
            }
        },
    }
}

fn resolve_bool(raw: Option<&str>, field: &str, default: bool) -> bool {
    match raw {
        None => default,
        Some(text) => match parse_bool_env(text) {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid {} '{}'; using default {}", field, text, default);
                default
            }
        },
    }
}

fn resolve_port(raw: Option<&str>) -> u16 {
    match raw {
        None => DEFAULT_PORT,
        Some(text) => match text.trim().parse::<u16>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid PORT '{}'; using default {}", text, DEFAULT_PORT);
                DEFAULT_PORT
            }
        },
    }
}
