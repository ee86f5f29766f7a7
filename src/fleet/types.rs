use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Returns the current timestamp in ISO-8601 UTC format.
#[must_use]
pub fn iso_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// One side of a mission route as the fleet API reports it.
///
/// The control plane is loose about which identifying field it fills in, so
/// identity resolution walks `id`, then `code`, then `displayName`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Endpoint {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(rename = "displayName", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Endpoint {
    #[must_use]
    pub fn with_id(id: &str) -> Self {
        Self {
            id: Some(id.to_owned()),
            code: None,
            display_name: None,
        }
    }

    /// Returns the first non-empty identifying field, or `""`.
    #[must_use]
    pub fn identity(&self) -> &str {
        [&self.id, &self.code, &self.display_name]
            .into_iter()
            .flatten()
            .map(|value| value.trim())
            .find(|value| !value.is_empty())
            .unwrap_or("")
    }
}

/// A traffic-generation job as observed from the fleet API.
///
/// Snapshots are read-only to this node; missions are created and terminated
/// by the mission registry.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Mission {
    pub id: Option<String>,
    pub source: Endpoint,
    pub destination: Endpoint,
    pub rps: Option<i64>,
    pub speed: Option<String>,
    pub escort_enabled: bool,
}

impl Mission {
    /// Returns the trimmed mission id, or `None` when the registry sent an
    /// empty one.
    #[must_use]
    pub fn mission_id(&self) -> Option<&str> {
        self.id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn source_identity(&self) -> &str {
        self.source.identity()
    }

    #[must_use]
    pub fn destination_identity(&self) -> &str {
        self.destination.identity()
    }

    /// Target request rate, floored at one request per second.
    #[must_use]
    pub fn effective_rps(&self) -> u32 {
        u32::try_from(self.rps.unwrap_or(1).max(1)).unwrap_or(u32::MAX)
    }

    /// Normalized speed key; missing or blank speeds mean `cruise`.
    #[must_use]
    pub fn speed_key(&self) -> String {
        let normalized = self
            .speed
            .as_deref()
            .map(str::trim)
            .filter(|speed| !speed.is_empty())
            .unwrap_or("cruise");
        normalized.to_ascii_lowercase()
    }
}

/// Response body of `GET <fleet>/orders?planetId=<id>`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OrdersPayload {
    pub missions: Vec<Mission>,
}

/// One line item of a cargo manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CargoEntry {
    pub item: String,
    pub quantity: u32,
    pub unit: String,
}

/// Body of `POST <planet>/dock`, one delivery attempt of a burst.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DockingRequest {
    pub mission_id: Option<String>,
    pub source: Endpoint,
    pub destination: Endpoint,
    pub rps: Option<i64>,
    pub speed: Option<String>,
    pub escort_enabled: bool,
    pub cargo: Vec<CargoEntry>,
    pub sent_at: Option<String>,
}

/// One simulated handling step recorded while a delivery is processed.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockOperation {
    pub action: String,
    pub duration_seconds: f64,
    pub completed_at: String,
}

/// Success response of `POST <planet>/dock`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DockingResponse {
    pub mission_id: Option<String>,
    pub status: String,
    pub processed_at: String,
    pub planet_id: String,
    pub operations: Vec<DockOperation>,
    pub cargo_processed: u64,
}
