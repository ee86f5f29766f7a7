use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Mission is missing an id")]
    MissingMissionId,
    #[error("Mission {mission_id} is missing a destination id")]
    MissingDestination { mission_id: String },
    #[error("Failed to build dispatch client for mission {mission_id}: {source}")]
    BuildClient {
        mission_id: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Docking request to {url} failed: {source}")]
    DeliveryTransport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Docking request to {url} returned status {status}")]
    DeliveryStatus { url: String, status: u16 },
}
