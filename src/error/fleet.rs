use thiserror::Error;

#[derive(Debug, Error)]
pub enum FleetError {
    #[error("Fleet API request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Fleet API request to {url} returned status {status}")]
    Status { url: String, status: u16 },
    #[error("Fleet API response from {url} could not be decoded: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}
