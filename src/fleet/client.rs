use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppResult, FleetError};

use super::types::{Mission, OrdersPayload};

/// Where the reconciler gets its desired mission set from.
///
/// The production implementation is [`FleetClient`]; tests substitute a
/// scripted source.
#[async_trait]
pub trait OrdersSource: Send + Sync {
    /// Fetches the missions currently addressed to `planet_id`.
    ///
    /// # Errors
    ///
    /// Returns a [`FleetError`] when the fleet API is unreachable, answers
    /// with a non-2xx status, or sends a body that does not decode.
    async fn fetch_orders(&self, planet_id: &str) -> Result<Vec<Mission>, FleetError>;
}

/// Thin HTTP client for the fleet control-plane API.
#[derive(Debug, Clone)]
pub struct FleetClient {
    base_url: String,
    client: Client,
}

impl FleetClient {
    /// Builds a client with the given per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the underlying HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            client,
        })
    }

    fn endpoint_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Fetches an arbitrary fleet API document as JSON.
    ///
    /// # Errors
    ///
    /// Returns a [`FleetError`] on transport failure, non-2xx status, or an
    /// undecodable body.
    pub async fn fetch_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, FleetError> {
        let url = self.endpoint_url(path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|err| FleetError::Transport {
                url: url.clone(),
                source: err,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FleetError::Status {
                url,
                status: status.as_u16(),
            });
        }
        response
            .json::<Value>()
            .await
            .map_err(|err| FleetError::Decode { url, source: err })
    }
}

#[async_trait]
impl OrdersSource for FleetClient {
    async fn fetch_orders(&self, planet_id: &str) -> Result<Vec<Mission>, FleetError> {
        let url = self.endpoint_url("/orders");
        let response = self
            .client
            .get(&url)
            .query(&[("planetId", planet_id)])
            .send()
            .await
            .map_err(|err| FleetError::Transport {
                url: url.clone(),
                source: err,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(FleetError::Status {
                url,
                status: status.as_u16(),
            });
        }
        let payload: OrdersPayload = response
            .json()
            .await
            .map_err(|err| FleetError::Decode { url, source: err })?;
        Ok(payload.missions)
    }
}
