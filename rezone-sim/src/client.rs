//! Capacity Engine HTTP client

use serde_json::Value;
use thiserror::Error;

use rezone_common::api::{NhoodSummary, NhoodsResponse, RezonedParcel, RezoningResponse};
use rezone_common::ZoningParams;

/// Capacity Engine client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Engine error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Typed client for the rezone-ce HTTP API
#[derive(Debug, Clone)]
pub struct EngineClient {
    http: reqwest::Client,
    base_url: String,
}

impl EngineClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /api/rezoning for one neighborhood
    pub async fn rezone(
        &self,
        nhood: &str,
        params: &ZoningParams,
    ) -> Result<Vec<RezonedParcel>, ClientError> {
        let url = format!("{}/api/rezoning", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("distance", params.distance_m.to_string()),
                ("heightMultiple", params.height_multiple.to_string()),
                ("localHeight", params.height_stat.to_string()),
                ("nhood", nhood.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api(
                status.as_u16(),
                error_message(response).await,
            ));
        }

        let body: RezoningResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(body.rezoned_parcels)
    }

    /// GET /api/nhoods
    pub async fn nhoods(&self) -> Result<Vec<NhoodSummary>, ClientError> {
        let url = format!("{}/api/nhoods", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Api(
                status.as_u16(),
                error_message(response).await,
            ));
        }

        let body: NhoodsResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(body.nhoods)
    }
}

/// Pull the `error` field out of an error response body, falling back
/// to the raw status text
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    match response.json::<Value>().await {
        Ok(body) => body
            .get("error")
            .and_then(|e| e.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| status.to_string()),
        Err(_) => status.to_string(),
    }
}
