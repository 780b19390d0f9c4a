use async_trait::async_trait;
use dinematch_common::{
    env::place::{Place, PlacesQuery},
    error::{DineError, Result},
    ports::PlacesDirectory,
};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::Config;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Google Places web service client ("nearby search" and "place details").
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct NearbyResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    results: Vec<Place>,
}

impl GooglePlacesClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.places_base_url.clone(), config.places_api_key.clone())
    }

    async fn get(&self, endpoint: &str, query: &[(&str, String)]) -> Result<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| DineError::UpstreamFetchFailed(format!("failed to fetch places: {e}")))?;

        if resp.status() != StatusCode::OK {
            warn!("Places directory answered {} for {}", resp.status(), endpoint);
            return Err(DineError::UpstreamFetchFailed(format!(
                "failed to fetch places: status code {}",
                resp.status().as_u16()
            )));
        }
        Ok(resp)
    }
}

#[async_trait]
impl PlacesDirectory for GooglePlacesClient {
    async fn fetch_candidates(&self, query: &PlacesQuery) -> Result<Vec<Place>> {
        let params = query.parameters;
        let resp = self
            .get(
                "nearbysearch/json",
                &[
                    ("location", query.location()),
                    ("radius", params.distance.to_string()),
                    ("minprice", params.price.to_string()),
                    ("rating", params.rating.to_string()),
                    ("type", "restaurant".to_string()),
                ],
            )
            .await?;

        let body: NearbyResponse = resp
            .json()
            .await
            .map_err(|e| DineError::UpstreamFetchFailed(format!("failed to decode response: {e}")))?;

        // the service reports quota and key problems with a 200 and a status field
        match body.status.as_deref() {
            None | Some("OK") | Some("ZERO_RESULTS") => {}
            Some(status) => {
                return Err(DineError::UpstreamFetchFailed(format!(
                    "places directory status {}: {}",
                    status,
                    body.error_message.unwrap_or_default()
                )));
            }
        }

        debug!("Fetched {} candidates around {}", body.results.len(), query.location());
        Ok(body.results)
    }

    async fn place_details(&self, place_id: &str) -> Result<serde_json::Value> {
        let resp = self
            .get("details/json", &[("place_id", place_id.to_string())])
            .await?;

        resp.json()
            .await
            .map_err(|e| DineError::UpstreamFetchFailed(format!("failed to decode response: {e}")))
    }
}
