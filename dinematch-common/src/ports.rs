use async_trait::async_trait;

use crate::{
    env::place::{Place, PlacesQuery},
    error::Result,
};

/// External directory the candidate list of a session is fetched from.
///
/// Implementations report every failure as `DineError::UpstreamFetchFailed`.
#[async_trait]
pub trait PlacesDirectory: Send + Sync {
    async fn fetch_candidates(&self, query: &PlacesQuery) -> Result<Vec<Place>>;
    async fn place_details(&self, place_id: &str) -> Result<serde_json::Value>;
}
