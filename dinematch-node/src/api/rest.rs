use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dinematch_common::{
    env::place::{Parameters, Place, PlacesQuery},
    error::DineError,
    ports::PlacesDirectory,
};
use dinematch_consensus::ConsensusEngine;
use dinematch_session::SessionStore;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<SessionStore>,
    pub engine: ConsensusEngine,
    pub places: Arc<dyn PlacesDirectory>,
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<SessionStore>, places: Arc<dyn PlacesDirectory>, export_dir: PathBuf) -> Self {
        Self {
            engine: ConsensusEngine::new(Arc::clone(&store)),
            store,
            places,
            export_dir,
        }
    }
}

/// Maps core failures to HTTP responses with a `{"error": ..}` body.
pub struct ApiError(DineError);

impl From<DineError> for ApiError {
    fn from(err: DineError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(DineError::InvalidRequest(rejection.body_text()))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DineError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            DineError::NoMembers(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DineError::UpstreamFetchFailed(_) => StatusCode::BAD_GATEWAY,
            DineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            DineError::Config(_) | DineError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub distance: i32,
    pub price: i32,
    pub rating: f64,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub candidates: usize,
}

#[derive(Deserialize)]
pub struct MemberRequest {
    pub session_id: String,
    pub user_id: String,
}

#[derive(Deserialize)]
pub struct VoteRequest {
    pub session_id: String,
    pub user_id: String,
    pub place_id: String,
    pub liked: bool,
}

#[derive(Deserialize)]
pub struct SessionRequest {
    pub session_id: String,
}

#[derive(Deserialize)]
struct NearbyParams {
    #[serde(default)]
    session_id: String,
    user_id: Option<String>,
}

#[derive(Deserialize)]
struct DetailsParams {
    place_id: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct PlacesResponse {
    pub places: Vec<Place>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct ConsensusEntry {
    pub name: String,
    pub agreement: f64,
}

#[derive(Serialize, Deserialize)]
pub struct SaveListResponse {
    pub path: String,
    pub entries: usize,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/createSessionWithParameters", post(create_session_api))
        .route("/addUserToSession", post(add_user_api))
        .route("/getNearbyPlaces", get(nearby_places_api))
        .route("/getPlaceDetails", get(place_details_api))
        .route("/trackUserAgreement", post(track_agreement_api))
        .route("/showConsensus", post(show_consensus_api))
        .route("/saveList", post(save_list_api))
        .with_state(state)
        .layer(tower_http::cors::CorsLayer::permissive())
}

pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("REST API listening on {}", addr);
    }
    axum::serve(listener, router(state)).await
}

pub async fn start_rest_api(addr: &str, state: AppState) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, state).await
}

async fn create_session_api(
    State(state): State<AppState>,
    payload: Result<Json<CreateSessionRequest>, JsonRejection>,
) -> ApiResult<Json<CreateSessionResponse>> {
    let Json(req) = payload?;
    let session_id = match req.session_id {
        Some(id) if !id.is_empty() => id,
        _ => uuid::Uuid::new_v4().to_string(),
    };

    let parameters = Parameters {
        distance: req.distance,
        price: req.price,
        rating: req.rating,
    };
    let query = PlacesQuery {
        latitude: req.latitude,
        longitude: req.longitude,
        parameters,
    };

    // fetched before touching the store; nothing is created on failure
    let places = state.places.fetch_candidates(&query).await.map_err(|e| {
        warn!("Session [{}] not created: {}", session_id, e);
        e
    })?;

    let candidates = places.len();
    state.store.create_session(&session_id, parameters, places);
    Ok(Json(CreateSessionResponse { session_id, candidates }))
}

async fn add_user_api(
    State(state): State<AppState>,
    payload: Result<Json<MemberRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;
    state.store.join(&req.session_id, &req.user_id)?;
    Ok(StatusCode::OK)
}

async fn nearby_places_api(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> ApiResult<Json<PlacesResponse>> {
    debug!(
        "Session ID: {}, User ID: {}",
        params.session_id,
        params.user_id.as_deref().unwrap_or("-")
    );
    let places = state.store.places(&params.session_id)?;
    Ok(Json(PlacesResponse { places }))
}

async fn place_details_api(
    State(state): State<AppState>,
    Query(params): Query<DetailsParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let place_id = params
        .place_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| DineError::InvalidRequest("place_id is required".into()))?;

    let details = state.places.place_details(&place_id).await?;
    Ok(Json(details))
}

async fn track_agreement_api(
    State(state): State<AppState>,
    payload: Result<Json<VoteRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let Json(req) = payload?;
    state
        .store
        .record_vote(&req.session_id, &req.user_id, &req.place_id, req.liked)?;
    Ok(StatusCode::OK)
}

async fn show_consensus_api(
    State(state): State<AppState>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<ConsensusEntry>>> {
    let Json(req) = payload?;
    let ranking = state.engine.show_consensus(&req.session_id)?;
    Ok(Json(
        ranking
            .into_iter()
            .map(|r| ConsensusEntry { name: r.name, agreement: r.agreement })
            .collect(),
    ))
}

async fn save_list_api(
    State(state): State<AppState>,
    payload: Result<Json<SessionRequest>, JsonRejection>,
) -> ApiResult<Json<SaveListResponse>> {
    let Json(req) = payload?;
    if !state.store.contains(&req.session_id) {
        return Err(DineError::SessionNotFound(req.session_id).into());
    }

    let file_name = format!("consensus_list-{}.txt", export_file_stem(&req.session_id));
    tokio::fs::create_dir_all(&state.export_dir)
        .await
        .map_err(DineError::from)?;
    let path = state.export_dir.join(file_name);

    // file write stays off the async workers
    let engine = state.engine.clone();
    let session_id = req.session_id;
    let target = path.clone();
    let entries = tokio::task::spawn_blocking(move || engine.save_list(&session_id, &target))
        .await
        .map_err(|e| DineError::Io(std::io::Error::other(e)))??;
    Ok(Json(SaveListResponse {
        path: path.display().to_string(),
        entries,
    }))
}

/// Session identifiers are caller-supplied; keep them from escaping the export dir.
///
/// `[A-Za-z0-9-]` is kept as is and every other byte becomes `_` plus two hex
/// digits, so distinct ids never share a file.
fn export_file_stem(session_id: &str) -> String {
    let mut stem = String::with_capacity(session_id.len());
    for byte in session_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(byte as char);
        } else {
            stem.push_str(&format!("_{:02x}", byte));
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_stem() {
        assert_eq!(export_file_stem("session-1"), "session-1");
        assert_eq!(export_file_stem("s_1"), "s_5f1");
        assert_eq!(export_file_stem("../etc/passwd"), "_2e_2e_2fetc_2fpasswd");
        assert_eq!(export_file_stem("caf\u{e9}"), "caf_c3_a9");
    }

    #[test]
    fn test_export_file_stem_keeps_ids_apart() {
        assert_ne!(export_file_stem("team.a"), export_file_stem("team_a"));
        assert_ne!(export_file_stem("a/b"), export_file_stem("a_b"));
        assert_ne!(export_file_stem("a_2fb"), export_file_stem("a/b"));
    }

    #[test]
    fn test_error_status_mapping() {
        let status = |e: DineError| ApiError(e).into_response().status();
        assert_eq!(status(DineError::SessionNotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status(DineError::NoMembers("x".into())), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(status(DineError::UpstreamFetchFailed("x".into())), StatusCode::BAD_GATEWAY);
        assert_eq!(status(DineError::InvalidRequest("x".into())), StatusCode::BAD_REQUEST);
    }
}
