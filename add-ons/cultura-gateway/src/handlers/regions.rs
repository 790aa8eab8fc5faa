use super::ApiError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use cultura_core::{validate_coordinates, EntityType, LatLng, DEFAULT_NEAREST_LIMIT};

#[derive(serde::Deserialize)]
pub(crate) struct MarkersQuery {
    state: Option<String>,
    #[serde(rename = "type")]
    marker_type: Option<EntityType>,
    q: Option<String>,
    /// `lat,lng`
    near: Option<String>,
    limit: Option<usize>,
}

#[derive(serde::Deserialize)]
pub(crate) struct PointQuery {
    lat: Option<f64>,
    lng: Option<f64>,
}

fn parse_point(raw: &str) -> Result<LatLng, ApiError> {
    let (lat, lng) = raw
        .split_once(',')
        .ok_or_else(|| ApiError::BadRequest(format!("near must be \"lat,lng\", got {raw:?}")))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|_| ApiError::BadRequest(format!("not a coordinate: {v:?}")))
    };
    validate_coordinates(parse(lat)?, parse(lng)?).map_err(ApiError::from)
}

/// GET /api/v1/states
pub(crate) async fn list_states(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "states": state.atlas.states(),
        "bounds": state.atlas.bounds(),
    }))
}

/// GET /api/v1/states/:id
pub(crate) async fn get_state(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let info = state
        .atlas
        .state(&id)
        .ok_or_else(|| ApiError::NotFound(format!("no state with id {id:?}")))?;
    Ok(axum::Json(serde_json::json!({
        "state": info,
        "markers": state.atlas.markers_in_state(&info.id),
    })))
}

/// GET /api/v1/markers[?state=&type=&q=] or ?near=lat,lng[&limit=]
pub(crate) async fn markers(
    State(state): State<AppState>,
    Query(query): Query<MarkersQuery>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    if let Some(near) = query.near.as_deref() {
        let point = parse_point(near)?;
        let limit = query.limit.unwrap_or(DEFAULT_NEAREST_LIMIT);
        return Ok(axum::Json(serde_json::json!({
            "near": point,
            "markers": state.atlas.nearest(point, limit),
        })));
    }

    let mut markers = match query.q.as_deref().filter(|q| !q.trim().is_empty()) {
        Some(q) => state.atlas.search_markers(q),
        None => state.atlas.markers().iter().collect(),
    };
    if let Some(id) = query.state.as_deref() {
        markers.retain(|m| m.state.eq_ignore_ascii_case(id));
    }
    if let Some(kind) = query.marker_type {
        markers.retain(|m| m.marker_type == kind);
    }
    Ok(axum::Json(serde_json::json!({ "markers": markers })))
}

/// GET /api/v1/bounds[?lat=&lng=]
pub(crate) async fn bounds(
    State(state): State<AppState>,
    Query(query): Query<PointQuery>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let bounds = state.atlas.bounds();
    match (query.lat, query.lng) {
        (Some(lat), Some(lng)) => Ok(axum::Json(serde_json::json!({
            "bounds": bounds,
            "contains": state.atlas.contains(lat, lng)?,
        }))),
        (None, None) => Ok(axum::Json(serde_json::json!({ "bounds": bounds }))),
        _ => Err(ApiError::BadRequest("lat and lng must be given together".to_string())),
    }
}

/// GET /api/v1/statistics
pub(crate) async fn statistics(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "regions": state.atlas.statistics(),
        "entities": state.store.len(),
        "fun_facts": state.facts.all().len(),
    }))
}

/// GET /api/v1/geojson
pub(crate) async fn geojson(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(state.atlas.feature_collection())
}
