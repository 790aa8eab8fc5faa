//! Region atlas: state metadata and located cultural markers for the eight northeastern states.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

use super::EntityType;
use crate::error::ConfigurationError;

const BUNDLED_REGIONS: &str = include_str!("../../data/regions.json");

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Markers returned by [`RegionAtlas::nearest`] when no limit is given.
pub const DEFAULT_NEAREST_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("coordinates must be finite numbers")]
    NotFinite,
    #[error("latitude must be between -90 and 90, got {0}")]
    InvalidLatitude(String),
    #[error("longitude must be between -180 and 180, got {0}")]
    InvalidLongitude(String),
}

/// `[lat, lng]` in degrees.
pub type LatLng = [f64; 2];

/// South-west and north-east corners.
pub type Bounds = [LatLng; 2];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateInfo {
    pub id: String,
    pub name: String,
    pub center: LatLng,
    pub bounds: Bounds,
    pub festivals: u32,
    pub tribes: u32,
    pub languages: Vec<String>,
    pub color: String,
    pub cultural_elements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalMarker {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub marker_type: EntityType,
    pub position: LatLng,
    pub state: String,
    pub description: String,
    pub season: String,
    #[serde(default)]
    pub communities: Vec<String>,
}

/// A marker with its great-circle distance from a query point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NearbyMarker<'a> {
    #[serde(flatten)]
    pub marker: &'a CulturalMarker,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionStatistics {
    pub total_states: usize,
    pub total_markers: usize,
    pub total_tribes: u32,
    pub total_languages: usize,
    pub festivals_by_state: BTreeMap<String, u32>,
    pub markers_by_type: BTreeMap<String, usize>,
}

#[derive(Debug, Deserialize)]
struct RegionData {
    states: Vec<StateInfo>,
    markers: Vec<CulturalMarker>,
}

#[derive(Debug, Clone)]
pub struct RegionAtlas {
    states: Vec<StateInfo>,
    markers: Vec<CulturalMarker>,
}

/// Great-circle distance in kilometres (haversine).
pub fn distance_km(from: LatLng, to: LatLng) -> f64 {
    let (lat1, lat2) = (from[0].to_radians(), to[0].to_radians());
    let d_lat = (to[0] - from[0]).to_radians();
    let d_lng = (to[1] - from[1]).to_radians();
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

pub fn validate_coordinates(lat: f64, lng: f64) -> Result<LatLng, GeoError> {
    if !lat.is_finite() || !lng.is_finite() {
        return Err(GeoError::NotFinite);
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(GeoError::InvalidLatitude(lat.to_string()));
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err(GeoError::InvalidLongitude(lng.to_string()));
    }
    Ok([lat, lng])
}

impl RegionAtlas {
    pub fn bundled() -> Result<Self, ConfigurationError> {
        let data: RegionData = serde_json::from_str(BUNDLED_REGIONS)?;
        Self::from_parts(data.states, data.markers)
    }

    /// Rejects an empty state list, duplicate ids and markers placed in unknown states.
    pub fn from_parts(
        states: Vec<StateInfo>,
        markers: Vec<CulturalMarker>,
    ) -> Result<Self, ConfigurationError> {
        if states.is_empty() {
            return Err(ConfigurationError::MissingData("region atlas has no states".to_string()));
        }
        let mut ids = HashSet::new();
        for state in &states {
            if !ids.insert(state.id.as_str()) {
                return Err(ConfigurationError::DuplicateId(state.id.clone()));
            }
        }
        let mut marker_ids = HashSet::new();
        for marker in &markers {
            if !marker_ids.insert(marker.id.as_str()) {
                return Err(ConfigurationError::DuplicateId(marker.id.clone()));
            }
            if !ids.contains(marker.state.as_str()) {
                return Err(ConfigurationError::MissingData(format!(
                    "marker {} references unknown state {}",
                    marker.id, marker.state
                )));
            }
        }
        Ok(Self { states, markers })
    }

    pub fn states(&self) -> &[StateInfo] {
        &self.states
    }

    pub fn markers(&self) -> &[CulturalMarker] {
        &self.markers
    }

    pub fn state(&self, id: &str) -> Option<&StateInfo> {
        self.states.iter().find(|s| s.id.eq_ignore_ascii_case(id))
    }

    pub fn markers_in_state(&self, state_id: &str) -> Vec<&CulturalMarker> {
        self.markers
            .iter()
            .filter(|m| m.state.eq_ignore_ascii_case(state_id))
            .collect()
    }

    pub fn markers_of_type(&self, marker_type: EntityType) -> Vec<&CulturalMarker> {
        self.markers.iter().filter(|m| m.marker_type == marker_type).collect()
    }

    /// Up to `limit` markers ordered by distance from `point`, closest first.
    pub fn nearest(&self, point: LatLng, limit: usize) -> Vec<NearbyMarker<'_>> {
        let mut nearby: Vec<NearbyMarker<'_>> = self
            .markers
            .iter()
            .map(|marker| NearbyMarker {
                marker,
                distance_km: distance_km(point, marker.position),
            })
            .collect();
        nearby.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        nearby.truncate(limit);
        nearby
    }

    /// Smallest box containing every state's bounds.
    pub fn bounds(&self) -> Bounds {
        let mut sw = [f64::INFINITY, f64::INFINITY];
        let mut ne = [f64::NEG_INFINITY, f64::NEG_INFINITY];
        for [min, max] in self.states.iter().map(|s| s.bounds) {
            sw = [sw[0].min(min[0]), sw[1].min(min[1])];
            ne = [ne[0].max(max[0]), ne[1].max(max[1])];
        }
        [sw, ne]
    }

    pub fn contains(&self, lat: f64, lng: f64) -> Result<bool, GeoError> {
        let [lat, lng] = validate_coordinates(lat, lng)?;
        let [sw, ne] = self.bounds();
        Ok((sw[0]..=ne[0]).contains(&lat) && (sw[1]..=ne[1]).contains(&lng))
    }

    /// Case-insensitive match on name, description or community.
    pub fn search_markers(&self, query: &str) -> Vec<&CulturalMarker> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.markers
            .iter()
            .filter(|m| {
                m.name.to_lowercase().contains(&needle)
                    || m.description.to_lowercase().contains(&needle)
                    || m.communities.iter().any(|c| c.to_lowercase().contains(&needle))
            })
            .collect()
    }

    pub fn statistics(&self) -> RegionStatistics {
        let languages: BTreeSet<&str> = self
            .states
            .iter()
            .flat_map(|s| s.languages.iter().map(String::as_str))
            .collect();
        let mut markers_by_type = BTreeMap::new();
        for marker in &self.markers {
            *markers_by_type.entry(marker.marker_type.to_string()).or_insert(0) += 1;
        }
        RegionStatistics {
            total_states: self.states.len(),
            total_markers: self.markers.len(),
            total_tribes: self.states.iter().map(|s| s.tribes).sum(),
            total_languages: languages.len(),
            festivals_by_state: self.states.iter().map(|s| (s.name.clone(), s.festivals)).collect(),
            markers_by_type,
        }
    }

    /// States as a GeoJSON `FeatureCollection`, each outlined by its bounding box.
    pub fn feature_collection(&self) -> Value {
        let features: Vec<Value> = self
            .states
            .iter()
            .map(|state| {
                let [[min_lat, min_lng], [max_lat, max_lng]] = state.bounds;
                let ring = [
                    [min_lng, min_lat],
                    [max_lng, min_lat],
                    [max_lng, max_lat],
                    [min_lng, max_lat],
                    [min_lng, min_lat],
                ];
                let mut properties = serde_json::to_value(state).unwrap_or_else(|_| json!({}));
                if let Some(map) = properties.as_object_mut() {
                    map.insert(
                        "total_cultural_sites".to_string(),
                        json!(self.markers_in_state(&state.id).len()),
                    );
                }
                json!({
                    "type": "Feature",
                    "properties": properties,
                    "geometry": { "type": "Polygon", "coordinates": [ring] },
                })
            })
            .collect();
        json!({ "type": "FeatureCollection", "features": features })
    }
}
