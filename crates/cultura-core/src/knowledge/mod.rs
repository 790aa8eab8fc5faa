//! Static cultural knowledge.
//!
//! | Layer           | Type             | Purpose                                             |
//! |-----------------|------------------|-----------------------------------------------------|
//! | Store           | `CulturalStore`  | Entities loaded from JSON, read-only after load     |
//! | Knowledge base  | `KnowledgeBase`  | Keyword records derived from the store for chat     |
//! | Fun facts       | `FunFacts`       | Bundled trivia, random or by category               |
//! | Atlas           | `RegionAtlas`    | State metadata and located markers, distance search |
//!
//! The knowledge base is rebuilt from a store, never edited on its own.

mod base;
mod facts;
mod geo;
mod store;

pub use base::{
    entity_key, KnowledgeBase, KnowledgeRecord, TopicSummary, GENERAL_FESTIVALS, GENERAL_FOOD,
    GENERAL_NORTHEAST_CULTURE,
};
pub(crate) use base::title_case;
pub use facts::{FunFact, FunFacts};
pub use geo::{
    distance_km, validate_coordinates, Bounds, CulturalMarker, GeoError, LatLng, NearbyMarker,
    RegionAtlas, RegionStatistics, StateInfo, DEFAULT_NEAREST_LIMIT,
};
pub use store::{CulturalEntity, CulturalStore, EntityType};
