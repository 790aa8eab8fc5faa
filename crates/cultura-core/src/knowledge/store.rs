//! Read-only store of cultural entities, loaded once from JSON.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::error::ConfigurationError;

const BUNDLED_DATASET: &str = include_str!("../../data/cultural_data.json");

/// Kind of cultural entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Festival,
    Ritual,
    Tradition,
    Food,
    Art,
    Dance,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Festival => "festival",
            Self::Ritual => "ritual",
            Self::Tradition => "tradition",
            Self::Food => "food",
            Self::Art => "art",
            Self::Dance => "dance",
        }
    }

    /// Emoji shown in rendered chat answers.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Festival => "🎉",
            Self::Ritual => "🕯️",
            Self::Tradition => "✨",
            Self::Food => "🍽️",
            Self::Art => "🎨",
            Self::Dance => "💃",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A documented festival, ritual, tradition, food, art form or dance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalEntity {
    /// Unique across the store.
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
    pub region: String,
    pub state: String,
    pub season: String,
    #[serde(default)]
    pub communities: Vec<String>,
    #[serde(default)]
    pub rituals: Vec<String>,
    #[serde(default)]
    pub symbols: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub historical_context: String,
    pub attribution: String,
    pub language: String,
}

impl CulturalEntity {
    fn matches(&self, needle: &str) -> bool {
        let hit = |s: &String| s.to_lowercase().contains(needle);
        hit(&self.name)
            || hit(&self.description)
            || self.communities.iter().any(hit)
            || self.rituals.iter().any(hit)
            || self.symbols.iter().any(hit)
    }
}

/// Immutable collection of [`CulturalEntity`] records in dataset order.
#[derive(Debug, Clone)]
pub struct CulturalStore {
    entities: Vec<CulturalEntity>,
}

impl CulturalStore {
    /// Validate and wrap entities. Fails on an empty dataset or a repeated id.
    pub fn from_entities(entities: Vec<CulturalEntity>) -> Result<Self, ConfigurationError> {
        if entities.is_empty() {
            return Err(ConfigurationError::MissingData("cultural dataset is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for entity in &entities {
            if !seen.insert(entity.id.as_str()) {
                return Err(ConfigurationError::DuplicateId(entity.id.clone()));
            }
        }
        tracing::info!(target: "cultura::knowledge", entities = entities.len(), "cultural store loaded");
        Ok(Self { entities })
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        Self::from_entities(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigurationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The dataset compiled into the binary.
    pub fn bundled() -> Result<Self, ConfigurationError> {
        Self::from_json(BUNDLED_DATASET)
    }

    pub fn get_all(&self) -> &[CulturalEntity] {
        &self.entities
    }

    pub fn get_by_id(&self, id: &str) -> Option<&CulturalEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Case-insensitive substring search over name, description, communities, rituals and symbols.
    pub fn search(&self, query: &str) -> Vec<&CulturalEntity> {
        let needle = query.trim().to_lowercase();
        self.entities.iter().filter(|e| e.matches(&needle)).collect()
    }

    /// Entities sharing a state, a type or a community with `id`. Empty for unknown ids.
    pub fn get_related(&self, id: &str) -> Vec<&CulturalEntity> {
        let Some(origin) = self.get_by_id(id) else {
            return Vec::new();
        };
        self.entities
            .iter()
            .filter(|e| e.id != origin.id)
            .filter(|e| {
                e.state == origin.state
                    || e.entity_type == origin.entity_type
                    || e.communities.iter().any(|c| origin.communities.contains(c))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
