//! Short fun facts about the region.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

const BUNDLED_FACTS: &str = include_str!("../../data/fun_facts.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunFact {
    pub id: u32,
    pub fact: String,
    pub category: String,
    pub icon: String,
    pub source: String,
}

#[derive(Debug, Clone)]
pub struct FunFacts {
    facts: Vec<FunFact>,
}

impl FunFacts {
    pub fn bundled() -> Result<Self, ConfigurationError> {
        let facts: Vec<FunFact> = serde_json::from_str(BUNDLED_FACTS)?;
        if facts.is_empty() {
            return Err(ConfigurationError::MissingData("fun facts are empty".to_string()));
        }
        Ok(Self { facts })
    }

    pub fn all(&self) -> &[FunFact] {
        &self.facts
    }

    pub fn random(&self) -> Option<&FunFact> {
        self.facts.choose(&mut rand::thread_rng())
    }

    pub fn by_category(&self, category: &str) -> Vec<&FunFact> {
        self.facts
            .iter()
            .filter(|f| f.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for fact in &self.facts {
            if !seen.contains(&fact.category.as_str()) {
                seen.push(&fact.category);
            }
        }
        seen
    }
}
