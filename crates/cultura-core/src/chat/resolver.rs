//! Offline answer resolution over the knowledge base.
//!
//! Rules run in strict priority order and the first rule that fires wins:
//!
//! | Rule            | Fires when                                        | Confidence           |
//! |-----------------|---------------------------------------------------|----------------------|
//! | Exact name      | query equals an entity name                        | 1.0                  |
//! | Name substring  | query contains an entity name                      | 0.95                 |
//! | Keyword score   | best record scores at least `min_score`            | min(cap, score/100)  |
//! | State           | query names one of the eight states                | 0.8                  |
//! | Category        | query contains a category word                     | 0.6                  |
//! | Default         | always                                             | 0.3                  |

use serde::{Deserialize, Serialize};

use super::message::{Attribution, KNOWLEDGE_BASE_ATTRIBUTION};
use crate::knowledge::{
    title_case, CulturalEntity, CulturalStore, KnowledgeBase, KnowledgeRecord, GENERAL_FESTIVALS,
    GENERAL_FOOD, GENERAL_NORTHEAST_CULTURE,
};

const STATES: [&str; 8] = [
    "assam",
    "arunachal pradesh",
    "manipur",
    "meghalaya",
    "mizoram",
    "nagaland",
    "sikkim",
    "tripura",
];

const STATE_MATCH_LIMIT: usize = 3;
const STATE_SOURCE: &str = "CULTURA Cultural Database";

const CATEGORY_TOPICS: [(&str, &str); 5] = [
    ("festival", GENERAL_FESTIVALS),
    ("food", GENERAL_FOOD),
    ("culture", GENERAL_NORTHEAST_CULTURE),
    ("dance", GENERAL_FESTIVALS),
    ("art", GENERAL_NORTHEAST_CULTURE),
];

const DEFAULT_RESPONSE: &str = "I'd love to help you learn about Northeast Indian culture! Here are some topics I can discuss in detail:

🎭 **Festivals**: Bihu (Assam), Lai Haraoba (Manipur), Hornbill Festival (Nagaland), Wangala (Meghalaya), Chapchar Kut (Mizoram)

🍽️ **Traditional Food**: Masor Tenga, Eromba, Axone, Jadoh, Thukpa, Bamboo Shoot Curry

🎨 **Arts & Crafts**: Assam Silk Weaving, Bamboo Crafts, Manipuri Pottery, Naga Wood Carving

💃 **Dance Forms**: Bihu Dance, Manipuri Classical, Cheraw (Bamboo Dance), Sattriya, Cham Dance

🏛️ **Cultural Heritage**: Traditional rituals, tribal customs, and community practices

Try asking me about any of these topics! For example: \"Tell me about Bihu festival\" or \"What is Masor Tenga?\"";

const SAMPLE_QUESTIONS: [&str; 20] = [
    "Tell me about Bihu festival",
    "What is Lai Haraoba?",
    "Describe the Hornbill Festival",
    "What is Wangala festival?",
    "Tell me about Chapchar Kut",
    "What is Losar festival?",
    "Tell me about traditional food of Northeast India",
    "What are the main festivals of Assam?",
    "Tell me about Sattriya dance",
    "What is Masor Tenga?",
    "Describe Manipuri classical dance",
    "What makes Northeast Indian culture unique?",
    "Tell me about bamboo crafts",
    "What is Axone?",
    "Describe Cheraw dance",
    "What are the eight Northeast states?",
    "Tell me about Muga silk",
    "What is Thukpa?",
    "Describe Assam silk weaving",
    "What is Eromba?",
];

/// Weights and thresholds for keyword scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub exact_weight: u32,
    pub contains_weight: u32,
    pub token_weight: u32,
    pub overlap_weight: u32,
    pub name_token_weight: u32,
    /// Query tokens with this many characters or fewer are ignored.
    pub short_token_len: usize,
    pub min_score: u32,
    pub confidence_cap: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            exact_weight: 100,
            contains_weight: 50,
            token_weight: 25,
            overlap_weight: 10,
            name_token_weight: 30,
            short_token_len: 2,
            min_score: 25,
            confidence_cap: 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    ExactName,
    NameSubstring,
    KeywordScore,
    State,
    Category,
    Default,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub response: String,
    pub sources: Vec<Attribution>,
    pub confidence: f32,
    pub entity: Option<CulturalEntity>,
    pub rule: MatchRule,
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Pure, side-effect free resolver over one immutable knowledge base.
#[derive(Debug, Clone)]
pub struct ChatResolver {
    base: KnowledgeBase,
    weights: ScoringWeights,
}

impl ChatResolver {
    pub fn new(base: KnowledgeBase, weights: ScoringWeights) -> Self {
        Self { base, weights }
    }

    pub fn from_store(store: &CulturalStore, weights: ScoringWeights) -> Self {
        Self::new(KnowledgeBase::build(store), weights)
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.base
    }

    pub fn resolve(&self, query: &str) -> Resolution {
        let query = normalize(query);
        if query.is_empty() {
            return default_resolution();
        }
        let records = self.base.records();

        if let Some(record) = records.iter().find(|r| entity_name(r).is_some_and(|n| n == query)) {
            return from_record(record, 1.0, MatchRule::ExactName);
        }

        if let Some(record) = records
            .iter()
            .find(|r| entity_name(r).is_some_and(|n| !n.is_empty() && query.contains(&n)))
        {
            return from_record(record, 0.95, MatchRule::NameSubstring);
        }

        if let Some((record, score)) = self.ranked(&query).into_iter().next() {
            if score >= self.weights.min_score {
                let confidence = (score as f32 / 100.0).min(self.weights.confidence_cap);
                return from_record(record, confidence, MatchRule::KeywordScore);
            }
        }

        if let Some(resolution) = self.state_match(&query) {
            return resolution;
        }

        if let Some(resolution) = self.category_match(&query) {
            return resolution;
        }

        default_resolution()
    }

    /// Keyword score of `record` for `query`.
    ///
    /// Each keyword contributes through the first rule it satisfies (equality, containment,
    /// token-in-keyword, then either-way overlap). Entity records add a bonus per
    /// (query token, name token) pair where one contains the other.
    pub fn score(&self, record: &KnowledgeRecord, query: &str) -> u32 {
        let query = normalize(query);
        self.score_normalized(record, &query)
    }

    fn score_normalized(&self, record: &KnowledgeRecord, query: &str) -> u32 {
        let w = &self.weights;
        let tokens: Vec<&str> = query
            .split_whitespace()
            .filter(|t| t.chars().count() > w.short_token_len)
            .collect();

        let mut score = 0;
        for keyword in &record.keywords {
            score += if query == keyword {
                w.exact_weight
            } else if query.contains(keyword.as_str()) {
                w.contains_weight
            } else if tokens.iter().any(|t| keyword.contains(t)) {
                w.token_weight
            } else if keyword.contains(query) {
                w.overlap_weight
            } else {
                0
            };
        }

        if let Some(entity) = &record.entity {
            let name = entity.name.to_lowercase();
            for token in &tokens {
                for name_word in name.split_whitespace() {
                    if name_word.contains(token) || token.contains(name_word) {
                        score += w.name_token_weight;
                    }
                }
            }
        }
        score
    }

    /// Records with a positive score, best first. Ties keep knowledge-base order.
    fn ranked(&self, query: &str) -> Vec<(&KnowledgeRecord, u32)> {
        let mut scored: Vec<(&KnowledgeRecord, u32)> = self
            .base
            .records()
            .iter()
            .map(|r| (r, self.score_normalized(r, query)))
            .filter(|(_, s)| *s > 0)
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored
    }

    fn state_match(&self, query: &str) -> Option<Resolution> {
        for state in STATES {
            if !query.contains(state) {
                continue;
            }
            let entities: Vec<&CulturalEntity> = self
                .base
                .records()
                .iter()
                .filter_map(|r| r.entity.as_ref())
                .filter(|e| e.state.to_lowercase() == state)
                .take(STATE_MATCH_LIMIT)
                .collect();
            if entities.is_empty() {
                continue;
            }

            let state_name = title_case(state);
            let listing = entities
                .iter()
                .map(|e| {
                    let snippet: String = e.description.chars().take(100).collect();
                    format!("- **{}** ({}): {}...", e.name, e.entity_type, snippet)
                })
                .collect::<Vec<_>>()
                .join("\n");
            return Some(Resolution {
                response: format!(
                    "🏔️ **Cultural Heritage of {state_name}**\n\n\
                     Here are some key cultural elements from {state_name}:\n\n\
                     {listing}\n\n\
                     Ask me about any specific festival, food, or tradition for detailed information!"
                ),
                sources: vec![Attribution::knowledge_base(STATE_SOURCE, None)],
                confidence: 0.8,
                entity: None,
                rule: MatchRule::State,
            });
        }
        None
    }

    fn category_match(&self, query: &str) -> Option<Resolution> {
        CATEGORY_TOPICS
            .iter()
            .filter(|(word, _)| query.contains(word))
            .find_map(|(_, key)| self.base.get(key))
            .map(|record| from_record(record, 0.6, MatchRule::Category))
    }

    /// True when any keyword of any record appears in the query.
    pub fn can_answer_offline(&self, query: &str) -> bool {
        let query = normalize(query);
        !query.is_empty()
            && self
                .base
                .records()
                .iter()
                .any(|r| r.keywords.iter().any(|k| query.contains(k.as_str())))
    }

    /// Up to `n` best-scoring entities, used as grounding for the remote model.
    pub fn top_matches(&self, query: &str, n: usize) -> Vec<&CulturalEntity> {
        let query = normalize(query);
        if query.is_empty() {
            return Vec::new();
        }
        self.ranked(&query)
            .into_iter()
            .filter_map(|(r, _)| r.entity.as_ref())
            .take(n)
            .collect()
    }

    pub fn sample_questions(&self) -> &'static [&'static str] {
        &SAMPLE_QUESTIONS
    }
}

fn entity_name(record: &KnowledgeRecord) -> Option<String> {
    record.entity.as_ref().map(|e| e.name.to_lowercase())
}

fn from_record(record: &KnowledgeRecord, confidence: f32, rule: MatchRule) -> Resolution {
    let id = record.entity.as_ref().map(|e| e.id.clone());
    Resolution {
        response: record.response.clone(),
        sources: record
            .sources
            .iter()
            .map(|s| Attribution::knowledge_base(s.clone(), id.clone()))
            .collect(),
        confidence,
        entity: record.entity.clone(),
        rule,
    }
}

fn default_resolution() -> Resolution {
    Resolution {
        response: DEFAULT_RESPONSE.to_string(),
        sources: vec![Attribution::knowledge_base(KNOWLEDGE_BASE_ATTRIBUTION, None)],
        confidence: 0.3,
        entity: None,
        rule: MatchRule::Default,
    }
}
