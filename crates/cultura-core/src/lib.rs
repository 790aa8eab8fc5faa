//! cultura-core: Northeast Indian cultural heritage companion (knowledge, chat, translation).
//!
//! Holds every offline capability plus the seam traits the network clients in
//! `cultura-skills` implement, so the gateway only wires things together.

mod chat;
mod error;
mod knowledge;
mod orchestrator;
mod shared;
mod translation;

// Shared
pub use error::{ConfigurationError, ServiceError};
pub use shared::{
    CoreConfig, LlmSettings, RetrySettings, ServiceSettings, DEFAULT_CONFIG_PATH,
    ENV_ANTHROPIC_API_KEY, ENV_BHASHINI_API_KEY, ENV_BHASHINI_USER_ID, ENV_CONFIG_PATH,
};

// Knowledge
pub use knowledge::{
    distance_km, entity_key, validate_coordinates, Bounds, CulturalEntity, CulturalMarker,
    CulturalStore, EntityType, FunFact, FunFacts, GeoError, KnowledgeBase, KnowledgeRecord, LatLng,
    NearbyMarker, RegionAtlas, RegionStatistics, StateInfo, TopicSummary, DEFAULT_NEAREST_LIMIT,
    GENERAL_FESTIVALS, GENERAL_FOOD, GENERAL_NORTHEAST_CULTURE,
};

// Chat
pub use chat::{
    Attribution, ChatMessage, ChatResolver, MatchRule, Resolution, Role, ScoringWeights, GREETING,
    KNOWLEDGE_BASE_ATTRIBUTION,
};
pub use orchestrator::{
    context_block, system_prompt, ChatError, ChatOrchestrator, ChatState, CompletionRequest,
    LlmBackend, LlmError,
};

// Translation
pub use translation::{
    curated_phrase, curated_phrase_count, detect_language, heuristic_translate,
    substitute_patterns, supported_languages, supported_pairs, translate_word_by_word, BatchItem,
    CacheConfig, CacheKey, CacheStats, Lang, LanguageInfo, OfflineDictionary, PublicLookup,
    RemoteTranslator, ServiceHealth, Translation, TranslationCache, TranslationMethod,
    TranslationResolver, TranslationStats,
};
