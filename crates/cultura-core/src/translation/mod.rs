//! Translation: language codes, cache, dictionaries and the resolution cascade.

mod cache;
mod dictionary;
mod lang;
mod resolver;

pub use cache::{CacheConfig, CacheKey, CacheStats, TranslationCache};
pub use dictionary::{
    curated_phrase, curated_phrase_count, heuristic_translate, substitute_patterns,
    translate_word_by_word, OfflineDictionary,
};
pub use lang::{detect_language, supported_languages, supported_pairs, Lang, LanguageInfo};
pub use resolver::{
    BatchItem, ServiceHealth, Translation, TranslationMethod, TranslationResolver, TranslationStats,
};

use async_trait::async_trait;

use crate::error::ServiceError;

/// Authenticated remote translation service (stage 5 of the cascade).
#[async_trait]
pub trait RemoteTranslator: Send + Sync {
    fn id(&self) -> &str;

    /// False when credentials are missing; the stage is then skipped without a request.
    fn is_configured(&self) -> bool;

    async fn translate(&self, text: &str, source: Lang, target: Lang) -> Result<String, ServiceError>;

    async fn health(&self) -> Result<(), ServiceError>;
}

/// Unauthenticated best-effort lookup used inside the offline cascade.
#[async_trait]
pub trait PublicLookup: Send + Sync {
    async fn lookup(&self, text: &str, source: Lang, target: Lang) -> Result<Option<String>, ServiceError>;
}
