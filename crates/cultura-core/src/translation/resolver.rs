//! Translation resolver: an ordered cascade of strategies, first usable result wins.
//!
//! A result is usable when it exists and differs from the input text by more than letter
//! case. Network failures
//! inside a stage are logged and treated as "no result", so only invalid language codes
//! ever reach the caller as errors.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::cache::{CacheConfig, CacheKey, CacheStats, TranslationCache};
use super::dictionary::{
    curated_phrase, curated_phrase_count, heuristic_translate, substitute_patterns,
    translate_word_by_word, OfflineDictionary,
};
use super::{Lang, PublicLookup, RemoteTranslator};
use crate::error::ConfigurationError;

/// Which strategy produced a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationMethod {
    Identity,
    Cache,
    Curated,
    OfflineDictionary,
    PublicLookup,
    Pattern,
    WordByWord,
    Remote,
    /// Last-resort heuristic; low confidence.
    Heuristic,
    /// Every stage failed; the input is returned unchanged.
    Fallback,
}

impl TranslationMethod {
    pub fn confidence(self) -> f32 {
        match self {
            TranslationMethod::Identity | TranslationMethod::Curated => 1.0,
            TranslationMethod::Remote => 0.9,
            TranslationMethod::Cache | TranslationMethod::OfflineDictionary => 0.8,
            TranslationMethod::PublicLookup => 0.7,
            TranslationMethod::Pattern | TranslationMethod::WordByWord => 0.5,
            TranslationMethod::Heuristic => 0.3,
            TranslationMethod::Fallback => 0.1,
        }
    }

    pub fn is_low_confidence(self) -> bool {
        self.confidence() < 0.5
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Translation {
    pub text: String,
    pub method: TranslationMethod,
    pub confidence: f32,
}

impl Translation {
    fn new(text: impl Into<String>, method: TranslationMethod) -> Self {
        Self {
            text: text.into(),
            method,
            confidence: method.confidence(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchItem {
    pub original: String,
    pub translated: String,
    pub method: TranslationMethod,
    pub confidence: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationStats {
    pub cache: CacheStats,
    pub supported_languages: usize,
    pub curated_phrases: usize,
    pub offline_terms: usize,
    pub remote_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealth {
    pub service: String,
    pub configured: bool,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Cache,
    Curated,
    Offline,
    Remote,
    Heuristic,
}

const CASCADE: [Stage; 5] = [
    Stage::Cache,
    Stage::Curated,
    Stage::Offline,
    Stage::Remote,
    Stage::Heuristic,
];

#[derive(Debug, Clone, Copy)]
enum OfflineStep {
    Dictionary,
    PublicLookup,
    Pattern,
    WordByWord,
}

const OFFLINE_STEPS: [OfflineStep; 4] = [
    OfflineStep::Dictionary,
    OfflineStep::PublicLookup,
    OfflineStep::Pattern,
    OfflineStep::WordByWord,
];

struct Request<'a> {
    text: &'a str,
    source: Lang,
    target: Lang,
}

impl Request<'_> {
    fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.source, self.target, self.text)
    }

    fn usable(&self, candidate: Option<Translation>) -> Option<Translation> {
        candidate.filter(|t| t.text.trim().to_lowercase() != self.text.trim().to_lowercase())
    }
}

pub struct TranslationResolver {
    cache: TranslationCache,
    dictionary: OfflineDictionary,
    remote: Option<Arc<dyn RemoteTranslator>>,
    public_lookup: Option<Arc<dyn PublicLookup>>,
}

impl TranslationResolver {
    /// Offline-only resolver; attach network stages with the `with_*` builders.
    pub fn new(cache: CacheConfig) -> Self {
        Self {
            cache: TranslationCache::new(cache),
            dictionary: OfflineDictionary::new(),
            remote: None,
            public_lookup: None,
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteTranslator>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn with_public_lookup(mut self, lookup: Arc<dyn PublicLookup>) -> Self {
        self.public_lookup = Some(lookup);
        self
    }

    pub fn dictionary(&self) -> &OfflineDictionary {
        &self.dictionary
    }

    /// Best-effort translation of `text`. Fails only on unsupported language codes.
    pub async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, ConfigurationError> {
        Ok(self.translate_detailed(text, source, target).await?.text)
    }

    pub async fn translate_detailed(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<Translation, ConfigurationError> {
        let source: Lang = source.parse()?;
        let target: Lang = target.parse()?;
        Ok(self.resolve(text, source, target).await)
    }

    /// Run the cascade for already-validated languages.
    pub async fn resolve(&self, text: &str, source: Lang, target: Lang) -> Translation {
        if text.is_empty() || source == target {
            return Translation::new(text, TranslationMethod::Identity);
        }
        let request = Request { text, source, target };

        for stage in CASCADE {
            let Some(found) = request.usable(self.run_stage(stage, &request).await) else {
                debug!(target: "cultura::translation", stage = ?stage, "no usable result, advancing");
                continue;
            };
            if !matches!(stage, Stage::Cache) {
                self.cache.insert(request.cache_key(), found.text.clone());
            }
            info!(
                target: "cultura::translation",
                source = %source,
                target_lang = %target,
                method = ?found.method,
                "translation resolved"
            );
            return found;
        }

        debug!(target: "cultura::translation", source = %source, target_lang = %target, "all stages failed, returning input");
        Translation::new(text, TranslationMethod::Fallback)
    }

    async fn run_stage(&self, stage: Stage, request: &Request<'_>) -> Option<Translation> {
        match stage {
            Stage::Cache => self
                .cache
                .get(&request.cache_key())
                .map(|t| Translation::new(t, TranslationMethod::Cache)),
            Stage::Curated => curated_phrase(request.text, request.target)
                .map(|t| Translation::new(t, TranslationMethod::Curated)),
            Stage::Offline => self.run_offline(request).await,
            Stage::Remote => self.run_remote(request).await,
            Stage::Heuristic => heuristic_translate(request.text, request.target, &self.dictionary)
                .map(|t| Translation::new(t, TranslationMethod::Heuristic)),
        }
    }

    async fn run_offline(&self, request: &Request<'_>) -> Option<Translation> {
        for step in OFFLINE_STEPS {
            let candidate = match step {
                OfflineStep::Dictionary => self
                    .dictionary
                    .lookup(request.text, request.target)
                    .map(|t| Translation::new(t, TranslationMethod::OfflineDictionary)),
                OfflineStep::PublicLookup => self.run_public_lookup(request).await,
                OfflineStep::Pattern => substitute_patterns(request.text, request.target)
                    .map(|t| Translation::new(t, TranslationMethod::Pattern)),
                OfflineStep::WordByWord => {
                    translate_word_by_word(request.text, |word| self.dictionary.lookup(word, request.target))
                        .map(|t| Translation::new(t, TranslationMethod::WordByWord))
                }
            };
            if let Some(found) = request.usable(candidate) {
                return Some(found);
            }
        }
        None
    }

    async fn run_public_lookup(&self, request: &Request<'_>) -> Option<Translation> {
        let lookup = self.public_lookup.as_ref()?;
        match lookup.lookup(request.text, request.source, request.target).await {
            Ok(found) => found.map(|t| Translation::new(t, TranslationMethod::PublicLookup)),
            Err(e) => {
                warn!(target: "cultura::translation", kind = e.kind(), error = %e, "public lookup failed");
                None
            }
        }
    }

    async fn run_remote(&self, request: &Request<'_>) -> Option<Translation> {
        let remote = self.remote.as_ref()?;
        if !remote.is_configured() {
            debug!(target: "cultura::translation", service = remote.id(), "remote translator not configured, skipping");
            return None;
        }
        match remote.translate(request.text, request.source, request.target).await {
            Ok(text) => Some(Translation::new(text, TranslationMethod::Remote)),
            Err(e) => {
                warn!(
                    target: "cultura::translation",
                    service = remote.id(),
                    kind = e.kind(),
                    error = %e,
                    "remote translation failed"
                );
                None
            }
        }
    }

    /// Translate each text in order; language codes are validated once.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source: &str,
        target: &str,
    ) -> Result<Vec<BatchItem>, ConfigurationError> {
        let source: Lang = source.parse()?;
        let target: Lang = target.parse()?;
        let mut items = Vec::with_capacity(texts.len());
        for text in texts {
            let translation = self.resolve(text, source, target).await;
            items.push(BatchItem {
                original: text.clone(),
                translated: translation.text,
                method: translation.method,
                confidence: translation.confidence,
            });
        }
        Ok(items)
    }

    pub fn stats(&self) -> TranslationStats {
        TranslationStats {
            cache: self.cache.stats(),
            supported_languages: Lang::all().len(),
            curated_phrases: curated_phrase_count(),
            offline_terms: self.dictionary.len(),
            remote_configured: self.remote.as_ref().is_some_and(|r| r.is_configured()),
        }
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!(target: "cultura::translation", "translation cache cleared");
    }

    pub async fn check_service_health(&self) -> ServiceHealth {
        let Some(remote) = self.remote.as_ref() else {
            return ServiceHealth {
                service: "none".to_string(),
                configured: false,
                healthy: false,
                error: Some("no remote translator attached".to_string()),
            };
        };
        if !remote.is_configured() {
            return ServiceHealth {
                service: remote.id().to_string(),
                configured: false,
                healthy: false,
                error: Some("credentials not configured".to_string()),
            };
        }
        let result = remote.health().await;
        if let Err(e) = &result {
            warn!(target: "cultura::translation", service = remote.id(), kind = e.kind(), "health check failed");
        }
        ServiceHealth {
            service: remote.id().to_string(),
            configured: true,
            healthy: result.is_ok(),
            error: result.err().map(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ServiceError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeRemote {
        configured: bool,
        reply: Result<String, ServiceError>,
        calls: AtomicUsize,
    }

    impl FakeRemote {
        fn new(reply: Result<String, ServiceError>) -> Arc<Self> {
            Arc::new(Self {
                configured: true,
                reply,
                calls: AtomicUsize::new(0),
            })
        }

        fn unconfigured() -> Arc<Self> {
            Arc::new(Self {
                configured: false,
                reply: Ok("unused".into()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RemoteTranslator for FakeRemote {
        fn id(&self) -> &str {
            "fake"
        }

        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn translate(&self, _text: &str, _source: Lang, _target: Lang) -> Result<String, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }

        async fn health(&self) -> Result<(), ServiceError> {
            self.reply.clone().map(|_| ())
        }
    }

    struct FakeLookup {
        reply: Result<Option<String>, ServiceError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PublicLookup for FakeLookup {
        async fn lookup(&self, _text: &str, _source: Lang, _target: Lang) -> Result<Option<String>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone()
        }
    }

    fn resolver_with(remote: Arc<FakeRemote>) -> TranslationResolver {
        TranslationResolver::new(CacheConfig::default()).with_remote(remote)
    }

    fn unreachable() -> Result<String, ServiceError> {
        Err(ServiceError::Network("connection refused".into()))
    }

    #[tokio::test]
    async fn same_language_is_identity_without_network() {
        let remote = FakeRemote::new(Ok("translated".into()));
        let resolver = resolver_with(remote.clone());
        for lang in Lang::all() {
            let out = resolver.translate("Brahmaputra valley", lang.code(), lang.code()).await.unwrap();
            assert_eq!(out, "Brahmaputra valley");
        }
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn curated_phrase_wins_when_remote_is_unreachable() {
        let remote = FakeRemote::new(unreachable());
        let resolver = resolver_with(remote.clone());
        let out = resolver.translate_detailed("Festival", "en", "as").await.unwrap();
        assert_eq!(out.text, "উৎসৱ");
        assert_eq!(out.method, TranslationMethod::Curated);
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn curated_phrase_without_any_remote() {
        let resolver = TranslationResolver::new(CacheConfig::default());
        assert_eq!(resolver.translate("Festival", "en", "as").await.unwrap(), "উৎসৱ");
    }

    #[tokio::test]
    async fn repeated_request_hits_cache_not_network() {
        let remote = FakeRemote::new(Ok("ब्रह्मपुत्र घाटी".into()));
        let resolver = resolver_with(remote.clone());

        let first = resolver.translate_detailed("Brahmaputra valley", "en", "hi").await.unwrap();
        assert_eq!(first.method, TranslationMethod::Remote);
        let second = resolver.translate_detailed("Brahmaputra valley", "en", "hi").await.unwrap();
        assert_eq!(second.method, TranslationMethod::Cache);
        assert_eq!(second.text, "ब्रह्मपुत्र घाटी");
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn remote_failure_falls_to_low_confidence_heuristic() {
        let remote = FakeRemote::new(unreachable());
        let resolver = resolver_with(remote.clone());
        let out = resolver.translate_detailed("Sacred Festival grounds", "en", "hi").await.unwrap();
        assert_eq!(out.text, "Sacred त्योहार grounds");
        assert_eq!(out.method, TranslationMethod::Heuristic);
        assert!(out.method.is_low_confidence());
        assert_eq!(remote.calls(), 1);
    }

    #[tokio::test]
    async fn total_failure_returns_input_and_caches_nothing() {
        let remote = FakeRemote::new(unreachable());
        let resolver = resolver_with(remote.clone());
        let out = resolver.translate_detailed("Brahmaputra", "en", "hi").await.unwrap();
        assert_eq!(out.text, "Brahmaputra");
        assert_eq!(out.method, TranslationMethod::Fallback);
        assert_eq!(resolver.stats().cache.size, 0);
    }

    #[tokio::test]
    async fn remote_echo_is_not_usable() {
        let remote = FakeRemote::new(Ok("Brahmaputra".into()));
        let resolver = resolver_with(remote.clone());
        let out = resolver.translate_detailed("Brahmaputra", "en", "hi").await.unwrap();
        assert_eq!(out.method, TranslationMethod::Fallback);
    }

    #[tokio::test]
    async fn case_only_change_is_not_a_translation() {
        let resolver = TranslationResolver::new(CacheConfig::default());
        let out = resolver.translate_detailed("festival", "hi", "en").await.unwrap();
        assert_eq!(out.text, "festival");
        assert_eq!(out.method, TranslationMethod::Fallback);
        let out = resolver.translate_detailed("festival music", "as", "en").await.unwrap();
        assert_eq!(out.text, "festival music");
        assert_eq!(out.method, TranslationMethod::Fallback);
        assert_eq!(resolver.stats().cache.size, 0);

        let remote = FakeRemote::new(Ok("BRAHMAPUTRA ".into()));
        let resolver = resolver_with(remote.clone());
        let out = resolver.translate_detailed("Brahmaputra", "en", "hi").await.unwrap();
        assert_eq!(out.method, TranslationMethod::Fallback);
        assert_eq!(remote.calls(), 1);
        assert_eq!(resolver.stats().cache.size, 0);
    }

    #[tokio::test]
    async fn unconfigured_remote_is_skipped() {
        let remote = FakeRemote::unconfigured();
        let resolver = resolver_with(remote.clone());
        let out = resolver.translate("Brahmaputra", "en", "bn").await.unwrap();
        assert_eq!(out, "Brahmaputra");
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn invalid_language_is_an_error() {
        let resolver = TranslationResolver::new(CacheConfig::default());
        let err = resolver.translate("Festival", "en", "fr").await.unwrap_err();
        assert!(matches!(err, ConfigurationError::UnsupportedLanguage(code) if code == "fr"));
        assert!(resolver.translate("Festival", "xx", "as").await.is_err());
    }

    #[tokio::test]
    async fn empty_text_enters_no_stage() {
        let remote = FakeRemote::new(Ok("x".into()));
        let resolver = resolver_with(remote.clone());
        assert_eq!(resolver.translate("", "en", "as").await.unwrap(), "");
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn offline_dictionary_precedes_public_lookup() {
        let lookup = Arc::new(FakeLookup {
            reply: Ok(Some("from lookup".into())),
            calls: AtomicUsize::new(0),
        });
        let resolver = TranslationResolver::new(CacheConfig::default()).with_public_lookup(lookup.clone());
        let out = resolver.translate_detailed("Thank you", "en", "mni").await.unwrap();
        assert_eq!(out.text, "ꯊꯥꯒꯠꯆꯔꯤ");
        assert_eq!(out.method, TranslationMethod::OfflineDictionary);
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn public_lookup_precedes_patterns() {
        let lookup = Arc::new(FakeLookup {
            reply: Ok(Some("বিহু কি?".into())),
            calls: AtomicUsize::new(0),
        });
        let resolver = TranslationResolver::new(CacheConfig::default()).with_public_lookup(lookup);
        let out = resolver.translate_detailed("What is Bihu?", "en", "as").await.unwrap();
        assert_eq!(out.method, TranslationMethod::PublicLookup);
        assert_eq!(out.text, "বিহু কি?");
    }

    #[tokio::test]
    async fn public_lookup_errors_are_swallowed() {
        let lookup = Arc::new(FakeLookup {
            reply: Err(ServiceError::Timeout),
            calls: AtomicUsize::new(0),
        });
        let resolver = TranslationResolver::new(CacheConfig::default()).with_public_lookup(lookup.clone());
        let out = resolver.translate_detailed("What is Bihu?", "en", "as").await.unwrap();
        assert_eq!(out.method, TranslationMethod::Pattern);
        assert_eq!(out.text, "কি Bihu?");
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn word_by_word_before_remote() {
        let remote = FakeRemote::new(Ok("remote".into()));
        let resolver = resolver_with(remote.clone());
        let out = resolver.translate_detailed("sacred river Brahmaputra", "en", "as").await.unwrap();
        assert_eq!(out.method, TranslationMethod::WordByWord);
        assert_eq!(out.text, "পবিত্ৰ নদী Brahmaputra");
        assert_eq!(remote.calls(), 0);
    }

    #[tokio::test]
    async fn batch_translates_in_order() {
        let resolver = TranslationResolver::new(CacheConfig::default());
        let texts = vec!["Festival".to_string(), "Brahmaputra".to_string(), String::new()];
        let items = resolver.translate_batch(&texts, "en", "bn").await.unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].translated, "উৎসব");
        assert_eq!(items[1].translated, "Brahmaputra");
        assert_eq!(items[1].method, TranslationMethod::Fallback);
        assert_eq!(items[2].translated, "");
        assert!(resolver.translate_batch(&texts, "en", "de").await.is_err());
    }

    #[tokio::test]
    async fn stats_and_clear() {
        let resolver = TranslationResolver::new(CacheConfig::default());
        resolver.translate("Festival", "en", "as").await.unwrap();
        resolver.translate("Festival", "en", "as").await.unwrap();
        let stats = resolver.stats();
        assert_eq!(stats.cache.size, 1);
        assert_eq!(stats.supported_languages, 5);
        assert_eq!(stats.curated_phrases, 9);
        assert!(!stats.remote_configured);

        resolver.clear_cache();
        assert_eq!(resolver.stats().cache.size, 0);
    }

    #[tokio::test]
    async fn health_reports_configuration() {
        let resolver = TranslationResolver::new(CacheConfig::default());
        assert!(!resolver.check_service_health().await.configured);

        let resolver = resolver_with(FakeRemote::new(unreachable()));
        let health = resolver.check_service_health().await;
        assert!(health.configured);
        assert!(!health.healthy);
        assert!(health.error.is_some());
    }
}
