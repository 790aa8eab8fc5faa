//! Chat orchestration: offline check, grounded remote answer, offline fallback.

mod backend;
mod grounding;

pub use backend::{CompletionRequest, LlmBackend, LlmError};
pub use grounding::{context_block, system_prompt};

use crate::chat::{Attribution, ChatMessage, ChatResolver};
use crate::shared::LlmSettings;
use serde::Serialize;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Number of entities passed to the remote model as grounding.
const GROUNDING_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,
    #[error("a previous message is still being answered")]
    SubmissionPending,
}

/// Lifecycle of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ChatState {
    Idle = 0,
    Checking = 1,
    OfflineAnswered = 2,
    ApiAttempting = 3,
    Answered = 4,
}

impl ChatState {
    fn from_u8(v: u8) -> Self {
        match v {
            1 => ChatState::Checking,
            2 => ChatState::OfflineAnswered,
            3 => ChatState::ApiAttempting,
            4 => ChatState::Answered,
            _ => ChatState::Idle,
        }
    }

    /// A submission is in flight.
    pub fn is_pending(self) -> bool {
        matches!(self, ChatState::Checking | ChatState::ApiAttempting)
    }
}

/// Resets the state once a submission finishes, including when its future is dropped mid-call.
struct InFlight<'a>(&'a AtomicU8);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(ChatState::Answered as u8, Ordering::SeqCst);
    }
}

/// Owns the transcript and answers one message at a time.
pub struct ChatOrchestrator {
    resolver: Arc<ChatResolver>,
    backend: Option<Arc<dyn LlmBackend>>,
    model: String,
    max_tokens: u32,
    state: AtomicU8,
    transcript: RwLock<Vec<ChatMessage>>,
}

impl ChatOrchestrator {
    pub fn new(resolver: Arc<ChatResolver>) -> Self {
        let llm = LlmSettings::default();
        Self {
            resolver,
            backend: None,
            model: llm.model,
            max_tokens: llm.max_tokens,
            state: AtomicU8::new(ChatState::Idle as u8),
            transcript: RwLock::new(vec![ChatMessage::greeting()]),
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn LlmBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_settings(mut self, llm: &LlmSettings) -> Self {
        self.model = llm.model.clone();
        self.max_tokens = llm.max_tokens;
        self
    }

    pub fn resolver(&self) -> &ChatResolver {
        &self.resolver
    }

    pub fn state(&self) -> ChatState {
        ChatState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Snapshot of every message so far, greeting first.
    pub fn transcript(&self) -> Vec<ChatMessage> {
        match self.transcript.read() {
            Ok(t) => t.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Answers `text` and appends both turns to the transcript.
    ///
    /// Remote failures never surface here; they fall back to the knowledge resolver and the
    /// reply is tagged offline.
    pub async fn submit(&self, text: &str) -> Result<ChatMessage, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ChatError::EmptyMessage);
        }

        self.state
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| {
                if ChatState::from_u8(v).is_pending() {
                    None
                } else {
                    Some(ChatState::Checking as u8)
                }
            })
            .map_err(|_| ChatError::SubmissionPending)?;
        let _guard = InFlight(&self.state);

        self.append(ChatMessage::user(text));

        let reply = if self.resolver.can_answer_offline(text) {
            self.set_state(ChatState::OfflineAnswered);
            tracing::debug!(target: "cultura::chat", "answered from knowledge base");
            ChatMessage::offline(self.resolver.resolve(text))
        } else {
            self.set_state(ChatState::ApiAttempting);
            self.ask_remote(text).await
        };

        self.append(reply.clone());
        Ok(reply)
    }

    async fn ask_remote(&self, text: &str) -> ChatMessage {
        let grounding = self.resolver.top_matches(text, GROUNDING_LIMIT);
        let result = match &self.backend {
            Some(backend) => {
                let request = CompletionRequest::user(&self.model, text)
                    .with_max_tokens(self.max_tokens)
                    .with_system(system_prompt(&grounding));
                backend.complete(request).await
            }
            None => Err(LlmError::MissingCredentials),
        };

        match result {
            Ok(answer) if !answer.trim().is_empty() => {
                let sources = grounding.iter().map(|e| Attribution::for_entity(e)).collect();
                ChatMessage::assistant(answer, sources)
            }
            Ok(_) => {
                tracing::warn!(target: "cultura::chat", kind = "empty", "remote model returned no text; answering offline");
                ChatMessage::offline(self.resolver.resolve(text))
            }
            Err(e) => {
                tracing::warn!(target: "cultura::chat", kind = e.kind(), error = %e, "remote model failed; answering offline");
                ChatMessage::offline(self.resolver.resolve(text))
            }
        }
    }

    fn set_state(&self, state: ChatState) {
        self.state.store(state as u8, Ordering::SeqCst);
    }

    fn append(&self, message: ChatMessage) {
        match self.transcript.write() {
            Ok(mut t) => t.push(message),
            Err(poisoned) => poisoned.into_inner().push(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{Role, ScoringWeights, GREETING};
    use crate::knowledge::CulturalStore;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    struct FakeBackend {
        reply: Result<String, LlmError>,
        calls: AtomicUsize,
        last: Mutex<Option<CompletionRequest>>,
    }

    impl FakeBackend {
        fn new(reply: Result<String, LlmError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last: Mutex::new(None),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmBackend for FakeBackend {
        fn id(&self) -> &str {
            "fake"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request);
            self.reply.clone()
        }
    }

    /// Blocks until released, so a submission stays in flight.
    struct GatedBackend {
        release: Notify,
    }

    #[async_trait::async_trait]
    impl LlmBackend for GatedBackend {
        fn id(&self) -> &str {
            "gated"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<String, LlmError> {
            self.release.notified().await;
            Ok("released".to_string())
        }
    }

    fn bundled_resolver() -> Arc<ChatResolver> {
        let store = CulturalStore::bundled().unwrap();
        Arc::new(ChatResolver::from_store(&store, ScoringWeights::default()))
    }

    fn drums_resolver() -> Arc<ChatResolver> {
        let store = CulturalStore::from_json(
            r#"[{
                "id": "wangala",
                "name": "Wangala",
                "type": "festival",
                "region": "Garo Hills",
                "state": "Meghalaya",
                "season": "autumn",
                "communities": ["Garo"],
                "rituals": ["Procession of the hundred drums"],
                "symbols": ["Dama drum"],
                "description": "Post-harvest thanksgiving of the Garo people.",
                "historical_context": "Celebrated at Asanang since 1976.",
                "attribution": "Garo Heritage Council",
                "language": "Garo"
            }]"#,
        )
        .unwrap();
        Arc::new(ChatResolver::from_store(&store, ScoringWeights::default()))
    }

    #[test]
    fn transcript_starts_with_greeting() {
        let chat = ChatOrchestrator::new(bundled_resolver());
        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].role, Role::Assistant);
        assert_eq!(transcript[0].content, GREETING);
        assert_eq!(chat.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn empty_message_is_rejected() {
        let chat = ChatOrchestrator::new(bundled_resolver());
        assert_eq!(chat.submit("   ").await, Err(ChatError::EmptyMessage));
        assert_eq!(chat.transcript().len(), 1);
        assert_eq!(chat.state(), ChatState::Idle);
    }

    #[tokio::test]
    async fn known_topic_skips_remote_model() {
        let backend = FakeBackend::new(Ok("remote".to_string()));
        let chat = ChatOrchestrator::new(bundled_resolver()).with_backend(backend.clone());

        let reply = chat.submit("What is Bihu Festival?").await.unwrap();
        assert!(reply.offline);
        assert!(reply.content.contains("Bihu"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
        assert_eq!(chat.state(), ChatState::Answered);

        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].role, Role::User);
        assert_eq!(transcript[1].content, "What is Bihu Festival?");
    }

    #[tokio::test]
    async fn remote_answer_is_grounded_and_attributed() {
        let backend = FakeBackend::new(Ok("The hundred drums echo across the Garo Hills.".to_string()));
        let llm = LlmSettings {
            model: "test-model".to_string(),
            max_tokens: 256,
            ..LlmSettings::default()
        };
        let chat = ChatOrchestrator::new(drums_resolver())
            .with_backend(backend.clone())
            .with_settings(&llm);

        let reply = chat.submit("hundred drums").await.unwrap();
        assert!(!reply.offline);
        assert_eq!(reply.content, "The hundred drums echo across the Garo Hills.");
        assert_eq!(reply.sources.len(), 1);
        assert_eq!(reply.sources[0].attribution, "Garo Heritage Council");
        assert_eq!(reply.sources[0].id.as_deref(), Some("wangala"));

        let request = backend.last.lock().unwrap().clone().unwrap();
        assert_eq!(request.model, "test-model");
        assert_eq!(request.max_tokens, 256);
        assert_eq!(request.user_message, "hundred drums");
        assert!(request.system_prompt.contains("[Wangala - Garo Hills]:"));
    }

    #[tokio::test]
    async fn remote_failure_falls_back_offline() {
        let backend = FakeBackend::new(Err(LlmError::Authentication));
        let resolver = bundled_resolver();
        let chat = ChatOrchestrator::new(resolver.clone()).with_backend(backend.clone());

        let reply = chat.submit("xyzzy plugh").await.unwrap();
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert!(reply.offline);
        assert_eq!(reply.content, resolver.resolve("xyzzy plugh").response);
        assert_eq!(chat.state(), ChatState::Answered);
    }

    #[tokio::test]
    async fn empty_remote_answer_falls_back_offline() {
        let backend = FakeBackend::new(Ok("  ".to_string()));
        let chat = ChatOrchestrator::new(bundled_resolver()).with_backend(backend);
        let reply = chat.submit("xyzzy plugh").await.unwrap();
        assert!(reply.offline);
        assert!(!reply.content.trim().is_empty());
    }

    #[tokio::test]
    async fn missing_backend_answers_offline() {
        let chat = ChatOrchestrator::new(bundled_resolver());
        let reply = chat.submit("xyzzy plugh").await.unwrap();
        assert!(reply.offline);
    }

    #[tokio::test]
    async fn second_submission_while_pending_is_rejected() {
        let backend = Arc::new(GatedBackend { release: Notify::new() });
        let chat = Arc::new(ChatOrchestrator::new(bundled_resolver()).with_backend(backend.clone()));

        let first = {
            let chat = chat.clone();
            tokio::spawn(async move { chat.submit("xyzzy plugh").await })
        };
        while chat.state() != ChatState::ApiAttempting {
            tokio::task::yield_now().await;
        }

        assert_eq!(chat.submit("another").await, Err(ChatError::SubmissionPending));

        backend.release.notify_one();
        let reply = first.await.unwrap().unwrap();
        assert_eq!(reply.content, "released");
        assert_eq!(chat.state(), ChatState::Answered);
        // greeting, one user turn, one reply
        assert_eq!(chat.transcript().len(), 3);

        backend.release.notify_one();
        assert!(chat.submit("xyzzy plugh").await.is_ok());
    }
}
