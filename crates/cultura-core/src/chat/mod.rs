//! Chat messages and the offline knowledge resolver.

mod message;
mod resolver;

pub use message::{Attribution, ChatMessage, Role, GREETING, KNOWLEDGE_BASE_ATTRIBUTION};
pub use resolver::{ChatResolver, MatchRule, Resolution, ScoringWeights};
