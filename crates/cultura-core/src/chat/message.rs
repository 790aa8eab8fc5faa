use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::resolver::Resolution;
use crate::knowledge::CulturalEntity;

/// Attribution label used for answers drawn from the offline knowledge base.
pub const KNOWLEDGE_BASE_ATTRIBUTION: &str = "CULTURA Knowledge Base";

pub const GREETING: &str = "Namaste! I'm CULTURA, your AI companion for Northeast Indian cultural heritage. \
I can answer questions about festivals, rituals, traditions, and cultural practices from all 8 Northeast states.\n\n\
🎭 Try asking me about: Bihu Festival, Lai Haraoba, Hornbill Festival, Wangala, or Chapchar Kut!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A cited source. `id` points back at a cultural entity when there is one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribution {
    pub name: String,
    pub attribution: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Attribution {
    pub fn knowledge_base(name: impl Into<String>, id: Option<String>) -> Self {
        Self {
            name: name.into(),
            attribution: KNOWLEDGE_BASE_ATTRIBUTION.to_string(),
            id,
        }
    }

    pub fn for_entity(entity: &CulturalEntity) -> Self {
        Self {
            name: entity.name.clone(),
            attribution: entity.attribution.clone(),
            id: Some(entity.id.clone()),
        }
    }
}

/// One transcript entry. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub sources: Vec<Attribution>,
    /// True when the answer came from the offline knowledge base.
    #[serde(default)]
    pub offline: bool,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::User,
            content: content.into(),
            sources: Vec::new(),
            offline: false,
        }
    }

    pub fn assistant(content: impl Into<String>, sources: Vec<Attribution>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: Role::Assistant,
            content: content.into(),
            sources,
            offline: false,
        }
    }

    pub fn offline(resolution: Resolution) -> Self {
        Self {
            offline: true,
            ..Self::assistant(resolution.response, resolution.sources)
        }
    }

    pub fn greeting() -> Self {
        Self::assistant(GREETING, Vec::new())
    }
}
