//! System prompt assembly for grounded remote answers.

use crate::knowledge::CulturalEntity;

/// One context block per entity: header, description, rituals, attribution.
pub fn context_block(entities: &[&CulturalEntity]) -> String {
    entities
        .iter()
        .map(|e| {
            format!(
                "[{} - {}]: {}\nRituals: {}\nAttribution: {}",
                e.name,
                e.region,
                e.description,
                e.rituals.join(", "),
                e.attribution
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn system_prompt(entities: &[&CulturalEntity]) -> String {
    format!(
        "You are CULTURA, an AI assistant specialized in Northeast Indian cultural heritage. \
You have access to verified cultural data from government sources and tribal communities.

ETHICAL GUIDELINES:
- Always attribute information to source communities
- Show respect for indigenous knowledge
- Avoid cultural appropriation or misrepresentation
- If uncertain, say so - never invent cultural facts
- Keep responses concise and informative (2-3 paragraphs max)

CULTURAL CONTEXT:
{}

Provide accurate, respectful responses about Northeast Indian culture. \
Always cite the community source when referencing specific cultural practices.",
        context_block(entities)
    )
}
