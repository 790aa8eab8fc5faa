//! Keyword index derived from the cultural store, plus hand-written general topics.

use serde::Serialize;

use super::store::{CulturalEntity, CulturalStore};

pub const GENERAL_NORTHEAST_CULTURE: &str = "northeast-culture";
pub const GENERAL_FESTIVALS: &str = "festivals";
pub const GENERAL_FOOD: &str = "food-cuisine";

const NORTHEAST_CULTURE_RESPONSE: &str = "🌈 **Northeast India Cultural Heritage**

Northeast India is home to more than 200 tribes and many linguistic groups across eight states.

🏔️ **The Eight States**:
- **Seven Sisters**: Assam, Arunachal Pradesh, Manipur, Meghalaya, Mizoram, Nagaland, Tripura
- **Brother State**: Sikkim

🎭 **Cultural Diversity**:
- **200+ Tribal Communities** with their own traditions, languages and customs
- **100+ Languages** and dialects spoken across the region
- **Many Faiths**: Hinduism, Buddhism, Christianity and indigenous beliefs

🍽️ **Culinary Heritage**:
- Rice is the staple in every state
- Fermented foods and drinks such as rice beer, fish and vegetables
- Boiled and steamed dishes with little oil
- Indigenous herbs, bamboo shoots and local greens

🏛️ **Shared Values**:
- Respect for nature and its conservation
- Strong community bonds and collective decision-making
- Warm hospitality towards guests
- Care for traditional knowledge

Every state and tribe keeps its own identity while sharing a common thread of harmony with nature and community life.";

const FESTIVALS_RESPONSE: &str = "🎉 **Major Festivals of Northeast India**

The region is often called a land of festivals, with celebrations all year round:

🌸 **Spring Festivals**:
- **Bihu (Assam)**: The Assamese new year
- **Chapchar Kut (Mizoram)**: Spring festival with the bamboo dance
- **Lai Haraoba (Manipur)**: Ancient ritual festival of the Meitei

❄️ **Winter Festivals**:
- **Hornbill Festival (Nagaland)**: Showcase of all the Naga tribes
- **Losar (Sikkim & Arunachal Pradesh)**: Tibetan new year
- **Sangai Festival (Manipur)**: Cultural festival named after the state animal

🍂 **Autumn Festivals**:
- **Wangala (Meghalaya)**: Garo harvest festival of the hundred drums
- **Nongkrem Dance (Meghalaya)**: Sacred harvest thanksgiving of the Khasi

Each festival reflects the identity and traditions of the community that keeps it.";

const FOOD_RESPONSE: &str = "🍽️ **Traditional Cuisine of Northeast India**

Northeast Indian cooking favours fresh ingredients, little oil and distinctive flavours:

🐟 **Signature Dishes**:
- **Masor Tenga (Assam)**: Tangy fish curry with tomato or elephant apple
- **Eromba (Manipur)**: Fiery mash with fermented fish and king chilli
- **Axone (Nagaland)**: Fermented soybean cooked with smoked meat
- **Jadoh (Meghalaya)**: Khasi rice dish with pork
- **Thukpa (Sikkim)**: Hearty noodle soup of Tibetan origin

🌿 **Common Ingredients**:
- **Bamboo shoots** in every state
- **Fermented fish** for depth of flavour
- **Indigenous herbs** found nowhere else
- **Rice** prepared in countless ways

🥘 **Cooking Methods**:
- Steaming and boiling rather than frying
- Smoking for preservation and flavour
- Fermentation for taste and nutrition

The cuisine reflects the region's close ties with nature and sustainable living.";

/// One searchable answer: an entity rendered for chat, or a general topic.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeRecord {
    pub key: String,
    /// Lowercase, never empty strings.
    pub keywords: Vec<String>,
    pub response: String,
    pub sources: Vec<String>,
    pub entity: Option<CulturalEntity>,
}

impl KnowledgeRecord {
    /// A record with no originating entity.
    pub fn general(key: &str, keywords: &[&str], response: &str, sources: &[&str]) -> Self {
        Self {
            key: key.to_string(),
            keywords: normalize_keywords(keywords.iter().map(|k| k.to_string())),
            response: response.to_string(),
            sources: sources.iter().map(|s| s.to_string()).collect(),
            entity: None,
        }
    }

    pub fn from_entity(entity: &CulturalEntity) -> Self {
        let keywords = [
            entity.name.clone(),
            entity.entity_type.as_str().to_string(),
            entity.region.clone(),
            entity.state.clone(),
            entity.season.clone(),
        ]
        .into_iter()
        .chain(entity.communities.iter().cloned())
        .chain(entity.rituals.iter().cloned())
        .chain(entity.symbols.iter().cloned());

        Self {
            key: entity_key(&entity.name),
            keywords: normalize_keywords(keywords),
            response: render_entity(entity),
            sources: vec![entity.attribution.clone()],
            entity: Some(entity.clone()),
        }
    }
}

fn normalize_keywords(raw: impl IntoIterator<Item = String>) -> Vec<String> {
    raw.into_iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Lowercased name with whitespace runs replaced by `-`.
pub fn entity_key(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

pub(crate) fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn bullet_list(items: &[String]) -> String {
    items.iter().map(|i| format!("- {i}")).collect::<Vec<_>>().join("\n")
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn render_entity(entity: &CulturalEntity) -> String {
    format!(
        "{emoji} **{name}** - {region}, {state}\n\n\
         {description}\n\n\
         🎭 **Cultural Elements**:\n{rituals}\n\n\
         🔮 **Symbols & Traditions**:\n{symbols}\n\n\
         👥 **Communities**: {communities}\n\n\
         📚 **Historical Context**: {history}\n\n\
         🌟 **Season**: {season}",
        emoji = entity.entity_type.emoji(),
        name = entity.name,
        region = entity.region,
        state = entity.state,
        description = entity.description,
        rituals = bullet_list(&entity.rituals),
        symbols = bullet_list(&entity.symbols),
        communities = entity.communities.join(", "),
        history = entity.historical_context,
        season = capitalize_first(&entity.season),
    )
}

/// Summary of a record for topic listings.
#[derive(Debug, Clone, Serialize)]
pub struct TopicSummary {
    pub key: String,
    pub name: String,
    /// Entity type, or "general" for hand-written topics.
    pub kind: String,
    pub keywords: Vec<String>,
}

/// Records derived from one store load, in a fixed order: entities first, then general topics.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    records: Vec<KnowledgeRecord>,
}

impl KnowledgeBase {
    pub fn build(store: &CulturalStore) -> Self {
        let mut records: Vec<KnowledgeRecord> =
            store.get_all().iter().map(KnowledgeRecord::from_entity).collect();
        records.extend(general_topics());
        tracing::debug!(target: "cultura::knowledge", records = records.len(), "knowledge base built");
        Self { records }
    }

    /// For tests and custom deployments that assemble their own records.
    pub fn from_records(records: Vec<KnowledgeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[KnowledgeRecord] {
        &self.records
    }

    pub fn get(&self, key: &str) -> Option<&KnowledgeRecord> {
        self.records.iter().find(|r| r.key == key)
    }

    pub fn topics(&self) -> Vec<TopicSummary> {
        self.records
            .iter()
            .map(|record| TopicSummary {
                key: record.key.clone(),
                name: match &record.entity {
                    Some(entity) => entity.name.clone(),
                    None => title_case(&record.key.replace('-', " ")),
                },
                kind: record
                    .entity
                    .as_ref()
                    .map_or("general", |e| e.entity_type.as_str())
                    .to_string(),
                keywords: record.keywords.iter().take(5).cloned().collect(),
            })
            .collect()
    }
}

fn general_topics() -> Vec<KnowledgeRecord> {
    vec![
        KnowledgeRecord::general(
            GENERAL_NORTHEAST_CULTURE,
            &["northeast", "culture", "heritage", "tribes", "diversity", "eight states", "seven sisters"],
            NORTHEAST_CULTURE_RESPONSE,
            &[
                "Northeast India Cultural Survey",
                "Tribal Heritage Documentation",
                "Ministry of Culture, Government of India",
            ],
        ),
        KnowledgeRecord::general(
            GENERAL_FESTIVALS,
            &["festivals", "celebrations", "cultural events", "traditional festivals"],
            FESTIVALS_RESPONSE,
            &["Festival Documentation", "Cultural Heritage Records"],
        ),
        KnowledgeRecord::general(
            GENERAL_FOOD,
            &["food", "cuisine", "dishes", "cooking", "traditional food"],
            FOOD_RESPONSE,
            &["Culinary Heritage Documentation", "Traditional Cooking Practices"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_records_come_first_then_general_topics() {
        let store = CulturalStore::bundled().unwrap();
        let kb = KnowledgeBase::build(&store);
        assert_eq!(kb.records().len(), store.len() + 3);
        assert_eq!(kb.records()[0].key, "bihu-festival");
        let tail: Vec<_> = kb.records()[store.len()..].iter().map(|r| r.key.as_str()).collect();
        assert_eq!(tail, vec!["northeast-culture", "festivals", "food-cuisine"]);
    }

    #[test]
    fn keywords_are_lowercase_and_non_empty() {
        let kb = KnowledgeBase::build(&CulturalStore::bundled().unwrap());
        let bihu = kb.get("bihu-festival").unwrap();
        assert!(bihu.keywords.contains(&"bihu festival".to_string()));
        assert!(bihu.keywords.contains(&"assam".to_string()));
        assert!(bihu.keywords.contains(&"gamosa".to_string()));
        for record in kb.records() {
            assert!(record.keywords.iter().all(|k| !k.is_empty() && *k == k.to_lowercase()));
        }
    }

    #[test]
    fn rendered_entity_has_all_sections() {
        let kb = KnowledgeBase::build(&CulturalStore::bundled().unwrap());
        let response = &kb.get("bihu-festival").unwrap().response;
        assert!(response.starts_with("🎉 **Bihu Festival** - Upper Assam, Assam"));
        assert!(response.contains("- Goru Bihu cattle bathing ceremony"));
        assert!(response.contains("👥 **Communities**: Assamese, Mising, Deori"));
        assert!(response.ends_with("🌟 **Season**: Spring"));
    }

    #[test]
    fn building_twice_is_deterministic() {
        let store = CulturalStore::bundled().unwrap();
        assert_eq!(KnowledgeBase::build(&store).records(), KnowledgeBase::build(&store).records());
    }

    #[test]
    fn topics_name_general_records() {
        let kb = KnowledgeBase::build(&CulturalStore::bundled().unwrap());
        let topics = kb.topics();
        let food = topics.iter().find(|t| t.key == "food-cuisine").unwrap();
        assert_eq!(food.name, "Food Cuisine");
        assert_eq!(food.kind, "general");
        assert!(food.keywords.len() <= 5);
    }

    #[test]
    fn entity_key_collapses_whitespace() {
        assert_eq!(entity_key("Manipuri  Ras Leela"), "manipuri-ras-leela");
    }
}
