use super::ApiError;
use crate::AppState;
use axum::extract::{Path, Query, State};
use cultura_core::CulturalEntity;

#[derive(serde::Deserialize)]
pub(crate) struct SearchQuery {
    #[serde(default)]
    q: String,
}

#[derive(serde::Deserialize)]
pub(crate) struct FactsQuery {
    #[serde(default)]
    category: Option<String>,
}

/// GET /api/v1/entities
pub(crate) async fn list_entities(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "entities": state.store.get_all() }))
}

/// GET /api/v1/entities/:id
pub(crate) async fn get_entity(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<axum::Json<CulturalEntity>, ApiError> {
    let entity = state
        .store
        .get_by_id(&id)
        .ok_or_else(|| ApiError::NotFound(format!("no cultural entity with id {id:?}")))?;
    Ok(axum::Json(entity.clone()))
}

/// GET /api/v1/entities/:id/related
pub(crate) async fn related_entities(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    if state.store.get_by_id(&id).is_none() {
        return Err(ApiError::NotFound(format!("no cultural entity with id {id:?}")));
    }
    Ok(axum::Json(serde_json::json!({ "related": state.store.get_related(&id) })))
}

/// GET /api/v1/search?q=
pub(crate) async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> axum::Json<serde_json::Value> {
    let results = if query.q.trim().is_empty() {
        Vec::new()
    } else {
        state.store.search(query.q.trim())
    };
    axum::Json(serde_json::json!({ "query": query.q, "results": results }))
}

/// GET /api/v1/fun-facts[?category=]
pub(crate) async fn fun_facts(
    State(state): State<AppState>,
    Query(query): Query<FactsQuery>,
) -> axum::Json<serde_json::Value> {
    match query.category.as_deref().filter(|c| !c.trim().is_empty()) {
        Some(category) => axum::Json(serde_json::json!({
            "category": category,
            "facts": state.facts.by_category(category),
        })),
        None => axum::Json(serde_json::json!({
            "fact": state.facts.random(),
            "categories": state.facts.categories(),
        })),
    }
}
