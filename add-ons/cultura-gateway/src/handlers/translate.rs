use super::ApiError;
use crate::AppState;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use cultura_core::{
    detect_language, supported_languages, supported_pairs, Lang, ServiceHealth, TranslationStats,
};

fn default_source() -> String {
    Lang::En.code().to_string()
}

#[derive(serde::Deserialize)]
pub(crate) struct TranslateRequest {
    text: String,
    #[serde(default = "default_source")]
    source: String,
    target: String,
}

#[derive(serde::Deserialize)]
pub(crate) struct BatchRequest {
    texts: Vec<String>,
    #[serde(default = "default_source")]
    source: String,
    target: String,
}

#[derive(serde::Deserialize)]
pub(crate) struct DetectRequest {
    text: String,
}

/// POST /api/v1/translate
pub(crate) async fn translate(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let result = state
        .translator
        .translate_detailed(&req.text, &req.source, &req.target)
        .await?;
    tracing::info!(
        target: "cultura::translation",
        method = ?result.method,
        chars = req.text.chars().count(),
        "translation served"
    );
    Ok(axum::Json(serde_json::json!({
        "original": req.text,
        "translated": result.text,
        "source": req.source,
        "target": req.target,
        "method": result.method,
        "confidence": result.confidence,
        "low_confidence": result.method.is_low_confidence(),
    })))
}

/// POST /api/v1/translate/batch
pub(crate) async fn translate_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchRequest>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    let items = state
        .translator
        .translate_batch(&req.texts, &req.source, &req.target)
        .await?;
    Ok(axum::Json(serde_json::json!({ "items": items })))
}

/// POST /api/v1/translate/detect
pub(crate) async fn detect(Json(req): Json<DetectRequest>) -> axum::Json<serde_json::Value> {
    let lang = detect_language(&req.text);
    axum::Json(serde_json::json!({ "language": lang.code(), "name": lang.name() }))
}

/// GET /api/v1/translate/stats
pub(crate) async fn stats(State(state): State<AppState>) -> axum::Json<TranslationStats> {
    axum::Json(state.translator.stats())
}

/// GET /api/v1/translate/health
pub(crate) async fn service_health(State(state): State<AppState>) -> axum::Json<ServiceHealth> {
    axum::Json(state.translator.check_service_health().await)
}

/// DELETE /api/v1/translate/cache
pub(crate) async fn clear_cache(State(state): State<AppState>) -> StatusCode {
    state.translator.clear_cache();
    StatusCode::NO_CONTENT
}

/// GET /api/v1/languages
pub(crate) async fn languages() -> axum::Json<serde_json::Value> {
    let pairs: Vec<[&str; 2]> = supported_pairs()
        .into_iter()
        .map(|(s, t)| [s.code(), t.code()])
        .collect();
    axum::Json(serde_json::json!({
        "languages": supported_languages(),
        "pairs": pairs,
    }))
}
