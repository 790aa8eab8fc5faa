//! Axum-based API Gateway for CULTURA. Config-driven via CoreConfig.

mod handlers;

use axum::http::Method;
use axum::{
    routing::{delete, get, post},
    Router,
};
use cultura_core::{
    ChatOrchestrator, ChatResolver, ConfigurationError, CoreConfig, CulturalStore, FunFacts,
    RegionAtlas, TranslationResolver,
};
use cultura_skills::{BhashiniClient, ModelRouter, MyMemoryLookup};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handlers::{chat, knowledge, regions, translate};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) config: Arc<CoreConfig>,
    pub(crate) store: Arc<CulturalStore>,
    pub(crate) facts: Arc<FunFacts>,
    pub(crate) atlas: Arc<RegionAtlas>,
    pub(crate) translator: Arc<TranslationResolver>,
    pub(crate) chat: Arc<ChatOrchestrator>,
}

fn load_store(config: &CoreConfig) -> Result<CulturalStore, ConfigurationError> {
    match config.data_path.as_deref().filter(|p| !p.trim().is_empty()) {
        Some(path) => CulturalStore::from_path(path),
        None => CulturalStore::bundled(),
    }
}

/// Wires the store, resolvers and remote clients described by `config`.
fn build_state(config: CoreConfig) -> Result<AppState, ConfigurationError> {
    let store = load_store(&config)?;
    let facts = FunFacts::bundled()?;
    let atlas = RegionAtlas::bundled()?;

    let bhashini = BhashiniClient::new(&config.services, &config.retry);
    let mut translator =
        TranslationResolver::new(config.cache.clone()).with_remote(Arc::new(bhashini));
    if let Some(lookup) = MyMemoryLookup::from_settings(&config.services, &config.retry) {
        translator = translator.with_public_lookup(Arc::new(lookup));
    }

    let resolver = Arc::new(ChatResolver::from_store(&store, config.scoring.clone()));
    let router = ModelRouter::new(&config.llm);
    tracing::info!(
        target: "cultura::chat",
        mode = ?router.mode(),
        remote_model = router.is_available(),
        "chat orchestrator ready"
    );
    let chat = ChatOrchestrator::new(resolver)
        .with_settings(&config.llm)
        .with_backend(Arc::new(router));

    Ok(AppState {
        config: Arc::new(config),
        store: Arc::new(store),
        facts: Arc::new(facts),
        atlas: Arc::new(atlas),
        translator: Arc::new(translator),
        chat: Arc::new(chat),
    })
}

/// Pre-flight check: config loads, dataset is valid, port is free.
fn run_verify() -> Result<(), String> {
    let config = CoreConfig::load().map_err(|e| format!("Config load failed: {}", e))?;

    print!("Checking cultural dataset... ");
    let store = load_store(&config).map_err(|e| format!("dataset invalid: {}", e))?;
    println!("OK ({} entities)", store.len());

    print!("Checking fun facts... ");
    let facts = FunFacts::bundled().map_err(|e| format!("fun facts invalid: {}", e))?;
    println!("OK ({} facts)", facts.all().len());

    print!("Checking region atlas... ");
    let atlas = RegionAtlas::bundled().map_err(|e| format!("region atlas invalid: {}", e))?;
    println!("OK ({} states, {} markers)", atlas.states().len(), atlas.markers().len());

    print!("Checking credentials... ");
    let bhashini = if config.services.bhashini_credentials().is_some() { "set" } else { "missing" };
    let anthropic = if config.llm.api_key.is_some() { "set" } else { "missing" };
    println!("BHASHINI {}, Anthropic {}", bhashini, anthropic);

    let port = config.port;
    print!("Checking port {}... ", port);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    match std::net::TcpListener::bind(addr) {
        Ok(listener) => {
            drop(listener);
            println!("OK (available)");
        }
        Err(e) => {
            return Err(format!("Port {} BLOCKED: {}", port, e));
        }
    }

    println!("\n✅ SUCCESS: All systems GO. Ready to start gateway.");
    Ok(())
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env::var calls)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("[cultura-gateway] .env not loaded: {} (using system environment)", e);
    }

    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--verify") {
        match run_verify() {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                eprintln!("❌ PRE-FLIGHT FAILED: {}", e);
                std::process::exit(1);
            }
        }
    }

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = match CoreConfig::load().and_then(build_state) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("startup failed: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(
        target: "cultura::knowledge",
        entities = state.store.len(),
        facts = state.facts.all().len(),
        states = state.atlas.states().len(),
        "cultural data loaded"
    );

    let port = state.config.port;
    let app_name = state.config.app_name.clone();
    let app = build_app(state);

    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("cannot bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    tracing::info!("{} listening on {}", app_name, addr);
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
    }
}

fn build_app(state: AppState) -> Router {
    // CORS: allow Backend/API (8001-8099) and Frontend/UI (3001-3099, 5173-5179) port ranges.
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin: &axum::http::HeaderValue, _| {
            let s = origin.to_str().unwrap_or("");
            let port = s
                .split(':')
                .last()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(0);
            (3001..=3099).contains(&port)
                || (5173..=5179).contains(&port)
                || (8001..=8099).contains(&port)
        }))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/translate", post(translate::translate))
        .route("/api/v1/translate/batch", post(translate::translate_batch))
        .route("/api/v1/translate/detect", post(translate::detect))
        .route("/api/v1/translate/stats", get(translate::stats))
        .route("/api/v1/translate/health", get(translate::service_health))
        .route("/api/v1/translate/cache", delete(translate::clear_cache))
        .route("/api/v1/languages", get(translate::languages))
        .route("/api/v1/chat", post(chat::chat))
        .route("/api/v1/chat/transcript", get(chat::transcript))
        .route("/api/v1/chat/samples", get(chat::samples))
        .route("/api/v1/topics", get(chat::topics))
        .route("/api/v1/entities", get(knowledge::list_entities))
        .route("/api/v1/entities/:id", get(knowledge::get_entity))
        .route("/api/v1/entities/:id/related", get(knowledge::related_entities))
        .route("/api/v1/search", get(knowledge::search))
        .route("/api/v1/fun-facts", get(knowledge::fun_facts))
        .route("/api/v1/states", get(regions::list_states))
        .route("/api/v1/states/:id", get(regions::get_state))
        .route("/api/v1/markers", get(regions::markers))
        .route("/api/v1/bounds", get(regions::bounds))
        .route("/api/v1/statistics", get(regions::statistics))
        .route("/api/v1/geojson", get(regions::geojson))
        .with_state(state)
        .layer(cors)
}

/// GET /api/v1/health – liveness check for UI and scripts.
async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "app_name": state.config.app_name,
        "entities": state.store.len(),
        "chat_state": state.chat.state(),
    }))
}
