use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::Instrument;
use validator::Validate;
use crate::core::{ExtractionError, Synthesizer};
use crate::error::{SearchError, QUERY_REQUIRED, QUERY_TOO_LONG};
use crate::models::{HealthResponse, SearchRequest};
use crate::services::CompletionClient;

/// Application state shared across all handlers
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub synthesizer: Arc<Synthesizer>,
    pub completion: Arc<CompletionClient>,
    pub max_query_chars: usize,
}

impl AppState {
    pub fn new(synthesizer: Synthesizer, completion: CompletionClient, max_query_chars: usize) -> Self {
        Self {
            synthesizer: Arc::new(synthesizer),
            completion: Arc::new(completion),
            max_query_chars,
        }
    }
}

/// Configure root-level routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .configure(configure_search);
}

/// Configure the search route alone
pub fn configure_search(cfg: &mut web::ServiceConfig) {
    cfg.route("/search", web::post().to(search));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Search endpoint
///
/// POST /search
///
/// Request body:
/// ```json
/// { "query": "string" }
/// ```
///
/// Responds with the model's synthesized array, a 400 when the query is
/// missing or empty, or a generic 500 for any downstream failure.
async fn search(
    state: web::Data<AppState>,
    req: web::Json<SearchRequest>,
) -> Result<HttpResponse, SearchError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("search", %request_id);

    run_search(&state, &req).instrument(span).await
}

async fn run_search(state: &AppState, req: &SearchRequest) -> Result<HttpResponse, SearchError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: {}", errors);
        return Err(SearchError::Validation(QUERY_REQUIRED));
    }

    let query = req.query().ok_or_else(|| {
        tracing::info!("Rejecting search request without a query");
        SearchError::Validation(QUERY_REQUIRED)
    })?;

    let query_chars = query.chars().count();
    if query_chars > state.max_query_chars {
        tracing::info!("Rejecting query of {} chars (max {})", query_chars, state.max_query_chars);
        return Err(SearchError::Validation(QUERY_TOO_LONG));
    }

    tracing::info!("Search received (query: {} chars)", query_chars);
    tracing::debug!("Search query: {:?}", query);

    let prompt = state.synthesizer.build_prompt(query);

    let raw = match state
        .completion
        .complete(state.synthesizer.system_prompt(), &prompt)
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!("Completion call to {} failed: {}", state.completion.endpoint(), e);
            return Err(e.into());
        }
    };

    let synthesis = match state.synthesizer.interpret(&raw) {
        Ok(synthesis) => synthesis,
        Err(e) => {
            match &e {
                ExtractionError::NoJsonSpan => {
                    tracing::error!(raw = %raw, "Model response did not contain parseable JSON")
                }
                _ => tracing::error!(raw = %raw, "Model response rejected: {}", e),
            }
            return Err(e.into());
        }
    };

    tracing::info!("Returning {} synthesized results", synthesis.count);

    Ok(HttpResponse::Ok().json(synthesis.items))
}
