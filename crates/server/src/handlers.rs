//! # Request Handlers
//!
//! Every client route runs that client's pipeline synchronously to completion
//! and returns its final result.

use crate::{
    errors::AppError,
    state::AppState,
    types::{ApiResponse, DebugParams, GenerateParams},
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use seocrew::{GenerationRequest, PipelineResult};
use serde_json::{json, Value};
use tracing::info;

/// The root handler.
pub async fn root() -> &'static str {
    "seocrew server is running."
}

/// The health check handler.
pub async fn health_check() -> &'static str {
    "OK"
}

/// The smoke-test route, kept for existing callers.
pub async fn teste() -> Json<Value> {
    Json(json!({ "mensagem": "Teste OK" }))
}

/// The handler for `GET /{client}` and `GET /{client}_backlink`.
///
/// Resolves the route to a client profile, builds its pipeline (one competitor
/// search) and runs every stage in order. With `?debug=true` the response also
/// carries the rendered stages, the stage transcript and the external links.
pub async fn generate_handler(
    State(app_state): State<AppState>,
    Path(route): Path<String>,
    Query(params): Query<GenerateParams>,
    Query(debug_params): Query<DebugParams>,
) -> Result<Json<ApiResponse<PipelineResult>>, AppError> {
    let profile = app_state.registry.resolve_route(&route)?;
    info!(
        route = %route,
        client = %profile.slug,
        tema = %params.tema,
        palavra_chave = %params.palavra_chave,
        "Received generation request"
    );

    let request = GenerationRequest::new(params.tema, params.palavra_chave);
    let pipeline = app_state.factory.build_pipeline(&profile, &request).await;
    let run = app_state.executor.run(&pipeline).await?;

    let debug_info = if debug_params.debug.unwrap_or(false) {
        Some(json!({
            "client": pipeline.client,
            "stages": pipeline.stages,
            "transcript": run.transcript,
            "external_links": pipeline.external_links,
            "competitor_digest": pipeline.research.digest,
        }))
    } else {
        None
    };

    Ok(Json(ApiResponse {
        debug: debug_info,
        result: run.result,
    }))
}

/// Lists the routes the server answers on, grouped by client.
pub async fn clients_handler(State(app_state): State<AppState>) -> Json<Value> {
    let clients: Vec<Value> = app_state
        .registry
        .profiles()
        .map(|p| {
            json!({
                "slug": p.slug,
                "display_name": p.display_name,
                "output": p.output,
                "routes": p.routes(),
            })
        })
        .collect();
    Json(json!({ "clients": clients }))
}
