use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::AppConfig;
use crate::routes;
use chartpad_client::FhirGateway;
use chartpad_forms::{CompiledSchema, FormError, intake};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub gateway: Arc<FhirGateway>,
    pub intake: Arc<CompiledSchema>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, FormError> {
        let gateway = FhirGateway::with_timeout(&config.fhir.base_url, config.fhir_timeout());
        Ok(Self {
            config: Arc::new(config),
            gateway: Arc::new(gateway),
            intake: Arc::new(intake::compile_intake()?),
        })
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .route("/healthz", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn run(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.addr();
    let fhir_base = config.fhir.base_url.clone();
    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, fhir = %fhir_base, "chartpad API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
}
