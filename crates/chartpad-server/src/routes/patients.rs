//! Patient registration, edit and listing endpoints.
//!
//! Thin proxy over the clinical-data server: listing re-shapes searchset
//! bundles into pages, create/update run the intake-form validation before
//! anything is forwarded.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::error::ApiError;
use crate::server::AppState;
use chartpad_core::PatientRecord;
use chartpad_forms::intake;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub id: Option<String>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct PatientPage {
    pub patients: Vec<Value>,
    pub total: u64,
    pub page: usize,
    #[serde(rename = "pageSize")]
    pub page_size: usize,
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

/// GET /api/patients
///
/// With `?id=` fetches that single patient; otherwise lists patients,
/// newest first, filtered by `?search=` and paged by `?page=&pageSize=`.
pub async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    if let Some(id) = &query.id {
        let patient = state.gateway.patient(id).await?;
        return Ok(Json(patient));
    }

    let page_size = query
        .page_size
        .unwrap_or(state.config.search.default_page_size)
        .clamp(1, state.config.search.max_page_size);

    let search = state
        .gateway
        .search_patients(&query.search, query.page, page_size)
        .await?;

    let page = PatientPage {
        total_pages: search.total.div_ceil(page_size as u64),
        patients: search.resources,
        total: search.total,
        page: query.page,
        page_size,
    };
    Ok(Json(serde_json::to_value(page).map_err(|e| {
        ApiError::internal(format!("failed to encode page: {e}"))
    })?))
}

/// GET /api/patients/{id}
pub async fn read_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let patient = state.gateway.patient(&id).await?;
    Ok(Json(patient))
}

/// POST /api/patients
///
/// Validates the submission with the intake schema, then forwards it.
pub async fn create_patient(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate_intake(&state, &payload)?;
    let created = state.gateway.create_patient(&payload).await?;
    info!(
        id = created.get("id").and_then(|v| v.as_str()).unwrap_or(""),
        "patient created"
    );
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/patients/{id}
///
/// Validates like create; the path id wins over any id in the payload.
pub async fn update_patient(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    validate_intake(&state, &payload)?;
    let updated = state.gateway.update_patient(&id, &payload).await?;
    info!(id = %id, "patient updated");
    Ok(Json(updated))
}

/// Re-check a FHIR-shaped submission with the same rules the intake form
/// enforces client-side.
fn validate_intake(state: &AppState, payload: &Value) -> Result<(), ApiError> {
    match payload.get("resourceType").and_then(|v| v.as_str()) {
        Some("Patient") => {}
        Some(other) => {
            return Err(ApiError::bad_request(format!(
                "Expected resourceType 'Patient', got '{other}'"
            )));
        }
        None => return Err(ApiError::bad_request("Missing resourceType")),
    }

    let record = PatientRecord::from_fhir(payload);
    state.intake.validate(&intake::intake_data(&record))?;
    Ok(())
}
