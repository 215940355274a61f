pub mod patients;

use axum::Router;
use axum::routing::get;

use crate::server::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/patients",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/api/patients/{id}",
            get(patients::read_patient).put(patients::update_patient),
        )
}
