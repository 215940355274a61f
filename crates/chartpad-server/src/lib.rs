//! HTTP API surface for the chartpad clinical data-entry application.
//!
//! A thin proxy in front of the external clinical-data server: patient
//! listing/search, single reads, and create/update with intake-form
//! validation applied before anything is forwarded.

pub mod config;
pub mod error;
pub mod observability;
pub mod routes;
pub mod server;

pub use config::AppConfig;
pub use error::ApiError;
pub use server::{AppState, build_router, run};
