//! HTTP binding for the prediction service.
//!
//! # Endpoints
//!
//! - `GET  /health`  - Liveness probe with model availability
//! - `POST /predict` - Predict an emotion and cite a verse

pub mod routes;

pub use routes::{app_router, serve, AppState};
