//! HTTP server for the companion backend.
//!
//! # Endpoints
//!
//! - `GET  /health`: Liveness probe
//! - `POST /chat`: One conversational turn
//! - `POST /analyze`: Message analysis without generation
//! - `GET  /resources/:category`: Emergency resources

pub mod routes;

pub use routes::{app_router, AppState};
