//! HTTP server for the AI tutor.
//!
//! # Endpoints
//!
//! - `GET    /`           - Service banner
//! - `GET    /health`     - Liveness check
//! - `POST   /query`      - Answer a question
//! - `POST   /chat`       - Answer a chat message
//! - `DELETE /chat/clear` - Acknowledge a history reset

pub mod routes;

pub use routes::{app_router, AppState, DEGRADED_HEADER};
