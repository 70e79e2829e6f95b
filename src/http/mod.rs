//! HTTP server module
//!
//! This module handles HTTP request routing and handling:
//! - Axum router with the metadata and service endpoints
//! - Request handlers and JSON error bodies
//! - Request logging middleware
//! - CORS middleware

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
