//! Urbanwatch Gateway HTTP API Server
//!
//! Axum surface for the analyze pipeline, the marker collection, and the
//! report artifacts.

pub mod analyze;
pub mod api_error;
pub mod markers_api;
pub mod reports;
pub mod server;

#[cfg(test)]
pub(crate) mod test_support;

pub use api_error::ApiError;
pub use server::{build_router, AppState};
