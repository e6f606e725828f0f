//! # API Shared
//!
//! Shared request/response types for the GUIA APIs.
//!
//! Contains:
//! - JSON DTOs with OpenAPI schemas (`dto` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and kept free of HTTP framework types.

pub mod dto;
pub mod health;

pub use dto::*;
pub use health::HealthService;
