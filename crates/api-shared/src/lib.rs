//! # API Shared
//!
//! Shared utilities and definitions for the patient management APIs.
//!
//! Contains:
//! - Wire response types (`MessageRes`, `ErrorRes`, `HealthRes`)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and the server binary.

pub mod health;
pub mod responses;

pub use health::HealthService;
pub use responses::{ErrorRes, HealthRes, MessageRes};

/// Banner returned by `GET /`.
pub const SERVICE_BANNER: &str = "Patients Management System API";

/// Description returned by `GET /about`.
pub const SERVICE_ABOUT: &str = "A fully functional Patients Management System API";
