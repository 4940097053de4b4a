//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Services own validation, persistence and delivery so route handlers stay
//! focused on request parsing and status mapping.

pub mod catalog;
pub mod contact;
pub mod model_asset;
pub mod notify;
pub mod project;
pub mod upload;
