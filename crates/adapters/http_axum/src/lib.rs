//! # lumenhub-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for transitions (`/api/transitions`) and group state
//!   (`/api/gateways/{device_id}/{device_type}/{group_id}`)
//! - Stream every applied state change over **SSE** (`/api/updates/stream`)
//! - Map HTTP requests into application service calls (driving adapter)
//! - Map domain errors onto status codes (`400`, `404`, `502`)
//!
//! ## Dependency rule
//! Depends on `lumenhub-app` (for port traits and services) and `lumenhub-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod error;
pub mod router;
pub mod state;

#[cfg(test)]
pub(crate) mod test_support;
