//! # lumenhub-domain
//!
//! Pure domain model for the lumenhub light hub.
//!
//! ## Responsibilities
//! - Foundational types: bulb identifiers, transition ids, error conventions, timestamps
//! - Define **group state** (the canonical per-bulb light state) and partial updates
//! - Define the closed set of **fields** a light exposes and their unit codecs
//! - Convert between RGB and hue/saturation
//! - Generate linear **step sequences** and build **transition plans** from requests
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or IO crates.
//! Timers, registries and delivery live in the `app` crate.

pub mod error;
pub mod id;
pub mod time;

pub mod color;
pub mod command;
pub mod event;
pub mod field;
pub mod state;
pub mod step;
pub mod transition;
pub mod units;
