//! # lumenhub-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `GroupStateCoordinator`: apply partial updates to canonical group state
//!   - `EventPublisher`: fan out applied state changes
//! - Run transitions: `TransitionScheduler` owns one timer task per active plan
//! - Define **driving/inbound** use-cases: `LightService`: state updates,
//!   the on/off fade policy, explicit transition requests
//! - Provide **in-process infrastructure** (event bus) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `lumenhub-domain` only (plus `tokio` for tasks, timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod ports;
pub mod services;
pub mod transition_scheduler;

#[cfg(test)]
pub(crate) mod test_support;
