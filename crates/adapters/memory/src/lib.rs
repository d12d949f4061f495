//! # lumenhub-adapter-memory
//!
//! In-memory implementation of the `GroupStateCoordinator` port.
//!
//! ## Responsibilities
//! - Keep the canonical state of every group in a `RwLock`-protected map
//! - Propagate updates between a group and its group 0
//! - Publish one [`StateChange`] per affected group through the injected
//!   `EventPublisher`, so transports see every intermediate value
//!
//! State lives for the lifetime of the process only.
//!
//! [`StateChange`]: lumenhub_domain::event::StateChange

mod group_state;

pub use group_state::InMemoryGroupStateStore;
