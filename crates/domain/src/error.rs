//! Common error types used across the workspace.
//!
//! Each layer converts into [`LumenHubError`] via `#[from]`; adapters map the
//! variants onto their own transport (HTTP status codes, log levels, …).

use crate::field::GroupStateField;

/// Top-level error shared by every crate in the workspace.
#[derive(Debug, thiserror::Error)]
pub enum LumenHubError {
    /// The request was malformed; nothing was changed.
    #[error("validation error")]
    Validation(#[from] ValidationError),

    /// The referenced resource does not exist (or is no longer active).
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// The group state coordinator failed to apply an update.
    #[error("apply error")]
    Apply(#[from] ApplyError),
}

/// Reasons a request can be rejected before anything is scheduled.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("field is required")]
    MissingField,

    #[error("end_value is required")]
    MissingEndValue,

    #[error("unknown field `{0}`")]
    UnknownField(String),

    #[error("field `{0}` cannot be transitioned")]
    NotTransitionable(GroupStateField),

    #[error("value {value} is outside the range of `{field}` ({min}..={max})")]
    OutOfRange {
        field: GroupStateField,
        value: i64,
        min: u16,
        max: u16,
    },

    #[error("invalid color `{0}`, expected `r,g,b` or an object with r, g and b")]
    InvalidColor(String),

    #[error("invalid value for `{0}`")]
    InvalidValue(GroupStateField),

    #[error("invalid timing: {0}")]
    InvalidTiming(&'static str),

    #[error("invalid device id `{0}`, expected a decimal or 0x-prefixed hex number")]
    InvalidDeviceId(String),

    #[error("unknown device type `{0}`")]
    InvalidDeviceType(String),

    #[error("invalid transition id `{0}`")]
    InvalidTransitionId(String),
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{entity} `{id}` not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Failure reported by the downstream group state coordinator.
#[derive(Debug, thiserror::Error)]
#[error("failed to apply update to {bulb}: {reason}")]
pub struct ApplyError {
    pub bulb: String,
    pub reason: String,
}
