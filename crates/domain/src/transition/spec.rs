//! Validated transition specifications, ready to be turned into plans.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ValidationError;
use crate::field::GroupStateField;
use crate::id::BulbId;
use crate::state::GroupUpdate;

use super::timing::Timing;

/// Registry slot a plan occupies for its bulb.
///
/// `level` and `brightness` share the `brightness` slot, `kelvin` and
/// `color_temp` share `color_temp`: a newer plan for either replaces the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKey {
    Field(GroupStateField),
    Color,
}

impl std::fmt::Display for PlanKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(field) => field.fmt(f),
            Self::Color => f.write_str("color"),
        }
    }
}

/// What a transition moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionTarget {
    /// A numeric field, with endpoints in the field's user-facing units.
    Field {
        field: GroupStateField,
        start: u16,
        end: u16,
    },
    Color {
        start: Rgb,
        end: Rgb,
    },
}

/// A fully specified transition for one bulb.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionSpec {
    pub bulb: BulbId,
    pub target: TransitionTarget,
    pub timing: Timing,
    /// Update merged into the final tick (e.g. `status: OFF` at the end of a fade-out).
    pub on_finish: Option<GroupUpdate>,
}

impl TransitionSpec {
    /// Numeric field transition.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotTransitionable`] for non-numeric fields and
    /// [`ValidationError::OutOfRange`] when an endpoint lies outside the field's range.
    pub fn field(
        bulb: BulbId,
        field: GroupStateField,
        start: u16,
        end: u16,
        timing: Timing,
    ) -> Result<Self, ValidationError> {
        let spec = Self {
            bulb,
            target: TransitionTarget::Field { field, start, end },
            timing,
            on_finish: None,
        };
        spec.validate()?;
        Ok(spec)
    }

    #[must_use]
    pub fn color(bulb: BulbId, start: Rgb, end: Rgb, timing: Timing) -> Self {
        Self {
            bulb,
            target: TransitionTarget::Color { start, end },
            timing,
            on_finish: None,
        }
    }

    /// Apply `update` together with the final value.
    #[must_use]
    pub fn then_apply(mut self, update: GroupUpdate) -> Self {
        self.on_finish = Some(update);
        self
    }

    #[must_use]
    pub fn key(&self) -> PlanKey {
        match self.target {
            TransitionTarget::Field { field, .. } => PlanKey::Field(field.internal()),
            TransitionTarget::Color { .. } => PlanKey::Color,
        }
    }

    /// Re-check invariants of a spec built by hand.
    ///
    /// # Errors
    ///
    /// See [`TransitionSpec::field`]; timing values of zero are rejected too.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timing.period_ms == 0 || self.timing.num_periods == 0 {
            return Err(ValidationError::InvalidTiming(
                "period and period count must be at least one",
            ));
        }
        if let TransitionTarget::Field { field, start, end } = self.target {
            field.check_value(i64::from(start))?;
            field.check_value(i64::from(end))?;
        }
        Ok(())
    }
}
