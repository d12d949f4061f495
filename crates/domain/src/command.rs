//! State commands: what a client sends to change a group's state.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::ValidationError;
use crate::field::GroupStateField;
use crate::state::{BulbStatus, GroupUpdate};
use crate::transition::TimingHint;

/// A state change request for one group.
///
/// Without `transition` every field is applied at once. With it, numeric
/// fields and the color move gradually and `status` follows the on/off fade
/// rules.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateCommand {
    #[serde(default, alias = "state", skip_serializing_if = "Option::is_none")]
    pub status: Option<BulbStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kelvin: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Transition duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<f64>,
    /// Transition period in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u64>,
}

impl StateCommand {
    #[must_use]
    pub fn status(status: BulbStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Request a transition of `seconds` for every field of this command.
    #[must_use]
    pub fn with_transition(mut self, seconds: f64) -> Self {
        self.transition = Some(seconds);
        self
    }

    /// Timing hints, when the command asks for a transition.
    #[must_use]
    pub fn timing(&self) -> Option<TimingHint> {
        self.transition
            .map(|seconds| TimingHint::with_duration(seconds).period(self.period))
    }

    /// Validated numeric targets, in user-facing units.
    ///
    /// `brightness` wins over `level` and `color_temp` over `kelvin` when
    /// both are given, so each internal field appears at most once.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] for any value outside its field's range.
    pub fn targets(&self) -> Result<Vec<(GroupStateField, u16)>, ValidationError> {
        let candidates = [
            (GroupStateField::Brightness, self.brightness),
            (GroupStateField::Level, self.level.filter(|_| self.brightness.is_none())),
            (GroupStateField::Hue, self.hue),
            (GroupStateField::Saturation, self.saturation),
            (GroupStateField::ColorTemp, self.color_temp),
            (GroupStateField::Kelvin, self.kelvin.filter(|_| self.color_temp.is_none())),
        ];
        candidates
            .into_iter()
            .filter_map(|(field, value)| value.map(|value| (field, value)))
            .map(|(field, value)| Ok((field, field.check_value(value)?)))
            .collect()
    }

    /// Internal brightness requested by this command, if any.
    ///
    /// # Errors
    ///
    /// See [`StateCommand::targets`].
    pub fn brightness_target(&self) -> Result<Option<u16>, ValidationError> {
        Ok(self
            .targets()?
            .into_iter()
            .find(|(field, _)| field.internal() == GroupStateField::Brightness)
            .map(|(field, value)| field.codec().to_internal(value)))
    }

    /// The whole command as one immediate update on internal scales.
    ///
    /// `color` sets hue and saturation; explicit `hue`/`saturation` take
    /// precedence over it.
    ///
    /// # Errors
    ///
    /// See [`StateCommand::targets`].
    pub fn to_update(&self) -> Result<GroupUpdate, ValidationError> {
        let mut update = GroupUpdate {
            status: self.status,
            ..GroupUpdate::default()
        };
        if let Some(color) = self.color {
            update = update.merge(GroupUpdate::hue_saturation(color.to_hue_saturation()));
        }
        for (field, value) in self.targets()? {
            let internal = field.codec().to_internal(value);
            update = update.merge(GroupUpdate::internal_value(field, internal));
        }
        Ok(update)
    }

    /// Whether the command carries anything besides timing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.color.is_none()
            && [
                self.brightness,
                self.level,
                self.hue,
                self.saturation,
                self.kelvin,
                self.color_temp,
            ]
            .iter()
            .all(Option::is_none)
    }
}
