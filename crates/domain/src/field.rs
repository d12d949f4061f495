//! The closed set of light attributes a group exposes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::units::{
    BRIGHTNESS_MAX, COLOR_TEMP_MAX_MIREDS, COLOR_TEMP_MIN_MIREDS, KELVIN_MAX, LEVEL_MAX, UnitCodec,
};

/// A single attribute of a light group.
///
/// `level` and `kelvin` are user-facing views of `brightness` and
/// `color_temp`; they share an internal field (and therefore a scheduler
/// slot) with the attribute they are computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStateField {
    Status,
    Brightness,
    Level,
    Hue,
    Saturation,
    Kelvin,
    ColorTemp,
    Color,
}

impl GroupStateField {
    /// Every field, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Status,
        Self::Brightness,
        Self::Level,
        Self::Hue,
        Self::Saturation,
        Self::Kelvin,
        Self::ColorTemp,
        Self::Color,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Brightness => "brightness",
            Self::Level => "level",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Kelvin => "kelvin",
            Self::ColorTemp => "color_temp",
            Self::Color => "color",
        }
    }

    #[must_use]
    pub fn codec(self) -> UnitCodec {
        match self {
            Self::Level => UnitCodec::LevelToBrightness,
            Self::Kelvin => UnitCodec::KelvinToMireds,
            _ => UnitCodec::Identity,
        }
    }

    /// The field a transition of `self` is computed and emitted on.
    #[must_use]
    pub fn internal(self) -> Self {
        match self {
            Self::Level => Self::Brightness,
            Self::Kelvin => Self::ColorTemp,
            other => other,
        }
    }

    /// Inclusive user-facing range of a numeric field.
    #[must_use]
    pub fn range(self) -> Option<(u16, u16)> {
        match self {
            Self::Brightness => Some((0, BRIGHTNESS_MAX)),
            Self::Level => Some((0, LEVEL_MAX)),
            Self::Hue => Some((0, 359)),
            Self::Saturation => Some((0, 100)),
            Self::Kelvin => Some((0, KELVIN_MAX)),
            Self::ColorTemp => Some((COLOR_TEMP_MIN_MIREDS, COLOR_TEMP_MAX_MIREDS)),
            Self::Status | Self::Color => None,
        }
    }

    /// Value assumed when the group has no recorded state for this field.
    #[must_use]
    pub fn default_value(self) -> u16 {
        match self {
            Self::Brightness => BRIGHTNESS_MAX,
            Self::Level | Self::Saturation => 100,
            Self::ColorTemp => COLOR_TEMP_MAX_MIREDS,
            Self::Hue | Self::Kelvin | Self::Status | Self::Color => 0,
        }
    }

    /// Check that `value` lies in this field's user-facing range.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotTransitionable`] for non-numeric fields and
    /// [`ValidationError::OutOfRange`] when `value` is outside the range.
    pub fn check_value(self, value: i64) -> Result<u16, ValidationError> {
        let (min, max) = self
            .range()
            .ok_or(ValidationError::NotTransitionable(self))?;
        u16::try_from(value)
            .ok()
            .filter(|v| (min..=max).contains(v))
            .ok_or(ValidationError::OutOfRange {
                field: self,
                value,
                min,
                max,
            })
    }
}

impl fmt::Display for GroupStateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GroupStateField {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "status" | "state" => Ok(Self::Status),
            "brightness" => Ok(Self::Brightness),
            "level" => Ok(Self::Level),
            "hue" => Ok(Self::Hue),
            "saturation" => Ok(Self::Saturation),
            "kelvin" | "temperature" => Ok(Self::Kelvin),
            "color_temp" => Ok(Self::ColorTemp),
            "color" => Ok(Self::Color),
            other => Err(ValidationError::UnknownField(other.to_string())),
        }
    }
}
