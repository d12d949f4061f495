//! Identifiers: bulb addresses and transition ids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Process-lifetime unique identifier of a transition.
///
/// Ids are handed out monotonically by the scheduler and are never reused
/// while the process runs. They are not persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransitionId(u64);

impl TransitionId {
    #[must_use]
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TransitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TransitionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .map(Self)
            .map_err(|_| ValidationError::InvalidTransitionId(s.to_string()))
    }
}

/// Remote/bulb protocol family a group belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    Rgbw,
    Cct,
    RgbCct,
    Rgb,
    Fut089,
    Fut091,
    Fut020,
}

impl DeviceType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rgbw => "rgbw",
            Self::Cct => "cct",
            Self::RgbCct => "rgb_cct",
            Self::Rgb => "rgb",
            Self::Fut089 => "fut089",
            Self::Fut091 => "fut091",
            Self::Fut020 => "fut020",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rgbw" => Ok(Self::Rgbw),
            "cct" => Ok(Self::Cct),
            "rgb_cct" => Ok(Self::RgbCct),
            "rgb" => Ok(Self::Rgb),
            "fut089" => Ok(Self::Fut089),
            "fut091" => Ok(Self::Fut091),
            "fut020" => Ok(Self::Fut020),
            _ => Err(ValidationError::InvalidDeviceType(s.to_string())),
        }
    }
}

/// Address of a light group: remote device id, group number and protocol.
///
/// Group `0` is the aggregate of every group on the same device id and type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BulbId {
    pub device_id: u16,
    pub group_id: u8,
    pub device_type: DeviceType,
}

impl BulbId {
    #[must_use]
    pub fn new(device_id: u16, group_id: u8, device_type: DeviceType) -> Self {
        Self {
            device_id,
            group_id,
            device_type,
        }
    }

    /// Build an id from path segments; `device_id` may be decimal or `0x` hex.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDeviceId`] or
    /// [`ValidationError::InvalidDeviceType`] when a segment does not parse.
    pub fn parse(device_id: &str, device_type: &str, group_id: u8) -> Result<Self, ValidationError> {
        let trimmed = device_id.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex) => u16::from_str_radix(hex, 16),
            None => trimmed.parse(),
        };
        let device_id = parsed.map_err(|_| ValidationError::InvalidDeviceId(device_id.to_string()))?;
        Ok(Self::new(device_id, group_id, device_type.parse()?))
    }

    /// The aggregate group sharing this bulb's device id and type.
    #[must_use]
    pub fn group_zero(self) -> Self {
        Self {
            group_id: 0,
            ..self
        }
    }

    #[must_use]
    pub fn is_group_zero(self) -> bool {
        self.group_id == 0
    }

    /// Whether `other` is a member group of the same remote (same device id and type).
    #[must_use]
    pub fn same_remote(self, other: Self) -> bool {
        self.device_id == other.device_id && self.device_type == other.device_type
    }
}

impl fmt::Display for BulbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:#06X}/{}/{}",
            self.device_id, self.device_type, self.group_id
        )
    }
}
