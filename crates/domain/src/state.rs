//! Group state: the canonical per-bulb light state, and partial updates to it.

use serde::{Deserialize, Serialize};

use crate::color::{HueSaturation, Rgb};
use crate::field::GroupStateField;

/// On/off status of a light group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BulbStatus {
    #[serde(alias = "on", alias = "On")]
    On,
    #[serde(alias = "off", alias = "Off")]
    Off,
}

impl std::fmt::Display for BulbStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::On => f.write_str("ON"),
            Self::Off => f.write_str("OFF"),
        }
    }
}

/// A partial update to a group's state: only the `Some` fields are written.
///
/// Values are always on the internal scales (`brightness` 0–255,
/// `color_temp` in mireds).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BulbStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hue: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_temp: Option<u16>,
}

impl GroupUpdate {
    #[must_use]
    pub fn status(status: BulbStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn brightness(brightness: u8) -> Self {
        Self {
            brightness: Some(brightness),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn hue_saturation(hs: HueSaturation) -> Self {
        Self {
            hue: Some(hs.hue),
            saturation: Some(hs.saturation),
            ..Self::default()
        }
    }

    /// Update writing `value` to the internal field behind `field`.
    ///
    /// `value` is expected on the internal scale; `level`/`kelvin` write
    /// `brightness`/`color_temp`. Status and color are not numeric and yield
    /// an empty update.
    #[must_use]
    pub fn internal_value(field: GroupStateField, value: u16) -> Self {
        let mut update = Self::default();
        match field.internal() {
            GroupStateField::Brightness => {
                update.brightness = Some(u8::try_from(value).unwrap_or(u8::MAX));
            }
            GroupStateField::Hue => update.hue = Some(value),
            GroupStateField::Saturation => {
                update.saturation = Some(u8::try_from(value).unwrap_or(u8::MAX));
            }
            GroupStateField::ColorTemp => update.color_temp = Some(value),
            _ => {}
        }
        update
    }

    /// Overlay `other` on top of `self`; fields set in `other` win.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            status: other.status.or(self.status),
            brightness: other.brightness.or(self.brightness),
            hue: other.hue.or(self.hue),
            saturation: other.saturation.or(self.saturation),
            color_temp: other.color_temp.or(self.color_temp),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Internal fields written by this update.
    #[must_use]
    pub fn fields(&self) -> Vec<GroupStateField> {
        [
            (self.status.is_some(), GroupStateField::Status),
            (self.brightness.is_some(), GroupStateField::Brightness),
            (self.hue.is_some(), GroupStateField::Hue),
            (self.saturation.is_some(), GroupStateField::Saturation),
            (self.color_temp.is_some(), GroupStateField::ColorTemp),
        ]
        .into_iter()
        .filter_map(|(set, field)| set.then_some(field))
        .collect()
    }
}

/// Last known state of one light group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupState {
    pub status: Option<BulbStatus>,
    pub brightness: Option<u8>,
    pub hue: Option<u16>,
    pub saturation: Option<u8>,
    pub color_temp: Option<u16>,
}

impl GroupState {
    /// Write every field set in `update` (last writer wins per field).
    pub fn apply(&mut self, update: &GroupUpdate) {
        if let Some(status) = update.status {
            self.status = Some(status);
        }
        if let Some(brightness) = update.brightness {
            self.brightness = Some(brightness);
        }
        if let Some(hue) = update.hue {
            self.hue = Some(hue);
        }
        if let Some(saturation) = update.saturation {
            self.saturation = Some(saturation);
        }
        if let Some(color_temp) = update.color_temp {
            self.color_temp = Some(color_temp);
        }
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.status == Some(BulbStatus::On)
    }

    /// Recorded value of a numeric field, in that field's user-facing units.
    #[must_use]
    pub fn value(&self, field: GroupStateField) -> Option<u16> {
        let internal = match field.internal() {
            GroupStateField::Brightness => self.brightness.map(u16::from),
            GroupStateField::Hue => self.hue,
            GroupStateField::Saturation => self.saturation.map(u16::from),
            GroupStateField::ColorTemp => self.color_temp,
            _ => None,
        }?;
        Some(field.codec().to_external(internal))
    }

    /// Recorded value, or the field's default when nothing is known.
    #[must_use]
    pub fn value_or_default(&self, field: GroupStateField) -> u16 {
        self.value(field).unwrap_or_else(|| field.default_value())
    }

    /// Current color as a fully bright RGB triple, if hue is known.
    #[must_use]
    pub fn color(&self) -> Option<Rgb> {
        let hue = self.hue?;
        Some(Rgb::from_hue_saturation(HueSaturation {
            hue,
            saturation: self.saturation.unwrap_or(100),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_only_overwrite_fields_present_in_update() {
        let mut state = GroupState {
            status: Some(BulbStatus::On),
            brightness: Some(10),
            hue: Some(40),
            ..GroupState::default()
        };
        state.apply(&GroupUpdate::brightness(200));
        assert_eq!(state.brightness, Some(200));
        assert_eq!(state.hue, Some(40));
        assert!(state.is_on());
    }

    #[test]
    fn should_report_level_from_stored_brightness() {
        let state = GroupState {
            brightness: Some(128),
            ..GroupState::default()
        };
        assert_eq!(state.value(GroupStateField::Level), Some(50));
        assert_eq!(state.value(GroupStateField::Brightness), Some(128));
    }

    #[test]
    fn should_report_kelvin_from_stored_mireds() {
        let state = GroupState {
            color_temp: Some(153),
            ..GroupState::default()
        };
        assert_eq!(state.value(GroupStateField::Kelvin), Some(100));
    }

    #[test]
    fn should_fall_back_to_field_default_when_unknown() {
        let state = GroupState::default();
        assert_eq!(state.value(GroupStateField::Hue), None);
        assert_eq!(state.value_or_default(GroupStateField::Brightness), 255);
    }

    #[test]
    fn should_write_internal_field_for_user_facing_field() {
        let update = GroupUpdate::internal_value(GroupStateField::Level, 128);
        assert_eq!(update, GroupUpdate::brightness(128));

        let update = GroupUpdate::internal_value(GroupStateField::Kelvin, 200);
        assert_eq!(update.color_temp, Some(200));
    }

    #[test]
    fn should_let_later_update_win_when_merging() {
        let merged = GroupUpdate::brightness(10).merge(GroupUpdate {
            brightness: Some(0),
            status: Some(BulbStatus::Off),
            ..GroupUpdate::default()
        });
        assert_eq!(merged.brightness, Some(0));
        assert_eq!(merged.status, Some(BulbStatus::Off));
    }

    #[test]
    fn should_list_written_fields() {
        let update = GroupUpdate {
            status: Some(BulbStatus::On),
            brightness: Some(0),
            ..GroupUpdate::default()
        };
        assert_eq!(
            update.fields(),
            vec![GroupStateField::Status, GroupStateField::Brightness]
        );
        assert!(GroupUpdate::default().is_empty());
    }

    #[test]
    fn should_serialize_update_without_unset_fields() {
        let json = serde_json::to_string(&GroupUpdate::hue_saturation(HueSaturation {
            hue: 120,
            saturation: 100,
        }))
        .unwrap();
        assert_eq!(json, r#"{"hue":120,"saturation":100}"#);
    }

    #[test]
    fn should_accept_lowercase_status() {
        let status: BulbStatus = serde_json::from_str("\"on\"").unwrap();
        assert_eq!(status, BulbStatus::On);
        assert_eq!(serde_json::to_string(&BulbStatus::Off).unwrap(), "\"OFF\"");
    }
}
