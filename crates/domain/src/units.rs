//! Unit conversions between user-facing scales and the internal canonical scales.
//!
//! | user-facing | range   | internal     | range     |
//! |-------------|---------|--------------|-----------|
//! | `level`     | 0–100   | `brightness` | 0–255     |
//! | `kelvin`    | 0–100   | `color_temp` | 153–370 mireds |
//!
//! Mireds are inversely correlated with color temperature, so kelvin `100`
//! (coolest white) maps to the *lowest* mired value.

/// Full brightness on the internal scale.
pub const BRIGHTNESS_MAX: u16 = 255;
/// Full brightness on the user-facing scale.
pub const LEVEL_MAX: u16 = 100;
/// Upper bound of the user-facing white temperature scale.
pub const KELVIN_MAX: u16 = 100;
/// Coolest white supported by the bulbs (~6500K).
pub const COLOR_TEMP_MIN_MIREDS: u16 = 153;
/// Warmest white supported by the bulbs (~2700K).
pub const COLOR_TEMP_MAX_MIREDS: u16 = 370;

const MIRED_SPAN: u16 = COLOR_TEMP_MAX_MIREDS - COLOR_TEMP_MIN_MIREDS;

/// Rescale `value` from `0..=old_max` to `0..=new_max`, rounding to nearest.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rescale(value: u16, new_max: u16, old_max: u16) -> u16 {
    if old_max == 0 {
        return 0;
    }
    let scaled = f64::from(value) * f64::from(new_max) / f64::from(old_max);
    scaled.round() as u16
}

#[must_use]
pub fn level_to_brightness(level: u16) -> u16 {
    rescale(level.min(LEVEL_MAX), BRIGHTNESS_MAX, LEVEL_MAX)
}

#[must_use]
pub fn brightness_to_level(brightness: u16) -> u16 {
    rescale(brightness.min(BRIGHTNESS_MAX), LEVEL_MAX, BRIGHTNESS_MAX)
}

#[must_use]
pub fn kelvin_to_mireds(kelvin: u16) -> u16 {
    let reverse = KELVIN_MAX - kelvin.min(KELVIN_MAX);
    COLOR_TEMP_MIN_MIREDS + rescale(reverse, MIRED_SPAN, KELVIN_MAX)
}

#[must_use]
pub fn mireds_to_kelvin(mireds: u16) -> u16 {
    let clamped = mireds.clamp(COLOR_TEMP_MIN_MIREDS, COLOR_TEMP_MAX_MIREDS);
    KELVIN_MAX - rescale(clamped - COLOR_TEMP_MIN_MIREDS, KELVIN_MAX, MIRED_SPAN)
}

/// Conversion bound to a field: how its user-facing values map onto the
/// scale transitions are computed and emitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitCodec {
    /// The field is already on its internal scale.
    Identity,
    /// `level` (0–100) computed as `brightness` (0–255).
    LevelToBrightness,
    /// `kelvin` (0–100) computed as `color_temp` (mireds).
    KelvinToMireds,
}

impl UnitCodec {
    #[must_use]
    pub fn to_internal(self, value: u16) -> u16 {
        match self {
            Self::Identity => value,
            Self::LevelToBrightness => level_to_brightness(value),
            Self::KelvinToMireds => kelvin_to_mireds(value),
        }
    }

    #[must_use]
    pub fn to_external(self, value: u16) -> u16 {
        match self {
            Self::Identity => value,
            Self::LevelToBrightness => brightness_to_level(value),
            Self::KelvinToMireds => mireds_to_kelvin(value),
        }
    }

    /// Express an internal per-tick increment in user-facing units.
    ///
    /// A non-zero step never rounds down to zero. The kelvin scale runs
    /// opposite to mireds, so its sign flips.
    #[must_use]
    pub fn step_to_external(self, step: i32) -> i32 {
        let magnitude = u16::try_from(step.unsigned_abs()).unwrap_or(u16::MAX);
        let scaled = match self {
            Self::Identity => return step,
            Self::LevelToBrightness => rescale(magnitude, LEVEL_MAX, BRIGHTNESS_MAX),
            Self::KelvinToMireds => rescale(magnitude, KELVIN_MAX, MIRED_SPAN),
        };
        let scaled = i32::from(scaled.max(u16::from(step != 0)));
        let sign = if self == Self::KelvinToMireds {
            -step.signum()
        } else {
            step.signum()
        };
        sign * scaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_map_level_quarters_onto_brightness() {
        let mapped: Vec<u16> = [0, 25, 50, 75, 100]
            .into_iter()
            .map(level_to_brightness)
            .collect();
        assert_eq!(mapped, vec![0, 64, 128, 191, 255]);
    }

    #[test]
    fn should_map_brightness_back_to_level() {
        assert_eq!(brightness_to_level(0), 0);
        assert_eq!(brightness_to_level(128), 50);
        assert_eq!(brightness_to_level(255), 100);
    }

    #[test]
    fn should_clamp_level_above_maximum() {
        assert_eq!(level_to_brightness(250), 255);
    }

    #[test]
    fn should_map_kelvin_extremes_onto_inverted_mired_range() {
        assert_eq!(kelvin_to_mireds(0), COLOR_TEMP_MAX_MIREDS);
        assert_eq!(kelvin_to_mireds(100), COLOR_TEMP_MIN_MIREDS);
    }

    #[test]
    fn should_map_mireds_back_to_kelvin() {
        assert_eq!(mireds_to_kelvin(COLOR_TEMP_MAX_MIREDS), 0);
        assert_eq!(mireds_to_kelvin(COLOR_TEMP_MIN_MIREDS), 100);
        assert_eq!(mireds_to_kelvin(kelvin_to_mireds(40)), 40);
    }

    #[test]
    fn should_clamp_mireds_outside_supported_range() {
        assert_eq!(mireds_to_kelvin(100), 100);
        assert_eq!(mireds_to_kelvin(500), 0);
    }

    #[test]
    fn should_leave_identity_values_untouched() {
        assert_eq!(UnitCodec::Identity.to_internal(200), 200);
        assert_eq!(UnitCodec::Identity.to_external(200), 200);
        assert_eq!(UnitCodec::Identity.step_to_external(-7), -7);
    }

    #[test]
    fn should_report_brightness_step_in_level_units() {
        assert_eq!(UnitCodec::LevelToBrightness.step_to_external(51), 20);
        assert_eq!(UnitCodec::LevelToBrightness.step_to_external(-64), -25);
    }

    #[test]
    fn should_never_round_a_nonzero_step_to_zero() {
        assert_eq!(UnitCodec::LevelToBrightness.step_to_external(1), 1);
        assert_eq!(UnitCodec::LevelToBrightness.step_to_external(0), 0);
    }

    #[test]
    fn should_flip_sign_of_mired_step_when_reported_as_kelvin() {
        assert_eq!(UnitCodec::KelvinToMireds.step_to_external(-22), 10);
        assert_eq!(UnitCodec::KelvinToMireds.step_to_external(22), -10);
    }
}
