//! RGB colors and their hue/saturation projection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An 8-bit-per-channel RGB color.
///
/// Deserializes from `"r,g,b"`, `[r, g, b]` or `{"r": .., "g": .., "b": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RgbRepr")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Hue (degrees, 0–359) and saturation (percent, 0–100).
///
/// Brightness is a separate field, so the HSV value component is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HueSaturation {
    pub hue: u16,
    pub saturation: u8,
}

pub const WHITE: Rgb = Rgb::new(255, 255, 255);

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    #[must_use]
    pub fn from_channels([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }

    /// Parse a color out of an arbitrary JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidColor`] when the value is not one of
    /// the accepted color shapes.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
        serde_json::from_value(value.clone())
            .map_err(|_| ValidationError::InvalidColor(value.to_string()))
    }

    /// Project onto hue/saturation (HSV with the value component dropped).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_hue_saturation(self) -> HueSaturation {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        if max == 0 {
            return HueSaturation {
                hue: 0,
                saturation: 0,
            };
        }

        let (r, g, b) = (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        );
        let delta = f64::from(max - min) / 255.0;
        let saturation = delta / (f64::from(max) / 255.0);

        let sector = if max == min {
            0.0
        } else if max == self.r {
            (g - b) / delta + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        HueSaturation {
            hue: ((sector / 6.0 * 360.0).round() as u16) % 360,
            saturation: (saturation * 100.0).round() as u8,
        }
    }

    /// Fully bright RGB color for a hue/saturation pair.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_hue_saturation(hs: HueSaturation) -> Self {
        let chroma = f64::from(hs.saturation.min(100)) / 100.0;
        let sector = f64::from(hs.hue % 360) / 60.0;
        let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
        let (r, g, b) = match sector.floor() as u8 {
            0 => (chroma, x, 0.0),
            1 => (x, chroma, 0.0),
            2 => (0.0, chroma, x),
            3 => (0.0, x, chroma),
            4 => (x, 0.0, chroma),
            _ => (chroma, 0.0, x),
        };
        let offset = 1.0 - chroma;
        let channel = |c: f64| ((c + offset) * 255.0).round() as u8;
        Self::new(channel(r), channel(g), channel(b))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidColor(s.to_string());
        let parts = s
            .split(',')
            .map(|part| part.trim().parse::<u8>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [r, g, b] => Ok(Self::new(*r, *g, *b)),
            _ => Err(invalid()),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RgbRepr {
    Text(String),
    Array([u8; 3]),
    Object { r: u8, g: u8, b: u8 },
}

impl TryFrom<RgbRepr> for Rgb {
    type Error = ValidationError;

    fn try_from(repr: RgbRepr) -> Result<Self, Self::Error> {
        match repr {
            RgbRepr::Text(text) => text.parse(),
            RgbRepr::Array(channels) => Ok(Self::from_channels(channels)),
            RgbRepr::Object { r, g, b } => Ok(Self::new(r, g, b)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hs(hue: u16, saturation: u8) -> HueSaturation {
        HueSaturation { hue, saturation }
    }

    #[test]
    fn should_parse_comma_separated_color() {
        assert_eq!("255, 0,128".parse::<Rgb>().unwrap(), Rgb::new(255, 0, 128));
    }

    #[test]
    fn should_reject_color_with_wrong_channel_count() {
        assert!(matches!(
            "255,0".parse::<Rgb>(),
            Err(ValidationError::InvalidColor(_))
        ));
    }

    #[test]
    fn should_reject_color_with_channel_above_255() {
        assert!("256,0,0".parse::<Rgb>().is_err());
    }

    #[test]
    fn should_deserialize_all_accepted_shapes() {
        let expected = Rgb::new(1, 2, 3);
        for json in [r#""1,2,3""#, "[1,2,3]", r#"{"r":1,"g":2,"b":3}"#] {
            let parsed: Rgb = serde_json::from_str(json).unwrap();
            assert_eq!(parsed, expected, "shape {json}");
        }
    }

    #[test]
    fn should_report_invalid_json_color() {
        let result = Rgb::from_json(&serde_json::json!(12));
        assert!(matches!(result, Err(ValidationError::InvalidColor(_))));
    }

    #[test]
    fn should_convert_primaries_to_hue_saturation() {
        assert_eq!(Rgb::new(255, 0, 0).to_hue_saturation(), hs(0, 100));
        assert_eq!(Rgb::new(0, 255, 0).to_hue_saturation(), hs(120, 100));
        assert_eq!(Rgb::new(0, 0, 255).to_hue_saturation(), hs(240, 100));
    }

    #[test]
    fn should_convert_intermediate_color_to_hue_saturation() {
        assert_eq!(Rgb::new(191, 64, 0).to_hue_saturation(), hs(20, 100));
        assert_eq!(Rgb::new(255, 0, 128).to_hue_saturation(), hs(330, 100));
    }

    #[test]
    fn should_report_zero_saturation_for_grey_and_black() {
        assert_eq!(Rgb::new(128, 128, 128).to_hue_saturation(), hs(0, 0));
        assert_eq!(Rgb::new(0, 0, 0).to_hue_saturation(), hs(0, 0));
    }

    #[test]
    fn should_build_fully_bright_color_from_hue_saturation() {
        assert_eq!(Rgb::from_hue_saturation(hs(120, 100)), Rgb::new(0, 255, 0));
        assert_eq!(Rgb::from_hue_saturation(hs(0, 0)), WHITE);
        assert_eq!(Rgb::from_hue_saturation(hs(240, 100)), Rgb::new(0, 0, 255));
    }

    #[test]
    fn should_display_as_comma_separated_channels() {
        assert_eq!(Rgb::new(10, 20, 30).to_string(), "10,20,30");
    }
}
