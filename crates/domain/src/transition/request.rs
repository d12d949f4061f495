//! User-facing transition requests and their resolution into specs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::{Rgb, WHITE};
use crate::error::ValidationError;
use crate::field::GroupStateField;
use crate::id::BulbId;
use crate::state::GroupState;

use super::spec::TransitionSpec;
use super::timing::{TimingHint, TransitionDefaults};

/// A request to start one transition, as received from a client.
///
/// `start_value` is optional: the bulb's last known value is used, or the
/// field's default when nothing is known. Color endpoints accept the shapes
/// understood by [`Rgb::from_json`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionRequest {
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_value: Option<Value>,
    #[serde(default)]
    pub end_value: Option<Value>,
    #[serde(flatten)]
    pub timing: TimingHint,
}

impl TransitionRequest {
    /// Resolve the request against the bulb's current state.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the field is missing or unknown,
    /// is `status`, when an endpoint is missing or invalid, or when the
    /// timing hints are invalid.
    pub fn resolve(
        &self,
        bulb: BulbId,
        state: &GroupState,
        defaults: &TransitionDefaults,
    ) -> Result<TransitionSpec, ValidationError> {
        let field: GroupStateField = self
            .field
            .as_deref()
            .ok_or(ValidationError::MissingField)?
            .parse()?;
        let end_value = self
            .end_value
            .as_ref()
            .ok_or(ValidationError::MissingEndValue)?;
        let timing = self.timing.resolve(defaults)?;

        match field {
            GroupStateField::Status => Err(ValidationError::NotTransitionable(field)),
            GroupStateField::Color => {
                let end = Rgb::from_json(end_value)?;
                let start = match &self.start_value {
                    Some(value) => Rgb::from_json(value)?,
                    None => state.color().unwrap_or(WHITE),
                };
                Ok(TransitionSpec::color(bulb, start, end, timing))
            }
            _ => {
                let end = field.check_value(numeric_value(field, end_value)?)?;
                let start = match &self.start_value {
                    Some(value) => field.check_value(numeric_value(field, value)?)?,
                    None => state.value_or_default(field),
                };
                TransitionSpec::field(bulb, field, start, end, timing)
            }
        }
    }
}

/// Accept integers, floats (rounded) and numeric strings.
#[allow(clippy::cast_possible_truncation)]
fn numeric_value(field: GroupStateField, value: &Value) -> Result<i64, ValidationError> {
    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.round() as i64)),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or(ValidationError::InvalidValue(field))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::id::DeviceType;
    use crate::state::BulbStatus;
    use crate::transition::{Timing, TransitionTarget};

    fn bulb() -> BulbId {
        BulbId::new(0x1234, 1, DeviceType::RgbCct)
    }

    fn request(body: Value) -> TransitionRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn should_resolve_explicit_endpoints_and_timing() {
        let spec = request(json!({
            "field": "level",
            "start_value": 0,
            "end_value": 100,
            "duration": 2.0,
            "period": 400,
        }))
        .resolve(bulb(), &GroupState::default(), &TransitionDefaults::default())
        .unwrap();

        assert_eq!(
            spec.target,
            TransitionTarget::Field {
                field: GroupStateField::Level,
                start: 0,
                end: 100,
            }
        );
        assert_eq!(
            spec.timing,
            Timing {
                period_ms: 400,
                num_periods: 5,
            }
        );
    }

    #[test]
    fn should_start_from_last_known_value_when_start_missing() {
        let state = GroupState {
            status: Some(BulbStatus::On),
            hue: Some(120),
            ..GroupState::default()
        };
        let spec = request(json!({"field": "hue", "end_value": 200}))
            .resolve(bulb(), &state, &TransitionDefaults::default())
            .unwrap();

        assert_eq!(
            spec.target,
            TransitionTarget::Field {
                field: GroupStateField::Hue,
                start: 120,
                end: 200,
            }
        );
    }

    #[test]
    fn should_start_from_field_default_when_state_unknown() {
        let spec = request(json!({"field": "brightness", "end_value": "10"}))
            .resolve(bulb(), &GroupState::default(), &TransitionDefaults::default())
            .unwrap();

        assert_eq!(
            spec.target,
            TransitionTarget::Field {
                field: GroupStateField::Brightness,
                start: 255,
                end: 10,
            }
        );
        assert_eq!(spec.timing.period_ms, 225);
        assert_eq!(spec.timing.num_periods, 20);
    }

    #[test]
    fn should_start_color_from_white_when_state_unknown() {
        let spec = request(json!({"field": "color", "end_value": "255,0,0"}))
            .resolve(bulb(), &GroupState::default(), &TransitionDefaults::default())
            .unwrap();

        assert_eq!(
            spec.target,
            TransitionTarget::Color {
                start: WHITE,
                end: Rgb::new(255, 0, 0),
            }
        );
    }

    #[test]
    fn should_reject_request_when_end_value_missing() {
        let result = request(json!({"field": "hue"})).resolve(
            bulb(),
            &GroupState::default(),
            &TransitionDefaults::default(),
        );
        assert_eq!(result, Err(ValidationError::MissingEndValue));
    }

    #[test]
    fn should_reject_request_when_field_missing() {
        let result = request(json!({"end_value": 3})).resolve(
            bulb(),
            &GroupState::default(),
            &TransitionDefaults::default(),
        );
        assert_eq!(result, Err(ValidationError::MissingField));
    }

    #[test]
    fn should_reject_request_when_field_is_status() {
        let result = request(json!({"field": "status", "end_value": "OFF"})).resolve(
            bulb(),
            &GroupState::default(),
            &TransitionDefaults::default(),
        );
        assert_eq!(
            result,
            Err(ValidationError::NotTransitionable(GroupStateField::Status))
        );
    }

    #[test]
    fn should_reject_request_when_value_out_of_range() {
        let result = request(json!({"field": "level", "end_value": 150})).resolve(
            bulb(),
            &GroupState::default(),
            &TransitionDefaults::default(),
        );
        assert!(matches!(result, Err(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn should_reject_request_when_value_not_numeric() {
        let result = request(json!({"field": "hue", "end_value": [1, 2]})).resolve(
            bulb(),
            &GroupState::default(),
            &TransitionDefaults::default(),
        );
        assert_eq!(
            result,
            Err(ValidationError::InvalidValue(GroupStateField::Hue))
        );
    }

    #[test]
    fn should_reject_request_when_duration_negative() {
        let result = request(json!({"field": "hue", "end_value": 10, "duration": -1.0})).resolve(
            bulb(),
            &GroupState::default(),
            &TransitionDefaults::default(),
        );
        assert!(matches!(result, Err(ValidationError::InvalidTiming(_))));
    }
}
