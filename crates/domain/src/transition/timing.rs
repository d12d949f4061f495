//! Timing resolution: turn optional duration/period/step-count hints into one
//! consistent `(period, num_periods)` pair.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default delay between two ticks of a transition.
pub const DEFAULT_PERIOD_MS: u64 = 225;
/// Default number of ticks when no timing hint is given.
pub const DEFAULT_NUM_PERIODS: u32 = 20;

/// Process-wide defaults used to fill in missing timing hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionDefaults {
    pub period_ms: u64,
    pub num_periods: u32,
}

impl Default for TransitionDefaults {
    fn default() -> Self {
        Self {
            period_ms: DEFAULT_PERIOD_MS,
            num_periods: DEFAULT_NUM_PERIODS,
        }
    }
}

impl TransitionDefaults {
    /// Duration used when only a period is given.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.period_ms.max(1) * u64::from(self.num_periods.max(1))
    }

    fn as_timing(self) -> Timing {
        Timing {
            period_ms: self.period_ms.max(1),
            num_periods: self.num_periods.max(1),
        }
    }
}

/// User-supplied timing hints. Every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TimingHint {
    /// Total duration in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Delay between ticks in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<u64>,
    /// Explicit number of ticks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_periods: Option<u32>,
}

/// Fully resolved timing. Both values are at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub period_ms: u64,
    pub num_periods: u32,
}

impl Timing {
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.period_ms * u64::from(self.num_periods)
    }
}

impl TimingHint {
    #[must_use]
    pub fn with_duration(seconds: f64) -> Self {
        Self {
            duration: Some(seconds),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn period(mut self, period_ms: Option<u64>) -> Self {
        self.period = period_ms;
        self
    }

    /// Resolve the hints against `defaults`.
    ///
    /// - duration and/or period given: missing one comes from the defaults,
    ///   `num_periods = max(1, ceil(duration / period))`
    /// - duration and step count without period: `period = duration / num_periods`
    /// - step count alone: default period
    /// - nothing: default period and step count
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidTiming`] when the duration is negative
    /// or not a finite number.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn resolve(&self, defaults: &TransitionDefaults) -> Result<Timing, ValidationError> {
        let duration_ms = match self.duration {
            Some(seconds) if !seconds.is_finite() || seconds < 0.0 => {
                return Err(ValidationError::InvalidTiming(
                    "duration must be a non-negative number of seconds",
                ));
            }
            Some(seconds) => Some((seconds * 1000.0).round() as u64),
            None => None,
        };
        let period = self.period.map(|p| p.max(1));
        let num_periods = self.num_periods.map(|n| n.max(1));

        let timing = match (duration_ms, period, num_periods) {
            (Some(duration), None, Some(num_periods)) => Timing {
                period_ms: (duration / u64::from(num_periods)).max(1),
                num_periods,
            },
            (None, None, Some(num_periods)) => Timing {
                period_ms: defaults.period_ms.max(1),
                num_periods,
            },
            (None, None, None) => defaults.as_timing(),
            (duration, period, _) => {
                let period_ms = period.unwrap_or(defaults.period_ms).max(1);
                let duration = duration.unwrap_or_else(|| defaults.duration_ms());
                let num_periods = duration.div_ceil(period_ms).max(1);
                Timing {
                    period_ms,
                    num_periods: u32::try_from(num_periods).unwrap_or(u32::MAX),
                }
            }
        };
        Ok(timing)
    }
}
