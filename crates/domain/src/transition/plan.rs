//! Runnable transition plans and their public summaries.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::field::GroupStateField;
use crate::id::{BulbId, TransitionId};
use crate::state::GroupUpdate;
use crate::step::StepSequence;
use crate::time::{self, Timestamp};

use super::color::ColorRamp;
use super::pad_right;
use super::spec::{PlanKey, TransitionSpec, TransitionTarget};

/// One emission of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub update: GroupUpdate,
    /// `true` for the final tick; the plan is exhausted afterwards.
    pub is_last: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PlanKind {
    Field {
        field: GroupStateField,
        start: u16,
        end: u16,
        /// Per-tick increment on the internal scale.
        step_size: i32,
        /// Internal-scale values, one per tick.
        values: Vec<u16>,
    },
    Color {
        start: Rgb,
        end: Rgb,
        ramp: ColorRamp,
    },
}

/// A precomputed sequence of partial updates for one bulb.
///
/// Values are computed up front; [`TransitionPlan::advance`] hands them out
/// one tick at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    id: TransitionId,
    bulb: BulbId,
    kind: PlanKind,
    period_ms: u64,
    created_at: Timestamp,
    ticks_emitted: usize,
    on_finish: Option<GroupUpdate>,
}

impl TransitionPlan {
    #[must_use]
    pub fn new(id: TransitionId, spec: &TransitionSpec) -> Self {
        let num_periods = spec.timing.num_periods;
        let kind = match spec.target {
            TransitionTarget::Field { field, start, end } => {
                let codec = field.codec();
                let sequence = StepSequence::new(
                    i32::from(codec.to_internal(start)),
                    i32::from(codec.to_internal(end)),
                    num_periods,
                );
                PlanKind::Field {
                    field,
                    start,
                    end,
                    step_size: sequence.step_size(),
                    values: sequence
                        .iter()
                        .map(|v| u16::try_from(v.max(0)).unwrap_or(u16::MAX))
                        .collect(),
                }
            }
            TransitionTarget::Color { start, end } => PlanKind::Color {
                start,
                end,
                ramp: ColorRamp::new(start, end, num_periods),
            },
        };
        Self {
            id,
            bulb: spec.bulb,
            kind,
            period_ms: spec.timing.period_ms,
            created_at: time::now(),
            ticks_emitted: 0,
            on_finish: spec.on_finish,
        }
    }

    #[must_use]
    pub fn id(&self) -> TransitionId {
        self.id
    }

    #[must_use]
    pub fn bulb(&self) -> BulbId {
        self.bulb
    }

    #[must_use]
    pub fn key(&self) -> PlanKey {
        match &self.kind {
            PlanKind::Field { field, .. } => PlanKey::Field(field.internal()),
            PlanKind::Color { .. } => PlanKey::Color,
        }
    }

    #[must_use]
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    #[must_use]
    pub fn total_ticks(&self) -> usize {
        match &self.kind {
            PlanKind::Field { values, .. } => values.len(),
            PlanKind::Color { ramp, .. } => ramp.colors.len(),
        }
    }

    #[must_use]
    pub fn ticks_emitted(&self) -> usize {
        self.ticks_emitted
    }

    /// Update merged into the final tick, if any.
    #[must_use]
    pub fn on_finish(&self) -> Option<GroupUpdate> {
        self.on_finish
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.ticks_emitted >= self.total_ticks()
    }

    /// Extend the plan to `len` ticks by repeating its final value.
    pub fn pad_to(&mut self, len: usize) {
        match &mut self.kind {
            PlanKind::Field { values, .. } => pad_right(values, len),
            PlanKind::Color { ramp, .. } => pad_right(&mut ramp.colors, len),
        }
    }

    /// Next update to emit, or `None` once exhausted.
    pub fn advance(&mut self) -> Option<Tick> {
        let index = self.ticks_emitted;
        let mut update = match &self.kind {
            PlanKind::Field { field, values, .. } => {
                GroupUpdate::internal_value(*field, *values.get(index)?)
            }
            PlanKind::Color { ramp, .. } => {
                GroupUpdate::hue_saturation(ramp.colors.get(index)?.to_hue_saturation())
            }
        };
        self.ticks_emitted += 1;
        let is_last = self.is_finished();
        if is_last && let Some(on_finish) = self.on_finish {
            update = update.merge(on_finish);
        }
        Some(Tick { update, is_last })
    }

    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        let last = self.ticks_emitted.checked_sub(1);
        let detail = match &self.kind {
            PlanKind::Field {
                field,
                start,
                end,
                step_size,
                values,
            } => {
                let codec = field.codec();
                PlanDetail::Field {
                    field: *field,
                    start_value: *start,
                    current_value: last
                        .and_then(|i| values.get(i))
                        .map_or(*start, |v| codec.to_external(*v)),
                    end_value: *end,
                    step_size: codec.step_to_external(*step_size),
                }
            }
            PlanKind::Color { start, end, ramp } => PlanDetail::Color {
                start_color: *start,
                current_color: last
                    .and_then(|i| ramp.colors.get(i))
                    .copied()
                    .unwrap_or(*start),
                end_color: *end,
                step_sizes: ramp.step_sizes,
            },
        };
        PlanSummary {
            id: self.id,
            bulb: self.bulb,
            period: self.period_ms,
            ticks_emitted: self.ticks_emitted,
            total_ticks: self.total_ticks(),
            created_at: self.created_at,
            elapsed_ms: time::elapsed_ms(self.created_at, time::now()),
            detail,
            on_finish: self.on_finish,
        }
    }
}

/// Snapshot of an active plan, as listed by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub id: TransitionId,
    pub bulb: BulbId,
    /// Period in milliseconds.
    pub period: u64,
    pub ticks_emitted: usize,
    pub total_ticks: usize,
    pub created_at: Timestamp,
    /// Wall-clock milliseconds since creation when the summary was taken.
    pub elapsed_ms: u64,
    #[serde(flatten)]
    pub detail: PlanDetail,
    /// Update applied with the final tick.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_finish: Option<GroupUpdate>,
}

/// Values are in the field's user-facing units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlanDetail {
    Field {
        field: GroupStateField,
        start_value: u16,
        current_value: u16,
        end_value: u16,
        step_size: i32,
    },
    Color {
        start_color: Rgb,
        current_color: Rgb,
        end_color: Rgb,
        step_sizes: [i32; 3],
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::DeviceType;
    use crate::state::BulbStatus;
    use crate::transition::Timing;

    fn bulb() -> BulbId {
        BulbId::new(0x1234, 2, DeviceType::RgbCct)
    }

    fn drain(plan: &mut TransitionPlan) -> Vec<Tick> {
        std::iter::from_fn(|| plan.advance()).collect()
    }

    #[test]
    fn should_emit_twenty_point_steps_when_fading_level_zero_to_hundred() {
        let timing = Timing {
            period_ms: 400,
            num_periods: 5,
        };
        let spec = TransitionSpec::field(bulb(), GroupStateField::Brightness, 0, 100, timing).unwrap();
        let mut plan = TransitionPlan::new(TransitionId::new(1), &spec);

        let values: Vec<_> = drain(&mut plan)
            .into_iter()
            .map(|tick| tick.update.brightness)
            .collect();
        assert_eq!(
            values,
            vec![Some(20), Some(40), Some(60), Some(80), Some(100)]
        );
        assert!(plan.is_finished());
        assert_eq!(plan.advance(), None);
    }

    #[test]
    fn should_emit_brightness_and_report_level_when_planning_level() {
        let timing = Timing {
            period_ms: 100,
            num_periods: 4,
        };
        let spec = TransitionSpec::field(bulb(), GroupStateField::Level, 0, 100, timing).unwrap();
        let mut plan = TransitionPlan::new(TransitionId::new(1), &spec);

        let first = plan.advance().unwrap();
        assert_eq!(first.update.brightness, Some(64));
        let PlanDetail::Field {
            current_value,
            end_value,
            step_size,
            ..
        } = plan.summary().detail
        else {
            panic!("expected field detail");
        };
        assert_eq!(current_value, 25);
        assert_eq!(end_value, 100);
        assert_eq!(step_size, 25);

        let last = drain(&mut plan).pop().unwrap();
        assert_eq!(last.update.brightness, Some(255));
        assert!(last.is_last);
    }

    #[test]
    fn should_run_on_mireds_when_planning_kelvin() {
        let timing = Timing {
            period_ms: 100,
            num_periods: 2,
        };
        let spec = TransitionSpec::field(bulb(), GroupStateField::Kelvin, 0, 100, timing).unwrap();
        let mut plan = TransitionPlan::new(TransitionId::new(1), &spec);

        assert_eq!(plan.key(), PlanKey::Field(GroupStateField::ColorTemp));
        let temps: Vec<_> = drain(&mut plan)
            .into_iter()
            .map(|tick| tick.update.color_temp)
            .collect();
        assert_eq!(temps, vec![Some(261), Some(153)]);
    }

    #[test]
    fn should_emit_single_tick_when_start_equals_end() {
        let timing = Timing {
            period_ms: 100,
            num_periods: 10,
        };
        let spec = TransitionSpec::field(bulb(), GroupStateField::Hue, 42, 42, timing).unwrap();
        let mut plan = TransitionPlan::new(TransitionId::new(1), &spec);

        let ticks = drain(&mut plan);
        assert_eq!(ticks.len(), 1);
        assert_eq!(ticks[0].update.hue, Some(42));
        assert!(ticks[0].is_last);
    }

    #[test]
    fn should_merge_deferred_update_into_final_tick_only() {
        let timing = Timing {
            period_ms: 100,
            num_periods: 3,
        };
        let spec = TransitionSpec::field(bulb(), GroupStateField::Brightness, 90, 0, timing)
            .unwrap()
            .then_apply(GroupUpdate::status(BulbStatus::Off));
        let mut plan = TransitionPlan::new(TransitionId::new(1), &spec);

        let ticks = drain(&mut plan);
        assert_eq!(ticks.len(), 3);
        assert!(ticks[..2].iter().all(|tick| tick.update.status.is_none()));
        assert_eq!(ticks[2].update.status, Some(BulbStatus::Off));
        assert_eq!(ticks[2].update.brightness, Some(0));
    }

    #[test]
    fn should_end_color_plan_on_end_hue_saturation() {
        let timing = Timing {
            period_ms: 1000,
            num_periods: 4,
        };
        let end = Rgb::new(0, 255, 0);
        let spec = TransitionSpec::color(bulb(), Rgb::new(255, 0, 0), end, timing);
        let mut plan = TransitionPlan::new(TransitionId::new(1), &spec);

        let ticks = drain(&mut plan);
        assert_eq!(ticks.len(), 4);
        let last = ticks.last().unwrap().update;
        let expected = end.to_hue_saturation();
        assert_eq!(last.hue, Some(expected.hue));
        assert_eq!(last.saturation, Some(expected.saturation));
        assert!(last.brightness.is_none());
    }

    #[test]
    fn should_report_progress_in_summary() {
        let timing = Timing {
            period_ms: 250,
            num_periods: 4,
        };
        let spec = TransitionSpec::color(bulb(), Rgb::new(255, 0, 0), Rgb::new(0, 255, 0), timing);
        let mut plan = TransitionPlan::new(TransitionId::new(9), &spec);
        plan.advance();

        let summary = plan.summary();
        assert_eq!(summary.id, TransitionId::new(9));
        assert_eq!(summary.period, 250);
        assert_eq!(summary.ticks_emitted, 1);
        assert_eq!(summary.total_ticks, 4);
        assert_eq!(
            summary.detail,
            PlanDetail::Color {
                start_color: Rgb::new(255, 0, 0),
                current_color: Rgb::new(191, 64, 0),
                end_color: Rgb::new(0, 255, 0),
                step_sizes: [-64, 64, 1],
            }
        );
    }

    #[test]
    fn should_serialize_summary_with_type_tag() {
        let timing = Timing {
            period_ms: 225,
            num_periods: 20,
        };
        let spec = TransitionSpec::field(bulb(), GroupStateField::Saturation, 0, 100, timing).unwrap();
        let plan = TransitionPlan::new(TransitionId::new(3), &spec);

        let json = serde_json::to_value(plan.summary()).unwrap();
        assert_eq!(json["type"], "field");
        assert_eq!(json["field"], "saturation");
        assert_eq!(json["id"], 3);
        assert_eq!(json["current_value"], 0);
        assert_eq!(json["step_size"], 5);
        assert!(json.get("on_finish").is_none());
    }
}
