//! Transition planning.
//!
//! A transition moves one field (or the color) of a bulb from a start value
//! to an end value in fixed linear steps, one step per period. This module
//! turns user requests into validated [`TransitionSpec`]s and specs into
//! [`TransitionPlan`]s that yield one [`GroupUpdate`](crate::state::GroupUpdate)
//! per tick. Running plans on a timer is the `app` crate's job.

mod color;
mod plan;
mod request;
mod spec;
mod timing;

pub use color::ColorRamp;
pub use plan::{PlanDetail, PlanSummary, Tick, TransitionPlan};
pub use request::TransitionRequest;
pub use spec::{PlanKey, TransitionSpec, TransitionTarget};
pub use timing::{
    DEFAULT_NUM_PERIODS, DEFAULT_PERIOD_MS, Timing, TimingHint, TransitionDefaults,
};

/// Pad every plan with its final value until all emit the same number of ticks.
///
/// Plans started together from one command finish on the same tick.
pub fn synchronize(plans: &mut [TransitionPlan]) {
    let len = plans
        .iter()
        .map(TransitionPlan::total_ticks)
        .max()
        .unwrap_or(0);
    for plan in plans {
        plan.pad_to(len);
    }
}

/// Repeat the last element of `values` until it holds `len` items.
pub(crate) fn pad_right<T: Copy>(values: &mut Vec<T>, len: usize) {
    if let Some(&last) = values.last() {
        values.resize(len.max(values.len()), last);
    }
}
