//! Linear step sequences.
//!
//! A [`StepSequence`] describes a right-censored linear ramp: every step has
//! the same size except the last one, which absorbs the remainder so the
//! sequence always lands exactly on `end`. The starting value itself is not
//! part of the sequence; `start == end` yields the single value `[end]`.

use std::iter::FusedIterator;

/// Immutable description of a ramp from `start` to `end`.
///
/// Iterate with [`StepSequence::iter`]; every call starts over from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepSequence {
    start: i32,
    end: i32,
    step_size: i32,
}

impl StepSequence {
    /// Ramp reaching `end` in at most `num_periods` steps.
    ///
    /// `step_size = max(1, ceil(|end - start| / num_periods))`, signed toward
    /// `end`. A zero period count is treated as one.
    #[must_use]
    pub fn new(start: i32, end: i32, num_periods: u32) -> Self {
        let distance = (end - start).unsigned_abs();
        let magnitude = distance.div_ceil(num_periods.max(1)).max(1);
        Self::with_step_size(start, end, i32::try_from(magnitude).unwrap_or(i32::MAX))
    }

    /// Ramp with an explicit step size; only its magnitude is used.
    #[must_use]
    pub fn with_step_size(start: i32, end: i32, step_size: i32) -> Self {
        let magnitude = i32::try_from(step_size.unsigned_abs().max(1)).unwrap_or(i32::MAX);
        Self {
            start,
            end,
            step_size: if end < start { -magnitude } else { magnitude },
        }
    }

    #[must_use]
    pub fn start(&self) -> i32 {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> i32 {
        self.end
    }

    /// Signed per-step increment. Never zero.
    #[must_use]
    pub fn step_size(&self) -> i32 {
        self.step_size
    }

    /// Number of values the sequence yields.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        let distance = (self.end - self.start).unsigned_abs();
        let steps = distance.div_ceil(self.step_size.unsigned_abs()).max(1);
        usize::try_from(steps).unwrap_or(usize::MAX)
    }

    #[must_use]
    pub fn iter(&self) -> Steps {
        Steps {
            current: self.start,
            end: self.end,
            step_size: self.step_size,
            finished: false,
        }
    }
}

impl IntoIterator for &StepSequence {
    type Item = i32;
    type IntoIter = Steps;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the values of a [`StepSequence`].
#[derive(Debug, Clone)]
pub struct Steps {
    current: i32,
    end: i32,
    step_size: i32,
    finished: bool,
}

impl Iterator for Steps {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        if self.finished {
            return None;
        }
        let remaining = self.end - self.current;
        if remaining.abs() < self.step_size.abs() {
            self.current = self.end;
        } else {
            self.current += self.step_size;
        }
        self.finished = self.current == self.end;
        Some(self.current)
    }
}

impl FusedIterator for Steps {}
