//! Color ramps: three independent channel sequences walked in lockstep.

use crate::color::Rgb;
use crate::step::StepSequence;

use super::pad_right;

/// RGB waypoints of a color transition.
///
/// Each channel moves on its own [`StepSequence`] with the same period count.
/// Channels that finish early (or never move) repeat their final value so all
/// three have the same length. The last waypoint is always the end color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRamp {
    pub step_sizes: [i32; 3],
    pub colors: Vec<Rgb>,
}

impl ColorRamp {
    #[must_use]
    pub fn new(start: Rgb, end: Rgb, num_periods: u32) -> Self {
        let starts = start.channels();
        let ends = end.channels();
        let sequences: [StepSequence; 3] = std::array::from_fn(|i| {
            StepSequence::new(i32::from(starts[i]), i32::from(ends[i]), num_periods)
        });

        let mut channels: Vec<Vec<u8>> = sequences
            .iter()
            .map(|sequence| sequence.iter().map(channel_value).collect())
            .collect();
        let len = channels.iter().map(Vec::len).max().unwrap_or(1);
        for channel in &mut channels {
            pad_right(channel, len);
        }

        let colors = (0..len)
            .map(|i| Rgb::new(channels[0][i], channels[1][i], channels[2][i]))
            .collect();

        Self {
            step_sizes: sequences.map(|sequence| sequence.step_size()),
            colors,
        }
    }
}

fn channel_value(value: i32) -> u8 {
    u8::try_from(value.clamp(0, 255)).unwrap_or(u8::MAX)
}
