use crate::core::controls::{Action, InputState};
use serde::Deserialize;

/// * `duration` - (s) Duration of the segment
/// * `actions` - Actions held during the whole segment (later actions win on the same axis)
#[derive(Debug, Deserialize, Clone)]
pub struct ScenarioSegment {
    pub duration: f64,
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// Scenario is a scripted sequence of held actions used to drive a vehicle without a player.
#[derive(Debug, Deserialize, Clone)]
pub struct Scenario {
    pub name: String,
    pub segments: Vec<ScenarioSegment>,
}

impl Scenario {
    /// duration returns the total duration of all segments (s).
    pub fn duration(&self) -> f64 {
        self.segments.iter().map(|segment| segment.duration).sum()
    }

    /// input_at returns the input state of the segment active at time t. Beyond the last segment
    /// no action is active.
    pub fn input_at(&self, t: f64) -> InputState {
        let mut t_segment_end = 0.0;

        for segment in self.segments.iter() {
            t_segment_end += segment.duration;

            if t < t_segment_end {
                return InputState::from_actions(segment.actions.iter());
            }
        }

        InputState::default()
    }
}
