use std::time::Duration;
use vehiclesim::core::controls::{Action, Axis, InputState};

/// PlayerActions is the server-side action state of a player. Received actions are held until no
/// input arrived for the same axis for longer than the staleness limit.
///
/// * `input` - Active actions (at most one per axis)
/// * `last_throttle_input` - Time of the latest accelerate/brake action
/// * `last_steering_input` - Time of the latest left/right action
#[derive(Debug, Clone, Default)]
pub struct PlayerActions {
    pub input: InputState,
    pub last_throttle_input: Option<Duration>,
    pub last_steering_input: Option<Duration>,
}

impl PlayerActions {
    /// merge activates the received actions, clears their opposite actions and stamps the input
    /// time of the affected axes.
    pub fn merge(&mut self, actions: &[Action], now: Duration) {
        for &action in actions {
            self.input.press(action);

            match action.axis() {
                Axis::Throttle => self.last_throttle_input = Some(now),
                Axis::Steering => self.last_steering_input = Some(now),
            }
        }
    }

    /// sweep clears every axis whose latest input is older than stale_after. The return value
    /// indicates whether an active action was cleared.
    pub fn sweep(&mut self, now: Duration, stale_after: Duration) -> bool {
        let mut cleared = false;

        for (axis, last_input) in [
            (Axis::Throttle, self.last_throttle_input),
            (Axis::Steering, self.last_steering_input),
        ] {
            let is_stale = match last_input {
                Some(t) => now.saturating_sub(t) > stale_after,
                None => true,
            };

            if is_stale && axis_active(&self.input, axis) {
                self.input.clear_axis(axis);
                cleared = true;
            }
        }

        cleared
    }
}

fn axis_active(input: &InputState, axis: Axis) -> bool {
    Action::ALL
        .iter()
        .any(|&action| action.axis() == axis && input.is_active(action))
}
