use crate::core::physics::RigidBody;
use crate::core::vehicle::Vehicle;
use helpers::general::{clamp_abs, InputValueError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Action is one of the four control intents. Accelerate/brake form the throttle axis,
/// left/right the steering axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Accelerate,
    Brake,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Throttle,
    Steering,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Accelerate, Action::Brake, Action::Left, Action::Right];

    pub fn axis(&self) -> Axis {
        match self {
            Action::Accelerate | Action::Brake => Axis::Throttle,
            Action::Left | Action::Right => Axis::Steering,
        }
    }

    /// opposite returns the other action on the same axis.
    pub fn opposite(&self) -> Action {
        match self {
            Action::Accelerate => Action::Brake,
            Action::Brake => Action::Accelerate,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Accelerate => "accelerate",
            Action::Brake => "brake",
            Action::Left => "left",
            Action::Right => "right",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = InputValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accelerate" => Ok(Action::Accelerate),
            "brake" => Ok(Action::Brake),
            "left" => Ok(Action::Left),
            "right" => Ok(Action::Right),
            _ => Err(InputValueError),
        }
    }
}

// key codes (KeyboardEvent.code) and the actions they trigger
const KEY_MAP: [(&str, Action); 8] = [
    ("ArrowUp", Action::Accelerate),
    ("KeyW", Action::Accelerate),
    ("ArrowDown", Action::Brake),
    ("KeyS", Action::Brake),
    ("ArrowLeft", Action::Left),
    ("KeyA", Action::Left),
    ("ArrowRight", Action::Right),
    ("KeyD", Action::Right),
];

/// action_for_key returns the action bound to a key code.
pub fn action_for_key(code: &str) -> Option<Action> {
    KEY_MAP
        .iter()
        .find(|(key, _)| *key == code)
        .map(|&(_, action)| action)
}

/// action_for_touch_target returns the action of a touch control, the targets are named like the
/// actions themselves.
pub fn action_for_touch_target(target: &str) -> Option<Action> {
    target.parse().ok()
}

/// InputState holds the active actions of one controlled vehicle. Activating an action clears
/// the opposite action of the same axis, so at most one action per axis is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub accelerate: bool,
    pub brake: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// from_actions activates the actions in the given order, later actions win on the same axis.
    pub fn from_actions<'a, I: IntoIterator<Item = &'a Action>>(actions: I) -> InputState {
        let mut input = InputState::default();
        for &action in actions {
            input.press(action);
        }
        input
    }

    pub fn is_active(&self, action: Action) -> bool {
        match action {
            Action::Accelerate => self.accelerate,
            Action::Brake => self.brake,
            Action::Left => self.left,
            Action::Right => self.right,
        }
    }

    fn set(&mut self, action: Action, active: bool) {
        match action {
            Action::Accelerate => self.accelerate = active,
            Action::Brake => self.brake = active,
            Action::Left => self.left = active,
            Action::Right => self.right = active,
        }
    }

    pub fn press(&mut self, action: Action) {
        self.set(action, true);
        self.set(action.opposite(), false);
    }

    pub fn release(&mut self, action: Action) {
        self.set(action, false);
    }

    /// clear_axis deactivates both actions of an axis.
    pub fn clear_axis(&mut self, axis: Axis) {
        for action in Action::ALL.iter().filter(|action| action.axis() == axis) {
            self.set(*action, false);
        }
    }

    pub fn active_actions(&self) -> Vec<Action> {
        Action::ALL
            .iter()
            .copied()
            .filter(|&action| self.is_active(action))
            .collect()
    }

    /// handle_key updates the state for a key down (pressed = true) or key up event. The return
    /// value indicates whether the key is bound to an action.
    pub fn handle_key(&mut self, code: &str, pressed: bool) -> bool {
        match action_for_key(code) {
            Some(action) if pressed => {
                self.press(action);
                true
            }
            Some(action) => {
                self.release(action);
                true
            }
            None => false,
        }
    }
}

/// * `max_engine_force` - (N) Forward force per driven wheel when accelerating
/// * `max_braking_force` - (N) Force per driven wheel opposing the current direction of travel
/// * `max_reverse_force` - (N) Backward force per driven wheel when reversing
/// * `reverse_speed_threshold` - (m/s) Speed above which a request against the direction of travel
/// brakes instead of driving
/// * `steering_increment` - (rad) Steering change per time step
/// * `steering_clamp` - (rad) Maximum steering angle
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ControlPars {
    pub max_engine_force: f64,
    pub max_braking_force: f64,
    pub max_reverse_force: f64,
    pub reverse_speed_threshold: f64,
    pub steering_increment: f64,
    pub steering_clamp: f64,
}

impl Default for ControlPars {
    fn default() -> Self {
        ControlPars {
            max_engine_force: 500.0,
            max_braking_force: 1000.0,
            max_reverse_force: 250.0,
            reverse_speed_threshold: 1.0,
            steering_increment: 0.04,
            steering_clamp: 0.5,
        }
    }
}

/// Controller converts the input state of the controlled vehicle into engine force and steering
/// once per time step.
#[derive(Debug, Clone)]
pub struct Controller {
    pars: ControlPars,
    engine_force: f64,
    steering: f64,
}

impl Controller {
    pub fn new(pars: &ControlPars) -> Controller {
        Controller {
            pars: pars.to_owned(),
            engine_force: 0.0,
            steering: 0.0,
        }
    }

    pub fn engine_force(&self) -> f64 {
        self.engine_force
    }

    pub fn steering(&self) -> f64 {
        self.steering
    }

    /// update determines engine force and steering from the input and the current forward speed.
    /// Requests against the direction of travel brake until the speed drops below the reverse
    /// threshold. Steering moves by one increment per call and snaps back to zero as soon as no
    /// steering action is active.
    pub fn update(&mut self, input: &InputState, speed: f64) {
        let threshold = self.pars.reverse_speed_threshold;

        self.engine_force = if input.accelerate {
            if speed < -threshold {
                self.pars.max_braking_force
            } else {
                self.pars.max_engine_force
            }
        } else if input.brake {
            if speed > threshold {
                -self.pars.max_braking_force
            } else {
                -self.pars.max_reverse_force
            }
        } else {
            0.0
        };

        self.steering = if input.left {
            clamp_abs(
                self.steering + self.pars.steering_increment,
                self.pars.steering_clamp,
            )
        } else if input.right {
            clamp_abs(
                self.steering - self.pars.steering_increment,
                self.pars.steering_clamp,
            )
        } else {
            0.0
        };
    }

    /// apply updates the controller with the vehicle's speed and writes the result to the
    /// driven and steerable wheels.
    pub fn apply<B: RigidBody>(&mut self, input: &InputState, vehicle: &mut Vehicle<B>) {
        self.update(input, vehicle.speed());
        vehicle.set_engine_force(self.engine_force);
        vehicle.set_steering(self.steering);
    }
}
