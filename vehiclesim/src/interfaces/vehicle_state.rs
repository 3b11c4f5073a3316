use helpers::geometry::{Point3d, Quaternion};
use serde::Serialize;

pub const MAX_STATE_UPDATE_FREQUENCY: f64 = 20.0;

/// * `position` - (m) Visual wheel position (contact position)
/// * `rotation` - Visual wheel rotation including steering and spin
#[derive(Debug, Clone, Serialize)]
pub struct WheelState {
    pub position: Point3d,
    pub rotation: Quaternion,
    pub in_contact: bool,
    pub suspension_length: f64,
}

/// VehicleState is the snapshot of a vehicle that is handed to an observer (e.g. a renderer).
#[derive(Debug, Clone, Serialize)]
pub struct VehicleState {
    pub time: f64,
    pub position: Point3d,
    pub rotation: Quaternion,
    pub speed: f64,
    pub engine_force: f64,
    pub steering: f64,
    pub no_wheels_in_contact: usize,
    pub wheels: Vec<WheelState>,
}
