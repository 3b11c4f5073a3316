use helpers::geometry::Point3d;
use std::fmt;

/// DriveResult contains all drive information that is required for post-processing the results.
#[derive(Debug, Clone)]
pub struct DriveResult {
    pub scenario_name: String,
    pub vehicle_name: String,
    pub duration: f64,
    pub final_position: Point3d,
    pub final_speed: f64,
    pub max_speed: f64,
    pub airborne_ticks: u64,
    pub distance: f64,
}

impl DriveResult {
    /// print_drive_result prints the result to the console output.
    pub fn print_drive_result(&self) {
        println!("RESULT: {}", self);
    }
}

impl fmt::Display for DriveResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} ({}): duration {:.2}s, distance {:.2}m, final position ({:.2}, {:.2}, {:.2})m, \
            final speed {:.2}m/s, max speed {:.2}m/s, airborne time steps {}",
            self.scenario_name,
            self.vehicle_name,
            self.duration,
            self.distance,
            self.final_position.x,
            self.final_position.y,
            self.final_position.z,
            self.final_speed,
            self.max_speed,
            self.airborne_ticks
        )
    }
}
