use crate::core::vehicle::VehicleError;
use helpers::general::is_positive_finite;
use helpers::geometry::{Point3d, Quaternion, Vector3d};
use serde::Deserialize;

/// * `position` - (m) Chassis connection point in body coordinates (ray origin)
/// * `suspension_axis` - Direction of the suspension in body coordinates (ray direction, usually
/// pointing down)
/// * `axle_axis` - Direction of the wheel axle in body coordinates
/// * `forward_axis` - Driving direction of the wheel in body coordinates
/// * `radius` - (m) Wheel radius
/// * `suspension_rest_length` - (m) Unloaded spring length, also the raycast length
/// * `suspension_force` - (N) Spring force at full compression
/// * `damping` - (-) Damping coefficient relative to the suspension force
/// * `side_force` - (kg) Lateral traction constant, multiplied with the desired lateral
/// acceleration
/// * `side_force_position_ratio` - (-) Position of the lateral force application point between the
/// hit point (0.0) and the chassis connection point (1.0)
/// * `rotation_multiplier` - (-) Scales the visual wheel spin
/// * `steerable` - True if the wheel follows the steering input
/// * `driven` - True if the engine force is applied to the wheel
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WheelPars {
    pub position: Point3d,
    pub suspension_axis: Vector3d,
    pub axle_axis: Vector3d,
    pub forward_axis: Vector3d,
    pub radius: f64,
    pub suspension_rest_length: f64,
    pub suspension_force: f64,
    pub damping: f64,
    pub side_force: f64,
    pub side_force_position_ratio: f64,
    pub rotation_multiplier: f64,
    pub steerable: bool,
    pub driven: bool,
}

impl Default for WheelPars {
    fn default() -> Self {
        WheelPars {
            position: Point3d::origin(),
            suspension_axis: Vector3d::new(0.0, -1.0, 0.0),
            axle_axis: Vector3d::new(-1.0, 0.0, 0.0),
            forward_axis: Vector3d::new(0.0, 0.0, 1.0),
            radius: 0.2,
            suspension_rest_length: 0.5,
            suspension_force: 15000.0,
            damping: 0.1,
            side_force: 40.0,
            side_force_position_ratio: 0.1,
            rotation_multiplier: 0.1,
            steerable: false,
            driven: false,
        }
    }
}

/// Wheel contains the fixed geometry and tuning of a single contact point as well as its dynamic
/// state. The dynamic state is written by the vehicle update (raycast, forces, visuals) and by the
/// controls (steering, forward_force).
#[derive(Debug, Clone)]
pub struct Wheel {
    // geometry and tuning
    pub position: Point3d,
    pub suspension_axis: Vector3d,
    pub axle_axis: Vector3d,
    pub forward_axis: Vector3d,
    pub radius: f64,
    pub suspension_rest_length: f64,
    pub suspension_force: f64,
    pub damping: f64,
    pub side_force: f64,
    pub side_force_position_ratio: f64,
    pub rotation_multiplier: f64,
    pub steerable: bool,
    pub driven: bool,
    // world state
    pub world_position: Point3d,
    pub world_suspension_axis: Vector3d,
    pub world_axle_axis: Vector3d,
    pub world_forward_axis: Vector3d,
    pub world_rotation: Quaternion,
    // contact state
    pub in_contact: bool,
    pub hit_point: Point3d,
    pub hit_normal: Vector3d,
    pub hit_distance: f64,
    pub suspension_length: f64, // always within [0, suspension_rest_length]
    pub previous_suspension_length: f64,
    // driving state
    pub steering: f64,
    pub forward_force: f64,
    pub rotation: f64,
    pub spin_rotation: Quaternion,
    pub contact_position: Point3d,
}

impl Wheel {
    /// new creates a wheel from its parameters. The axes are normalized. A rest length that is not
    /// positive would break the compression ratio and is rejected.
    pub fn new(wheel_pars: &WheelPars) -> Result<Wheel, VehicleError> {
        if !is_positive_finite(wheel_pars.suspension_rest_length) {
            return Err(VehicleError::InvalidRestLength(
                wheel_pars.suspension_rest_length,
            ));
        }

        let suspension_axis = wheel_pars.suspension_axis.normalized_or_zero();
        let axle_axis = wheel_pars.axle_axis.normalized_or_zero();
        let forward_axis = wheel_pars.forward_axis.normalized_or_zero();

        Ok(Wheel {
            position: wheel_pars.position,
            suspension_axis,
            axle_axis,
            forward_axis,
            radius: wheel_pars.radius,
            suspension_rest_length: wheel_pars.suspension_rest_length,
            suspension_force: wheel_pars.suspension_force,
            damping: wheel_pars.damping,
            side_force: wheel_pars.side_force,
            side_force_position_ratio: wheel_pars.side_force_position_ratio,
            rotation_multiplier: wheel_pars.rotation_multiplier,
            steerable: wheel_pars.steerable,
            driven: wheel_pars.driven,
            world_position: wheel_pars.position,
            world_suspension_axis: suspension_axis,
            world_axle_axis: axle_axis,
            world_forward_axis: forward_axis,
            world_rotation: Quaternion::identity(),
            in_contact: false,
            hit_point: wheel_pars.position,
            hit_normal: suspension_axis.neg(),
            hit_distance: wheel_pars.suspension_rest_length,
            suspension_length: 0.0,
            previous_suspension_length: 0.0,
            steering: 0.0,
            forward_force: 0.0,
            rotation: 0.0,
            spin_rotation: Quaternion::identity(),
            contact_position: wheel_pars.position,
        })
    }

    /// compression_ratio returns the current suspension length relative to the rest length.
    pub fn compression_ratio(&self) -> f64 {
        self.suspension_length / self.suspension_rest_length
    }
}
