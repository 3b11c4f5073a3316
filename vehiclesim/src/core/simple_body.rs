use crate::core::physics::RigidBody;
use helpers::geometry::{Point3d, Quaternion, Transform, Vector3d};
use serde::Deserialize;

/// * `mass` - (kg) Chassis mass
/// * `half_extents` - (m) Half size of the chassis box (used for the inertia tensor)
/// * `start_position` - (m) Initial position of the center of mass
/// * `start_heading` - (rad) Initial rotation about the vertical axis
/// * `linear_damping` - (1/s) Exponential decay rate of the linear velocity
/// * `angular_damping` - (1/s) Exponential decay rate of the angular velocity
#[derive(Debug, Deserialize, Clone)]
pub struct BodyPars {
    pub mass: f64,
    pub half_extents: Vector3d,
    pub start_position: Point3d,
    #[serde(default)]
    pub start_heading: f64,
    #[serde(default)]
    pub linear_damping: f64,
    #[serde(default)]
    pub angular_damping: f64,
}

/// SimpleBody is a single dynamic box-shaped rigid body integrated with semi-implicit Euler. It
/// accumulates the forces applied between two integrations.
#[derive(Debug, Clone)]
pub struct SimpleBody {
    inv_mass: f64,
    inv_inertia_local: Vector3d, // diagonal of the inverse inertia tensor in body coordinates
    linear_damping: f64,
    angular_damping: f64,
    transform: Transform,
    linear_velocity: Vector3d,
    angular_velocity: Vector3d,
    force_accum: Vector3d,
    torque_accum: Vector3d,
}

impl SimpleBody {
    pub fn new(body_pars: &BodyPars) -> SimpleBody {
        let m = body_pars.mass;
        let size = body_pars.half_extents.mult(2.0);

        // solid cuboid: I_xx = m / 12 * (h^2 + d^2) etc.
        let inertia = Vector3d::new(
            m / 12.0 * (size.dy.powf(2.0) + size.dz.powf(2.0)),
            m / 12.0 * (size.dx.powf(2.0) + size.dz.powf(2.0)),
            m / 12.0 * (size.dx.powf(2.0) + size.dy.powf(2.0)),
        );

        SimpleBody {
            inv_mass: inverse_or_zero(m),
            inv_inertia_local: Vector3d::new(
                inverse_or_zero(inertia.dx),
                inverse_or_zero(inertia.dy),
                inverse_or_zero(inertia.dz),
            ),
            linear_damping: body_pars.linear_damping,
            angular_damping: body_pars.angular_damping,
            transform: Transform::new(
                body_pars.start_position,
                Quaternion::from_axis_angle(&Vector3d::unit_y(), body_pars.start_heading),
            ),
            linear_velocity: Vector3d::zero(),
            angular_velocity: Vector3d::zero(),
            force_accum: Vector3d::zero(),
            torque_accum: Vector3d::zero(),
        }
    }

    /// integrate advances the body by one time step using the accumulated forces and gravity and
    /// clears the accumulators afterwards.
    pub fn integrate(&mut self, dt: f64, gravity: &Vector3d) {
        if self.inv_mass > 0.0 {
            // linear part
            let acceleration = self.force_accum.mult(self.inv_mass).add(gravity);
            self.linear_velocity = self
                .linear_velocity
                .add(&acceleration.mult(dt))
                .mult((-self.linear_damping * dt).exp());

            // angular part (inertia tensor is diagonal in body coordinates)
            let torque_local = self.transform.inverse_transform_vector(&self.torque_accum);
            let angular_acceleration = self.transform.transform_vector(&Vector3d::new(
                torque_local.dx * self.inv_inertia_local.dx,
                torque_local.dy * self.inv_inertia_local.dy,
                torque_local.dz * self.inv_inertia_local.dz,
            ));
            self.angular_velocity = self
                .angular_velocity
                .add(&angular_acceleration.mult(dt))
                .mult((-self.angular_damping * dt).exp());

            self.transform.origin = self.transform.origin.shift(&self.linear_velocity.mult(dt));
            self.transform.rotation = self.transform.rotation.integrate(&self.angular_velocity, dt);
        }

        self.force_accum = Vector3d::zero();
        self.torque_accum = Vector3d::zero();
    }
}

impl RigidBody for SimpleBody {
    fn world_transform(&self) -> Transform {
        self.transform
    }

    fn linear_velocity(&self) -> Vector3d {
        self.linear_velocity
    }

    fn angular_velocity(&self) -> Vector3d {
        self.angular_velocity
    }

    fn set_angular_velocity(&mut self, angular_velocity: Vector3d) {
        self.angular_velocity = angular_velocity;
    }

    fn apply_force(&mut self, force: &Vector3d, at_world_point: &Point3d) {
        let lever_arm = at_world_point.sub(&self.transform.origin);
        self.force_accum = self.force_accum.add(force);
        self.torque_accum = self.torque_accum.add(&lever_arm.cross(force));
    }
}

fn inverse_or_zero(x: f64) -> f64 {
    if x > 0.0 {
        1.0 / x
    } else {
        0.0
    }
}
