use crate::core::controls::ControlPars;
use crate::core::physics::{PhysicsWorld, RigidBody};
use crate::core::wheel::{Wheel, WheelPars};
use helpers::general::is_positive_finite;
use helpers::geometry::{Point3d, Quaternion, Transform, Vector3d};
use serde::Deserialize;
use thiserror::Error;

// time to impact below which the predictive landing correction is skipped (s)
const MIN_TIME_TO_IMPACT: f64 = 1e-6;

#[derive(Debug, Error)]
pub enum VehicleError {
    #[error("no physics context was attached before building the vehicle")]
    MissingPhysics,

    #[error("fixed time step must be positive and finite, but is {0}")]
    InvalidTimestep(f64),

    #[error("suspension rest length must be positive and finite, but is {0}")]
    InvalidRestLength(f64),
}

/// * `wheel_a` - Index of the first wheel of the axle in the wheel list
/// * `wheel_b` - Index of the second wheel of the axle in the wheel list
/// * `force` - (N) Force applied at a compression difference equal to the average rest length
#[derive(Debug, Deserialize, Clone)]
pub struct AntiRollAxlePars {
    pub wheel_a: usize,
    pub wheel_b: usize,
    pub force: f64,
}

/// * `frames` - Number of time steps the airborne trajectory is predicted ahead
/// * `blend_ratio` - (-) Fraction by which the angular velocity is moved towards the landing
/// target in every airborne time step
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PredictionPars {
    pub frames: u32,
    pub blend_ratio: f64,
}

impl Default for PredictionPars {
    fn default() -> Self {
        PredictionPars {
            frames: 60,
            blend_ratio: 0.6,
        }
    }
}

/// * `name` - Vehicle name, e.g. buggy
/// * `wheels` - Wheel parameters, the order determines the wheel indices
/// * `anti_roll_axles` - Wheel pairs that are balanced against each other
/// * `prediction` - Predictive landing tuning
/// * `controls` - Engine, brake and steering tuning of the input layer
#[derive(Debug, Deserialize, Clone)]
pub struct VehiclePars {
    pub name: String,
    pub wheels: Vec<WheelPars>,
    #[serde(default)]
    pub anti_roll_axles: Vec<AntiRollAxlePars>,
    #[serde(default)]
    pub prediction: PredictionPars,
    #[serde(default)]
    pub controls: ControlPars,
}

/// VehicleBuilder assembles a vehicle from a rigid body and its wheel parameters. The physics
/// context must be attached before building, its fixed time step is queried once at that point.
#[derive(Debug)]
pub struct VehicleBuilder<B: RigidBody> {
    body: B,
    wheel_pars: Vec<WheelPars>,
    anti_roll_axles: Vec<AntiRollAxlePars>,
    prediction: PredictionPars,
    fixed_timestep: Option<f64>,
}

impl<B: RigidBody> VehicleBuilder<B> {
    pub fn new(body: B) -> VehicleBuilder<B> {
        VehicleBuilder {
            body,
            wheel_pars: Vec::new(),
            anti_roll_axles: Vec::new(),
            prediction: PredictionPars::default(),
            fixed_timestep: None,
        }
    }

    pub fn from_pars(body: B, vehicle_pars: &VehiclePars) -> VehicleBuilder<B> {
        VehicleBuilder {
            body,
            wheel_pars: vehicle_pars.wheels.to_owned(),
            anti_roll_axles: vehicle_pars.anti_roll_axles.to_owned(),
            prediction: vehicle_pars.prediction.to_owned(),
            fixed_timestep: None,
        }
    }

    pub fn wheel(mut self, wheel_pars: WheelPars) -> VehicleBuilder<B> {
        self.wheel_pars.push(wheel_pars);
        self
    }

    pub fn anti_roll_axle(mut self, axle_pars: AntiRollAxlePars) -> VehicleBuilder<B> {
        self.anti_roll_axles.push(axle_pars);
        self
    }

    pub fn prediction(mut self, prediction: PredictionPars) -> VehicleBuilder<B> {
        self.prediction = prediction;
        self
    }

    pub fn physics<W: PhysicsWorld + ?Sized>(mut self, world: &W) -> VehicleBuilder<B> {
        self.fixed_timestep = Some(world.fixed_timestep());
        self
    }

    pub fn build(self) -> Result<Vehicle<B>, VehicleError> {
        let fixed_timestep = self.fixed_timestep.ok_or(VehicleError::MissingPhysics)?;

        if !is_positive_finite(fixed_timestep) {
            return Err(VehicleError::InvalidTimestep(fixed_timestep));
        }

        let wheels = self
            .wheel_pars
            .iter()
            .map(Wheel::new)
            .collect::<Result<Vec<Wheel>, VehicleError>>()?;

        for axle in self.anti_roll_axles.iter() {
            if axle.wheel_a >= wheels.len() || axle.wheel_b >= wheels.len() {
                log::warn!(
                    "Anti-roll axle ({}, {}) references a wheel that does not exist, it will not \
                    apply any force",
                    axle.wheel_a,
                    axle.wheel_b
                );
            }
        }

        Ok(Vehicle {
            body: self.body,
            wheels,
            anti_roll_axles: self.anti_roll_axles,
            prediction: self.prediction,
            fixed_timestep,
            speed: 0.0,
            no_wheels_in_contact: 0,
        })
    }
}

#[derive(Debug)]
pub struct Vehicle<B: RigidBody> {
    body: B,
    wheels: Vec<Wheel>,
    anti_roll_axles: Vec<AntiRollAxlePars>,
    prediction: PredictionPars,
    fixed_timestep: f64,
    speed: f64,
    no_wheels_in_contact: usize,
}

impl<B: RigidBody> Vehicle<B> {
    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn wheels(&self) -> &[Wheel] {
        &self.wheels
    }

    pub fn wheels_mut(&mut self) -> &mut [Wheel] {
        &mut self.wheels
    }

    /// speed returns the forward speed (m/s) determined in the latest update, negative when
    /// rolling backwards.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn no_wheels_in_contact(&self) -> usize {
        self.no_wheels_in_contact
    }

    pub fn fixed_timestep(&self) -> f64 {
        self.fixed_timestep
    }

    /// set_engine_force sets the forward force of all driven wheels.
    pub fn set_engine_force(&mut self, force: f64) {
        for wheel in self.wheels.iter_mut().filter(|wheel| wheel.driven) {
            wheel.forward_force = force;
        }
    }

    /// set_steering sets the steering angle (rad) of all steerable wheels.
    pub fn set_steering(&mut self, angle: f64) {
        for wheel in self.wheels.iter_mut().filter(|wheel| wheel.steerable) {
            wheel.steering = angle;
        }
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// The method simulates one fixed time step of the vehicle. The forces are applied to the
    /// body, integrating them is up to the physics engine. Execution order:
    /// 1. Read the world transform of the body and reset the ground contact counter.
    /// 2. Determine the forward speed from the body-local linear velocity.
    /// 3. For every wheel (in list order): update its world transform and steering, raycast
    /// along the suspension, apply suspension, side and forward forces, and update the contact
    /// position and spin.
    /// 4. Correct the angular velocity towards the expected landing orientation if no wheel
    /// touches the ground.
    /// 5. Distribute the anti-roll forces between the wheels of each anti-roll axle.
    pub fn update<W: PhysicsWorld + ?Sized>(&mut self, world: &W) {
        let dt = self.fixed_timestep;
        let body_tf = self.body.world_transform();

        self.no_wheels_in_contact = 0;
        self.speed = body_tf
            .inverse_transform_vector(&self.body.linear_velocity())
            .dz;

        for wheel in self.wheels.iter_mut() {
            update_wheel_transform(wheel, &body_tf);
            update_steering(wheel, &body_tf);

            if raycast_wheel(wheel, world) {
                self.no_wheels_in_contact += 1;
            }

            if let Some(force) = update_suspension(wheel, dt) {
                self.body.apply_force(&force, &wheel.hit_point);
            }

            if let Some((force, point)) = side_force(wheel, &self.body, dt) {
                self.body.apply_force(&force, &point);
            }

            if wheel.in_contact && wheel.forward_force != 0.0 {
                let force = wheel.world_forward_axis.mult(wheel.forward_force);
                self.body.apply_force(&force, &wheel.hit_point);
            }

            update_contact_position(wheel);
            update_rotation(wheel, self.speed);
        }

        if self.no_wheels_in_contact == 0 {
            self.predict_landing(world, &body_tf);
        }

        self.apply_anti_roll();
    }

    // ---------------------------------------------------------------------------------------------
    // VEHICLE PARTS -------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// The method predicts the ballistic trajectory of the airborne body and raycasts along it. If
    /// the ground is hit, the angular velocity is blended towards the angular velocity that
    /// aligns the body's up axis with the ground normal at the time of impact.
    fn predict_landing<W: PhysicsWorld + ?Sized>(&mut self, world: &W, body_tf: &Transform) {
        let t_pred = self.prediction.frames as f64 * self.fixed_timestep;
        let position = body_tf.origin;
        let predicted_position = position
            .shift(&self.body.linear_velocity().mult(t_pred))
            .shift(&world.gravity().mult(0.5 * t_pred * t_pred));

        let path_length = predicted_position.dist(&position);
        if path_length <= f64::EPSILON {
            return;
        }

        let hit = match world.raycast(&position, &predicted_position) {
            Some(hit) => hit,
            None => return,
        };

        // the chord fraction is used as an estimate of the time fraction until the impact
        let time_to_impact = t_pred * hit.distance / path_length;
        if time_to_impact <= MIN_TIME_TO_IMPACT {
            return;
        }

        let up = body_tf.transform_vector(&Vector3d::unit_y());
        let target = landing_angular_velocity(&up, &hit.normal, time_to_impact);
        let angular_velocity = self
            .body
            .angular_velocity()
            .lerp(&target, self.prediction.blend_ratio);

        log::trace!(
            "Landing predicted in {:.3}s, blending angular velocity towards {:?}",
            time_to_impact,
            target
        );

        self.body.set_angular_velocity(angular_velocity);
    }

    /// The method applies equal and opposite forces to the wheels of every anti-roll axle such
    /// that the more compressed wheel pushes the body up and the less compressed one pulls it
    /// down.
    fn apply_anti_roll(&mut self) {
        for axle in self.anti_roll_axles.iter() {
            let (wheel_a, wheel_b) = match (
                self.wheels.get(axle.wheel_a),
                self.wheels.get(axle.wheel_b),
            ) {
                (Some(wheel_a), Some(wheel_b)) => (wheel_a, wheel_b),
                _ => continue,
            };

            if !wheel_a.in_contact && !wheel_b.in_contact {
                continue;
            }

            let (wheel_low, wheel_high) = if wheel_a.suspension_length <= wheel_b.suspension_length
            {
                (wheel_a, wheel_b)
            } else {
                (wheel_b, wheel_a)
            };

            let rest_length_avg =
                0.5 * (wheel_low.suspension_rest_length + wheel_high.suspension_rest_length);
            let compression_diff = (wheel_high.suspension_length - wheel_low.suspension_length)
                .min(rest_length_avg);
            let force = axle.force * compression_diff / rest_length_avg;

            self.body.apply_force(
                &wheel_low.world_suspension_axis.mult(force),
                &wheel_low.world_position,
            );
            self.body.apply_force(
                &wheel_high.world_suspension_axis.mult(-force),
                &wheel_high.world_position,
            );
        }
    }
}

/// landing_angular_velocity returns the angular velocity that rotates the direction up onto the
/// direction normal within time_to_impact. Antiparallel directions have no unique rotation axis,
/// the result is zero in that case.
pub fn landing_angular_velocity(up: &Vector3d, normal: &Vector3d, time_to_impact: f64) -> Vector3d {
    let up = up.normalized_or_zero();
    let normal = normal.normalized_or_zero();
    let axis = up.cross(&normal).normalized_or_zero();
    let angle = up.dot(&normal).max(-1.0).min(1.0).acos();
    axis.mult(angle / time_to_impact)
}

// -------------------------------------------------------------------------------------------------
// WHEEL UPDATE STEPS ------------------------------------------------------------------------------
// -------------------------------------------------------------------------------------------------

fn update_wheel_transform(wheel: &mut Wheel, body_tf: &Transform) {
    wheel.world_position = body_tf.transform_point(&wheel.position);
    wheel.world_suspension_axis = body_tf.transform_vector(&wheel.suspension_axis);
}

fn update_steering(wheel: &mut Wheel, body_tf: &Transform) {
    let steering_rotation =
        Quaternion::from_axis_angle(&wheel.suspension_axis.neg(), wheel.steering);
    wheel.world_rotation = body_tf.rotation.mult(&steering_rotation).normalized();
    wheel.world_axle_axis = wheel.world_rotation.rotate(&wheel.axle_axis);
    wheel.world_forward_axis = wheel.world_rotation.rotate(&wheel.forward_axis);
}

/// raycast_wheel casts the suspension ray and stores the contact information. It returns true in
/// case of ground contact.
fn raycast_wheel<W: PhysicsWorld + ?Sized>(wheel: &mut Wheel, world: &W) -> bool {
    let target_point = wheel.world_position.shift(
        &wheel
            .world_suspension_axis
            .mult(wheel.suspension_rest_length),
    );

    match world.raycast(&wheel.world_position, &target_point) {
        Some(hit) => {
            wheel.in_contact = true;
            wheel.hit_point = hit.point;
            wheel.hit_normal = hit.normal;
            wheel.hit_distance = hit.distance;
        }
        None => {
            wheel.in_contact = false;
            wheel.hit_point = target_point;
            wheel.hit_normal = wheel.world_suspension_axis.neg();
            wheel.hit_distance = wheel.suspension_rest_length;
        }
    }

    wheel.in_contact
}

/// update_suspension determines the new suspension length and returns the resulting spring and
/// damper force (None without ground contact).
fn update_suspension(wheel: &mut Wheel, dt: f64) -> Option<Vector3d> {
    if !wheel.in_contact {
        wheel.suspension_length = wheel.previous_suspension_length;
        return None;
    }

    wheel.suspension_length = (wheel.suspension_rest_length - wheel.hit_distance)
        .clamp(0.0, wheel.suspension_rest_length);

    let spring_force = wheel.suspension_force * wheel.compression_ratio();
    let damping_rate = (wheel.previous_suspension_length - wheel.suspension_length) / dt;
    let damping_force = damping_rate * wheel.suspension_force * wheel.damping;

    wheel.previous_suspension_length = wheel.suspension_length;

    Some(
        wheel
            .world_suspension_axis
            .neg()
            .mult(spring_force - damping_force),
    )
}

/// side_force returns the lateral traction force that cancels the slip velocity along the axle
/// within one time step, together with its application point.
fn side_force<B: RigidBody>(wheel: &Wheel, body: &B, dt: f64) -> Option<(Vector3d, Point3d)> {
    if !wheel.in_contact {
        return None;
    }

    let slip_velocity = body
        .velocity_at_point(&wheel.hit_point)
        .dot(&wheel.world_axle_axis);
    let desired_acceleration = -slip_velocity / dt;

    Some((
        wheel
            .world_axle_axis
            .mult(wheel.side_force * desired_acceleration),
        wheel
            .hit_point
            .lerp(&wheel.world_position, wheel.side_force_position_ratio),
    ))
}

fn update_contact_position(wheel: &mut Wheel) {
    wheel.contact_position = wheel.world_position.shift(
        &wheel
            .world_suspension_axis
            .mult(wheel.hit_distance - wheel.radius),
    );
}

fn update_rotation(wheel: &mut Wheel, speed: f64) {
    wheel.rotation += speed * wheel.rotation_multiplier * wheel.radius;
    wheel.spin_rotation = wheel
        .world_rotation
        .mult(&Quaternion::from_axis_angle(&wheel.axle_axis, wheel.rotation))
        .normalized();
}
