use helpers::geometry::{Point3d, Transform, Vector3d};

/// Result of a successful raycast.
///
/// * `point` - World position of the intersection
/// * `normal` - Surface normal at the intersection (unit length)
/// * `distance` - Distance between ray origin and intersection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub point: Point3d,
    pub normal: Vector3d,
    pub distance: f64,
}

/// PhysicsWorld is the part of the physics engine the vehicle model queries: scene raycasts and
/// the global simulation settings.
pub trait PhysicsWorld {
    /// raycast casts a ray from origin towards target_point and returns the closest hit on the
    /// segment between both points (None in case of a miss).
    fn raycast(&self, origin: &Point3d, target_point: &Point3d) -> Option<RaycastHit>;

    /// fixed_timestep returns the simulation time step size in seconds.
    fn fixed_timestep(&self) -> f64;

    /// gravity returns the gravity acceleration vector (m/s^2).
    fn gravity(&self) -> Vector3d;
}

/// RigidBody is the chassis body of a vehicle as provided by the physics engine. The vehicle
/// model only accumulates forces, the engine integrates them afterwards.
pub trait RigidBody {
    fn world_transform(&self) -> Transform;

    fn linear_velocity(&self) -> Vector3d;

    fn angular_velocity(&self) -> Vector3d;

    fn set_angular_velocity(&mut self, angular_velocity: Vector3d);

    /// apply_force applies a world-space force at a world-space point of the body.
    fn apply_force(&mut self, force: &Vector3d, at_world_point: &Point3d);

    /// velocity_at_point returns the velocity of the body at a world-space point (linear velocity
    /// plus the contribution of the angular velocity).
    fn velocity_at_point(&self, world_point: &Point3d) -> Vector3d {
        let lever_arm = world_point.sub(&self.world_transform().origin);
        self.linear_velocity()
            .add(&self.angular_velocity().cross(&lever_arm))
    }
}
