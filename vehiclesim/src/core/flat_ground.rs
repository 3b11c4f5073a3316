use crate::core::physics::{PhysicsWorld, RaycastHit};
use helpers::geometry::{Point3d, Vector3d};
use serde::Deserialize;

/// * `ground_height` - (m) Height of the horizontal ground plane
/// * `gravity` - (m/s^2) Gravity acceleration vector
#[derive(Debug, Deserialize, Clone)]
pub struct WorldPars {
    #[serde(default)]
    pub ground_height: f64,
    #[serde(default = "default_gravity")]
    pub gravity: Vector3d,
}

fn default_gravity() -> Vector3d {
    Vector3d::new(0.0, -9.81, 0.0)
}

impl Default for WorldPars {
    fn default() -> Self {
        WorldPars {
            ground_height: 0.0,
            gravity: default_gravity(),
        }
    }
}

/// FlatGround is a world consisting of an infinite horizontal plane (normal +y).
#[derive(Debug, Clone)]
pub struct FlatGround {
    pub ground_height: f64,
    pub gravity: Vector3d,
    pub timestep_size: f64,
}

impl FlatGround {
    pub fn new(world_pars: &WorldPars, timestep_size: f64) -> FlatGround {
        FlatGround {
            ground_height: world_pars.ground_height,
            gravity: world_pars.gravity,
            timestep_size,
        }
    }
}

impl PhysicsWorld for FlatGround {
    /// A ray starting below the ground reports a hit at its origin, such that sunken wheels still
    /// push the body back up.
    fn raycast(&self, origin: &Point3d, target_point: &Point3d) -> Option<RaycastHit> {
        let normal = Vector3d::unit_y();

        if origin.y <= self.ground_height {
            return Some(RaycastHit {
                point: *origin,
                normal,
                distance: 0.0,
            });
        }

        if target_point.y > self.ground_height {
            return None;
        }

        let ray = target_point.sub(origin);
        let frac = (self.ground_height - origin.y) / ray.dy;

        Some(RaycastHit {
            point: origin.shift(&ray.mult(frac)),
            normal,
            distance: ray.abs() * frac,
        })
    }

    fn fixed_timestep(&self) -> f64 {
        self.timestep_size
    }

    fn gravity(&self) -> Vector3d {
        self.gravity
    }
}
