use crate::general::lin_interp;
use approx::ulps_eq;
use serde::{Deserialize, Serialize};

// POINT -------------------------------------------------------------------------------------------
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct Point3d {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3d {
    pub fn new(x: f64, y: f64, z: f64) -> Point3d {
        Point3d { x, y, z }
    }
    pub fn origin() -> Point3d {
        Point3d::default()
    }
    pub fn as_vector3d(&self) -> Vector3d {
        Vector3d {
            dx: self.x,
            dy: self.y,
            dz: self.z,
        }
    }
    pub fn shift(&self, other: &Vector3d) -> Point3d {
        self.as_vector3d().add(other).as_point3d()
    }
    /// sub returns the vector pointing from other to self.
    pub fn sub(&self, other: &Point3d) -> Vector3d {
        self.as_vector3d().sub(&other.as_vector3d())
    }
    pub fn dist(&self, other: &Point3d) -> f64 {
        self.sub(other).abs()
    }
    /// lerp returns the point at fraction t on the line from self (t = 0) to other (t = 1).
    pub fn lerp(&self, other: &Point3d, t: f64) -> Point3d {
        Point3d {
            x: lin_interp(self.x, other.x, t),
            y: lin_interp(self.y, other.y, t),
            z: lin_interp(self.z, other.z, t),
        }
    }
}

impl PartialEq for Point3d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.x, other.x) && ulps_eq!(self.y, other.y) && ulps_eq!(self.z, other.z)
    }
}

// VECTOR ------------------------------------------------------------------------------------------
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default)]
pub struct Vector3d {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Vector3d {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Vector3d {
        Vector3d { dx, dy, dz }
    }
    pub fn zero() -> Vector3d {
        Vector3d::default()
    }
    pub fn unit_x() -> Vector3d {
        Vector3d::new(1.0, 0.0, 0.0)
    }
    pub fn unit_y() -> Vector3d {
        Vector3d::new(0.0, 1.0, 0.0)
    }
    pub fn unit_z() -> Vector3d {
        Vector3d::new(0.0, 0.0, 1.0)
    }
    pub fn as_point3d(&self) -> Point3d {
        Point3d {
            x: self.dx,
            y: self.dy,
            z: self.dz,
        }
    }
    pub fn sub(&self, other: &Self) -> Vector3d {
        Vector3d {
            dx: self.dx - other.dx,
            dy: self.dy - other.dy,
            dz: self.dz - other.dz,
        }
    }
    pub fn add(&self, other: &Self) -> Vector3d {
        Vector3d {
            dx: self.dx + other.dx,
            dy: self.dy + other.dy,
            dz: self.dz + other.dz,
        }
    }
    pub fn mult(&self, k: f64) -> Vector3d {
        Vector3d {
            dx: self.dx * k,
            dy: self.dy * k,
            dz: self.dz * k,
        }
    }
    pub fn neg(&self) -> Vector3d {
        self.mult(-1.0)
    }
    pub fn dot(&self, other: &Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy + self.dz * other.dz
    }
    pub fn cross(&self, other: &Self) -> Vector3d {
        Vector3d {
            dx: self.dy * other.dz - self.dz * other.dy,
            dy: self.dz * other.dx - self.dx * other.dz,
            dz: self.dx * other.dy - self.dy * other.dx,
        }
    }
    pub fn abs(&self) -> f64 {
        (self.dx.powf(2.0) + self.dy.powf(2.0) + self.dz.powf(2.0)).sqrt()
    }
    pub fn normalized(&self) -> Vector3d {
        self.mult(1.0 / self.abs())
    }
    /// normalized_or_zero returns the zero vector instead of NaN components for (almost) zero
    /// length vectors.
    pub fn normalized_or_zero(&self) -> Vector3d {
        let len = self.abs();
        if len <= f64::EPSILON {
            Vector3d::zero()
        } else {
            self.mult(1.0 / len)
        }
    }
    /// lerp returns the linear interpolation between self (t = 0) and other (t = 1).
    pub fn lerp(&self, other: &Self, t: f64) -> Vector3d {
        Vector3d {
            dx: lin_interp(self.dx, other.dx, t),
            dy: lin_interp(self.dy, other.dy, t),
            dz: lin_interp(self.dz, other.dz, t),
        }
    }
}

impl PartialEq for Vector3d {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.dx, other.dx) && ulps_eq!(self.dy, other.dy) && ulps_eq!(self.dz, other.dz)
    }
}

// QUATERNION --------------------------------------------------------------------------------------
/// Rotation quaternion (w + xi + yj + zk). Rotations are only meaningful for unit quaternions,
/// use normalized() after chaining many multiplications.
#[derive(Debug, Serialize, Deserialize, Clone, Copy)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::identity()
    }
}

impl Quaternion {
    pub fn identity() -> Quaternion {
        Quaternion {
            w: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }
    /// from_axis_angle creates the rotation by angle (rad) about axis (right-hand rule). The axis
    /// does not have to be normalized, a zero axis results in the identity.
    pub fn from_axis_angle(axis: &Vector3d, angle: f64) -> Quaternion {
        let axis = axis.normalized_or_zero();
        let (s, c) = (0.5 * angle).sin_cos();
        Quaternion {
            w: c,
            x: axis.dx * s,
            y: axis.dy * s,
            z: axis.dz * s,
        }
        .normalized()
    }
    /// mult returns the Hamilton product self * other, i.e. other is applied first.
    pub fn mult(&self, other: &Self) -> Quaternion {
        Quaternion {
            w: self.w * other.w - self.x * other.x - self.y * other.y - self.z * other.z,
            x: self.w * other.x + self.x * other.w + self.y * other.z - self.z * other.y,
            y: self.w * other.y - self.x * other.z + self.y * other.w + self.z * other.x,
            z: self.w * other.z + self.x * other.y - self.y * other.x + self.z * other.w,
        }
    }
    pub fn conjugate(&self) -> Quaternion {
        Quaternion {
            w: self.w,
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
    pub fn norm(&self) -> f64 {
        (self.w.powf(2.0) + self.x.powf(2.0) + self.y.powf(2.0) + self.z.powf(2.0)).sqrt()
    }
    pub fn normalized(&self) -> Quaternion {
        let norm = self.norm();
        if norm <= f64::EPSILON {
            return Quaternion::identity();
        }
        Quaternion {
            w: self.w / norm,
            x: self.x / norm,
            y: self.y / norm,
            z: self.z / norm,
        }
    }
    /// rotate applies the rotation to a vector (the quaternion is assumed to be normalized).
    pub fn rotate(&self, v: &Vector3d) -> Vector3d {
        // v' = v + 2w (q x v) + 2 q x (q x v) with q being the vector part
        let q = Vector3d::new(self.x, self.y, self.z);
        let t = q.cross(v).mult(2.0);
        v.add(&t.mult(self.w)).add(&q.cross(&t))
    }
    /// integrate advances the orientation by the angular velocity omega (rad/s, world frame) over
    /// the time step dt.
    pub fn integrate(&self, omega: &Vector3d, dt: f64) -> Quaternion {
        let angle = omega.abs() * dt;
        if angle <= f64::EPSILON {
            return *self;
        }
        Quaternion::from_axis_angle(omega, angle)
            .mult(self)
            .normalized()
    }
}

impl PartialEq for Quaternion {
    fn eq(&self, other: &Self) -> bool {
        ulps_eq!(self.w, other.w)
            && ulps_eq!(self.x, other.x)
            && ulps_eq!(self.y, other.y)
            && ulps_eq!(self.z, other.z)
    }
}

// TRANSFORM ---------------------------------------------------------------------------------------
/// Rigid transform consisting of a rotation followed by a translation to origin.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq)]
pub struct Transform {
    pub origin: Point3d,
    pub rotation: Quaternion,
}

impl Transform {
    pub fn new(origin: Point3d, rotation: Quaternion) -> Transform {
        Transform { origin, rotation }
    }
    /// transform_point maps a point from local into world space.
    pub fn transform_point(&self, p: &Point3d) -> Point3d {
        self.origin.shift(&self.rotation.rotate(&p.as_vector3d()))
    }
    /// transform_vector maps a direction from local into world space (no translation).
    pub fn transform_vector(&self, v: &Vector3d) -> Vector3d {
        self.rotation.rotate(v)
    }
    /// inverse_transform_vector maps a direction from world into local space.
    pub fn inverse_transform_vector(&self, v: &Vector3d) -> Vector3d {
        self.rotation.conjugate().rotate(v)
    }
}
