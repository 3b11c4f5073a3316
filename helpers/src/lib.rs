pub mod buffer;
pub mod general;
pub mod geometry;

#[cfg(test)]
mod buffer_tests {
    use crate::buffer::RingBuffer;
    use approx::assert_ulps_eq;

    #[test]
    fn test_ringbuffer_1() {
        let x: RingBuffer<u32> = RingBuffer::new(5);
        assert!(x.get_avg().is_none());
        assert!(x.get_max().is_none());
    }
    #[test]
    fn test_ringbuffer_2() {
        let mut x: RingBuffer<u32> = RingBuffer::new(5);
        x.push(3);
        x.push(4);
        assert_ulps_eq!(x.get_avg().unwrap(), 3.5);
        assert_eq!(x.len(), 2);
        assert!(!x.is_empty());
    }
    #[test]
    fn test_ringbuffer_3() {
        let mut x: RingBuffer<u32> = RingBuffer::new(5);
        x.push(3);
        x.push(4);
        x.push(2);
        x.push(1);
        x.push(5);
        x.push(10);
        assert_ulps_eq!(x.get_avg().unwrap(), 4.4);
        assert_ulps_eq!(x.get_max().unwrap(), 10.0);
        assert_eq!(x.len(), 5);
    }
    #[test]
    fn test_ringbuffer_zero_capacity() {
        let mut x: RingBuffer<f64> = RingBuffer::new(0);
        x.push(1.0);
        x.push(2.0);
        assert_eq!(x.len(), 1);
        assert_ulps_eq!(x.get_avg().unwrap(), 2.0);
    }
}


#[cfg(test)]
mod geometry_tests {
    use crate::geometry::{Point3d, Quaternion, Transform, Vector3d};
    use approx::assert_relative_eq;
    use approx::assert_ulps_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_vector3d_sub() {
        let v1 = Vector3d::new(5.0, 5.0, 1.0);
        let v2 = Vector3d::new(2.0, -1.0, 1.0);
        assert_eq!(v1.sub(&v2), Vector3d::new(3.0, 6.0, 0.0));
    }
    #[test]
    fn test_vector3d_dot() {
        let v1 = Vector3d::new(1.0, 2.0, 3.0);
        let v2 = Vector3d::new(-2.0, 0.5, 4.0);
        assert_ulps_eq!(v1.dot(&v2), 11.0);
    }
    #[test]
    fn test_vector3d_cross() {
        assert_eq!(
            Vector3d::unit_x().cross(&Vector3d::unit_y()),
            Vector3d::unit_z()
        );
    }
    #[test]
    fn test_vector3d_normalized_or_zero() {
        assert_eq!(Vector3d::zero().normalized_or_zero(), Vector3d::zero());
        assert_ulps_eq!(Vector3d::new(3.0, 0.0, 4.0).normalized_or_zero().abs(), 1.0);
    }
    #[test]
    fn test_vector3d_lerp() {
        let v1 = Vector3d::new(1.0, 0.0, 0.0);
        let v2 = Vector3d::new(0.0, 0.0, 2.0);
        assert_eq!(v1.lerp(&v2, 0.5), Vector3d::new(0.5, 0.0, 1.0));
    }

    #[test]
    fn test_point3d_lerp() {
        let p1 = Point3d::new(0.0, 0.0, 0.0);
        let p2 = Point3d::new(0.0, 1.0, 0.0);
        assert_eq!(p1.lerp(&p2, 0.1), Point3d::new(0.0, 0.1, 0.0));
        assert_ulps_eq!(p1.dist(&p2), 1.0);
    }

    #[test]
    fn test_quaternion_rotate() {
        let q = Quaternion::from_axis_angle(&Vector3d::unit_y(), FRAC_PI_2);
        let v = q.rotate(&Vector3d::unit_z());
        assert_relative_eq!(v.dx, 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.dy, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.dz, 0.0, epsilon = 1e-12);
    }
    #[test]
    fn test_quaternion_mult_order() {
        // rotate about z first, then about x
        let q_z = Quaternion::from_axis_angle(&Vector3d::unit_z(), FRAC_PI_2);
        let q_x = Quaternion::from_axis_angle(&Vector3d::unit_x(), FRAC_PI_2);
        let v = q_x.mult(&q_z).rotate(&Vector3d::unit_x());
        assert_relative_eq!(v.dx, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.dy, 0.0, epsilon = 1e-12);
        assert_relative_eq!(v.dz, 1.0, epsilon = 1e-12);
    }
    #[test]
    fn test_quaternion_conjugate_inverts() {
        let q = Quaternion::from_axis_angle(&Vector3d::new(1.0, 2.0, -0.5), 0.7);
        let v = Vector3d::new(0.3, -1.2, 2.0);
        let v_back = q.conjugate().rotate(&q.rotate(&v));
        assert_relative_eq!(v_back.dx, v.dx, epsilon = 1e-12);
        assert_relative_eq!(v_back.dy, v.dy, epsilon = 1e-12);
        assert_relative_eq!(v_back.dz, v.dz, epsilon = 1e-12);
    }
    #[test]
    fn test_quaternion_zero_axis() {
        assert_eq!(
            Quaternion::from_axis_angle(&Vector3d::zero(), 1.0),
            Quaternion::identity()
        );
    }
    #[test]
    fn test_quaternion_integrate() {
        let q = Quaternion::identity().integrate(&Vector3d::new(0.0, FRAC_PI_2, 0.0), 1.0);
        let v = q.rotate(&Vector3d::unit_z());
        assert_relative_eq!(v.dx, 1.0, epsilon = 1e-12);
        assert_relative_eq!(v.dz, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_point() {
        let tf = Transform::new(
            Point3d::new(1.0, 2.0, 3.0),
            Quaternion::from_axis_angle(&Vector3d::unit_y(), FRAC_PI_2),
        );
        let p = tf.transform_point(&Point3d::new(0.0, 0.0, 1.0));
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(p.z, 3.0, epsilon = 1e-12);
    }
    #[test]
    fn test_transform_inverse_vector() {
        let tf = Transform::new(
            Point3d::origin(),
            Quaternion::from_axis_angle(&Vector3d::unit_y(), FRAC_PI_2),
        );
        let local = tf.inverse_transform_vector(&Vector3d::unit_x());
        assert_relative_eq!(local.dz, 1.0, epsilon = 1e-12);
    }
}
