pub mod core {
    pub mod controls;
    pub mod drive;
    pub mod flat_ground;
    pub mod handle_drive;
    pub mod physics;
    pub mod scenario;
    pub mod simple_body;
    pub mod vehicle;
    pub mod wheel;
}
pub mod interfaces {
    pub mod vehicle_state;
}
pub mod post {
    pub mod drive_result;
}
pub mod pre {
    pub mod check_sim_opts_pars;
    pub mod read_sim_pars;
    pub mod sim_opts;
}

#[cfg(test)]
mod test_doubles {
    use crate::core::physics::{PhysicsWorld, RaycastHit, RigidBody};
    use helpers::geometry::{Point3d, Transform, Vector3d};
    use std::cell::RefCell;
    use std::collections::VecDeque;

    /// Body that records every applied force instead of integrating it.
    #[derive(Debug, Default)]
    pub struct RecordingBody {
        pub transform: Transform,
        pub linear_velocity: Vector3d,
        pub angular_velocity: Vector3d,
        pub forces: Vec<(Vector3d, Point3d)>,
    }

    impl RigidBody for RecordingBody {
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
            self.forces.push((*force, *at_world_point));
        }
    }

    /// World answering raycasts from a script of hit distances (None = miss). Once the script is
    /// used up, every raycast is answered with the fallback.
    pub struct ScriptedWorld {
        pub timestep: f64,
        pub gravity: Vector3d,
        pub normal: Vector3d,
        pub script: RefCell<VecDeque<Option<f64>>>,
        pub fallback: Option<f64>,
        pub rays: RefCell<Vec<(Point3d, Point3d)>>,
    }

    impl ScriptedWorld {
        pub fn new(timestep: f64, fallback: Option<f64>) -> ScriptedWorld {
            ScriptedWorld {
                timestep,
                gravity: Vector3d::new(0.0, -9.81, 0.0),
                normal: Vector3d::unit_y(),
                script: RefCell::new(VecDeque::new()),
                fallback,
                rays: RefCell::new(Vec::new()),
            }
        }

        pub fn push_answers(&self, answers: &[Option<f64>]) {
            self.script.borrow_mut().extend(answers.iter().copied());
        }

        pub fn no_raycasts(&self) -> usize {
            self.rays.borrow().len()
        }
    }

    impl PhysicsWorld for ScriptedWorld {
        fn raycast(&self, origin: &Point3d, target_point: &Point3d) -> Option<RaycastHit> {
            self.rays.borrow_mut().push((*origin, *target_point));
            let answer = self
                .script
                .borrow_mut()
                .pop_front()
                .unwrap_or(self.fallback);

            answer.map(|distance| RaycastHit {
                point: origin.shift(&target_point.sub(origin).normalized().mult(distance)),
                normal: self.normal,
                distance,
            })
        }
        fn fixed_timestep(&self) -> f64 {
            self.timestep
        }
        fn gravity(&self) -> Vector3d {
            self.gravity
        }
    }
}

#[cfg(test)]
mod wheel_tests {
    use crate::core::vehicle::VehicleError;
    use crate::core::wheel::{Wheel, WheelPars};
    use approx::assert_ulps_eq;
    use helpers::geometry::Vector3d;

    #[test]
    fn test_wheel_defaults() {
        let wheel = Wheel::new(&WheelPars::default()).unwrap();
        assert_ulps_eq!(wheel.radius, 0.2);
        assert_ulps_eq!(wheel.suspension_rest_length, 0.5);
        assert_ulps_eq!(wheel.suspension_force, 15000.0);
        assert_ulps_eq!(wheel.damping, 0.1);
        assert_ulps_eq!(wheel.side_force, 40.0);
        assert_ulps_eq!(wheel.side_force_position_ratio, 0.1);
        assert_ulps_eq!(wheel.rotation_multiplier, 0.1);
        assert_eq!(wheel.suspension_axis, Vector3d::new(0.0, -1.0, 0.0));
        assert_eq!(wheel.axle_axis, Vector3d::new(-1.0, 0.0, 0.0));
        assert_eq!(wheel.forward_axis, Vector3d::new(0.0, 0.0, 1.0));
        assert!(!wheel.in_contact);
        assert_ulps_eq!(wheel.hit_distance, 0.5);
    }
    #[test]
    fn test_wheel_axes_normalized() {
        let wheel = Wheel::new(&WheelPars {
            suspension_axis: Vector3d::new(0.0, -3.0, 0.0),
            ..WheelPars::default()
        })
        .unwrap();
        assert_eq!(wheel.suspension_axis, Vector3d::new(0.0, -1.0, 0.0));
    }
    #[test]
    fn test_wheel_zero_rest_length() {
        let result = Wheel::new(&WheelPars {
            suspension_rest_length: 0.0,
            ..WheelPars::default()
        });
        assert!(matches!(result, Err(VehicleError::InvalidRestLength(_))));
    }
    #[test]
    fn test_wheel_pars_from_json() {
        let wheel_pars: WheelPars =
            serde_json::from_str(r#"{"radius": 0.3, "driven": true}"#).unwrap();
        assert_ulps_eq!(wheel_pars.radius, 0.3);
        assert_ulps_eq!(wheel_pars.suspension_rest_length, 0.5);
        assert!(wheel_pars.driven);
        assert!(!wheel_pars.steerable);
    }
}


#[cfg(test)]
mod controls_tests {
    use crate::core::controls::{
        action_for_key, action_for_touch_target, Action, Axis, ControlPars, Controller, InputState,
    };
    use crate::core::vehicle::VehicleBuilder;
    use crate::core::wheel::WheelPars;
    use crate::test_doubles::{RecordingBody, ScriptedWorld};
    use approx::assert_ulps_eq;

    #[test]
    fn test_key_map() {
        assert_eq!(action_for_key("ArrowUp"), Some(Action::Accelerate));
        assert_eq!(action_for_key("KeyW"), Some(Action::Accelerate));
        assert_eq!(action_for_key("KeyS"), Some(Action::Brake));
        assert_eq!(action_for_key("ArrowLeft"), Some(Action::Left));
        assert_eq!(action_for_key("KeyD"), Some(Action::Right));
        assert_eq!(action_for_key("Space"), None);
    }
    #[test]
    fn test_touch_targets() {
        assert_eq!(action_for_touch_target("brake"), Some(Action::Brake));
        assert_eq!(action_for_touch_target("boost"), None);
    }
    #[test]
    fn test_action_serde() {
        let actions: Vec<Action> = serde_json::from_str(r#"["accelerate", "left"]"#).unwrap();
        assert_eq!(actions, vec![Action::Accelerate, Action::Left]);
        assert_eq!(serde_json::to_string(&Action::Right).unwrap(), r#""right""#);
    }
    #[test]
    fn test_input_exclusive() {
        let mut input = InputState::default();
        input.handle_key("KeyW", true);
        input.handle_key("ArrowDown", true);
        assert!(input.brake);
        assert!(!input.accelerate);

        input.handle_key("KeyA", true);
        input.handle_key("KeyD", true);
        assert!(input.right);
        assert!(!input.left);

        input.handle_key("KeyD", false);
        assert_eq!(input.active_actions(), vec![Action::Brake]);
        assert!(!input.handle_key("Escape", true));
    }
    #[test]
    fn test_input_clear_axis() {
        let mut input = InputState::from_actions(&[Action::Accelerate, Action::Left]);
        input.clear_axis(Axis::Steering);
        assert_eq!(input.active_actions(), vec![Action::Accelerate]);
    }

    #[test]
    fn test_controller_throttle() {
        let mut controller = Controller::new(&ControlPars::default());

        controller.update(&InputState::from_actions(&[Action::Accelerate]), 0.0);
        assert_ulps_eq!(controller.engine_force(), 500.0);

        // accelerating while rolling backwards brakes
        controller.update(&InputState::from_actions(&[Action::Accelerate]), -2.0);
        assert_ulps_eq!(controller.engine_force(), 1000.0);

        controller.update(&InputState::from_actions(&[Action::Brake]), 5.0);
        assert_ulps_eq!(controller.engine_force(), -1000.0);

        controller.update(&InputState::from_actions(&[Action::Brake]), 0.5);
        assert_ulps_eq!(controller.engine_force(), -250.0);

        controller.update(&InputState::default(), 5.0);
        assert_ulps_eq!(controller.engine_force(), 0.0);
    }
    #[test]
    fn test_controller_steering() {
        let mut controller = Controller::new(&ControlPars::default());
        let left = InputState::from_actions(&[Action::Left]);

        controller.update(&left, 0.0);
        assert_ulps_eq!(controller.steering(), 0.04);

        for _ in 0..20 {
            controller.update(&left, 0.0);
        }
        assert_ulps_eq!(controller.steering(), 0.5);

        controller.update(&InputState::from_actions(&[Action::Right]), 0.0);
        assert_ulps_eq!(controller.steering(), 0.46);

        controller.update(&InputState::default(), 0.0);
        assert_ulps_eq!(controller.steering(), 0.0);
    }
    #[test]
    fn test_controller_apply_wheel_roles() {
        let world = ScriptedWorld::new(0.01, None);
        let mut vehicle = VehicleBuilder::new(RecordingBody::default())
            .wheel(WheelPars {
                steerable: true,
                ..WheelPars::default()
            })
            .wheel(WheelPars {
                driven: true,
                ..WheelPars::default()
            })
            .physics(&world)
            .build()
            .unwrap();
        let mut controller = Controller::new(&ControlPars::default());

        controller.apply(
            &InputState::from_actions(&[Action::Accelerate, Action::Left]),
            &mut vehicle,
        );

        assert_ulps_eq!(vehicle.wheels()[0].forward_force, 0.0);
        assert_ulps_eq!(vehicle.wheels()[0].steering, 0.04);
        assert_ulps_eq!(vehicle.wheels()[1].forward_force, 500.0);
        assert_ulps_eq!(vehicle.wheels()[1].steering, 0.0);
    }
}

#[cfg(test)]
mod collaborator_tests {
    use crate::core::flat_ground::{FlatGround, WorldPars};
    use crate::core::physics::{PhysicsWorld, RigidBody};
    use crate::core::simple_body::{BodyPars, SimpleBody};
    use approx::assert_relative_eq;
    use helpers::geometry::{Point3d, Vector3d};

    fn body_pars() -> BodyPars {
        BodyPars {
            mass: 100.0,
            half_extents: Vector3d::new(1.0, 0.5, 2.0),
            start_position: Point3d::new(0.0, 1.0, 0.0),
            start_heading: 0.0,
            linear_damping: 0.0,
            angular_damping: 0.0,
        }
    }

    #[test]
    fn test_flat_ground_raycast() {
        let world = FlatGround::new(&WorldPars::default(), 0.01);
        let hit = world
            .raycast(&Point3d::new(1.0, 0.5, 2.0), &Point3d::new(1.0, -0.5, 2.0))
            .unwrap();
        assert_relative_eq!(hit.distance, 0.5);
        assert_relative_eq!(hit.point.y, 0.0);
        assert_relative_eq!(hit.point.x, 1.0);
        assert_eq!(hit.normal, Vector3d::unit_y());

        assert!(world
            .raycast(&Point3d::new(0.0, 2.0, 0.0), &Point3d::new(0.0, 1.0, 0.0))
            .is_none());
    }
    #[test]
    fn test_flat_ground_origin_below() {
        let world = FlatGround::new(&WorldPars::default(), 0.01);
        let hit = world
            .raycast(&Point3d::new(0.0, -0.1, 0.0), &Point3d::new(0.0, -0.6, 0.0))
            .unwrap();
        assert_relative_eq!(hit.distance, 0.0);
    }
    #[test]
    fn test_simple_body_free_fall() {
        let mut body = SimpleBody::new(&body_pars());
        let gravity = Vector3d::new(0.0, -9.81, 0.0);
        for _ in 0..100 {
            body.integrate(0.01, &gravity);
        }
        assert_relative_eq!(body.linear_velocity().dy, -9.81, epsilon = 1e-9);
        assert!(body.world_transform().origin.y < 1.0 - 4.8);
    }
    #[test]
    fn test_simple_body_force_and_torque() {
        let mut body = SimpleBody::new(&body_pars());
        body.apply_force(&Vector3d::new(0.0, 100.0, 0.0), &Point3d::new(1.0, 1.0, 0.0));
        body.integrate(0.1, &Vector3d::zero());

        // 100N on 100kg for 0.1s
        assert_relative_eq!(body.linear_velocity().dy, 0.1, epsilon = 1e-12);
        // torque 100Nm about +z, I_zz = 100 / 12 * (4 + 1)
        assert_relative_eq!(
            body.angular_velocity().dz,
            100.0 / (100.0 / 12.0 * 5.0) * 0.1,
            epsilon = 1e-12
        );

        // accumulators are cleared after integration
        body.integrate(0.1, &Vector3d::zero());
        assert_relative_eq!(body.linear_velocity().dy, 0.1, epsilon = 1e-12);
    }
}


#[cfg(test)]
mod drive_tests {
    use crate::core::drive::Drive;
    use crate::core::handle_drive::handle_drive;
    use crate::pre::read_sim_pars::{read_sim_pars, SimPars};
    use std::path::Path;

    fn sim_pars() -> SimPars {
        read_sim_pars(Path::new("../input/parameters/pars_buggy.json")).unwrap()
    }

    #[test]
    fn test_drive_idle_settles() {
        let sim_pars = sim_pars();
        let scenario = sim_pars.selected_scenarios(Some("idle"))[0].to_owned();
        let mut drive = Drive::new(&sim_pars, &scenario, 0.01).unwrap();

        while !drive.get_finished() {
            drive.simulate_timestep();

            for wheel in drive.vehicle.wheels() {
                assert!(0.0 <= wheel.suspension_length);
                assert!(wheel.suspension_length <= wheel.suspension_rest_length);
            }
        }

        let result = drive.get_drive_result();
        assert_eq!(drive.vehicle.no_wheels_in_contact(), 4);
        assert!(result.final_speed.abs() < 0.1);
        assert!(result.final_position.z.abs() < 0.1);
        assert!(0.5 < result.final_position.y && result.final_position.y < 1.0);
    }
    #[test]
    fn test_drive_accelerate() {
        let sim_pars = sim_pars();
        let scenario = sim_pars.selected_scenarios(Some("accelerate"))[0].to_owned();
        let result = handle_drive(&sim_pars, &scenario, 0.01, None, 1.0).unwrap();

        assert!(result.final_position.z > 2.0);
        assert!(result.final_speed > 1.0);
        assert!(result.max_speed >= result.final_speed);
        assert!(result.distance > 2.0);
    }
    #[test]
    fn test_drive_slalom_left_turn() {
        let sim_pars = sim_pars();
        let scenario = sim_pars.selected_scenarios(Some("slalom"))[0].to_owned();
        let mut drive = Drive::new(&sim_pars, &scenario, 0.01).unwrap();

        // straight for 2s
        for _ in 0..200 {
            drive.simulate_timestep();
        }
        let state = drive.get_vehicle_state();
        assert!(state.position.x.abs() < 0.05);
        assert!(state.position.z > 0.5);

        // steering left turns the vehicle towards +x
        for _ in 0..100 {
            drive.simulate_timestep();
        }
        let state = drive.get_vehicle_state();
        assert!(state.steering > 0.0);
        assert!(state.position.x > 0.05);
    }
    #[test]
    fn test_drive_trace() {
        let sim_pars = sim_pars();
        let scenario = sim_pars.selected_scenarios(Some("idle"))[0].to_owned();
        let (tx, rx) = flume::unbounded();
        let _ = handle_drive(&sim_pars, &scenario, 0.01, Some(&tx), 100.0).unwrap();

        let states: Vec<_> = rx.try_iter().collect();
        assert!(!states.is_empty());
        assert_eq!(states[0].wheels.len(), 4);
    }
}
