use crate::core::controls::Controller;
use crate::core::flat_ground::FlatGround;
use crate::core::physics::{PhysicsWorld, RigidBody};
use crate::core::scenario::Scenario;
use crate::core::simple_body::SimpleBody;
use crate::core::vehicle::{Vehicle, VehicleBuilder, VehicleError};
use crate::interfaces::vehicle_state::{VehicleState, WheelState};
use crate::post::drive_result::DriveResult;
use crate::pre::read_sim_pars::SimPars;
use helpers::geometry::Point3d;

/// Drive couples a vehicle on flat ground with a controller that is fed by a scenario.
#[derive(Debug)]
pub struct Drive {
    pub scenario: Scenario,
    pub world: FlatGround,
    pub vehicle: Vehicle<SimpleBody>,
    pub controller: Controller,
    pub timestep_size: f64,
    pub cur_time: f64,
    cur_timestep: u64,
    no_timesteps: u64,
    vehicle_name: String,
    max_speed: f64,
    airborne_ticks: u64,
    distance: f64,
}

impl Drive {
    pub fn new(
        sim_pars: &SimPars,
        scenario: &Scenario,
        timestep_size: f64,
    ) -> Result<Drive, VehicleError> {
        let world = FlatGround::new(&sim_pars.world_pars, timestep_size);
        let body = SimpleBody::new(&sim_pars.body_pars);
        let vehicle = VehicleBuilder::from_pars(body, &sim_pars.vehicle_pars)
            .physics(&world)
            .build()?;

        Ok(Drive {
            scenario: scenario.to_owned(),
            world,
            vehicle,
            controller: Controller::new(&sim_pars.vehicle_pars.controls),
            timestep_size,
            cur_time: 0.0,
            cur_timestep: 0,
            no_timesteps: (scenario.duration() / timestep_size).round() as u64,
            vehicle_name: sim_pars.vehicle_pars.name.to_owned(),
            max_speed: 0.0,
            airborne_ticks: 0,
            distance: 0.0,
        })
    }

    pub fn get_finished(&self) -> bool {
        self.cur_timestep >= self.no_timesteps
    }

    // ---------------------------------------------------------------------------------------------
    // MAIN METHOD ---------------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    /// The method simulates one time step: controls, vehicle update (forces), body integration.
    pub fn simulate_timestep(&mut self) {
        let input = self.scenario.input_at(self.cur_time);
        self.controller.apply(&input, &mut self.vehicle);
        self.vehicle.update(&self.world);

        let position_prev = self.vehicle.body().world_transform().origin;
        let gravity = self.world.gravity();
        self.vehicle
            .body_mut()
            .integrate(self.timestep_size, &gravity);
        let position = self.vehicle.body().world_transform().origin;

        // statistics
        self.distance += horizontal_dist(&position_prev, &position);
        self.max_speed = self.max_speed.max(self.vehicle.speed().abs());
        if self.vehicle.no_wheels_in_contact() == 0 {
            self.airborne_ticks += 1;
        }

        self.cur_timestep += 1;
        self.cur_time = self.cur_timestep as f64 * self.timestep_size;
    }

    // ---------------------------------------------------------------------------------------------
    // METHODS (OUTPUT) ----------------------------------------------------------------------------
    // ---------------------------------------------------------------------------------------------

    pub fn get_vehicle_state(&self) -> VehicleState {
        let body_tf = self.vehicle.body().world_transform();

        VehicleState {
            time: self.cur_time,
            position: body_tf.origin,
            rotation: body_tf.rotation,
            speed: self.vehicle.speed(),
            engine_force: self.controller.engine_force(),
            steering: self.controller.steering(),
            no_wheels_in_contact: self.vehicle.no_wheels_in_contact(),
            wheels: self
                .vehicle
                .wheels()
                .iter()
                .map(|wheel| WheelState {
                    position: wheel.contact_position,
                    rotation: wheel.spin_rotation,
                    in_contact: wheel.in_contact,
                    suspension_length: wheel.suspension_length,
                })
                .collect(),
        }
    }

    pub fn get_drive_result(&self) -> DriveResult {
        DriveResult {
            scenario_name: self.scenario.name.to_owned(),
            vehicle_name: self.vehicle_name.to_owned(),
            duration: self.cur_time,
            final_position: self.vehicle.body().world_transform().origin,
            final_speed: self.vehicle.speed(),
            max_speed: self.max_speed,
            airborne_ticks: self.airborne_ticks,
            distance: self.distance,
        }
    }
}

fn horizontal_dist(a: &Point3d, b: &Point3d) -> f64 {
    ((b.x - a.x).powi(2) + (b.z - a.z).powi(2)).sqrt()
}
