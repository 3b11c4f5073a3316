use crate::core::drive::Drive;
use crate::core::scenario::Scenario;
use crate::interfaces::vehicle_state::{VehicleState, MAX_STATE_UPDATE_FREQUENCY};
use crate::post::drive_result::DriveResult;
use crate::pre::read_sim_pars::SimPars;
use anyhow::Context;
use flume::Sender;
use std::thread::sleep;
use std::time::{Duration, Instant};

/// handle_drive creates and simulates a scripted drive on the basis of the inserted parameters,
/// and returns the result for post-processing. If a sender is inserted, the drive is simulated
/// in real-time and the vehicle state is sent with a maximum of MAX_STATE_UPDATE_FREQUENCY.
pub fn handle_drive(
    sim_pars: &SimPars,
    scenario: &Scenario,
    timestep_size: f64,
    tx: Option<&Sender<VehicleState>>,
    realtime_factor: f64,
) -> anyhow::Result<DriveResult> {
    // create the drive
    let mut drive = Drive::new(sim_pars, scenario, timestep_size).context(format!(
        "Failed to create vehicle {} for scenario {}!",
        sim_pars.vehicle_pars.name, scenario.name
    ))?;

    match tx {
        None => {
            // NORMAL SIMULATION -------------------------------------------------------------------
            while !drive.get_finished() {
                drive.simulate_timestep();
            }
        }
        Some(tx) => {
            // REAL-TIME SIMULATION ----------------------------------------------------------------
            let mut t_drive_update_print = 0.0;
            let mut t_drive_update_state = f64::NEG_INFINITY;

            while !drive.get_finished() {
                let t_start = Instant::now();

                drive.simulate_timestep();

                // print status (with a maximum of 1 Hz)
                if drive.cur_time > t_drive_update_print + 0.9999 {
                    log::info!(
                        "Simulating {}... Current drive time is {:.3}s, current speed is {:.2}m/s",
                        scenario.name,
                        drive.cur_time,
                        drive.vehicle.speed()
                    );
                    t_drive_update_print = drive.cur_time;
                }

                // send vehicle state
                if drive.cur_time > t_drive_update_state + 1.0 / MAX_STATE_UPDATE_FREQUENCY - 0.001
                {
                    tx.send(drive.get_vehicle_state())
                        .context("Failed to send vehicle state!")?;
                    t_drive_update_state = drive.cur_time;
                }

                // sleep until time step is finished in real-time as well
                let t_step = Duration::from_secs_f64(drive.timestep_size / realtime_factor);
                let t_elapsed = t_start.elapsed();

                if t_elapsed < t_step {
                    sleep(t_step - t_elapsed);
                } else {
                    log::warn!("Could not keep up with real-time!");
                }
            }
        }
    }

    Ok(drive.get_drive_result())
}
