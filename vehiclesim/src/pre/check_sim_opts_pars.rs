use crate::pre::read_sim_pars::SimPars;
use crate::pre::sim_opts::SimOpts;
use anyhow::Context;
use helpers::general::{is_positive_finite, InputValueError};

/// check_sim_opts_pars assures that the inserted options and parameters are within reasonable
/// limits and raises an error if not.
pub fn check_sim_opts_pars(sim_opts: &SimOpts, sim_pars: &SimPars) -> anyhow::Result<()> {
    // PART 1: SIMULATION OPTIONS
    if !(0.001 <= sim_opts.timestep_size && sim_opts.timestep_size <= 0.05) {
        return Err(InputValueError).context(format!(
            "timestep_size is {:.3}s, which is not within the reasonable range of [0.001, 0.05]s!",
            sim_opts.timestep_size
        ));
    }

    if sim_opts.trace && !(0.1 <= sim_opts.realtime_factor && sim_opts.realtime_factor <= 100.0) {
        return Err(InputValueError).context(format!(
            "realtime_factor is {:.3}, which is not within the reasonable range of [0.1, 100.0]!",
            sim_opts.realtime_factor
        ));
    }

    let no_selected_scenarios = sim_pars
        .selected_scenarios(sim_opts.scenario.as_deref())
        .len();

    if no_selected_scenarios == 0 {
        return Err(InputValueError).context(match &sim_opts.scenario {
            Some(name) => format!("Scenario {} is not contained in the parameter file!", name),
            None => "The parameter file does not contain any scenario!".to_owned(),
        });
    }

    if sim_opts.trace && no_selected_scenarios != 1 {
        return Err(InputValueError)
            .context("If trace is activated, exactly one scenario must be selected!");
    }

    // PART 2: SIMULATION PARAMETERS
    check_sim_pars(sim_pars)
}

/// check_sim_pars checks the parameter file content on its own.
pub fn check_sim_pars(sim_pars: &SimPars) -> anyhow::Result<()> {
    // BODY ----------------------------------------------------------------------------------------
    let body_pars = &sim_pars.body_pars;

    if !is_positive_finite(body_pars.mass) {
        return Err(InputValueError).context(format!(
            "Body mass must be positive, but is {:.3}kg!",
            body_pars.mass
        ));
    }

    let half_extents = &body_pars.half_extents;
    if ![half_extents.dx, half_extents.dy, half_extents.dz]
        .iter()
        .all(|&x| is_positive_finite(x))
    {
        return Err(InputValueError).context("All body half extents must be positive!");
    }

    if body_pars.linear_damping < 0.0 || body_pars.angular_damping < 0.0 {
        return Err(InputValueError).context("Body damping rates must not be negative!");
    }

    // VEHICLE -------------------------------------------------------------------------------------
    let vehicle_pars = &sim_pars.vehicle_pars;

    if vehicle_pars.wheels.is_empty() {
        return Err(InputValueError).context(format!(
            "Vehicle {} must have at least one wheel!",
            vehicle_pars.name
        ));
    }

    for (i, wheel_pars) in vehicle_pars.wheels.iter().enumerate() {
        if !is_positive_finite(wheel_pars.suspension_rest_length) {
            return Err(InputValueError).context(format!(
                "Suspension rest length of wheel {} must be positive, but is {:.3}m!",
                i, wheel_pars.suspension_rest_length
            ));
        }

        if wheel_pars.radius < 0.0 || wheel_pars.suspension_force < 0.0 {
            return Err(InputValueError).context(format!(
                "Radius and suspension force of wheel {} must not be negative!",
                i
            ));
        }

        if !(0.0 <= wheel_pars.side_force_position_ratio
            && wheel_pars.side_force_position_ratio <= 1.0)
        {
            return Err(InputValueError).context(format!(
                "side_force_position_ratio of wheel {} is not within the required range [0.0, 1.0]!",
                i
            ));
        }
    }

    for axle in vehicle_pars.anti_roll_axles.iter() {
        if axle.wheel_a >= vehicle_pars.wheels.len()
            || axle.wheel_b >= vehicle_pars.wheels.len()
            || axle.wheel_a == axle.wheel_b
        {
            return Err(InputValueError).context(format!(
                "Anti-roll axle ({}, {}) must reference two different existing wheels!",
                axle.wheel_a, axle.wheel_b
            ));
        }
    }

    if vehicle_pars.prediction.frames < 1
        || !(0.0 <= vehicle_pars.prediction.blend_ratio
            && vehicle_pars.prediction.blend_ratio <= 1.0)
    {
        return Err(InputValueError).context(
            "Prediction requires at least one frame and a blend ratio within [0.0, 1.0]!",
        );
    }

    let controls = &vehicle_pars.controls;
    if controls.steering_clamp < 0.0 || controls.steering_increment < 0.0 {
        return Err(InputValueError)
            .context("Steering increment and steering clamp must not be negative!");
    }

    // SCENARIOS -----------------------------------------------------------------------------------
    for scenario in sim_pars.scenarios.iter() {
        if scenario.segments.is_empty() {
            return Err(InputValueError).context(format!(
                "Scenario {} must contain at least one segment!",
                scenario.name
            ));
        }

        if scenario
            .segments
            .iter()
            .any(|segment| !is_positive_finite(segment.duration))
        {
            return Err(InputValueError).context(format!(
                "All segment durations of scenario {} must be positive!",
                scenario.name
            ));
        }
    }

    Ok(())
}
