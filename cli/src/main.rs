use anyhow::Context;
use clap::{Parser, Subcommand};
use raceserver::core::handle_server::handle_server;
use raceserver::pre::serve_opts::{check_serve_opts, ServeOpts};
use rayon::prelude::*;
use std::io::Write;
use std::thread;
use std::time::Instant;
use vehiclesim::core::handle_drive::handle_drive;
use vehiclesim::interfaces::vehicle_state::VehicleState;
use vehiclesim::post::drive_result::DriveResult;
use vehiclesim::pre::check_sim_opts_pars::check_sim_opts_pars;
use vehiclesim::pre::read_sim_pars::read_sim_pars;
use vehiclesim::pre::sim_opts::SimOpts;

#[derive(Debug, Parser)]
#[command(
    version = "0.1.0",
    author = "Alexander Heilmeier <alexander.heilmeier@tum.de>",
    name = "RS-VS",
    about = "A raycast vehicle simulation and race server written in Rust"
)]
struct Opts {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Drive the scenarios of a parameter file without a player
    Simulate(SimOpts),
    /// Run the race room and player action server
    Serve(ServeOpts),
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Opts::parse().command {
        Command::Simulate(sim_opts) => simulate(&sim_opts),
        Command::Serve(serve_opts) => {
            check_serve_opts(&serve_opts)?;
            handle_server(&serve_opts)
        }
    }
}

fn simulate(sim_opts: &SimOpts) -> anyhow::Result<()> {
    // PRE-PROCESSING ------------------------------------------------------------------------------
    let sim_pars = read_sim_pars(sim_opts.parfile_path.as_path())?;
    check_sim_opts_pars(sim_opts, &sim_pars)?;

    let scenarios = sim_pars.selected_scenarios(sim_opts.scenario.as_deref());

    log::info!(
        "Simulating {} scenario(s) with vehicle {} and a time step size of {:.3}s",
        scenarios.len(),
        sim_pars.vehicle_pars.name,
        sim_opts.timestep_size
    );

    // EXECUTION -----------------------------------------------------------------------------------
    let t_start = Instant::now();

    let drive_results: Vec<DriveResult> = if !sim_opts.trace {
        // all scenarios in parallel
        scenarios
            .par_iter()
            .map(|scenario| handle_drive(&sim_pars, scenario, sim_opts.timestep_size, None, 1.0))
            .collect::<anyhow::Result<Vec<DriveResult>>>()?
    } else {
        // single scenario in real-time, the vehicle states are printed by a separate thread
        let (tx, rx) = flume::unbounded::<VehicleState>();

        let printer = thread::spawn(move || -> anyhow::Result<()> {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            for vehicle_state in rx.iter() {
                let line = serde_json::to_string(&vehicle_state)
                    .context("Failed to serialize vehicle state!")?;
                writeln!(handle, "{}", line).context("Failed to write vehicle state!")?;
            }
            Ok(())
        });

        let drive_result = handle_drive(
            &sim_pars,
            scenarios[0],
            sim_opts.timestep_size,
            Some(&tx),
            sim_opts.realtime_factor,
        )?;

        // close the channel such that the printer finishes
        drop(tx);
        printer
            .join()
            .map_err(|_| anyhow::anyhow!("Vehicle state printer panicked!"))??;

        vec![drive_result]
    };

    log::info!(
        "Execution time (total): {}ms",
        t_start.elapsed().as_millis()
    );

    // POST-PROCESSING -----------------------------------------------------------------------------
    for drive_result in drive_results.iter() {
        drive_result.print_drive_result();
    }

    Ok(())
}
