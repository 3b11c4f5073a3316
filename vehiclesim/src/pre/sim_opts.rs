use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args, Clone)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Stream the vehicle state as JSON lines to stdout (drive is then simulated in real-time with
    /// the inserted real-time factor, a single scenario must be selected)
    #[arg(long)]
    pub trace: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set path to the simulation parameter file
    #[arg(short, long)]
    pub parfile_path: PathBuf,

    /// Set real-time factor (only relevant in case tracing/real-time simulation is activated)
    #[arg(short, long, default_value_t = 1.0)]
    pub realtime_factor: f64,

    /// Set simulation timestep size in seconds, should be in the range [0.001, 0.05]
    #[arg(short, long, default_value_t = 0.01)]
    pub timestep_size: f64,

    /// Simulate only the scenario with the inserted name (all scenarios if not set)
    #[arg(short, long)]
    pub scenario: Option<String>,
}
