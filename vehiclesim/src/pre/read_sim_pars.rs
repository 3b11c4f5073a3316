use crate::core::flat_ground::WorldPars;
use crate::core::scenario::Scenario;
use crate::core::simple_body::BodyPars;
use crate::core::vehicle::VehiclePars;
use anyhow::Context;
use serde::Deserialize;
use std::fs::OpenOptions;
use std::path::Path;

/// SimPars is used to store all other parameter structs.
#[derive(Debug, Deserialize, Clone)]
pub struct SimPars {
    pub vehicle_pars: VehiclePars,
    pub body_pars: BodyPars,
    #[serde(default)]
    pub world_pars: WorldPars,
    pub scenarios: Vec<Scenario>,
}

impl SimPars {
    /// selected_scenarios returns the scenario with the inserted name or all scenarios if no name
    /// is inserted.
    pub fn selected_scenarios(&self, name: Option<&str>) -> Vec<&Scenario> {
        self.scenarios
            .iter()
            .filter(|scenario| name.map_or(true, |name| scenario.name == name))
            .collect()
    }
}

/// read_sim_pars reads the JSON file and decodes the JSON string into the simulation parameters
/// struct.
pub fn read_sim_pars(filepath: &Path) -> anyhow::Result<SimPars> {
    // open file
    let fh = OpenOptions::new()
        .read(true)
        .open(filepath)
        .context(format!(
            "Failed to open parameter file {}!",
            filepath.display()
        ))?;

    // read and parse parameter file content
    let pars = serde_json::from_reader(&fh).context(format!(
        "Failed to parse parameter file {}!",
        filepath.display()
    ))?;
    Ok(pars)
}
