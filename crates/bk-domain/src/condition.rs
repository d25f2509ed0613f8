//! Condiciones de simulación y de toma de datos.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationCondition {
    pub id: i64,
    pub description: String,
    pub beam_condition: Option<String>,
    pub beam_energy: Option<String>,
    pub generator: Option<String>,
    pub magnetic_field: Option<String>,
    pub detector_condition: Option<String>,
    pub luminosity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTakingCondition {
    pub id: i64,
    pub description: String,
    /// Estado de cada subdetector (`VELO` -> `INCLUDED`, ...).
    pub detector_states: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    Simulation(SimulationCondition),
    DataTaking(DataTakingCondition),
}

impl Condition {
    pub fn description(&self) -> &str {
        match self {
            Condition::Simulation(c) => &c.description,
            Condition::DataTaking(c) => &c.description,
        }
    }
}
