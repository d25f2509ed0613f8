//! Producciones: identificador con signo, condición exclusiva y pasos
//! ordenados.

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Identificador de producción. Los valores negativos son runs de datos
/// reales; los positivos, producciones simuladas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductionId(pub i64);

impl ProductionId {
    pub fn is_real_data(self) -> bool {
        self.0 < 0
    }
    pub fn get(self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub name: String,
    pub version: String,
}

/// Referencia a la condición de una producción: simulación o toma de datos,
/// nunca ambas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionRef {
    Simulation(i64),
    DataTaking(i64),
}

impl ConditionRef {
    pub fn from_ids(simulation: Option<i64>, data_taking: Option<i64>) -> Result<Option<Self>, DomainError> {
        match (simulation, data_taking) {
            (Some(_), Some(_)) => Err(DomainError::Validation(
                "simulation and data-taking conditions are mutually exclusive".into(),
            )),
            (Some(s), None) => Ok(Some(Self::Simulation(s))),
            (None, Some(d)) => Ok(Some(Self::DataTaking(d))),
            (None, None) => Ok(None),
        }
    }
}

/// Paso de una producción con su nivel ("step" en `stepscontainer`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionStep {
    pub step_id: i64,
    pub level: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    pub id: ProductionId,
    pub processing_pass_id: i64,
    pub condition: Option<ConditionRef>,
    pub configuration: Configuration,
    pub steps: Vec<ProductionStep>,
}

impl Production {
    /// Pasos ordenados por nivel.
    pub fn ordered_steps(&self) -> Vec<&ProductionStep> {
        let mut steps: Vec<&ProductionStep> = self.steps.iter().collect();
        steps.sort_by_key(|s| s.level);
        steps
    }
}
