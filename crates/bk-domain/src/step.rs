//! Definición de un step de procesamiento.
use serde::{Deserialize, Serialize};

use crate::{DomainError, Visibility};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: i64,
    pub name: String,
    pub application_name: String,
    pub application_version: String,
    pub option_files: Option<String>,
    pub dddb: Option<String>,
    pub conddb: Option<String>,
    pub extra_packages: Option<String>,
    pub visible: Visibility,
    pub usable: String,
    pub dq_tag: Option<String>,
    pub options_format: Option<String>,
    pub is_multicore: bool,
    pub system_config: Option<String>,
    pub mc_tck: Option<String>,
    /// Steps referenciados como compañeros de runtime (no es un árbol).
    pub runtime_projects: Vec<i64>,
}

impl Step {
    /// Verifica que cada runtime project apunte a un step existente.
    pub fn check_runtime_projects<F>(&self, exists: F) -> Result<(), DomainError>
        where F: Fn(i64) -> bool
    {
        match self.runtime_projects.iter().find(|id| !exists(**id)) {
            Some(missing) => Err(DomainError::Validation(format!(
                "step {} references unknown runtime project {missing}",
                self.id
            ))),
            None => Ok(()),
        }
    }
}
