use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::ProductionId;

/// Registro de una ejecución (job).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub production: ProductionId,
    pub run_number: Option<i64>,
    pub fill_number: Option<i64>,
    pub tck: Option<String>,
    pub worker_node: Option<String>,
    pub job_start: Option<NaiveDateTime>,
    pub job_end: Option<NaiveDateTime>,
    pub total_luminosity: Option<f64>,
    /// Archivos consumidos (ids de `files`).
    pub input_file_ids: Vec<i64>,
}
