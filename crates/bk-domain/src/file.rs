//! Archivo lógico (LFN) y la instantánea de metadatos que acompaña a los
//! resultados de procedencia.
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{ProductionId, ReplicaFlag, Visibility};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: i64,
    pub name: String,
    /// Job que produjo el archivo.
    pub job_id: i64,
    pub event_type_id: Option<i64>,
    pub file_type: String,
    pub file_size: Option<i64>,
    pub event_stat: Option<i64>,
    pub luminosity: Option<f64>,
    pub inst_luminosity: Option<f64>,
    pub adler32: Option<String>,
    pub md5sum: Option<String>,
    pub guid: Option<String>,
    pub replica: ReplicaFlag,
    pub visibility: Visibility,
    pub quality_id: Option<i64>,
    pub insert_time: Option<NaiveDateTime>,
}

/// Metadatos devueltos por archivo en `WithMetadata`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileMetadata {
    pub event_stat: Option<i64>,
    pub event_type: Option<i64>,
    pub luminosity: Option<f64>,
    pub inst_luminosity: Option<f64>,
    pub file_type: Option<String>,
    pub got_replica: Option<String>,
    pub production: Option<ProductionId>,
}

impl FileMetadata {
    pub fn has_replica(&self) -> bool {
        !matches!(self.got_replica.as_deref(), Some("No"))
    }
}
