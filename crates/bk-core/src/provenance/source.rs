//! Grafo de producción que consume el motor de procedencia.
//!
//! `ProvenanceGraph` abstrae los cinco saltos que necesita el recorrido;
//! `StoreProvenance` los resuelve con los procedimientos almacenados del
//! catálogo.

use bk_domain::{FileMetadata, ProductionId};

use crate::constants::procedures;
use crate::store::{CatalogStore, Row, SqlValue, StoreError};

/// Archivo alcanzado en un salto, con su instantánea de metadatos.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedFile {
    pub name: String,
    pub metadata: FileMetadata,
}

pub trait ProvenanceGraph {
    fn file_id(&self, lfn: &str) -> Result<Option<i64>, StoreError>;
    /// Job productor, sin filtrar por réplica.
    fn producing_job(&self, lfn: &str) -> Result<Option<i64>, StoreError>;
    fn job_inputs(&self, job_id: i64) -> Result<Vec<LinkedFile>, StoreError>;
    fn consuming_jobs(&self, lfn: &str) -> Result<Vec<i64>, StoreError>;
    fn job_outputs(&self, job_id: i64) -> Result<Vec<LinkedFile>, StoreError>;
}

pub struct StoreProvenance<S> {
    store: S,
}

impl<S: CatalogStore> StoreProvenance<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn ids(&self, name: &str, arg: SqlValue) -> Result<Vec<i64>, StoreError> {
        self.store
            .call_procedure(name, &[arg], true, None)?
            .iter()
            .filter_map(|row| row.first())
            .filter(|v| !v.is_null())
            .map(|v| v.as_i64().ok_or_else(|| StoreError::Decode(format!("{name} returned {v:?}"))))
            .collect()
    }

    fn files(&self, name: &str, job_id: i64) -> Result<Vec<LinkedFile>, StoreError> {
        self.store.call_procedure(name, &[job_id.into()], true, None)?.iter().map(decode_file).collect()
    }
}

/// Fila `(filename, gotreplica, eventstat, eventtypeid, luminosity,
/// instluminosity, filetype, production)`.
pub fn decode_file(row: &Row) -> Result<LinkedFile, StoreError> {
    let [name, replica, event_stat, event_type, lumi, inst_lumi, file_type, production] = row.as_slice() else {
        return Err(StoreError::Decode(format!("file row has {} columns, expected 8", row.len())));
    };
    let name = name.as_str()
                   .ok_or_else(|| StoreError::Decode(format!("file name {name:?}")))?
                   .to_string();
    let text = |v: &SqlValue| v.as_str().map(str::to_string);
    Ok(LinkedFile { name,
                    metadata: FileMetadata { event_stat: event_stat.as_i64(),
                                             event_type: event_type.as_i64(),
                                             luminosity: lumi.as_f64(),
                                             inst_luminosity: inst_lumi.as_f64(),
                                             file_type: text(file_type),
                                             got_replica: text(replica),
                                             production: production.as_i64().map(ProductionId) } })
}

impl<S: CatalogStore> ProvenanceGraph for StoreProvenance<S> {
    fn file_id(&self, lfn: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.ids(procedures::FILE_ID, lfn.into())?.into_iter().next())
    }

    fn producing_job(&self, lfn: &str) -> Result<Option<i64>, StoreError> {
        Ok(self.ids(procedures::PRODUCING_JOB, lfn.into())?.into_iter().next())
    }

    fn job_inputs(&self, job_id: i64) -> Result<Vec<LinkedFile>, StoreError> {
        self.files(procedures::JOB_INPUT_FILES, job_id)
    }

    fn consuming_jobs(&self, lfn: &str) -> Result<Vec<i64>, StoreError> {
        self.ids(procedures::CONSUMING_JOBS, lfn.into())
    }

    fn job_outputs(&self, job_id: i64) -> Result<Vec<LinkedFile>, StoreError> {
        self.files(procedures::JOB_OUTPUT_FILES, job_id)
    }
}
