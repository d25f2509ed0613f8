//! Esquema relacional del bookkeeping (tablas, alias y columnas).
//!
//! El esquema pertenece al store externo; aquí sólo se declaran los nombres
//! que la composición de consultas necesita, más la lista de columnas que
//! usa el backend en memoria.

use crate::sql::{Column, TableRef};

pub const FILES: TableRef = TableRef::new("files", "f");
pub const JOBS: TableRef = TableRef::new("jobs", "j");
pub const INPUT_FILES: TableRef = TableRef::new("inputfiles", "inf");
pub const PRODUCTION_OUTPUT: TableRef = TableRef::new("productionoutputfiles", "prod");
pub const PRODUCTIONS: TableRef = TableRef::new("productionscontainer", "cont");
pub const CONFIGURATIONS: TableRef = TableRef::new("configurations", "c");
pub const SIMULATION_CONDITIONS: TableRef = TableRef::new("simulationconditions", "sim");
pub const DATA_TAKING_CONDITIONS: TableRef = TableRef::new("data_taking_conditions", "daq");
pub const PROCESSING: TableRef = TableRef::new("processing", "pp");
pub const FILE_TYPES: TableRef = TableRef::new("filetypes", "ft");
pub const DATA_QUALITY: TableRef = TableRef::new("dataquality", "d");
pub const STEPS: TableRef = TableRef::new("steps", "s");
pub const STEPS_CONTAINER: TableRef = TableRef::new("stepscontainer", "sc");
pub const RUNTIME_PROJECTS: TableRef = TableRef::new("runtimeprojects", "rp");

pub mod files {
    use super::*;
    pub const FILEID: Column = FILES.col("fileid");
    pub const FILENAME: Column = FILES.col("filename");
    pub const JOBID: Column = FILES.col("jobid");
    pub const EVENTTYPEID: Column = FILES.col("eventtypeid");
    pub const FILETYPEID: Column = FILES.col("filetypeid");
    pub const FILESIZE: Column = FILES.col("filesize");
    pub const EVENTSTAT: Column = FILES.col("eventstat");
    pub const FULLSTAT: Column = FILES.col("fullstat");
    pub const EVENTINPUTSTAT: Column = FILES.col("eventinputstat");
    pub const LUMINOSITY: Column = FILES.col("luminosity");
    pub const INSTLUMINOSITY: Column = FILES.col("instluminosity");
    pub const ADLER32: Column = FILES.col("adler32");
    pub const MD5SUM: Column = FILES.col("md5sum");
    pub const GUID: Column = FILES.col("guid");
    pub const GOTREPLICA: Column = FILES.col("gotreplica");
    pub const VISIBILITYFLAG: Column = FILES.col("visibilityflag");
    pub const QUALITYID: Column = FILES.col("qualityid");
    pub const CREATIONDATE: Column = FILES.col("creationdate");
    pub const INSERTTIMESTAMP: Column = FILES.col("inserttimestamp");
}

pub mod jobs {
    use super::*;
    pub const JOBID: Column = JOBS.col("jobid");
    pub const PRODUCTION: Column = JOBS.col("production");
    pub const RUNNUMBER: Column = JOBS.col("runnumber");
    pub const FILLNUMBER: Column = JOBS.col("fillnumber");
    pub const TCK: Column = JOBS.col("tck");
    pub const WORKERNODE: Column = JOBS.col("workernode");
    pub const JOBSTART: Column = JOBS.col("jobstart");
    pub const JOBEND: Column = JOBS.col("jobend");
    pub const TOTALLUMINOSITY: Column = JOBS.col("totalluminosity");
}

pub mod input_files {
    use super::*;
    pub const JOBID: Column = INPUT_FILES.col("jobid");
    pub const FILEID: Column = INPUT_FILES.col("fileid");
}

pub mod production_output {
    use super::*;
    pub const PRODUCTION: Column = PRODUCTION_OUTPUT.col("production");
    pub const STEPID: Column = PRODUCTION_OUTPUT.col("stepid");
    pub const EVENTTYPEID: Column = PRODUCTION_OUTPUT.col("eventtypeid");
    pub const FILETYPEID: Column = PRODUCTION_OUTPUT.col("filetypeid");
    pub const VISIBLE: Column = PRODUCTION_OUTPUT.col("visible");
    pub const GOTREPLICA: Column = PRODUCTION_OUTPUT.col("gotreplica");
}

pub mod productions {
    use super::*;
    pub const PRODUCTION: Column = PRODUCTIONS.col("production");
    pub const PROCESSINGID: Column = PRODUCTIONS.col("processingid");
    pub const CONFIGURATIONID: Column = PRODUCTIONS.col("configurationid");
    pub const SIMID: Column = PRODUCTIONS.col("simid");
    pub const DAQPERIODID: Column = PRODUCTIONS.col("daqperiodid");
}

pub mod configurations {
    use super::*;
    pub const CONFIGURATIONID: Column = CONFIGURATIONS.col("configurationid");
    pub const CONFIGNAME: Column = CONFIGURATIONS.col("configname");
    pub const CONFIGVERSION: Column = CONFIGURATIONS.col("configversion");
}

pub mod simulation_conditions {
    use super::*;
    pub const SIMID: Column = SIMULATION_CONDITIONS.col("simid");
    pub const SIMDESCRIPTION: Column = SIMULATION_CONDITIONS.col("simdescription");
}

pub mod data_taking_conditions {
    use super::*;
    pub const DAQPERIODID: Column = DATA_TAKING_CONDITIONS.col("daqperiodid");
    pub const DESCRIPTION: Column = DATA_TAKING_CONDITIONS.col("description");
}

pub mod processing {
    use super::*;
    pub const ID: Column = PROCESSING.col("id");
    pub const PARENTID: Column = PROCESSING.col("parentid");
    pub const NAME: Column = PROCESSING.col("name");
}

pub mod file_types {
    use super::*;
    pub const FILETYPEID: Column = FILE_TYPES.col("filetypeid");
    pub const NAME: Column = FILE_TYPES.col("name");
}

pub mod data_quality {
    use super::*;
    pub const QUALITYID: Column = DATA_QUALITY.col("qualityid");
    pub const DATAQUALITYFLAG: Column = DATA_QUALITY.col("dataqualityflag");
}

pub mod steps {
    use super::*;
    pub const STEPID: Column = STEPS.col("stepid");
    pub const STEPNAME: Column = STEPS.col("stepname");
    pub const APPLICATIONNAME: Column = STEPS.col("applicationname");
    pub const APPLICATIONVERSION: Column = STEPS.col("applicationversion");
    pub const OPTIONFILES: Column = STEPS.col("optionfiles");
    pub const DDDB: Column = STEPS.col("dddb");
    pub const CONDDB: Column = STEPS.col("conddb");
    pub const EXTRAPACKAGES: Column = STEPS.col("extrapackages");
    pub const VISIBLE: Column = STEPS.col("visible");
    pub const PROCESSINGPASS: Column = STEPS.col("processingpass");
    pub const USABLE: Column = STEPS.col("usable");
    pub const DQTAG: Column = STEPS.col("dqtag");
    pub const OPTIONSFORMAT: Column = STEPS.col("optionsformat");
    pub const ISMULTICORE: Column = STEPS.col("ismulticore");
    pub const SYSTEMCONFIG: Column = STEPS.col("systemconfig");
    pub const MCTCK: Column = STEPS.col("mctck");
    pub const INSERTTIMESTAMPS: Column = STEPS.col("inserttimestamps");
}

pub mod steps_container {
    use super::*;
    pub const PRODUCTION: Column = STEPS_CONTAINER.col("production");
    pub const STEPID: Column = STEPS_CONTAINER.col("stepid");
    pub const STEP: Column = STEPS_CONTAINER.col("step");
}

pub mod runtime_projects {
    use super::*;
    pub const STEPID: Column = RUNTIME_PROJECTS.col("stepid");
    pub const RUNTIMEPROJECTID: Column = RUNTIME_PROJECTS.col("runtimeprojectid");
}

/// Definición de tabla para backends que mantienen las filas ellos mismos.
pub struct TableDef {
    pub name: &'static str,
    pub columns: &'static [&'static str],
    /// Columna de clave primaria (única), si la hay.
    pub key: Option<&'static str>,
}

pub const TABLES: &[TableDef] = &[
    TableDef { name: "files",
               columns: &["fileid", "filename", "jobid", "eventtypeid", "filetypeid", "filesize", "eventstat",
                          "fullstat", "eventinputstat", "luminosity", "instluminosity", "adler32", "md5sum",
                          "guid", "gotreplica", "visibilityflag", "qualityid", "creationdate", "inserttimestamp"],
               key: Some("fileid") },
    TableDef { name: "jobs",
               columns: &["jobid", "production", "runnumber", "fillnumber", "tck", "workernode", "jobstart",
                          "jobend", "totalluminosity"],
               key: Some("jobid") },
    TableDef { name: "inputfiles", columns: &["jobid", "fileid"], key: None },
    TableDef { name: "productionoutputfiles",
               columns: &["production", "stepid", "eventtypeid", "filetypeid", "visible", "gotreplica"],
               key: None },
    TableDef { name: "productionscontainer",
               columns: &["production", "processingid", "configurationid", "simid", "daqperiodid"],
               key: Some("production") },
    TableDef { name: "configurations",
               columns: &["configurationid", "configname", "configversion"],
               key: Some("configurationid") },
    TableDef { name: "simulationconditions", columns: &["simid", "simdescription"], key: Some("simid") },
    TableDef { name: "data_taking_conditions", columns: &["daqperiodid", "description"], key: Some("daqperiodid") },
    TableDef { name: "processing", columns: &["id", "parentid", "name"], key: Some("id") },
    TableDef { name: "filetypes", columns: &["filetypeid", "name"], key: Some("filetypeid") },
    TableDef { name: "dataquality", columns: &["qualityid", "dataqualityflag"], key: Some("qualityid") },
    TableDef { name: "steps",
               columns: &["stepid", "stepname", "applicationname", "applicationversion", "optionfiles", "dddb",
                          "conddb", "extrapackages", "visible", "processingpass", "usable", "dqtag",
                          "optionsformat", "ismulticore", "systemconfig", "mctck", "inserttimestamps"],
               key: Some("stepid") },
    TableDef { name: "stepscontainer", columns: &["production", "stepid", "step"], key: None },
    TableDef { name: "runtimeprojects", columns: &["stepid", "runtimeprojectid"], key: None },
];
