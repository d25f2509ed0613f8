//! Catálogo de demostración en memoria: una cadena RAW -> FULL.DST -> DST
//! de un run de datos reales.

use bk_core::{InMemoryCatalog, StoreError};
use bk_domain::{ConditionRef, Configuration, DataTakingCondition, FileRecord, Job, ProcessingPassNode, Production,
                ProductionId, ProductionStep, ReplicaFlag, Step, Visibility};
use chrono::NaiveDate;

pub const RAW_LFN: &str = "/lhcb/data/2012/RAW/FULL/LHCb/COLLISION12/114753/114753_0000000001.raw";
pub const RECO_LFN: &str = "/lhcb/LHCb/Collision12/FULL.DST/00020198/0000/00020198_00000001_1.full.dst";
pub const DST_LFN: &str = "/lhcb/LHCb/Collision12/EW.DST/00020330/0000/00020330_00000001_1.ew.dst";

fn step(id: i64, name: &str, app: &str, version: &str) -> Step {
    Step { id,
           name: name.into(),
           application_name: app.into(),
           application_version: version.into(),
           option_files: None,
           dddb: Some("dddb-20120831".into()),
           conddb: Some("cond-20120831".into()),
           extra_packages: None,
           visible: Visibility::Visible,
           usable: "Yes".into(),
           dq_tag: None,
           options_format: None,
           is_multicore: false,
           system_config: None,
           mc_tck: None,
           runtime_projects: Vec::new() }
}

fn file(id: i64, name: &str, job_id: i64, file_type: &str, day: u32) -> FileRecord {
    FileRecord { id,
                 name: name.into(),
                 job_id,
                 event_type_id: Some(90000000),
                 file_type: file_type.into(),
                 file_size: Some(3_000_000_000 / id),
                 event_stat: Some(50_000 / id),
                 luminosity: Some(12.5),
                 inst_luminosity: Some(0.4),
                 adler32: None,
                 md5sum: None,
                 guid: None,
                 replica: ReplicaFlag::Yes,
                 visibility: Visibility::Visible,
                 quality_id: Some(1),
                 insert_time: NaiveDate::from_ymd_opt(2012, 9, day).and_then(|d| d.and_hms_opt(12, 0, 0)) }
}

fn job(id: i64, production: i64, inputs: Vec<i64>) -> Job {
    Job { id,
          production: ProductionId(production),
          run_number: Some(114753),
          fill_number: Some(3050),
          tck: Some("0x00990042".into()),
          worker_node: None,
          job_start: None,
          job_end: None,
          total_luminosity: None,
          input_file_ids: inputs }
}

/// Construye el catálogo de demostración.
pub fn sample_catalog() -> Result<InMemoryCatalog, StoreError> {
    let cat = InMemoryCatalog::new();
    for (id, parent, name) in [(1, None, "Real Data"), (2, Some(1), "Reco14"), (3, Some(2), "Stripping20")] {
        cat.add_processing_node(&ProcessingPassNode { id, name: name.into(), parent_id: parent })?;
    }
    cat.add_data_quality(1, "OK")?;
    cat.add_data_taking_condition(&DataTakingCondition { id: 1,
                                                         description: "Beam4000GeV-VeloClosed-MagUp".into(),
                                                         detector_states: Default::default() })?;
    cat.add_step(&step(17000, "Reco14", "Brunel", "v43r2p2"))?;
    cat.add_step(&step(17001, "Stripping20", "DaVinci", "v32r2p1"))?;

    let config = Configuration { name: "LHCb".into(), version: "Collision12".into() };
    for (id, pass, steps) in [(-114753, 1, vec![]), (20198, 2, vec![17000]), (20330, 3, vec![17001])] {
        cat.add_production(&Production { id: ProductionId(id),
                                         processing_pass_id: pass,
                                         condition: Some(ConditionRef::DataTaking(1)),
                                         configuration: config.clone(),
                                         steps: steps.into_iter()
                                                     .map(|step_id| ProductionStep { step_id, level: 1 })
                                                     .collect() })?;
    }
    cat.add_production_output(-114753, 0, 90000000, "RAW", Visibility::Visible, ReplicaFlag::Yes)?;
    cat.add_production_output(20198, 17000, 90000000, "FULL.DST", Visibility::Visible, ReplicaFlag::Yes)?;
    cat.add_production_output(20330, 17001, 90000000, "EW.DST", Visibility::Visible, ReplicaFlag::Yes)?;

    cat.add_job(&job(1, -114753, vec![]))?;
    cat.add_job(&job(2, 20198, vec![1]))?;
    cat.add_job(&job(3, 20330, vec![2]))?;
    cat.add_file(&file(1, RAW_LFN, 1, "RAW", 10))?;
    cat.add_file(&file(2, RECO_LFN, 2, "FULL.DST", 11))?;
    cat.add_file(&file(3, DST_LFN, 3, "EW.DST", 12))?;
    cat.clear_statements();
    Ok(cat)
}
