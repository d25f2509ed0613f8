#![allow(dead_code)]

//! Catálogo de prueba compartido.
//!
//! Bosque de processing pass:
//!   1 /Real Data, 2 /Real Data/Reco14, 3 /Real Data/Reco14/Stripping20,
//!   4 /Sim08, 5 /Sim08/Reco14, 6 /Sim08/Reco14/Stripping20
//!
//! Grafo de producción (job: entradas -> salidas):
//!   1 (-1000, run 1010): -> RAW_1010
//!   2 (-1000, run 1020): -> RAW_1020
//!   3 (2000, run 1010): RAW_1010 -> RECO_1010
//!   4 (3000, run 1010): RECO_1010 -> BHADRON_1010, DIMUON_1010 (sin réplica, invisible)
//!   5 (2000, run 1020): RAW_1020 -> RECO_1020
//!   6 (4000, sin run): -> SIM_1

use std::sync::Arc;

use bk_core::{Bookkeeping, InMemoryCatalog};
use bk_domain::{Configuration, ConditionRef, DataTakingCondition, FileRecord, Job, ProcessingPassNode, Production,
                ProductionId, ProductionStep, ReplicaFlag, SimulationCondition, Step, Visibility};
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;

pub const RAW_1010: &str = "/lhcb/data/2011/RAW/FULL/LHCb/COLLISION11/1010/1010_0001.raw";
pub const RAW_1020: &str = "/lhcb/data/2011/RAW/FULL/LHCb/COLLISION11/1020/1020_0001.raw";
pub const RECO_1010: &str = "/lhcb/LHCb/Collision11/FULL.DST/00002000/0000/00002000_00000001_1.full.dst";
pub const RECO_1020: &str = "/lhcb/LHCb/Collision11/FULL.DST/00002000/0000/00002000_00000002_1.full.dst";
pub const BHADRON_1010: &str = "/lhcb/LHCb/Collision11/BHADRON.DST/00003000/0000/00003000_00000001_1.bhadron.dst";
pub const DIMUON_1010: &str = "/lhcb/LHCb/Collision11/DIMUON.DST/00003000/0000/00003000_00000001_1.dimuon.dst";
pub const SIM_1: &str = "/lhcb/MC/2011/ALLSTREAMS.DST/00004000/0000/00004000_00000001_1.allstreams.dst";

pub const DAQ_DESCRIPTION: &str = "Beam3500GeV-VeloClosed-MagDown";
pub const SIM_DESCRIPTION: &str = "Beam3500GeV-2011-MagDown-Nu2-Pythia8";

pub static SHARED: Lazy<Arc<InMemoryCatalog>> = Lazy::new(|| Arc::new(catalog()));

pub fn ts(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").unwrap()
}

pub fn fixed_clock() -> NaiveDateTime {
    ts("2011-07-01 00:00:00")
}

pub fn shared() -> Bookkeeping<Arc<InMemoryCatalog>> {
    Bookkeeping::new(SHARED.clone()).with_clock(fixed_clock)
}

/// Catálogo propio, para pruebas que inspeccionan sentencias o escriben.
pub fn fresh() -> (Arc<InMemoryCatalog>, Bookkeeping<Arc<InMemoryCatalog>>) {
    let cat = Arc::new(catalog());
    let bk = Bookkeeping::new(cat.clone()).with_clock(fixed_clock);
    (cat, bk)
}

pub fn step(id: i64, name: &str, app: &str, version: &str, runtime_projects: Vec<i64>) -> Step {
    Step { id,
           name: name.into(),
           application_name: app.into(),
           application_version: version.into(),
           option_files: Some(format!("$APPCONFIGOPTS/{app}/DataType-2011.py")),
           dddb: Some("head-20110914".into()),
           conddb: Some("head-20110901".into()),
           extra_packages: Some("AppConfig.v3r104".into()),
           visible: Visibility::Visible,
           usable: "Yes".into(),
           dq_tag: None,
           options_format: None,
           is_multicore: false,
           system_config: None,
           mc_tck: None,
           runtime_projects }
}

fn job(id: i64, production: i64, run: Option<i64>, inputs: Vec<i64>) -> Job {
    Job { id,
          production: ProductionId(production),
          run_number: run,
          fill_number: run.map(|r| r / 10),
          tck: Some("0x0094003d".into()),
          worker_node: Some("lxbatch.cern.ch".into()),
          job_start: Some(ts("2011-05-31 10:00:00")),
          job_end: Some(ts("2011-05-31 12:00:00")),
          total_luminosity: Some(10.0),
          input_file_ids: inputs }
}

#[allow(clippy::too_many_arguments)]
fn file(id: i64,
        name: &str,
        job_id: i64,
        event_type: i64,
        file_type: &str,
        replica: ReplicaFlag,
        visibility: Visibility,
        quality: i64,
        inserted: &str)
        -> FileRecord {
    FileRecord { id,
                 name: name.into(),
                 job_id,
                 event_type_id: Some(event_type),
                 file_type: file_type.into(),
                 file_size: Some(1000 * id),
                 event_stat: Some(100 * id),
                 luminosity: Some(1.5),
                 inst_luminosity: Some(0.5),
                 adler32: Some(format!("{id:08x}")),
                 md5sum: None,
                 guid: Some(format!("00000000-0000-0000-0000-{id:012}")),
                 replica,
                 visibility,
                 quality_id: Some(quality),
                 insert_time: Some(ts(inserted)) }
}

fn production(id: i64, pass: i64, condition: ConditionRef, config: (&str, &str), steps: &[i64]) -> Production {
    Production { id: ProductionId(id),
                 processing_pass_id: pass,
                 condition: Some(condition),
                 configuration: Configuration { name: config.0.into(), version: config.1.into() },
                 steps: steps.iter()
                             .enumerate()
                             .map(|(i, s)| ProductionStep { step_id: *s, level: i as i64 + 1 })
                             .collect() }
}

pub fn catalog() -> InMemoryCatalog {
    use ReplicaFlag::{No, Yes};
    use Visibility::{Hidden, Visible};

    let cat = InMemoryCatalog::new();
    for (id, parent, name) in [(1, None, "Real Data"),
                               (2, Some(1), "Reco14"),
                               (3, Some(2), "Stripping20"),
                               (4, None, "Sim08"),
                               (5, Some(4), "Reco14"),
                               (6, Some(5), "Stripping20")]
    {
        cat.add_processing_node(&ProcessingPassNode { id, name: name.into(), parent_id: parent }).unwrap();
    }
    cat.add_data_quality(1, "OK").unwrap();
    cat.add_data_quality(2, "BAD").unwrap();
    cat.add_data_taking_condition(&DataTakingCondition { id: 10,
                                                         description: DAQ_DESCRIPTION.into(),
                                                         detector_states: Default::default() })
       .unwrap();
    cat.add_simulation_condition(&SimulationCondition { id: 20,
                                                        description: SIM_DESCRIPTION.into(),
                                                        beam_condition: Some("beta*~3m".into()),
                                                        beam_energy: Some("3500 GeV".into()),
                                                        generator: Some("Pythia8".into()),
                                                        magnetic_field: Some("-1".into()),
                                                        detector_condition: None,
                                                        luminosity: None })
       .unwrap();

    cat.add_step(&step(13878, "Reco14", "Brunel", "v43r2p2", vec![])).unwrap();
    cat.add_step(&step(13879, "Stripping20", "DaVinci", "v32r2p1", vec![])).unwrap();
    cat.add_step(&step(13880, "Merge", "LHCb", "v36r0", vec![13878])).unwrap();

    let daq = ConditionRef::DataTaking(10);
    let collision = ("LHCb", "Collision11");
    cat.add_production(&production(-1000, 1, daq, collision, &[])).unwrap();
    cat.add_production(&production(2000, 2, daq, collision, &[13878])).unwrap();
    cat.add_production(&production(3000, 3, daq, collision, &[13879, 13880])).unwrap();
    cat.add_production(&production(4000, 6, ConditionRef::Simulation(20), ("MC", "2011"), &[13879])).unwrap();

    cat.add_production_output(-1000, 0, 90000000, "RAW", Visible, Yes).unwrap();
    cat.add_production_output(2000, 13878, 90000000, "FULL.DST", Visible, Yes).unwrap();
    cat.add_production_output(3000, 13879, 90000000, "BHADRON.DST", Visible, Yes).unwrap();
    cat.add_production_output(3000, 13879, 90000000, "DIMUON.DST", Hidden, No).unwrap();
    cat.add_production_output(4000, 13879, 11102003, "ALLSTREAMS.DST", Visible, Yes).unwrap();

    let jobs = [job(1, -1000, Some(1010), vec![]),
                job(2, -1000, Some(1020), vec![]),
                job(3, 2000, Some(1010), vec![1]),
                job(4, 3000, Some(1010), vec![3]),
                job(5, 2000, Some(1020), vec![2]),
                job(6, 4000, None, vec![])];
    for j in &jobs {
        cat.add_job(j).unwrap();
    }

    let files = [file(1, RAW_1010, 1, 90000000, "RAW", Yes, Visible, 1, "2011-06-01 08:00:00"),
                 file(2, RAW_1020, 2, 90000000, "RAW", Yes, Visible, 2, "2011-06-01 09:00:00"),
                 file(3, RECO_1010, 3, 90000000, "FULL.DST", Yes, Visible, 1, "2011-06-02 08:00:00"),
                 file(4, BHADRON_1010, 4, 90000000, "BHADRON.DST", Yes, Visible, 1, "2011-06-03 08:00:00"),
                 file(5, DIMUON_1010, 4, 90000000, "DIMUON.DST", No, Hidden, 1, "2011-06-03 08:00:00"),
                 file(6, RECO_1020, 5, 90000000, "FULL.DST", Yes, Visible, 1, "2011-06-02 09:00:00"),
                 file(7, SIM_1, 6, 11102003, "ALLSTREAMS.DST", Yes, Visible, 1, "2011-06-05 08:00:00")];
    for f in &files {
        cat.add_file(f).unwrap();
    }
    cat.clear_statements();
    cat
}

pub fn names(result: &bk_core::ShapedResult, column: &str) -> Vec<String> {
    result.values(column).into_iter().filter_map(|v| v.as_str().map(str::to_string)).collect()
}

pub fn ints(result: &bk_core::ShapedResult, column: &str) -> Vec<i64> {
    result.values(column).into_iter().filter_map(|v| v.as_i64()).collect()
}
