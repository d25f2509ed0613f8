mod support;

use bk_core::{CatalogError, FacetMap, SqlValue};
use serde_json::json;
use support::*;

fn facets(v: serde_json::Value) -> FacetMap {
    FacetMap::from_json(v).unwrap()
}

#[test]
fn sentinel_facets_produce_only_structural_joins() {
    let (cat, bk) = fresh();
    let r = bk.find(&facets(json!({"EventType": "ALL", "Production": null, "Visible": "All",
                                   "ReplicaFlag": "ALL", "RunNumber": "ALL", "ProcessingPass": "ALL"})))
              .unwrap();
    assert_eq!(r.total_records, 7);
    assert_eq!(r.parameter_names.len(), 25);
    let stmts = cat.statements();
    assert_eq!(stmts.len(), 1);
    assert!(stmts[0].ends_with("FROM files f, jobs j, filetypes ft, dataquality d \
                                WHERE f.jobid = j.jobid AND f.filetypeid = ft.filetypeid \
                                AND f.qualityid = d.qualityid ORDER BY f.filename ASC"),
            "{}",
            stmts[0]);
    let mut sorted = names(&r, "FileName");
    sorted.sort();
    assert_eq!(names(&r, "FileName"), sorted);
}

#[test]
fn run_list_and_range_are_a_union() {
    let bk = shared();
    let both = bk.find(&facets(json!({"RunNumber": [1010], "StartRun": 1015, "EndRun": 1025}))).unwrap();
    assert_eq!(both.total_records, 6);
    let mut runs = ints(&both, "RunNumber");
    runs.sort();
    runs.dedup();
    assert_eq!(runs, vec![1010, 1020]);

    let range = bk.find(&facets(json!({"StartRun": 1015, "EndRun": 1025}))).unwrap();
    assert_eq!(names(&range, "FileName"), vec![RECO_1020, RAW_1020]);
    let listed = bk.find(&facets(json!({"RunNumber": [1010]}))).unwrap();
    assert_eq!(listed.total_records, 4);
}

#[test]
fn processing_pass_is_resolved_by_full_path() {
    let bk = shared();
    let r = bk.find(&facets(json!({"ProcessingPass": "/Real Data/Reco14/Stripping20"}))).unwrap();
    assert_eq!(names(&r, "FileName"), vec![BHADRON_1010, DIMUON_1010]);
    let r = bk.find(&facets(json!({"ProcessingPass": "/Sim08/Reco14/Stripping20"}))).unwrap();
    assert_eq!(names(&r, "FileName"), vec![SIM_1]);
    let r = bk.find(&facets(json!({"ProcessingPass": "Real Data/Reco14"}))).unwrap();
    assert_eq!(names(&r, "FileName"), vec![RECO_1010, RECO_1020]);
}

#[test]
fn unknown_processing_pass_is_an_invalid_facet() {
    let err = shared().find(&facets(json!({"ProcessingPass": "/Real Data/Reco99"}))).unwrap_err();
    assert_eq!(err.facet(), Some("ProcessingPass"));
}

#[test]
fn raw_file_type_narrows_to_real_data() {
    let (cat, bk) = fresh();
    let r = bk.find(&facets(json!({"FileType": "RAW"}))).unwrap();
    assert_eq!(names(&r, "FileName"), vec![RAW_1010, RAW_1020]);
    assert!(cat.statements().last().unwrap().contains("ft.name = 'RAW' AND j.production < 0"));
}

#[test]
fn paging_reports_total_before_the_window() {
    let bk = shared();
    let r = bk.find(&facets(json!({"StartItem": 0, "MaxItem": 2}))).unwrap();
    assert_eq!((r.records.len(), r.total_records), (2, 7));
    let r = bk.find(&facets(json!({"StartItem": 6, "MaxItem": 5}))).unwrap();
    assert_eq!((r.records.len(), r.total_records), (1, 7));
    let err = bk.find(&facets(json!({"StartItem": 0}))).unwrap_err();
    assert_eq!(err.facet(), Some("MaxItem"));
}

#[test]
fn flags_filter_and_reject_unknown_literals() {
    let bk = shared();
    let r = bk.find(&facets(json!({"ReplicaFlag": "No"}))).unwrap();
    assert_eq!(names(&r, "FileName"), vec![DIMUON_1010]);
    let r = bk.find(&facets(json!({"Visible": "N"}))).unwrap();
    assert_eq!(names(&r, "FileName"), vec![DIMUON_1010]);
    assert_eq!(bk.find(&facets(json!({"Visible": "Maybe"}))).unwrap_err().facet(), Some("Visible"));
    assert_eq!(bk.find(&facets(json!({"ReplicaFlag": "Y"}))).unwrap_err().facet(), Some("ReplicaFlag"));
}

#[test]
fn configuration_and_conditions() {
    let bk = shared();
    let r = bk.find(&facets(json!({"ConfigName": "MC", "ConfigVersion": "2011"}))).unwrap();
    assert_eq!(names(&r, "FileName"), vec![SIM_1]);
    let r = bk.find(&facets(json!({"ConfigName": ["LHCb", "MC"]}))).unwrap();
    assert_eq!(r.total_records, 7);

    let r = bk.find(&facets(json!({"ConditionDescription": DAQ_DESCRIPTION}))).unwrap();
    assert_eq!(r.total_records, 6);
    let r = bk.find(&facets(json!({"ConditionDescription": SIM_DESCRIPTION}))).unwrap();
    assert_eq!(names(&r, "FileName"), vec![SIM_1]);
    let err = bk.find(&facets(json!({"ConditionDescription": "Beam450GeV"}))).unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));

    let err = bk.find(&facets(json!({"SimulationCondition": 20, "DataTakingCondition": 10}))).unwrap_err();
    assert_eq!(err.facet(), Some("ConditionDescription"));
}

#[test]
fn open_ended_date_range_ends_at_the_clock() {
    let (cat, bk) = fresh();
    let r = bk.find(&facets(json!({"StartDate": "2011-06-03"}))).unwrap();
    assert_eq!(names(&r, "FileName"), vec![BHADRON_1010, DIMUON_1010, SIM_1]);
    assert!(cat.statements()
               .last()
               .unwrap()
               .contains("f.inserttimestamp <= TIMESTAMP '2011-07-01 00:00:00'"));
}

#[test]
fn quality_tck_and_event_type() {
    let bk = shared();
    let r = bk.find(&facets(json!({"DataQuality": "BAD"}))).unwrap();
    assert_eq!(names(&r, "FileName"), vec![RAW_1020]);
    assert_eq!(bk.find(&facets(json!({"TCK": "0x0094003d"}))).unwrap().total_records, 7);
    assert!(bk.find(&facets(json!({"TCK": ["0xdead"]}))).unwrap().is_empty());
    let r = bk.find(&facets(json!({"EventType": 11102003}))).unwrap();
    assert_eq!(names(&r, "FileName"), vec![SIM_1]);
    assert_eq!(bk.find(&facets(json!({"EventType": [90000000]}))).unwrap().total_records, 6);
    assert_eq!(bk.find(&facets(json!({"Production": ["x"]}))).unwrap_err().facet(), Some("Production"));
}

#[test]
fn sort_by_parameter_name() {
    let bk = shared();
    let r = bk.find(&facets(json!({"Sort": {"Items": "EventStat", "Order": "Desc"}}))).unwrap();
    assert_eq!(names(&r, "FileName")[0], SIM_1);
    assert_eq!(bk.find(&facets(json!({"Sort": {"Items": "Colour"}}))).unwrap_err().facet(), Some("Sort"));
    assert_eq!(bk.find(&facets(json!({"Sort": {"Items": "EventStat", "Order": "Sideways"}})))
                 .unwrap_err()
                 .facet(),
               Some("Sort"));
}

#[test]
fn runs_are_real_data_only() {
    let bk = shared();
    assert_eq!(ints(&bk.get_runs(&FacetMap::new()).unwrap(), "RunNumber"), vec![1010, 1020]);
    let r = bk.get_runs(&facets(json!({"DataQuality": "OK"}))).unwrap();
    assert_eq!(ints(&r, "RunNumber"), vec![1010]);
}

#[test]
fn productions_come_from_the_output_view() {
    let bk = shared();
    let all = bk.get_productions(&FacetMap::new()).unwrap();
    assert_eq!(all.parameter_names, vec!["Production/RunNumber"]);
    assert_eq!(ints(&all, "Production/RunNumber"), vec![-1000, 2000, 3000, 4000]);
    let hidden = bk.get_productions(&facets(json!({"Visible": "N"}))).unwrap();
    assert_eq!(ints(&hidden, "Production/RunNumber"), vec![3000]);
    let raw = bk.get_productions(&facets(json!({"FileType": "RAW"}))).unwrap();
    assert_eq!(ints(&raw, "Production/RunNumber"), vec![-1000]);
    let reco = bk.get_productions(&facets(json!({"ProcessingPass": "/Real Data/Reco14"}))).unwrap();
    assert_eq!(ints(&reco, "Production/RunNumber"), vec![2000]);
    let sim = bk.get_productions(&facets(json!({"EventType": 11102003}))).unwrap();
    assert_eq!(ints(&sim, "Production/RunNumber"), vec![4000]);
}

#[test]
fn files_summary_aggregates_the_selection() {
    let bk = shared();
    let r = bk.get_files_summary(&facets(json!({"ProcessingPass": "/Real Data/Reco14/Stripping20"}))).unwrap();
    assert_eq!(r.parameter_names, vec!["NbofFiles", "NumberOfEvents", "FileSize", "Luminosity", "InstLuminosity"]);
    assert_eq!(r.records,
               vec![vec![SqlValue::Int(2),
                         SqlValue::Int(900),
                         SqlValue::Int(9000),
                         SqlValue::Float(3.0),
                         SqlValue::Float(1.0)]]);
}
