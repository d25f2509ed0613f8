use bookkeeping_rust::demo::{self, DST_LFN, RAW_LFN, RECO_LFN};
use bookkeeping_rust::{Bookkeeping, FacetMap, InMemoryCatalog, SqlValue};
use once_cell::sync::Lazy;
use serde_json::json;

static CATALOG: Lazy<InMemoryCatalog> = Lazy::new(|| demo::sample_catalog().unwrap());

fn bk() -> Bookkeeping<&'static InMemoryCatalog> {
    Bookkeeping::new(&*CATALOG)
}

#[test]
fn demo_chain_is_walkable_both_ways() {
    let up = bk().get_file_ancestors(&[DST_LFN.to_string()], 3, true);
    assert_eq!(up.successful[DST_LFN], vec![RECO_LFN, RAW_LFN]);
    let down = bk().get_file_descendants(&[RAW_LFN.to_string()], 3, 0, true);
    assert_eq!(down.successful[RAW_LFN], vec![RECO_LFN, DST_LFN]);
    assert!(down.not_processed.is_empty());
}

#[test]
fn demo_find_by_processing_pass() {
    let facets = FacetMap::from_json(json!({"ProcessingPass": "/Real Data/Reco14/Stripping20"})).unwrap();
    let r = bk().find(&facets).unwrap();
    assert_eq!(r.values("FileName"), vec![&SqlValue::Text(DST_LFN.into())]);
}

#[test]
fn demo_runs_and_production_steps() {
    let runs = bk().get_runs(&FacetMap::new()).unwrap();
    assert_eq!(runs.values("RunNumber"), vec![&SqlValue::Int(114753)]);
    let steps = bk().get_production_steps(20330).unwrap();
    assert_eq!(steps.values("StepId"), vec![&SqlValue::Int(17001)]);
}

#[test]
fn each_sample_catalog_is_independent() {
    let cat = demo::sample_catalog().unwrap();
    let local = Bookkeeping::new(&cat);
    assert_eq!(local.add_processing_pass_path("/Real Data/Reco15").unwrap(), vec![4]);
    assert!(bk().resolve_processing_pass_id("/Real Data/Reco15").is_err());
}
