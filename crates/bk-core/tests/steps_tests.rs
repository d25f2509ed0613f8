mod support;

use bk_core::{CatalogError, FacetMap, InMemoryCatalog, SqlValue, StoreError};
use serde_json::json;
use support::*;

#[test]
fn step_id_facet_selects_exactly_that_step() {
    let bk = shared();
    let r = bk.get_available_steps(&FacetMap::from_json(json!({"StepId": 13878})).unwrap()).unwrap();
    assert_eq!(ints(&r, "StepId"), vec![13878]);
    assert_eq!(r.total_records, 1);
    assert_eq!(r.parameter_names[0], "StepId");
    assert_eq!(r.parameter_names.len(), 16);
}

#[test]
fn total_records_counts_before_paging() {
    let (cat, bk) = fresh();
    let r = bk.get_available_steps(&FacetMap::from_json(json!({"StartItem": 0, "MaxItem": 1})).unwrap()).unwrap();
    assert_eq!(ints(&r, "StepId"), vec![13880]);
    assert_eq!(r.total_records, 3);
    let stmts = cat.statements();
    assert!(stmts[0].starts_with("SELECT COUNT(*) FROM steps s"));
    assert!(stmts[1].ends_with("ORDER BY s.stepid DESC OFFSET 0 ROWS FETCH NEXT 1 ROWS ONLY"));
}

#[test]
fn steps_filter_by_application_and_sort() {
    let bk = shared();
    let facets = FacetMap::new().with("ApplicationName", json!(["Brunel", "DaVinci"]))
                                .with("Sort", json!({"Items": "StepName", "Order": "Asc"}));
    let r = bk.get_available_steps(&facets).unwrap();
    assert_eq!(names(&r, "StepName"), vec!["Reco14", "Stripping20"]);
    assert_eq!(r.total_records, 2);

    let bad = FacetMap::new().with("Sort", json!({"Items": "StepName", "Order": "Up"}));
    assert_eq!(bk.get_available_steps(&bad).unwrap_err().facet(), Some("Sort"));
}

#[test]
fn get_step_carries_runtime_projects() {
    let bk = shared();
    let merge = bk.get_step(13880).unwrap();
    assert_eq!(merge.runtime_projects, vec![13878]);
    assert_eq!(merge.application_name, "LHCb");
    assert!(bk.get_step(13878).unwrap().runtime_projects.is_empty());
    assert!(matches!(bk.get_step(1), Err(CatalogError::NotFound(_))));
}

#[test]
fn runtime_project_must_reference_an_existing_step() {
    let cat = InMemoryCatalog::new();
    let err = cat.add_step(&step(1, "Orphan", "Gauss", "v45r0", vec![99])).unwrap_err();
    assert!(matches!(err, StoreError::Query(m) if m.contains("foreign key")));
    assert_eq!(cat.row_count("steps"), 0);
}

#[test]
fn production_steps_are_ordered_by_level() {
    let bk = shared();
    let r = bk.get_production_steps(3000).unwrap();
    assert_eq!(r.parameter_names.last().map(String::as_str), Some("Level"));
    assert_eq!(ints(&r, "StepId"), vec![13879, 13880]);
    assert_eq!(r.values("Level"), vec![&SqlValue::Int(1), &SqlValue::Int(2)]);
    assert!(bk.get_production_steps(-1000).unwrap().is_empty());
}
