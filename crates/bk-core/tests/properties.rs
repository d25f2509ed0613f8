mod support;

use bk_core::FacetMap;
use bk_domain::{PassPath, SENTINEL};
use proptest::prelude::*;
use serde_json::Value;
use support::*;

const FILE_FACETS: &[&str] = &["ConfigName",
                               "ConfigVersion",
                               "ConditionDescription",
                               "ProcessingPass",
                               "EventType",
                               "Production",
                               "FileType",
                               "Visible",
                               "ReplicaFlag",
                               "DataQuality",
                               "RunNumber",
                               "StartRun",
                               "EndRun",
                               "TCK",
                               "StartDate",
                               "EndDate",
                               "JobStartDate",
                               "JobEndDate",
                               "SimulationCondition",
                               "DataTakingCondition"];

fn unconstrained() -> impl Strategy<Value = Value> {
    prop_oneof![Just(Value::Null), Just(Value::String(SENTINEL.to_string()))]
}

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9.]{0,7}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sentinel_facets_compose_to_the_empty_query(
        picked in proptest::sample::subsequence(FILE_FACETS.to_vec(), 0..FILE_FACETS.len()),
        values in proptest::collection::vec(unconstrained(), FILE_FACETS.len()),
    ) {
        let (cat, bk) = fresh();
        bk.find(&FacetMap::new()).unwrap();
        let baseline = cat.statements();
        cat.clear_statements();

        let facets = picked.iter().zip(values).fold(FacetMap::new(), |m, (name, v)| m.with(name, v));
        let r = bk.find(&facets).unwrap();
        prop_assert_eq!(r.total_records, 7);
        prop_assert_eq!(cat.statements(), baseline);
    }

    #[test]
    fn inserted_path_resolves_back_to_itself(segments in proptest::collection::vec(segment(), 1..=6)) {
        let (_, bk) = fresh();
        let path = PassPath::from_segments(segments.clone()).to_string();
        let created = bk.add_processing_pass_path(&path).unwrap();
        let id = bk.resolve_processing_pass_id(&path).unwrap();
        if let Some(last) = created.last() {
            prop_assert_eq!(id, *last);
        }
        prop_assert_eq!(bk.list_processing_paths(id).unwrap()[0].clone(), path.clone());
        prop_assert!(bk.add_processing_pass_path(&path).unwrap().is_empty());
    }
}
