mod support;

use bk_core::{CatalogError, CatalogStore, NodeIdAllocator, SqlValue, StoreError};
use support::*;

#[test]
fn full_path_disambiguates_repeated_leaf_names() {
    let bk = shared();
    assert_eq!(bk.resolve_processing_pass_id("/Real Data/Reco14").unwrap(), 2);
    assert_eq!(bk.resolve_processing_pass_id("/Sim08/Reco14").unwrap(), 5);
    assert_eq!(bk.resolve_processing_pass_id("Sim08/Reco14/Stripping20/").unwrap(), 6);
    assert!(matches!(bk.resolve_processing_pass_id("/Reco14"), Err(CatalogError::NotFound(_))));
    assert_eq!(bk.resolve_processing_pass_id("/").unwrap_err().facet(), Some("ProcessingPass"));
}

#[test]
fn added_path_resolves_to_its_last_created_node() {
    let (_, bk) = fresh();
    assert_eq!(bk.add_processing_pass_path("/Real Data/Reco14/Stripping21").unwrap(), vec![7]);
    assert_eq!(bk.resolve_processing_pass_id("/Real Data/Reco14/Stripping21").unwrap(), 7);

    let created = bk.add_processing_pass_path("/Sim09/Reco14/Stripping21").unwrap();
    assert_eq!(created, vec![8, 9, 10]);
    assert_eq!(bk.resolve_processing_pass_id("/Sim09/Reco14/Stripping21").unwrap(), 10);
    assert_eq!(bk.resolve_processing_pass_id("/Real Data/Reco14/Stripping21").unwrap(), 7);

    assert!(bk.add_processing_pass_path("/Sim09/Reco14").unwrap().is_empty());
}

#[test]
fn paths_deeper_than_the_hop_limit_are_rejected() {
    let (cat, bk) = fresh();
    let err = bk.add_processing_pass_path("/a/b/c/d/e/f/g").unwrap_err();
    assert_eq!(err.facet(), Some("ProcessingPass"));
    assert_eq!(cat.row_count("processing"), 6);
    assert_eq!(bk.add_processing_pass_path("/a/b/c/d/e/f").unwrap().len(), 6);
    assert_eq!(bk.resolve_processing_pass_id("/a/b/c/d/e/f").unwrap(), 12);
}

/// Asignador que simula a otro escritor que ya usó el id.
struct Stale(i64);

impl NodeIdAllocator for Stale {
    fn allocate<S: CatalogStore + ?Sized>(&self, _: &S) -> Result<i64, StoreError> {
        Ok(self.0)
    }
}

#[test]
fn colliding_ids_surface_as_store_errors() {
    let (cat, bk) = fresh();
    let err = bk.add_processing_pass_path_with("/Real Data/Reco15", &Stale(3)).unwrap_err();
    assert!(matches!(err, CatalogError::Store(StoreError::Query(ref m)) if m.contains("unique")), "{err}");
    assert_eq!(cat.row_count("processing"), 6);
}

#[test]
fn listing_follows_the_subtree() {
    let bk = shared();
    assert_eq!(bk.list_processing_paths(1).unwrap(),
               vec!["/Real Data", "/Real Data/Reco14", "/Real Data/Reco14/Stripping20"]);
    assert_eq!(bk.list_processing_paths(6).unwrap(), vec!["/Sim08/Reco14/Stripping20"]);
    assert!(matches!(bk.list_processing_paths(99), Err(CatalogError::NotFound(_))));

    let roots = bk.list_processing_pass_children("/").unwrap();
    assert_eq!(roots.parameter_names, vec!["ID", "Name"]);
    assert_eq!(names(&roots, "Name"), vec!["Real Data", "Sim08"]);
    let children = bk.list_processing_pass_children("/Sim08").unwrap();
    assert_eq!(children.records, vec![vec![SqlValue::Int(5), SqlValue::Text("Reco14".into())]]);
}
