//! Pruebas contra Postgres real (requiere DATABASE_URL válido en entorno).


use bk_core::{CatalogStore, SqlValue, StoreError};
use test_support::with_store;

#[test]
fn scalar_query_round_trips_through_json_rows() {
    let Some(rows) = with_store(|store| store.query("SELECT 1 AS one, 'RAW' AS name, NULL AS missing").unwrap()) else {
        eprintln!("DATABASE_URL no definido: omitiendo test");
        return;
    };
    assert_eq!(rows, vec![vec![SqlValue::Int(1), SqlValue::Text("RAW".into()), SqlValue::Null]]);
}

#[test]
fn missing_table_is_a_query_error() {
    let Some(err) = with_store(|store| store.query("SELECT * FROM no_such_table_bk").unwrap_err()) else {
        eprintln!("DATABASE_URL no definido: omitiendo test");
        return;
    };
    assert!(matches!(err, StoreError::Query(_)), "{err}");
}
