//! Capacidad de almacenamiento que consume el núcleo.
//!
//! El núcleo no gestiona conexiones ni transporte: sólo necesita ejecutar una
//! consulta o invocar un procedimiento almacenado y recibir filas. `select` e
//! `insert` reciben el AST ya compuesto; por defecto se renderizan a texto
//! SQL y se delegan a `query`, pero un backend puede evaluarlos directamente
//! (ver `InMemoryCatalog`).

pub mod memory;
pub mod value;

use std::sync::Arc;

use thiserror::Error;

use crate::sql::{Insert, Select};

pub use memory::InMemoryCatalog;
pub use value::{Row, SqlValue};

/// Error del store, propagado tal cual con su mensaje.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("query failed: {0}")]
    Query(String),
    #[error("procedure {name} failed: {message}")]
    Procedure { name: String, message: String },
    #[error("cannot decode row: {0}")]
    Decode(String),
    #[error("unsupported by this store: {0}")]
    Unsupported(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub trait CatalogStore {
    /// Ejecuta texto SQL y devuelve las filas resultantes.
    fn query(&self, sql: &str) -> Result<Vec<Row>, StoreError>;

    /// Invoca un procedimiento almacenado con argumentos posicionales.
    /// `bulk` se pasa como argumento de tipo arreglo al final.
    fn call_procedure(&self,
                      name: &str,
                      args: &[SqlValue],
                      expects_output: bool,
                      bulk: Option<&[SqlValue]>)
                      -> Result<Vec<Row>, StoreError>;

    fn select(&self, select: &Select) -> Result<Vec<Row>, StoreError> {
        self.query(&select.to_sql())
    }

    fn insert(&self, insert: &Insert) -> Result<(), StoreError> {
        self.query(&insert.to_sql()).map(|_| ())
    }
}

impl<T: CatalogStore + ?Sized> CatalogStore for &T {
    fn query(&self, sql: &str) -> Result<Vec<Row>, StoreError> {
        (**self).query(sql)
    }
    fn call_procedure(&self,
                      name: &str,
                      args: &[SqlValue],
                      expects_output: bool,
                      bulk: Option<&[SqlValue]>)
                      -> Result<Vec<Row>, StoreError> {
        (**self).call_procedure(name, args, expects_output, bulk)
    }
    fn select(&self, select: &Select) -> Result<Vec<Row>, StoreError> {
        (**self).select(select)
    }
    fn insert(&self, insert: &Insert) -> Result<(), StoreError> {
        (**self).insert(insert)
    }
}

impl<T: CatalogStore + ?Sized> CatalogStore for Arc<T> {
    fn query(&self, sql: &str) -> Result<Vec<Row>, StoreError> {
        (**self).query(sql)
    }
    fn call_procedure(&self,
                      name: &str,
                      args: &[SqlValue],
                      expects_output: bool,
                      bulk: Option<&[SqlValue]>)
                      -> Result<Vec<Row>, StoreError> {
        (**self).call_procedure(name, args, expects_output, bulk)
    }
    fn select(&self, select: &Select) -> Result<Vec<Row>, StoreError> {
        (**self).select(select)
    }
    fn insert(&self, insert: &Insert) -> Result<(), StoreError> {
        (**self).insert(insert)
    }
}
