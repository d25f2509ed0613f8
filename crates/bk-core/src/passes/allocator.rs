//! Asignación de ids para nodos nuevos de processing pass.
//!
//! Los ids no vienen de una secuencia del store: `MaxPlusOne` lee `MAX(id)`
//! y devuelve el siguiente. Dos escritores concurrentes pueden obtener el
//! mismo id; quien use el asignador debe serializar las inserciones (un único
//! escritor o una secuencia del lado del store).

use crate::schema::{self, processing};
use crate::sql::{Select, SelectItem};
use crate::store::{CatalogStore, StoreError};

pub trait NodeIdAllocator {
    fn allocate<S: CatalogStore + ?Sized>(&self, store: &S) -> Result<i64, StoreError>;
}

/// `MAX(pp.id) + 1`, o 1 si el bosque está vacío.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxPlusOne;

impl NodeIdAllocator for MaxPlusOne {
    fn allocate<S: CatalogStore + ?Sized>(&self, store: &S) -> Result<i64, StoreError> {
        let mut select = Select { items: vec![SelectItem::Max(processing::ID)], ..Default::default() };
        select.tables.add(schema::PROCESSING);
        let rows = store.select(&select)?;
        match rows.first().and_then(|r| r.first()) {
            None => Ok(1),
            Some(v) if v.is_null() => Ok(1),
            Some(v) => v.as_i64()
                        .map(|max| max + 1)
                        .ok_or_else(|| StoreError::Decode(format!("MAX(id) is not an integer: {v:?}"))),
        }
    }
}
