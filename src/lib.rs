//! Bookkeeping Rust
//!
//! Librería raíz del workspace:
//! - Re-exporta la API pública de `bk-core` y los tipos de `bk-domain`.
//! - Expone `demo` con un catálogo en memoria listo para usar.
//! - Expone `errors` con el error agregado de las aplicaciones.

pub mod demo;
pub mod errors;

pub use bk_core::{AncestorsResult, Bookkeeping, CatalogError, CatalogStore, DescendantsResult, FacetMap,
                  InMemoryCatalog, ShapedResult, SqlValue, StoreError};
pub use bk_domain as domain;
pub use errors::AppError;
