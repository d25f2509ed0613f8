//! Núcleo de acceso al catálogo de bookkeeping.
//!
//! - `composer`: facetas dispersas a un fragmento FROM/WHERE estructurado.
//! - `passes`: rutas `/A/B/C` sobre el bosque de processing pass.
//! - `provenance`: ancestros y descendientes de archivos por el grafo de
//!   jobs.
//! - `shaper`: sobre `{ParameterNames, Records, TotalRecords}`.
//! - `store`: capacidad de almacenamiento consumida (y `InMemoryCatalog`).
//!
//! `Bookkeeping` reúne las operaciones públicas.

pub mod client;
pub mod composer;
pub mod constants;
pub mod errors;
pub mod facets;
pub mod passes;
pub mod provenance;
pub mod schema;
pub mod shaper;
pub mod sql;
pub mod store;

pub use client::{Bookkeeping, Clock};
pub use composer::Composition;
pub use errors::CatalogError;
pub use facets::{CatalogQuery, FacetMap, SortSpec};
pub use passes::{MaxPlusOne, NodeIdAllocator, PassResolver};
pub use provenance::{AncestorsResult, DescendantsResult, ProvenanceGraph, StoreProvenance};
pub use shaper::ShapedResult;
pub use store::{CatalogStore, InMemoryCatalog, Row, SqlValue, StoreError};
