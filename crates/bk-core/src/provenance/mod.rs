//! Motor de recorrido de procedencia.
//!
//! Cada semilla se expande de forma independiente con una función recursiva
//! pura que devuelve su `Expansion`; el llamador particiona los resultados por
//! semilla. La única protección contra ciclos es el contador de profundidad,
//! acotado a `[MIN_TRAVERSAL_DEPTH, MAX_TRAVERSAL_DEPTH]`. Un archivo
//! alcanzado por dos caminos se expande por ambos (sin caché de visitados) y
//! aparece una sola vez en la lista de nombres.

pub mod ancestors;
pub mod descendants;
pub mod source;

use bk_domain::FileMetadata;
use indexmap::{IndexMap, IndexSet};

use crate::constants::{MAX_TRAVERSAL_DEPTH, MIN_TRAVERSAL_DEPTH};

pub use ancestors::{ancestors, AncestorsResult};
pub use descendants::{descendants, DescendantsResult};
pub use source::{LinkedFile, ProvenanceGraph, StoreProvenance};

/// Acota la profundidad pedida a `[1, 10]`.
pub fn clamp_depth(depth: i64) -> usize {
    depth.clamp(MIN_TRAVERSAL_DEPTH, MAX_TRAVERSAL_DEPTH) as usize
}

/// Archivos alcanzados desde una semilla.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    pub names: IndexSet<String>,
    pub metadata: IndexMap<String, FileMetadata>,
}

impl Expansion {
    /// Registra un archivo; `keep_metadata` falso lo deja fuera de los
    /// metadatos pero no de los nombres.
    fn record(&mut self, file: &LinkedFile, keep_metadata: bool) {
        self.names.insert(file.name.clone());
        if keep_metadata {
            self.metadata.entry(file.name.clone()).or_insert_with(|| file.metadata.clone());
        }
    }

    fn merge(&mut self, other: Expansion) {
        self.names.extend(other.names);
        for (name, meta) in other.metadata {
            self.metadata.entry(name).or_insert(meta);
        }
    }
}
