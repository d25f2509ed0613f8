//! Errores del núcleo.
//!
//! - `InvalidFacet`: entrada de consulta mal formada o contradictoria; no se
//!   reintenta y lleva el nombre de la faceta.
//! - `NotFound`: una ruta, condición o archivo referenciado no existe.
//! - `Store`: el store externo falló; se propaga con su mensaje.
//!
//! Los fallos parciales del recorrido de procedencia no son errores: quedan
//! particionados por semilla en `Failed` / `NotProcessed`.

use bk_domain::DomainError;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CatalogError {
    #[error("invalid facet {facet}: {reason}")]
    InvalidFacet { facet: String, reason: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CatalogError {
    pub fn invalid(facet: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFacet { facet: facet.to_string(), reason: reason.into() }
    }

    /// Adjunta el nombre de faceta a un error de dominio.
    pub fn from_domain(facet: &str, err: DomainError) -> Self {
        Self::invalid(facet, err.to_string())
    }

    pub fn facet(&self) -> Option<&str> {
        match self {
            Self::InvalidFacet { facet, .. } => Some(facet),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_facet_format() {
        let err = CatalogError::invalid("Sort", "unknown order direction");
        assert_eq!(err.to_string(), "invalid facet Sort: unknown order direction");
        assert_eq!(err.facet(), Some("Sort"));
    }

    #[test]
    fn store_error_is_transparent() {
        let err: CatalogError = StoreError::Query("ORA-00942".into()).into();
        assert_eq!(err.to_string(), "query failed: ORA-00942");
    }
}
