//! Nodos y rutas de processing pass.
//!
//! Un processing pass es un bosque almacenado como tabla plana con puntero al
//! padre. Una ruta (`/Real Data/Reco14/Stripping20`) identifica un nodo sólo
//! cuando se compara completa: el mismo nombre de hoja puede repetirse bajo
//! padres distintos.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DomainError;

pub const PATH_SEPARATOR: char = '/';

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingPassNode {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

impl ProcessingPassNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Ruta normalizada (siempre comienza con `/`, sin segmentos vacíos).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PassPath {
    segments: Vec<String>,
}

impl PassPath {
    /// Normaliza la ruta: antepone `/` si falta y descarta segmentos vacíos
    /// (dobles separadores o separador final).
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation("empty processing pass path".into()));
        }
        let segments: Vec<String> = trimmed.split(PATH_SEPARATOR)
                                           .map(str::trim)
                                           .filter(|s| !s.is_empty())
                                           .map(str::to_string)
                                           .collect();
        Ok(Self { segments })
    }

    pub fn from_segments<I, S>(segments: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        Self { segments: segments.into_iter().map(Into::into).collect() }
    }

    /// Ruta compuesta sólo por el separador: no restringe nada.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn leaf(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for PassPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "{PATH_SEPARATOR}");
        }
        for s in &self.segments {
            write!(f, "{PATH_SEPARATOR}{s}")?;
        }
        Ok(())
    }
}
