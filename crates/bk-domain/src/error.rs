use thiserror::Error;

/// Errores del dominio de bookkeeping (validación de literales y entidades).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{0}")]
    Validation(String),
    #[error("invalid literal for {field}: {value:?}")]
    InvalidLiteral { field: &'static str, value: String },
}
